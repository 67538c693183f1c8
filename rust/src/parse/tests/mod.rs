mod expr;
mod stmt;

use crate::lex::Lexer;
use crate::parse::expr::parse_expr;
use crate::parse::parser::Parser;
use crate::parse::stmt::parse_stmt;
use crate::serialise::serialise_node;
use serde_json::Value;

fn parse_expr_and_serialise(input: &str) -> Value {
    let mut parser = Parser::new(Lexer::new(input.as_bytes().to_vec()));
    let scope = parser.scope_map().create_global_scope();
    let node_id = parse_expr(&mut parser, scope).unwrap();
    let (node_map, _) = parser.take();
    serialise_node(&node_map, node_id)
}

fn parse_stmt_and_serialise(input: &str) -> Value {
    let mut parser = Parser::new(Lexer::new(input.as_bytes().to_vec()));
    let scope = parser.scope_map().create_global_scope();
    let node_id = parse_stmt(&mut parser, scope).unwrap();
    let (node_map, _) = parser.take();
    serialise_node(&node_map, node_id)
}
