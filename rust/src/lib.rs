use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::emit::emit_program;
use crate::emit::EmitOptions;
use crate::error::SyntaxResult;
use crate::lex::Lexer;
use crate::minify::minify_tree;
use crate::minify::MinifyOptions;
use crate::parse::parser::Parser;
use crate::parse::toplevel::parse_top_level;
use crate::symbol::ScopeId;
use crate::symbol::ScopeMap;

pub mod ast;
pub mod char;
pub mod coerce;
pub mod emit;
pub mod error;
pub mod lex;
pub mod minify;
pub mod num;
pub mod operator;
pub mod parse;
pub mod serialise;
pub mod source;
pub mod symbol;
pub mod token;
pub mod visit;

/// A parsed program: the node and scope arenas plus the root IDs needed to
/// walk, rewrite, and emit it.
pub struct ParsedProgram {
    pub node_map: NodeMap,
    pub scope_map: ScopeMap,
    pub top_level_node_id: NodeId,
    pub top_level_scope_id: ScopeId,
    pub leading_comments: String,
}

/// Parses UTF-8 JavaScript source into an AST, for custom introspection and
/// transforms before emitting.
pub fn parse(source: Vec<u8>) -> SyntaxResult<ParsedProgram> {
    let mut parser = Parser::new(Lexer::new(source));
    let parsed = parse_top_level(&mut parser)?;
    let (node_map, scope_map) = parser.take();
    Ok(ParsedProgram {
        node_map,
        scope_map,
        top_level_node_id: parsed.top_level_node_id,
        top_level_scope_id: parsed.top_level_scope_id,
        leading_comments: parsed.leading_comments,
    })
}

/// Minifies UTF-8 JavaScript source, appending the output to `output`.
///
/// # Examples
///
/// ```
/// use compact_js::minify;
/// use compact_js::minify::MinifyOptions;
/// use compact_js::emit::EmitOptions;
///
/// let src = b"function add(first, second) { return first + second; }";
/// let mut out = Vec::new();
/// minify(
///     src.to_vec(),
///     &mut out,
///     &MinifyOptions::default(),
///     &EmitOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(out.as_slice(), b"function add(a,b){return a+b}");
/// ```
pub fn minify(
    source: Vec<u8>,
    output: &mut Vec<u8>,
    minify_options: &MinifyOptions,
    emit_options: &EmitOptions,
) -> SyntaxResult<()> {
    let mut parsed = parse(source)?;
    minify_tree(
        &mut parsed.scope_map,
        &mut parsed.node_map,
        parsed.top_level_scope_id,
        parsed.top_level_node_id,
        minify_options,
    );
    emit_program(
        output,
        &parsed.node_map,
        parsed.top_level_node_id,
        &parsed.leading_comments,
        emit_options,
    );
    Ok(())
}
