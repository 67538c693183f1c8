use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::error::SyntaxResult;
use crate::parse::parser::Parser;
use crate::parse::stmt::parse_statements_until;
use crate::source::SourceRange;
use crate::symbol::ScopeId;
use crate::token::TokenType;

pub struct ParsedTopLevel {
    pub top_level_node_id: NodeId,
    pub top_level_scope_id: ScopeId,
    // Comment text ahead of the first token, for optional preservation.
    pub leading_comments: String,
}

pub fn parse_top_level(parser: &mut Parser) -> SyntaxResult<ParsedTopLevel> {
    let top_level_scope_id = parser.scope_map().create_global_scope();
    let body = parse_statements_until(parser, top_level_scope_id, TokenType::EOF)?;
    let loc = match (body.first(), body.last()) {
        (Some(&first), Some(&last)) => {
            let mut loc = parser.node_map()[first].loc();
            loc.extend(parser.node_map()[last].loc());
            loc
        }
        _ => SourceRange::anonymous(),
    };
    let top_level_node_id =
        parser.create_node(top_level_scope_id, loc, Syntax::TopLevel { body });
    Ok(ParsedTopLevel {
        top_level_node_id,
        top_level_scope_id,
        leading_comments: parser.leading_comments().to_string(),
    })
}
