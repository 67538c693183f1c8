use super::is_directive;
use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::visit::visit_node;
use crate::visit::Visitor;

struct HoistFunctions {}

impl Visitor for HoistFunctions {
  fn on_up(&mut self, map: &mut NodeMap, node: NodeId, _parent: Option<NodeId>) {
    let mut stx = map.take_stx(node);
    if let Some(body) = super::statement_list(&mut stx) {
      let mut directives = Vec::<NodeId>::new();
      let mut functions = Vec::<NodeId>::new();
      let mut rest = Vec::<NodeId>::new();
      let mut in_prologue = true;
      for &s in body.iter() {
        if in_prologue && is_directive(map, s) {
          directives.push(s);
          continue;
        };
        in_prologue = false;
        if let Syntax::FunctionDecl { .. } = map[s].stx() {
          functions.push(s);
        } else {
          rest.push(s);
        };
      }
      body.clear();
      body.extend(directives);
      body.extend(functions);
      body.extend(rest);
    };
    map[node].set_stx(stx);
  }
}

/// Moves function declarations ahead of other statements in every statement
/// list, keeping their relative order and any directive prologue. Declarations
/// are bound before any statement runs, so this only changes layout.
pub fn hoist_functions(map: &mut NodeMap, top_level: NodeId) {
  visit_node(&mut HoistFunctions {}, map, top_level);
}

#[cfg(test)]
mod tests {
  use crate::emit::emit_js;
  use crate::lex::Lexer;
  use crate::parse::parser::Parser;
  use crate::parse::toplevel::parse_top_level;

  fn after_pass(src: &str) -> String {
    let mut parser = Parser::new(Lexer::new(src.as_bytes().to_vec()));
    let parsed = parse_top_level(&mut parser).unwrap();
    let (mut map, _) = parser.take();
    super::hoist_functions(&mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_functions_move_to_front() {
    assert_eq!(
      after_pass("a();function f(){}b();function g(){}"),
      "function f(){}function g(){}a();b()"
    );
  }

  #[test]
  fn test_directive_prologue_stays_first() {
    assert_eq!(
      after_pass("\"use strict\";a();function f(){}"),
      "\"use strict\";function f(){}a()"
    );
  }

  #[test]
  fn test_nested_lists_are_hoisted_too() {
    assert_eq!(
      after_pass("function f(){a();function g(){}}"),
      "function f(){function g(){}a()}"
    );
  }
}
