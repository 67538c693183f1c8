use super::is_directive;
use super::statement_list;
use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::operator::OperatorName;
use crate::visit::visit_node;
use crate::visit::Visitor;

fn comma(map: &mut NodeMap, left: NodeId, right: NodeId) -> NodeId {
  let scope = map[left].scope();
  let loc = map[left].loc();
  map.create_node(scope, loc, Syntax::BinaryExpr {
    operator: OperatorName::Comma,
    left,
    right,
  })
}

fn expression_of(map: &NodeMap, stmt: NodeId) -> NodeId {
  match map[stmt].stx() {
    Syntax::ExpressionStmt { expression } => *expression,
    _ => stmt,
  }
}

// Collapses a run of expression statements into the first statement of the
// run, joined by the comma operator.
fn flush(map: &mut NodeMap, pending: &mut Vec<NodeId>, out: &mut Vec<NodeId>) {
  match pending.len() {
    0 => {}
    1 => out.push(pending[0]),
    _ => {
      let mut chain = expression_of(map, pending[0]);
      for &stmt in pending[1..].iter() {
        let right = expression_of(map, stmt);
        chain = comma(map, chain, right);
      }
      let first = pending[0];
      map[first].set_stx(Syntax::ExpressionStmt { expression: chain });
      out.push(first);
    }
  };
  pending.clear();
}

fn group_list(map: &mut NodeMap, body: &mut Vec<NodeId>) {
  let mut out = Vec::<NodeId>::new();
  let mut pending = Vec::<NodeId>::new();
  let mut in_prologue = true;
  for &s in body.iter() {
    if in_prologue && is_directive(map, s) {
      out.push(s);
      continue;
    };
    in_prologue = false;
    match map[s].stx() {
      Syntax::EmptyStmt {} => continue,
      Syntax::ExpressionStmt { .. } => {
        pending.push(s);
        continue;
      }
      _ => {}
    };
    // A valued return absorbs the run ahead of it; the comma operator keeps
    // the evaluation order.
    let ret_value = match map[s].stx() {
      Syntax::ReturnStmt { value: Some(value) } if !pending.is_empty() => Some(*value),
      _ => None,
    };
    if let Some(value) = ret_value {
      let mut chain = expression_of(map, pending[0]);
      for &stmt in pending[1..].iter() {
        let right = expression_of(map, stmt);
        chain = comma(map, chain, right);
      }
      let chain = comma(map, chain, value);
      map[s].set_stx(Syntax::ReturnStmt { value: Some(chain) });
      pending.clear();
      out.push(s);
      continue;
    };
    flush(map, &mut pending, &mut out);
    out.push(s);
  }
  flush(map, &mut pending, &mut out);
  *body = out;
}

struct GroupStatements {}

impl Visitor for GroupStatements {
  fn on_up(&mut self, map: &mut NodeMap, node: NodeId, _parent: Option<NodeId>) {
    let mut stx = map.take_stx(node);
    if let Some(body) = statement_list(&mut stx) {
      group_list(map, body);
    };
    map[node].set_stx(stx);
  }
}

/// Joins runs of expression statements with the comma operator, folds a run
/// into a following valued `return`, and drops empty statements. Directive
/// prologues are left untouched.
pub fn group_statements(map: &mut NodeMap, top_level: NodeId) {
  visit_node(&mut GroupStatements {}, map, top_level);
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
    super::group_statements(&mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_runs_merge_with_commas() {
    assert_eq!(after_pass("a();b();c()"), "a(),b(),c()");
  }

  #[test]
  fn test_other_statements_break_runs() {
    assert_eq!(after_pass("a();if(x)b();c();d()"), "a();if(x)b();c(),d()");
  }

  #[test]
  fn test_run_folds_into_return() {
    assert_eq!(
      after_pass("function f(){a();b();return c}"),
      "function f(){return a(),b(),c}"
    );
  }

  #[test]
  fn test_bare_return_absorbs_nothing() {
    assert_eq!(
      after_pass("function f(){a();return}"),
      "function f(){a();return}"
    );
  }

  #[test]
  fn test_directives_are_kept_separate() {
    assert_eq!(after_pass("\"use strict\";a();b()"), "\"use strict\";a(),b()");
  }

  #[test]
  fn test_empty_statements_are_dropped() {
    assert_eq!(after_pass("a();;;b()"), "a(),b()");
  }
}
