use super::statement_list;
use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::emit::emitted_len;
use crate::operator::OperatorName;
use crate::visit::visit_node;
use crate::visit::Visitor;

// Sees through a block holding exactly one statement.
fn as_single_stmt(map: &NodeMap, n: NodeId) -> NodeId {
  match map[n].stx() {
    Syntax::BlockStmt { body } => match body.as_slice() {
      [single] => *single,
      _ => n,
    },
    _ => n,
  }
}

fn is_empty(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::EmptyStmt {} => true,
    Syntax::BlockStmt { body } => body.is_empty(),
    _ => false,
  }
}

fn stmt_expr(map: &NodeMap, n: NodeId) -> Option<NodeId> {
  match map[n].stx() {
    Syntax::ExpressionStmt { expression } => Some(*expression),
    _ => None,
  }
}

fn return_value(map: &NodeMap, n: NodeId) -> Option<NodeId> {
  match map[n].stx() {
    Syntax::ReturnStmt { value: Some(value) } => Some(*value),
    _ => None,
  }
}

// Whether control never falls out of the bottom of the statement.
fn terminates(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::ReturnStmt { .. }
    | Syntax::ThrowStmt { .. }
    | Syntax::BreakStmt { .. }
    | Syntax::ContinueStmt { .. } => true,
    Syntax::BlockStmt { body } => match body.last() {
      Some(&last) => terminates(map, last),
      None => false,
    },
    _ => false,
  }
}

// Logical negation for a boolean context, removing an existing `!` rather
// than stacking another.
fn negated(map: &mut NodeMap, test: NodeId) -> NodeId {
  if let Syntax::UnaryExpr {
    operator: OperatorName::LogicalNot,
    argument,
  } = map[test].stx()
  {
    return *argument;
  };
  let scope = map[test].scope();
  let loc = map[test].loc();
  map.create_node(scope, loc, Syntax::UnaryExpr {
    operator: OperatorName::LogicalNot,
    argument: test,
  })
}

// Replaces `n` with the candidate when the rendering is no longer. The
// candidate shares subtrees with the original; exactly one of the two
// survives, so sharing is safe.
fn commit_if_no_longer(map: &mut NodeMap, n: NodeId, candidate: NodeId) -> bool {
  if emitted_len(map, candidate) <= emitted_len(map, n) {
    let stx = map.take_stx(candidate);
    map[n].set_stx(stx);
    true
  } else {
    false
  }
}

// Rewrites one `if` statement into a cheaper equivalent shape, repeating
// until none applies. Returns whether anything changed.
fn restructure_node(map: &mut NodeMap, n: NodeId) -> bool {
  let mut changed = false;
  loop {
    let (test, consequent, alternate) = match map[n].stx() {
      Syntax::IfStmt {
        test,
        consequent,
        alternate,
      } => (*test, *consequent, *alternate),
      _ => return changed,
    };
    let scope = map[n].scope();
    let loc = map[n].loc();
    let cons = as_single_stmt(map, consequent);

    if is_empty(map, cons) {
      match alternate {
        Some(alternate) => {
          let test = negated(map, test);
          map[n].set_stx(Syntax::IfStmt {
            test,
            consequent: alternate,
            alternate: None,
          });
          changed = true;
          continue;
        }
        None => {
          // Only the test's effects remain.
          let candidate = map.create_node(scope, loc, Syntax::ExpressionStmt { expression: test });
          if commit_if_no_longer(map, n, candidate) {
            changed = true;
            continue;
          };
          return changed;
        }
      };
    };

    match alternate {
      None => {
        // `if(a)if(b)s` collapses to `if(a&&b)s`.
        if let Syntax::IfStmt {
          test: inner_test,
          consequent: inner_consequent,
          alternate: None,
        } = map[cons].stx()
        {
          let (inner_test, inner_consequent) = (*inner_test, *inner_consequent);
          let joined = map.create_node(scope, loc, Syntax::BinaryExpr {
            operator: OperatorName::LogicalAnd,
            left: test,
            right: inner_test,
          });
          let candidate = map.create_node(scope, loc, Syntax::IfStmt {
            test: joined,
            consequent: inner_consequent,
            alternate: None,
          });
          if commit_if_no_longer(map, n, candidate) {
            changed = true;
            continue;
          };
        };
        // `if(a)b()` becomes `a&&b()`.
        if let Some(effect) = stmt_expr(map, cons) {
          let joined = map.create_node(scope, loc, Syntax::BinaryExpr {
            operator: OperatorName::LogicalAnd,
            left: test,
            right: effect,
          });
          let candidate = map.create_node(scope, loc, Syntax::ExpressionStmt { expression: joined });
          if commit_if_no_longer(map, n, candidate) {
            changed = true;
            continue;
          };
        };
        return changed;
      }
      Some(alternate) => {
        let alt = as_single_stmt(map, alternate);
        // `if(a)return b;else return c` becomes `return a?b:c`.
        if let (Some(x), Some(y)) = (return_value(map, cons), return_value(map, alt)) {
          let conditional = map.create_node(scope, loc, Syntax::ConditionalExpr {
            test,
            consequent: x,
            alternate: y,
          });
          let candidate = map.create_node(scope, loc, Syntax::ReturnStmt {
            value: Some(conditional),
          });
          if commit_if_no_longer(map, n, candidate) {
            changed = true;
            continue;
          };
        };
        // `if(a)b();else c()` becomes `a?b():c()`.
        if let (Some(e1), Some(e2)) = (stmt_expr(map, cons), stmt_expr(map, alt)) {
          let conditional = map.create_node(scope, loc, Syntax::ConditionalExpr {
            test,
            consequent: e1,
            alternate: e2,
          });
          let candidate = map.create_node(scope, loc, Syntax::ExpressionStmt {
            expression: conditional,
          });
          if commit_if_no_longer(map, n, candidate) {
            changed = true;
            continue;
          };
        };
        return changed;
      }
    };
  }
}

fn restructure_list(map: &mut NodeMap, body: &mut Vec<NodeId>) {
  let mut changed = true;
  while changed {
    changed = false;
    let mut i = 0;
    while i < body.len() {
      if restructure_node(map, body[i]) {
        changed = true;
      };
      // An `else` after a branch that never falls through is redundant; its
      // body continues after the `if`.
      if let Syntax::IfStmt {
        test,
        consequent,
        alternate: Some(alternate),
      } = map[body[i]].stx()
      {
        let (test, consequent, alternate) = (*test, *consequent, *alternate);
        if terminates(map, consequent) {
          map[body[i]].set_stx(Syntax::IfStmt {
            test,
            consequent,
            alternate: None,
          });
          body.insert(i + 1, alternate);
          changed = true;
        } else if terminates(map, alternate) {
          let test = negated(map, test);
          map[body[i]].set_stx(Syntax::IfStmt {
            test,
            consequent: alternate,
            alternate: None,
          });
          body.insert(i + 1, consequent);
          changed = true;
        };
      };
      // `if(a)return b;return c` becomes `return a?b:c`.
      if i + 1 < body.len() {
        let s = body[i];
        let next = as_single_stmt(map, body[i + 1]);
        if let Syntax::IfStmt {
          test,
          consequent,
          alternate: None,
        } = map[s].stx()
        {
          let (test, consequent) = (*test, *consequent);
          let cons = as_single_stmt(map, consequent);
          if let (Some(x), Some(y)) = (return_value(map, cons), return_value(map, next)) {
            let original = emitted_len(map, s) + 1 + emitted_len(map, body[i + 1]);
            let scope = map[s].scope();
            let loc = map[s].loc();
            let conditional = map.create_node(scope, loc, Syntax::ConditionalExpr {
              test,
              consequent: x,
              alternate: y,
            });
            let candidate = map.create_node(scope, loc, Syntax::ReturnStmt {
              value: Some(conditional),
            });
            if emitted_len(map, candidate) <= original {
              let stx = map.take_stx(candidate);
              map[s].set_stx(stx);
              body.remove(i + 1);
              changed = true;
            };
          };
        };
      };
      i += 1;
    }
  }
}

struct RestructureConditionals {}

impl Visitor for RestructureConditionals {
  fn on_up(&mut self, map: &mut NodeMap, node: NodeId, _parent: Option<NodeId>) {
    restructure_node(map, node);
    let mut stx = map.take_stx(node);
    if let Some(body) = statement_list(&mut stx) {
      restructure_list(map, body);
    };
    map[node].set_stx(stx);
  }
}

/// Collapses branching shapes into conditional and logical expressions where
/// the rendering is no longer than the original: if/else over returns or
/// expressions, nested `if`s, and `else` branches made redundant by early
/// exits.
pub fn restructure_conditionals(map: &mut NodeMap, top_level: NodeId) {
  visit_node(&mut RestructureConditionals {}, map, top_level);
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
    super::restructure_conditionals(&mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_if_else_returns_collapse() {
    assert_eq!(
      after_pass("function f(a,b,c){if(a){return b}else{return c}}"),
      "function f(a,b,c){return a?b:c}"
    );
  }

  #[test]
  fn test_return_after_if_collapses() {
    assert_eq!(
      after_pass("function f(a,b,c){if(a)return b;return c}"),
      "function f(a,b,c){return a?b:c}"
    );
  }

  #[test]
  fn test_chained_returns_collapse() {
    assert_eq!(
      after_pass("function f(a,b){if(a)return 1;if(b)return 2;return 3}"),
      "function f(a,b){return a?1:b?2:3}"
    );
  }

  #[test]
  fn test_if_else_expressions_collapse() {
    assert_eq!(after_pass("if(a)b();else c()"), "a?b():c()");
  }

  #[test]
  fn test_guard_becomes_logical_and() {
    assert_eq!(after_pass("if(a)b()"), "a&&b()");
  }

  #[test]
  fn test_nested_ifs_join() {
    assert_eq!(after_pass("if(a){if(b){c();d()}}"), "if(a&&b){c();d()}");
  }

  #[test]
  fn test_empty_consequent_negates() {
    assert_eq!(after_pass("if(a);else b()"), "!a&&b()");
  }

  #[test]
  fn test_redundant_else_drops() {
    assert_eq!(
      after_pass("function f(a){if(a)return 1;else a()}"),
      "function f(a){if(a)return 1;a()}"
    );
  }

  #[test]
  fn test_terminating_alternate_swaps() {
    assert_eq!(
      after_pass("function f(a){if(a)a();else return 1}"),
      "function f(a){if(!a)return 1;a()}"
    );
  }
}
