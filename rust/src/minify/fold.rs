use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::char::ID_CONTINUE;
use crate::char::ID_START;
use crate::coerce::to_boolean;
use crate::coerce::to_number;
use crate::coerce::to_string;
use crate::lex::RESERVED_STRS;
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::visit::visit_node;
use crate::visit::Visitor;

// A string usable as a dot-access property name. Reserved words are excluded;
// `a.if` is a syntax error in the grammar this targets.
fn is_identifier_name(name: &str) -> bool {
  let b = name.as_bytes();
  match b.first() {
    Some(&c) if ID_START.has(c) => {}
    _ => return false,
  };
  if !b[1..].iter().all(|&c| ID_CONTINUE.has(c)) {
    return false;
  };
  !RESERVED_STRS.contains(name)
}

struct FoldConstants {}

impl Visitor for FoldConstants {
  fn on_up(&mut self, map: &mut NodeMap, node: NodeId, _parent: Option<NodeId>) {
    let stx = map.take_stx(node);
    let new_stx = match stx {
      // The tested expressions are known side-effect-free literal shapes, so
      // the untaken branch and the test itself can be dropped outright.
      Syntax::IfStmt {
        test,
        consequent,
        alternate,
      } => match to_boolean(map, test) {
        Some(true) => map.take_stx(consequent),
        Some(false) => match alternate {
          Some(alternate) => map.take_stx(alternate),
          None => Syntax::EmptyStmt {},
        },
        None => Syntax::IfStmt {
          test,
          consequent,
          alternate,
        },
      },
      Syntax::WhileStmt { condition, body } => match to_boolean(map, condition) {
        Some(false) => Syntax::EmptyStmt {},
        // `for(;;)` is two bytes shorter than `while(!0)`.
        Some(true) => Syntax::ForStmt {
          init: crate::ast::ForInit::None,
          condition: None,
          post: None,
          body,
        },
        None => Syntax::WhileStmt { condition, body },
      },
      Syntax::ConditionalExpr {
        test,
        consequent,
        alternate,
      } => match to_boolean(map, test) {
        Some(true) => map.take_stx(consequent),
        Some(false) => map.take_stx(alternate),
        None => match map[test].stx() {
          Syntax::UnaryExpr {
            operator: OperatorName::LogicalNot,
            argument,
          } => Syntax::ConditionalExpr {
            test: *argument,
            consequent: alternate,
            alternate: consequent,
          },
          _ => Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
          },
        },
      },
      Syntax::NewExpr {
        callee,
        arguments: Some(arguments),
      } if arguments.is_empty() => Syntax::NewExpr {
        callee,
        arguments: None,
      },
      Syntax::ComputedMemberExpr { object, member } => {
        let key = match map[member].stx() {
          Syntax::LiteralStringExpr { value } => Some(value.clone()),
          _ => None,
        };
        match key {
          Some(key) if is_identifier_name(&key) => Syntax::MemberExpr {
            left: object,
            right: key,
          },
          Some(key) => {
            // Only indices whose canonical string form matches exactly;
            // `a["00"]` and `a[0]` are different keys.
            match to_number(&key) {
              Some(n) if to_string(n) == key => {
                map[member].set_stx(Syntax::LiteralNumberExpr {
                  value: JsNumber(n),
                });
              }
              _ => {}
            };
            Syntax::ComputedMemberExpr { object, member }
          }
          None => Syntax::ComputedMemberExpr { object, member },
        }
      }
      Syntax::DebuggerStmt {} => Syntax::EmptyStmt {},
      stx => stx,
    };
    map[node].set_stx(new_stx);
  }
}

/// Resolves statically-known conditions, normalises property accesses with
/// literal keys, and drops `debugger` statements.
pub fn fold_constants(map: &mut NodeMap, top_level: NodeId) {
  visit_node(&mut FoldConstants {}, map, top_level);
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
    super::fold_constants(&mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_known_if_tests_fold() {
    assert_eq!(after_pass("if(true)a();else b()"), "a()");
    assert_eq!(after_pass("if(0)a();else b()"), "b()");
    assert_eq!(after_pass("if(\"\")a()"), "");
  }

  #[test]
  fn test_while_true_becomes_for() {
    assert_eq!(after_pass("while(true)a()"), "for(;;)a()");
    assert_eq!(after_pass("while(0)a()"), "");
  }

  #[test]
  fn test_negated_conditional_swaps_branches() {
    assert_eq!(after_pass("x=!a?b:c"), "x=a?c:b");
  }

  #[test]
  fn test_new_with_empty_arguments() {
    assert_eq!(after_pass("x=new A()"), "x=new A");
  }

  #[test]
  fn test_literal_key_accesses() {
    assert_eq!(after_pass("a[\"b\"]"), "a.b");
    assert_eq!(after_pass("a[\"0\"]"), "a[0]");
    assert_eq!(after_pass("a[\"00\"]"), "a[\"00\"]");
    assert_eq!(after_pass("a[\"in\"]"), "a[\"in\"]");
    assert_eq!(after_pass("a[\"b c\"]"), "a[\"b c\"]");
  }

  #[test]
  fn test_debugger_is_dropped() {
    assert_eq!(after_pass("a();debugger;b()"), "a();b()");
  }
}
