use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::coerce::literal_to_number;
use crate::coerce::literal_to_string;
use crate::coerce::static_typeof;
use crate::emit::emitted_len;
use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::symbol::ScopeMap;
use crate::visit::visit_node;
use crate::visit::Visitor;

fn compound_of(op: OperatorName) -> Option<OperatorName> {
  let compound = match op {
    OperatorName::Addition => OperatorName::AssignmentAddition,
    OperatorName::Subtraction => OperatorName::AssignmentSubtraction,
    OperatorName::Multiplication => OperatorName::AssignmentMultiplication,
    OperatorName::Division => OperatorName::AssignmentDivision,
    OperatorName::Remainder => OperatorName::AssignmentRemainder,
    OperatorName::BitwiseAnd => OperatorName::AssignmentBitwiseAnd,
    OperatorName::BitwiseOr => OperatorName::AssignmentBitwiseOr,
    OperatorName::BitwiseXor => OperatorName::AssignmentBitwiseXor,
    OperatorName::BitwiseLeftShift => OperatorName::AssignmentBitwiseLeftShift,
    OperatorName::BitwiseRightShift => OperatorName::AssignmentBitwiseRightShift,
    OperatorName::BitwiseUnsignedRightShift => OperatorName::AssignmentBitwiseUnsignedRightShift,
    _ => return None,
  };
  Some(compound)
}

fn is_literal_number(map: &NodeMap, n: NodeId, value: f64) -> bool {
  match map[n].stx() {
    Syntax::LiteralNumberExpr { value: v } => v.0 == value,
    _ => false,
  }
}

// In a boolean position `!!x` tests the same way `x` does.
fn strip_double_not(map: &NodeMap, slot: &mut NodeId) {
  loop {
    let argument = match map[*slot].stx() {
      Syntax::UnaryExpr {
        operator: OperatorName::LogicalNot,
        argument,
      } => *argument,
      _ => return,
    };
    match map[argument].stx() {
      Syntax::UnaryExpr {
        operator: OperatorName::LogicalNot,
        argument: inner,
      } => *slot = *inner,
      _ => return,
    };
  }
}

// Replaces the node with a literal when the literal renders no longer than
// the expression it folds.
fn fold_to_number(map: &mut NodeMap, node: NodeId, value: f64) {
  if !value.is_finite() {
    return;
  };
  let scope = map[node].scope();
  let loc = map[node].loc();
  let candidate = map.create_node(scope, loc, Syntax::LiteralNumberExpr {
    value: JsNumber(value),
  });
  if emitted_len(map, candidate) <= emitted_len(map, node) {
    let stx = map.take_stx(candidate);
    map[node].set_stx(stx);
  };
}

fn fold_to_string(map: &mut NodeMap, node: NodeId, value: String) {
  let scope = map[node].scope();
  let loc = map[node].loc();
  let candidate = map.create_node(scope, loc, Syntax::LiteralStringExpr { value });
  if emitted_len(map, candidate) <= emitted_len(map, node) {
    let stx = map.take_stx(candidate);
    map[node].set_stx(stx);
  };
}

// `a = a op b` where both `a`s are the same binding becomes `a op= b`.
fn try_compound_assignment(
  scopes: &ScopeMap,
  map: &mut NodeMap,
  node: NodeId,
  left: NodeId,
  right: NodeId,
) {
  let name = match map[left].stx() {
    Syntax::IdentifierExpr { name } => name.clone(),
    _ => return,
  };
  let (op, inner_left, inner_right) = match map[right].stx() {
    Syntax::BinaryExpr {
      operator,
      left,
      right,
    } => (*operator, *left, *right),
    _ => return,
  };
  let compound = match compound_of(op) {
    Some(compound) => compound,
    None => return,
  };
  match map[inner_left].stx() {
    Syntax::IdentifierExpr { name: n } if *n == name => {}
    _ => return,
  };
  if scopes.resolve_symbol(map[left].scope(), &name)
    != scopes.resolve_symbol(map[inner_left].scope(), &name)
  {
    return;
  };
  map[node].set_stx(Syntax::BinaryExpr {
    operator: compound,
    left,
    right: inner_right,
  });
}

fn fold_node(scopes: &ScopeMap, map: &mut NodeMap, node: NodeId) {
  {
    let mut stx = map.take_stx(node);
    match &mut stx {
      Syntax::IfStmt { test, .. } | Syntax::ConditionalExpr { test, .. } => {
        strip_double_not(map, test)
      }
      Syntax::WhileStmt { condition, .. } | Syntax::DoWhileStmt { condition, .. } => {
        strip_double_not(map, condition)
      }
      Syntax::ForStmt {
        condition: Some(condition),
        ..
      } => strip_double_not(map, condition),
      _ => {}
    };
    map[node].set_stx(stx);
  }

  let (operator, left, right) = match map[node].stx() {
    Syntax::BinaryExpr {
      operator,
      left,
      right,
    } => (*operator, *left, *right),
    Syntax::UnaryExpr {
      operator: OperatorName::UnaryNegation,
      argument,
    } => {
      // Negative zero must stay an expression; `-0` and `0` differ.
      let argument = *argument;
      match map[argument].stx() {
        Syntax::LiteralNumberExpr { value } if value.0 != 0.0 => {
          let value = -value.0;
          map[node].set_stx(Syntax::LiteralNumberExpr {
            value: JsNumber(value),
          });
        }
        Syntax::UnaryExpr {
          operator: OperatorName::UnaryNegation,
          argument: inner,
        } => {
          let inner = *inner;
          if static_typeof(map, inner) == Some("number") {
            let stx = map.take_stx(inner);
            map[node].set_stx(stx);
          };
        }
        _ => {}
      };
      return;
    }
    _ => return,
  };

  match operator {
    OperatorName::Assignment => try_compound_assignment(scopes, map, node, left, right),
    OperatorName::StrictEquality | OperatorName::StrictInequality => {
      // With both operand types certain and equal, loose equality performs
      // no coercion and matches strict equality.
      let lt = static_typeof(map, left);
      if lt.is_some() && lt == static_typeof(map, right) {
        let downgraded = match operator {
          OperatorName::StrictEquality => OperatorName::Equality,
          _ => OperatorName::Inequality,
        };
        if let Syntax::BinaryExpr { operator, .. } = map[node].stx_mut() {
          *operator = downgraded;
        };
      };
    }
    OperatorName::Addition => {
      if is_literal_number(map, left, 0.0) && static_typeof(map, right) == Some("number") {
        let stx = map.take_stx(right);
        map[node].set_stx(stx);
        return;
      };
      if is_literal_number(map, right, 0.0) && static_typeof(map, left) == Some("number") {
        let stx = map.take_stx(left);
        map[node].set_stx(stx);
        return;
      };
      let stringy =
        static_typeof(map, left) == Some("string") || static_typeof(map, right) == Some("string");
      if stringy {
        if let (Some(a), Some(b)) = (literal_to_string(map, left), literal_to_string(map, right)) {
          fold_to_string(map, node, format!("{}{}", a, b));
        };
      } else if let (Some(a), Some(b)) =
        (literal_to_number(map, left), literal_to_number(map, right))
      {
        fold_to_number(map, node, a + b);
      };
    }
    OperatorName::Multiplication => {
      if is_literal_number(map, left, 1.0) && static_typeof(map, right) == Some("number") {
        let stx = map.take_stx(right);
        map[node].set_stx(stx);
        return;
      };
      if is_literal_number(map, right, 1.0) && static_typeof(map, left) == Some("number") {
        let stx = map.take_stx(left);
        map[node].set_stx(stx);
        return;
      };
      if let (Some(a), Some(b)) = (literal_to_number(map, left), literal_to_number(map, right)) {
        fold_to_number(map, node, a * b);
      };
    }
    OperatorName::Subtraction | OperatorName::Division | OperatorName::Remainder => {
      if let (Some(a), Some(b)) = (literal_to_number(map, left), literal_to_number(map, right)) {
        let value = match operator {
          OperatorName::Subtraction => a - b,
          OperatorName::Division => a / b,
          _ => a % b,
        };
        fold_to_number(map, node, value);
      };
    }
    _ => {}
  };
}

struct FoldExpressions<'a> {
  scopes: &'a ScopeMap,
}

impl<'a> Visitor for FoldExpressions<'a> {
  fn on_up(&mut self, map: &mut NodeMap, node: NodeId, _parent: Option<NodeId>) {
    fold_node(self.scopes, map, node);
  }
}

/// Arithmetic on literal operands, compound-assignment contraction, strict
/// equality downgrades, and double-negation removal in test positions. Every
/// literal fold is kept only when its rendering is no longer than the
/// expression it replaces.
pub fn fold_expressions(scopes: &ScopeMap, map: &mut NodeMap, top_level: NodeId) {
  visit_node(&mut FoldExpressions { scopes }, map, top_level);
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
    let (mut map, scopes) = parser.take();
    super::fold_expressions(&scopes, &mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_numeric_literals_fold() {
    assert_eq!(after_pass("x=1+2"), "x=3");
    assert_eq!(after_pass("x=10-4*2"), "x=2");
    assert_eq!(after_pass("x=7%4"), "x=3");
  }

  #[test]
  fn test_long_results_are_rejected() {
    assert_eq!(after_pass("x=1/3"), "x=1/3");
    assert_eq!(after_pass("x=1/0"), "x=1/0");
  }

  #[test]
  fn test_string_concatenation_folds() {
    assert_eq!(after_pass("x=\"a\"+\"b\""), "x=\"ab\"");
    assert_eq!(after_pass("x=\"1\"+2"), "x=\"12\"");
    assert_eq!(after_pass("x=1+\"\""), "x=\"1\"");
  }

  #[test]
  fn test_unknown_operands_do_not_fold() {
    assert_eq!(after_pass("x=a+1"), "x=a+1");
  }

  #[test]
  fn test_compound_assignment() {
    assert_eq!(after_pass("a=a+b"), "a+=b");
    assert_eq!(after_pass("a=a-1"), "a-=1");
    assert_eq!(after_pass("a=a>>2"), "a>>=2");
    assert_eq!(after_pass("a=b+a"), "a=b+a");
  }

  #[test]
  fn test_strict_equality_downgrades() {
    assert_eq!(after_pass("x=typeof a===\"f\""), "x=typeof a==\"f\"");
    assert_eq!(after_pass("x=a===b"), "x=a===b");
  }

  #[test]
  fn test_double_negation_in_tests() {
    assert_eq!(after_pass("if(!!a)b()"), "if(a)b()");
    assert_eq!(after_pass("while(!!a)b()"), "while(a)b()");
    assert_eq!(after_pass("x=!!a"), "x=!!a");
  }

  #[test]
  fn test_identities() {
    assert_eq!(after_pass("x=-a+0"), "x=-a");
    assert_eq!(after_pass("x=1*-a"), "x=-a");
    assert_eq!(after_pass("x=- -2"), "x=2");
  }
}
