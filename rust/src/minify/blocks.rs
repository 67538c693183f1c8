use super::statement_list;
use crate::ast::for_each_child;
use crate::ast::ForInit;
use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::emit::ends_with_dangling_if;
use crate::emit::node_precedence;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::visit::visit_node;
use crate::visit::Visitor;

fn prec(name: OperatorName) -> u8 {
  OPERATORS[&name].precedence
}

// Peels explicit parentheses off a slot. A parenthesis survives only when the
// inner expression has exactly the slot's precedence on its non-associative
// side; anything looser is re-wrapped by the printer, and anything tighter
// never needed wrapping.
fn unwrap_paren_slot(
  map: &NodeMap,
  slot: &mut NodeId,
  slot_precedence: Option<u8>,
  allow_equal: bool,
) {
  loop {
    let inner = match map[*slot].stx() {
      Syntax::ParenthesisedExpr { expression } => *expression,
      _ => return,
    };
    let keep = match (slot_precedence, node_precedence(map, inner)) {
      (Some(sp), Some(ip)) => ip == sp && !allow_equal,
      _ => false,
    };
    if keep {
      return;
    };
    *slot = inner;
  }
}

fn strip(map: &NodeMap, slot: &mut NodeId) {
  unwrap_paren_slot(map, slot, None, true);
}

// Whether the subtree uses the `in` operator where parentheses no longer
// shield it. A `for` head's init must keep such parentheses or the `in`
// would be parsed as a for-in.
fn contains_in(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::BinaryExpr {
      operator: OperatorName::In,
      ..
    } => return true,
    Syntax::ParenthesisedExpr { .. }
    | Syntax::FunctionExpr { .. }
    | Syntax::FunctionDecl { .. } => return false,
    _ => {}
  };
  let mut found = false;
  for_each_child(map[n].stx(), |c| {
    if !found && contains_in(map, c) {
      found = true;
    };
  });
  found
}

fn strip_guarding_in(map: &NodeMap, slot: &mut NodeId) {
  loop {
    let inner = match map[*slot].stx() {
      Syntax::ParenthesisedExpr { expression } => *expression,
      _ => return,
    };
    if contains_in(map, inner) {
      return;
    };
    *slot = inner;
  }
}

fn clean_parens(map: &NodeMap, stx: &mut Syntax) {
  match stx {
    Syntax::BinaryExpr {
      operator,
      left,
      right,
    } => {
      let p = prec(*operator);
      let assoc = OPERATORS[operator].associativity;
      unwrap_paren_slot(map, left, Some(p), assoc == Associativity::Left);
      unwrap_paren_slot(map, right, Some(p), assoc == Associativity::Right);
    }
    Syntax::ConditionalExpr {
      test,
      consequent,
      alternate,
    } => {
      unwrap_paren_slot(map, test, Some(prec(OperatorName::Conditional)), true);
      unwrap_paren_slot(map, consequent, Some(prec(OperatorName::Assignment)), true);
      unwrap_paren_slot(map, alternate, Some(prec(OperatorName::Assignment)), true);
    }
    Syntax::UnaryExpr { operator, argument } | Syntax::UnaryPostfixExpr { operator, argument } => {
      unwrap_paren_slot(map, argument, Some(prec(*operator)), true);
    }
    Syntax::CallExpr { callee, arguments } => {
      unwrap_paren_slot(map, callee, Some(prec(OperatorName::MemberAccess)), true);
      for a in arguments {
        unwrap_paren_slot(map, a, Some(prec(OperatorName::Assignment)), true);
      }
    }
    Syntax::NewExpr { callee, arguments } => {
      unwrap_paren_slot(map, callee, Some(prec(OperatorName::MemberAccess)), true);
      if let Some(arguments) = arguments {
        for a in arguments {
          unwrap_paren_slot(map, a, Some(prec(OperatorName::Assignment)), true);
        }
      };
    }
    Syntax::MemberExpr { left, .. } => {
      unwrap_paren_slot(map, left, Some(prec(OperatorName::MemberAccess)), true);
    }
    Syntax::ComputedMemberExpr { object, member } => {
      unwrap_paren_slot(map, object, Some(prec(OperatorName::MemberAccess)), true);
      strip(map, member);
    }
    Syntax::LiteralArrayExpr { elements } => {
      for e in elements.iter_mut().flatten() {
        unwrap_paren_slot(map, e, Some(prec(OperatorName::Assignment)), true);
      }
    }
    Syntax::ObjectMember { value, .. } => {
      unwrap_paren_slot(map, value, Some(prec(OperatorName::Assignment)), true);
    }
    Syntax::ParenthesisedExpr { expression } => strip(map, expression),
    Syntax::ExpressionStmt { expression } => strip(map, expression),
    Syntax::IfStmt { test, .. } => strip(map, test),
    Syntax::WhileStmt { condition, .. } | Syntax::DoWhileStmt { condition, .. } => {
      strip(map, condition)
    }
    Syntax::ForStmt {
      init,
      condition,
      post,
      ..
    } => {
      if let ForInit::Expression(e) = init {
        strip_guarding_in(map, e);
      };
      if let Some(condition) = condition {
        strip(map, condition);
      };
      if let Some(post) = post {
        strip(map, post);
      };
    }
    Syntax::ForInStmt { rhs, .. } => strip(map, rhs),
    Syntax::WithStmt { object, .. } => strip(map, object),
    Syntax::SwitchStmt { test, .. } => strip(map, test),
    Syntax::SwitchBranch {
      case: Some(case), ..
    } => strip(map, case),
    Syntax::ReturnStmt { value: Some(value) } => strip(map, value),
    Syntax::ThrowStmt { value } => strip(map, value),
    Syntax::VarStmt { declarators } => {
      // Initializers may sit in a `for` head, where an exposed `in` changes
      // the parse; keep its parentheses.
      for d in declarators {
        if let Some(init) = &mut d.initializer {
          strip_guarding_in(map, init);
        };
      }
    }
    _ => {}
  };
}

// Replaces a single-statement or empty block in a substatement slot with the
// statement itself. A lone function declaration keeps its braces, and a
// consequent followed by `else` keeps them when it ends with an else-less
// `if`.
fn unwrap_block_slot(map: &mut NodeMap, slot: &mut NodeId, guard_dangling_if: bool) {
  let inner = match map[*slot].stx() {
    Syntax::BlockStmt { body } => match body.as_slice() {
      [] => None,
      [single] => Some(*single),
      _ => return,
    },
    _ => return,
  };
  match inner {
    None => map[*slot].set_stx(Syntax::EmptyStmt {}),
    Some(inner) => {
      if let Syntax::FunctionDecl { .. } = map[inner].stx() {
        return;
      };
      if guard_dangling_if && ends_with_dangling_if(map, inner) {
        return;
      };
      *slot = inner;
    }
  };
}

fn tidy_statements(map: &mut NodeMap, stx: &mut Syntax) {
  if let Some(body) = statement_list(stx) {
    // Braces have no scoping meaning here; nested blocks flatten into the
    // surrounding list. Children were tidied first, so one level suffices.
    let mut out = Vec::<NodeId>::new();
    for &s in body.iter() {
      match map[s].stx() {
        Syntax::BlockStmt { body: inner } => out.extend(inner.iter().copied()),
        Syntax::EmptyStmt {} => {}
        _ => out.push(s),
      };
    }
    *body = out;
    return;
  };
  match stx {
    Syntax::IfStmt {
      consequent,
      alternate,
      ..
    } => {
      unwrap_block_slot(map, consequent, alternate.is_some());
      let mut drop_alternate = false;
      if let Some(alt) = alternate {
        unwrap_block_slot(map, alt, false);
        if let Syntax::EmptyStmt {} = map[*alt].stx() {
          drop_alternate = true;
        };
      };
      if drop_alternate {
        *alternate = None;
      };
    }
    Syntax::WhileStmt { body, .. }
    | Syntax::DoWhileStmt { body, .. }
    | Syntax::ForStmt { body, .. }
    | Syntax::ForInStmt { body, .. }
    | Syntax::WithStmt { body, .. } => {
      unwrap_block_slot(map, body, false);
    }
    Syntax::LabelStmt { statement, .. } => {
      unwrap_block_slot(map, statement, false);
    }
    _ => {}
  };
}

struct TidyBlocks {}

impl Visitor for TidyBlocks {
  fn on_up(&mut self, map: &mut NodeMap, node: NodeId, _parent: Option<NodeId>) {
    let mut stx = map.take_stx(node);
    clean_parens(map, &mut stx);
    tidy_statements(map, &mut stx);
    map[node].set_stx(stx);
  }
}

/// Removes redundant braces and parentheses: nested blocks flatten into their
/// parent list, single-statement blocks in substatement positions lose their
/// braces, and explicit parentheses the printer would re-create are dropped.
pub fn tidy_blocks(map: &mut NodeMap, top_level: NodeId) {
  visit_node(&mut TidyBlocks {}, map, top_level);
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
    super::tidy_blocks(&mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_nested_blocks_flatten() {
    assert_eq!(after_pass("{a();{b()}}c()"), "a();b();c()");
  }

  #[test]
  fn test_single_statement_bodies_lose_braces() {
    assert_eq!(after_pass("if(a){b()}else{c()}"), "if(a)b();else c()");
    assert_eq!(after_pass("while(a){b()}"), "while(a)b()");
    assert_eq!(after_pass("for(;;){b()}"), "for(;;)b()");
  }

  #[test]
  fn test_empty_bodies_become_empty_statements() {
    assert_eq!(after_pass("while(a){}"), "while(a);");
    assert_eq!(after_pass("if(a){}else b()"), "if(a);else b()");
    assert_eq!(after_pass("if(a)b();else{}"), "if(a)b()");
  }

  #[test]
  fn test_dangling_else_keeps_braces() {
    assert_eq!(
      after_pass("if(a){if(b)c()}else d()"),
      "if(a){if(b)c()}else d()"
    );
  }

  #[test]
  fn test_redundant_parens_drop() {
    assert_eq!(after_pass("x=(a+b)"), "x=a+b");
    assert_eq!(after_pass("x=(a+b)*c"), "x=(a+b)*c");
    assert_eq!(after_pass("x=(a*b)+c"), "x=a*b+c");
    assert_eq!(after_pass("((a()))"), "a()");
  }

  #[test]
  fn test_associativity_parens_survive() {
    assert_eq!(after_pass("x=a-(b-c)"), "x=a-(b-c)");
    assert_eq!(after_pass("x=(a-b)-c"), "x=a-b-c");
  }

  #[test]
  fn test_stripped_operands_reprint_identically() {
    // After stripping, the printer must regroup every operand slot exactly
    // where the source had parentheses that mattered.
    assert_eq!(after_pass("x=-(a*b)"), "x=-(a*b)");
    assert_eq!(after_pass("x=-(a)"), "x=-a");
    assert_eq!(after_pass("(a=b)?c():d()"), "(a=b)?c():d()");
    assert_eq!(after_pass("(x?y:z)?a:b"), "(x?y:z)?a:b");
    assert_eq!(after_pass("(a)?b():c()"), "a?b():c()");
    assert_eq!(after_pass("(a+b)[c]"), "(a+b)[c]");
    assert_eq!(after_pass("(a.b)[c]"), "a.b[c]");
    assert_eq!(after_pass("x=(y=z)"), "x=y=z");
    assert_eq!(after_pass("x=new (a())()"), "x=new(a())()");
    assert_eq!(after_pass("x=new (a.b)()"), "x=new a.b()");
  }

  #[test]
  fn test_for_head_keeps_parens_around_in() {
    assert_eq!(after_pass("for((a in b);;)c()"), "for((a in b);;)c()");
    assert_eq!(after_pass("for((a);;)c()"), "for(a;;)c()");
  }

  #[test]
  fn test_function_declaration_keeps_braces() {
    assert_eq!(after_pass("if(a){function f(){}}"), "if(a){function f(){}}");
  }
}
