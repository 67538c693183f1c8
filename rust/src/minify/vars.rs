use super::is_directive;
use super::is_empty_stmt;
use super::statement_list;
use crate::ast::for_each_child;
use crate::ast::ForInLhs;
use crate::ast::ForInit;
use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::ast::VariableDeclarator;
use crate::operator::OperatorName;
use crate::source::SourceRange;
use crate::symbol::ScopeMap;
use crate::visit::visit_node;
use crate::visit::JourneyControls;
use crate::visit::Visitor;
use ahash::AHashSet;

// Every variable-scope body: the program itself plus each function body.
struct RegionCollector {
  regions: Vec<NodeId>,
}

impl Visitor for RegionCollector {
  fn on_down(
    &mut self,
    map: &mut NodeMap,
    node: NodeId,
    _parent: Option<NodeId>,
    _ctl: &mut JourneyControls,
  ) {
    match map[node].stx() {
      Syntax::TopLevel { .. } => self.regions.push(node),
      Syntax::FunctionDecl { body, .. } | Syntax::FunctionExpr { body, .. } => {
        self.regions.push(*body)
      }
      _ => {}
    };
  }
}

fn references_any(map: &NodeMap, node: NodeId, names: &AHashSet<String>) -> bool {
  match map[node].stx() {
    Syntax::IdentifierExpr { name } | Syntax::IdentifierPattern { name } => {
      if names.contains(name) {
        return true;
      };
    }
    _ => {}
  };
  let mut found = false;
  for_each_child(map[node].stx(), |c| {
    if !found && references_any(map, c, names) {
      found = true;
    };
  });
  found
}

// Chains `name = init` assignments for the initialized declarators with the
// comma operator, left to right. None when every declarator is bare.
fn assignments_chain(map: &mut NodeMap, declarators: &[VariableDeclarator]) -> Option<NodeId> {
  let mut chain: Option<NodeId> = None;
  for decl in declarators {
    let init = match decl.initializer {
      Some(init) => init,
      None => continue,
    };
    let name = match map[decl.pattern].stx() {
      Syntax::IdentifierPattern { name } => name.clone(),
      _ => continue,
    };
    let scope = map[decl.pattern].scope();
    let loc = map[decl.pattern].loc();
    let target = map.create_node(scope, loc, Syntax::IdentifierExpr { name });
    let assign = map.create_node(scope, loc, Syntax::BinaryExpr {
      operator: OperatorName::Assignment,
      left: target,
      right: init,
    });
    chain = Some(match chain {
      None => assign,
      Some(prev) => map.create_node(scope, loc, Syntax::BinaryExpr {
        operator: OperatorName::Comma,
        left: prev,
        right: assign,
      }),
    });
  }
  chain
}

// Rewrites every `var` below `node` into plain assignments, without
// descending into nested functions, which are their own regions.
fn rewrite_vars(map: &mut NodeMap, node: NodeId) {
  match map[node].stx() {
    Syntax::FunctionDecl { .. } | Syntax::FunctionExpr { .. } => return,
    _ => {}
  };
  // A bare single-declarator for-in head becomes a plain pattern up front, so
  // its declarator is not treated like a standalone statement below.
  let stx = map.take_stx(node);
  let stx = match stx {
    Syntax::ForInStmt {
      lhs: ForInLhs::Declaration(d),
      rhs,
      body,
    } => {
      let bare = match map[d].stx() {
        Syntax::VarStmt { declarators } => match declarators.as_slice() {
          [decl] if decl.initializer.is_none() => match map[decl.pattern].stx() {
            Syntax::IdentifierPattern { name } => Some((decl.pattern, name.clone())),
            _ => None,
          },
          _ => None,
        },
        _ => None,
      };
      match bare {
        Some((pattern, name)) => {
          let scope = map[pattern].scope();
          let loc = map[pattern].loc();
          let target = map.create_node(scope, loc, Syntax::IdentifierExpr { name });
          Syntax::ForInStmt {
            lhs: ForInLhs::Pattern(target),
            rhs,
            body,
          }
        }
        // `for(var x = init in y)` keeps its declaration; the duplicate
        // hoisted declarator is legal and harmless.
        None => Syntax::ForInStmt {
          lhs: ForInLhs::Declaration(d),
          rhs,
          body,
        },
      }
    }
    stx => stx,
  };
  map[node].set_stx(stx);

  let mut children = Vec::<NodeId>::new();
  for_each_child(map[node].stx(), |c| children.push(c));
  if let Syntax::ForInStmt {
    lhs: ForInLhs::Declaration(d),
    ..
  } = map[node].stx()
  {
    let d = *d;
    children.retain(|&c| c != d);
  };
  for c in children {
    rewrite_vars(map, c);
  }

  let stx = map.take_stx(node);
  let stx = match stx {
    Syntax::VarStmt { declarators } => match assignments_chain(map, &declarators) {
      Some(expression) => Syntax::ExpressionStmt { expression },
      None => Syntax::EmptyStmt {},
    },
    // The declarator under the init slot was just rewritten above.
    Syntax::ForStmt {
      init: ForInit::Declaration(d),
      condition,
      post,
      body,
    } => {
      let init = match map[d].stx() {
        Syntax::ExpressionStmt { expression } => ForInit::Expression(*expression),
        _ => ForInit::None,
      };
      Syntax::ForStmt {
        init,
        condition,
        post,
        body,
      }
    }
    stx => stx,
  };
  map[node].set_stx(stx);
}

fn hoist_region(scopes: &ScopeMap, map: &mut NodeMap, region: NodeId) {
  let scope = map[region].scope();
  let names: Vec<String> = scopes[scope]
    .symbol_names()
    .iter()
    .filter(|name| match scopes[scope].get_symbol(name.as_str()) {
      Some(symbol) => !symbol.is_param && !symbol.is_function,
      None => false,
    })
    .cloned()
    .collect();
  if names.is_empty() {
    return;
  };
  rewrite_vars(map, region);
  let name_set: AHashSet<String> = names.iter().cloned().collect();
  let mut stx = map.take_stx(region);
  if let Some(body) = statement_list(&mut stx) {
    // The declaration goes after the prologue and as late as possible before
    // the first statement that mentions a hoisted name, so a later pass can
    // fold the first assignments back into it.
    let mut at = 0;
    while at < body.len() {
      let s = body[at];
      let skippable = is_directive(map, s)
        || matches!(map[s].stx(), Syntax::FunctionDecl { .. })
        || !references_any(map, s, &name_set);
      if !skippable {
        break;
      };
      at += 1;
    }
    let declarators = names
      .iter()
      .map(|name| VariableDeclarator {
        pattern: map.create_node(scope, SourceRange::anonymous(), Syntax::IdentifierPattern {
          name: name.clone(),
        }),
        initializer: None,
      })
      .collect();
    let var = map.create_node(
      scope,
      SourceRange::anonymous(),
      Syntax::VarStmt { declarators },
    );
    body.insert(at, var);
  };
  map[region].set_stx(stx);
}

/// Merges all `var` declarations of each variable scope into a single
/// declaration near the top of the scope, leaving assignments where the
/// initializers were. Declaration order follows first-declaration order.
pub fn hoist_vars(scopes: &ScopeMap, map: &mut NodeMap, top_level: NodeId) {
  let mut collector = RegionCollector {
    regions: Vec::new(),
  };
  visit_node(&mut collector, map, top_level);
  for region in collector.regions {
    hoist_region(scopes, map, region);
  }
}

// The leftmost assignment-to-identifier of an expression, descending the left
// spine of a comma chain. The second element is the comma node directly
// holding the assignment, if any.
fn leading_assignment(map: &NodeMap, root: NodeId) -> Option<(NodeId, Option<NodeId>)> {
  let mut container: Option<NodeId> = None;
  let mut cur = root;
  loop {
    match map[cur].stx() {
      Syntax::BinaryExpr {
        operator: OperatorName::Comma,
        left,
        ..
      } => {
        container = Some(cur);
        cur = *left;
      }
      Syntax::BinaryExpr {
        operator: OperatorName::Assignment,
        left,
        ..
      } => {
        return match map[*left].stx() {
          Syntax::IdentifierExpr { .. } => Some((cur, container)),
          _ => None,
        };
      }
      _ => return None,
    };
  }
}

fn try_fold_into(scopes: &ScopeMap, map: &mut NodeMap, var: NodeId, stmt: NodeId) -> bool {
  let expr_root = match map[stmt].stx() {
    Syntax::ExpressionStmt { expression } => *expression,
    Syntax::ForStmt {
      init: ForInit::Expression(e),
      ..
    } => *e,
    _ => return false,
  };
  let (assign, container) = match leading_assignment(map, expr_root) {
    Some(found) => found,
    None => return false,
  };
  let (target, rhs) = match map[assign].stx() {
    Syntax::BinaryExpr { left, right, .. } => (*left, *right),
    _ => return false,
  };
  let name = match map[target].stx() {
    Syntax::IdentifierExpr { name } => name.clone(),
    _ => return false,
  };
  // The assignment must hit the binding this declaration creates; a shadowing
  // catch parameter in between means it does not.
  let declared_in = scopes[map[var].scope()].variable_scope();
  if scopes.resolve_symbol(map[target].scope(), &name) != Some(declared_in) {
    return false;
  };

  // A bare declarator for the name, and the position just after the
  // initialized prefix, which keeps initializer order matching execution
  // order.
  let (k, p) = {
    let declarators = match map[var].stx() {
      Syntax::VarStmt { declarators } => declarators,
      _ => return false,
    };
    let p = declarators
      .iter()
      .take_while(|d| d.initializer.is_some())
      .count();
    let mut k = None;
    for (i, d) in declarators.iter().enumerate() {
      if d.initializer.is_none() {
        if let Syntax::IdentifierPattern { name: n } = map[d.pattern].stx() {
          if *n == name {
            k = Some(i);
            break;
          };
        };
      };
    }
    match k {
      Some(k) => (k, p),
      None => return false,
    }
  };

  let mut var_stx = map.take_stx(var);
  if let Syntax::VarStmt { declarators } = &mut var_stx {
    let mut d = declarators.remove(k);
    d.initializer = Some(rhs);
    declarators.insert(p, d);
  };
  map[var].set_stx(var_stx);

  match container {
    Some(comma) => {
      let rest = match map[comma].stx() {
        Syntax::BinaryExpr { right, .. } => *right,
        _ => return true,
      };
      let rest_stx = map.take_stx(rest);
      map[comma].set_stx(rest_stx);
    }
    None => {
      let stmt_stx = map.take_stx(stmt);
      let new_stx = match stmt_stx {
        Syntax::ForStmt {
          condition,
          post,
          body,
          ..
        } => Syntax::ForStmt {
          init: ForInit::None,
          condition,
          post,
          body,
        },
        _ => Syntax::EmptyStmt {},
      };
      map[stmt].set_stx(new_stx);
    }
  };
  true
}

fn fold_list(scopes: &ScopeMap, map: &mut NodeMap, body: &mut Vec<NodeId>) {
  let mut i = 0;
  while i < body.len() {
    if let Syntax::VarStmt { .. } = map[body[i]].stx() {
      let var = body[i];
      let mut j = i + 1;
      while j < body.len() {
        // A function declaration binds at scope entry, not here, so it
        // cannot sit between the declaration and the assignment at runtime.
        if is_empty_stmt(map, body[j])
          || matches!(map[body[j]].stx(), Syntax::FunctionDecl { .. })
        {
          j += 1;
          continue;
        };
        if !try_fold_into(scopes, map, var, body[j]) {
          break;
        };
        // The statement may have shed only its head; try it again.
      }
    };
    i += 1;
  }
}

struct FoldAssignments<'a> {
  scopes: &'a ScopeMap,
}

impl<'a> Visitor for FoldAssignments<'a> {
  fn on_up(&mut self, map: &mut NodeMap, node: NodeId, _parent: Option<NodeId>) {
    let mut stx = map.take_stx(node);
    if let Some(body) = statement_list(&mut stx) {
      fold_list(self.scopes, map, body);
    };
    map[node].set_stx(stx);
  }
}

/// Absorbs assignments immediately following a `var` into the declaration's
/// bare declarators, e.g. `var a;a=1` into `var a=1`.
pub fn fold_assignments(scopes: &ScopeMap, map: &mut NodeMap, top_level: NodeId) {
  visit_node(&mut FoldAssignments { scopes }, map, top_level);
}

#[cfg(test)]
mod tests {
  use crate::emit::emit_js;
  use crate::lex::Lexer;
  use crate::parse::parser::Parser;
  use crate::parse::toplevel::parse_top_level;

  fn after_hoist(src: &str) -> String {
    let mut parser = Parser::new(Lexer::new(src.as_bytes().to_vec()));
    let parsed = parse_top_level(&mut parser).unwrap();
    let (mut map, scopes) = parser.take();
    super::hoist_vars(&scopes, &mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  fn after_fold(src: &str) -> String {
    let mut parser = Parser::new(Lexer::new(src.as_bytes().to_vec()));
    let parsed = parse_top_level(&mut parser).unwrap();
    let (mut map, scopes) = parser.take();
    super::fold_assignments(&scopes, &mut map, parsed.top_level_node_id);
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_vars_merge_at_top() {
    assert_eq!(after_hoist("var a=1;f();var b=2"), "var a,b;a=1;f();b=2");
  }

  #[test]
  fn test_declaration_is_placed_before_first_use() {
    assert_eq!(after_hoist("f();var a=1"), "f();var a;a=1");
  }

  #[test]
  fn test_function_bodies_are_separate_regions() {
    assert_eq!(
      after_hoist("function f(){var x=1;return x}"),
      "function f(){var x;x=1;return x}"
    );
  }

  #[test]
  fn test_parameters_are_not_redeclared() {
    assert_eq!(
      after_hoist("function f(a){var b=a;return b}"),
      "function f(a){var b;b=a;return b}"
    );
  }

  #[test]
  fn test_for_loop_heads() {
    assert_eq!(
      after_hoist("for(var i=0;i<3;i++)g()"),
      "var i;for(i=0;i<3;i++)g()"
    );
    assert_eq!(after_hoist("for(var k in o)g(k)"), "var k;for(k in o)g(k)");
  }

  #[test]
  fn test_multiple_declarators() {
    assert_eq!(after_hoist("var a=1,b,c=2"), "var a,b,c;a=1,c=2");
  }

  #[test]
  fn test_assignment_folds_into_declaration() {
    assert_eq!(after_fold("var a;a=1;f()"), "var a=1;f()");
  }

  #[test]
  fn test_folded_declarators_follow_assignment_order() {
    assert_eq!(after_fold("var c,b,a;a=1;b=1"), "var a=1,b=1,c");
  }

  #[test]
  fn test_comma_chain_head_folds() {
    assert_eq!(after_fold("var a;a=1,f()"), "var a=1;f()");
  }

  #[test]
  fn test_for_init_folds() {
    assert_eq!(
      after_fold("var i;for(i=0;i<5;i++)g()"),
      "var i=0;for(;i<5;i++)g()"
    );
  }

  #[test]
  fn test_unrelated_assignment_stops_folding() {
    assert_eq!(after_fold("var a;b=1;a=2"), "var a;b=1;a=2");
  }
}
