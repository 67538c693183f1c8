use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::char::ID_CONTINUE_CHARSTR;
use crate::char::ID_START_CHARSTR;
use crate::lex::RESERVED_STRS;
use crate::symbol::ScopeId;
use crate::symbol::ScopeMap;
use crate::symbol::ScopeType;
use crate::visit::visit_node;
use crate::visit::JourneyControls;
use crate::visit::Visitor;
use ahash::AHashMap;
use ahash::AHashSet;
use itertools::Itertools;

/// Yields candidate identifiers in order of length, shortest first: `a`
/// through `$`, then `a0`, `a1`, and so on. The first position draws from the
/// identifier-start alphabet, later positions from the continue alphabet.
struct MinifiedNameGenerator {
  state: Vec<usize>,
}

impl MinifiedNameGenerator {
  fn new() -> MinifiedNameGenerator {
    MinifiedNameGenerator { state: Vec::new() }
  }

  fn advance(&mut self) -> String {
    let mut i = self.state.len();
    loop {
      if i == 0 {
        self.state.insert(0, 0);
        break;
      };
      i -= 1;
      let alphabet: &[u8] = if i == 0 {
        ID_START_CHARSTR
      } else {
        ID_CONTINUE_CHARSTR
      };
      self.state[i] += 1;
      if self.state[i] < alphabet.len() {
        break;
      };
      self.state[i] = 0;
    }
    self
      .state
      .iter()
      .enumerate()
      .map(|(i, &d)| {
        let alphabet: &[u8] = if i == 0 {
          ID_START_CHARSTR
        } else {
          ID_CONTINUE_CHARSTR
        };
        alphabet[d] as char
      })
      .collect()
  }

  fn next_available(&mut self, taken: &AHashSet<String>) -> String {
    loop {
      let name = self.advance();
      if !RESERVED_STRS.contains(name.as_str()) && !taken.contains(&name) {
        return name;
      };
    }
  }
}

// Usage counts per binding, the set of names each scope sees from above, and
// the scopes where renaming is off-limits.
struct UsageCollector<'a> {
  scopes: &'a ScopeMap,
  usages: AHashMap<(ScopeId, String), usize>,
  inherited: AHashMap<ScopeId, AHashSet<String>>,
  poisoned: AHashSet<ScopeId>,
}

impl<'a> UsageCollector<'a> {
  // `with` and direct eval can resolve names dynamically, in this scope and
  // every enclosing one; none of those scopes may rename anything.
  fn poison(&mut self, scope: ScopeId) {
    let mut cur = Some(scope);
    while let Some(s) = cur {
      if !self.poisoned.insert(s) {
        return;
      };
      cur = self.scopes[s].parent();
    }
  }
}

impl<'a> Visitor for UsageCollector<'a> {
  fn on_down(
    &mut self,
    map: &mut NodeMap,
    node: NodeId,
    _parent: Option<NodeId>,
    _ctl: &mut JourneyControls,
  ) {
    let scope = map[node].scope();
    match map[node].stx() {
      Syntax::IdentifierExpr { name } | Syntax::IdentifierPattern { name } => {
        let name = name.clone();
        let resolved = self.scopes.resolve_symbol(scope, &name);
        if let Some(declaring) = resolved {
          *self.usages.entry((declaring, name.clone())).or_insert(0) += 1;
        };
        // The name is visible from every scope between the use and its
        // declaration; those scopes must not reuse it.
        let mut cur = Some(scope);
        while let Some(s) = cur {
          if Some(s) == resolved {
            break;
          };
          self.inherited.entry(s).or_default().insert(name.clone());
          cur = self.scopes[s].parent();
        }
      }
      Syntax::WithStmt { .. } => self.poison(scope),
      Syntax::CallExpr { callee, .. } => {
        if let Syntax::IdentifierExpr { name } = map[*callee].stx() {
          if name == "eval" {
            self.poison(scope);
          };
        };
      }
      _ => {}
    };
  }
}

struct ApplyRenames<'a> {
  scopes: &'a ScopeMap,
  assignments: &'a AHashMap<(ScopeId, String), String>,
}

impl<'a> Visitor for ApplyRenames<'a> {
  fn on_down(
    &mut self,
    map: &mut NodeMap,
    node: NodeId,
    _parent: Option<NodeId>,
    _ctl: &mut JourneyControls,
  ) {
    let scope = map[node].scope();
    let new_name = match map[node].stx() {
      Syntax::IdentifierExpr { name } | Syntax::IdentifierPattern { name } => {
        match self.scopes.resolve_symbol(scope, name) {
          Some(declaring) => self.assignments.get(&(declaring, name.clone())).cloned(),
          None => None,
        }
      }
      _ => None,
    };
    if let Some(new_name) = new_name {
      match map[node].stx_mut() {
        Syntax::IdentifierExpr { name } | Syntax::IdentifierPattern { name } => *name = new_name,
        _ => {}
      };
    };
  }
}

/// Renames every safely renameable binding to the shortest identifier not
/// visible from its scope. Globals keep their names, as does every scope
/// containing (or enclosing) `with` or a direct `eval` call. More frequently
/// used bindings get shorter names.
pub fn mangle_names(
  scope_map: &mut ScopeMap,
  node_map: &mut NodeMap,
  top_level_scope: ScopeId,
  top_level_node: NodeId,
) {
  let mut collector = UsageCollector {
    scopes: scope_map,
    usages: AHashMap::new(),
    inherited: AHashMap::new(),
    poisoned: AHashSet::new(),
  };
  visit_node(&mut collector, node_map, top_level_node);
  let UsageCollector {
    usages,
    inherited,
    poisoned,
    ..
  } = collector;

  // Scopes are processed outside-in so a name inherited from an ancestor is
  // already in its final form when it lands on a blacklist.
  let mut assignments = AHashMap::<(ScopeId, String), String>::new();
  let mut stack = vec![top_level_scope];
  while let Some(scope) = stack.pop() {
    stack.extend(scope_map[scope].children().iter().copied());
    if scope_map[scope].typ() == ScopeType::Global || poisoned.contains(&scope) {
      continue;
    };
    let mut taken = AHashSet::<String>::new();
    if let Some(names) = inherited.get(&scope) {
      for name in names {
        let final_name = match scope_map.resolve_symbol(scope, name) {
          Some(declaring) => assignments
            .get(&(declaring, name.clone()))
            .cloned()
            .unwrap_or_else(|| name.clone()),
          None => name.clone(),
        };
        taken.insert(final_name);
      }
    };
    let order = scope_map[scope]
      .symbol_names()
      .iter()
      .enumerate()
      .map(|(i, name)| {
        let count = usages.get(&(scope, name.clone())).copied().unwrap_or(0);
        (count, i, name.clone())
      })
      .sorted_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, _, name) in order {
      let mut generator = MinifiedNameGenerator::new();
      let new_name = generator.next_available(&taken);
      taken.insert(new_name.clone());
      if new_name != name {
        assignments.insert((scope, name), new_name);
      };
    }
  }

  // Occurrences are rewritten against the unmodified symbol tables; only
  // then do the tables themselves move to the new names.
  visit_node(
    &mut ApplyRenames {
      scopes: scope_map,
      assignments: &assignments,
    },
    node_map,
    top_level_node,
  );
  let mut by_scope = AHashMap::<ScopeId, AHashMap<String, String>>::new();
  for ((scope, old), new) in assignments {
    by_scope.entry(scope).or_default().insert(old, new);
  }
  for (scope, renames) in by_scope {
    scope_map[scope].apply_renames(&renames);
  }
}

#[cfg(test)]
mod tests {
  use super::MinifiedNameGenerator;
  use crate::emit::emit_js;
  use crate::lex::Lexer;
  use crate::parse::parser::Parser;
  use crate::parse::toplevel::parse_top_level;

  fn after_pass(src: &str) -> String {
    let mut parser = Parser::new(Lexer::new(src.as_bytes().to_vec()));
    let parsed = parse_top_level(&mut parser).unwrap();
    let (mut map, mut scopes) = parser.take();
    super::mangle_names(
      &mut scopes,
      &mut map,
      parsed.top_level_scope_id,
      parsed.top_level_node_id,
    );
    let mut out = Vec::<u8>::new();
    emit_js(&mut out, &map, parsed.top_level_node_id);
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn test_generator_sequence() {
    let mut g = MinifiedNameGenerator::new();
    assert_eq!(g.advance(), "a");
    assert_eq!(g.advance(), "b");
    let mut last = String::new();
    for _ in 0..52 {
      last = g.advance();
    }
    assert_eq!(last, "$");
    assert_eq!(g.advance(), "a0");
    assert_eq!(g.advance(), "a1");
  }

  #[test]
  fn test_globals_keep_their_names() {
    assert_eq!(
      after_pass("var x=1;function f(){return x}"),
      "var x=1;function f(){return x}"
    );
  }

  #[test]
  fn test_parameters_shorten() {
    assert_eq!(
      after_pass("function f(longName){return longName}"),
      "function f(a){return a}"
    );
  }

  #[test]
  fn test_most_used_binding_gets_shortest_name() {
    assert_eq!(
      after_pass("function f(uu,v){v();v();v();return uu}"),
      "function f(b,a){a();a();a();return b}"
    );
  }

  #[test]
  fn test_inherited_names_are_not_shadowed() {
    assert_eq!(
      after_pass("function f(x){return function(y){return x+y}}"),
      "function f(a){return function(b){return a+b}}"
    );
  }

  #[test]
  fn test_unrelated_scopes_reuse_names() {
    assert_eq!(
      after_pass("function f(x){return x}function g(y){return y}"),
      "function f(a){return a}function g(a){return a}"
    );
  }

  #[test]
  fn test_eval_disables_renaming() {
    assert_eq!(
      after_pass("function f(x){return eval(x)}"),
      "function f(x){return eval(x)}"
    );
  }

  #[test]
  fn test_with_disables_renaming() {
    assert_eq!(
      after_pass("function f(x){with(x)g()}"),
      "function f(x){with(x)g()}"
    );
  }

  #[test]
  fn test_catch_parameter_renames() {
    assert_eq!(
      after_pass("function f(){try{g()}catch(err){h(err)}}"),
      "function f(){try{g()}catch(a){h(a)}}"
    );
  }

  #[test]
  fn test_nested_function_declarations_rename() {
    assert_eq!(
      after_pass("function f(){function helper(){}helper();helper()}"),
      "function f(){function a(){}a();a()}"
    );
  }
}
