use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::symbol::ScopeId;
use crate::symbol::ScopeMap;
use log::debug;

pub mod algebra;
pub mod blocks;
pub mod fold;
pub mod group;
pub mod hoist;
pub mod names;
pub mod returns;
pub mod vars;

/// The named rewrite passes, each independently selectable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pass {
  /// Move function declarations to the front of their statement list.
  HoistFunctions,
  /// Simplify statically-known conditions and literal-keyed accesses.
  FoldConstants,
  /// Merge every `var` in a closure into one declaration at the top.
  HoistVars,
  /// Fold a following assignment into a bare declarator's initializer.
  FoldAssignments,
  /// Merge runs of expression statements with the comma operator.
  GroupStatements,
  /// Strip redundant braces and parentheses.
  TidyBlocks,
  /// Collapse if/return shapes into conditional expressions.
  RestructureConditionals,
  /// Shorten identifiers scope by scope.
  MangleNames,
  /// Constant arithmetic, compound assignments, and operator downgrades.
  FoldExpressions,
}

impl Pass {
  pub fn name(&self) -> &'static str {
    match self {
      Pass::HoistFunctions => "hoist_functions",
      Pass::FoldConstants => "fold_constants",
      Pass::HoistVars => "hoist_vars",
      Pass::FoldAssignments => "fold_assignments",
      Pass::GroupStatements => "group_statements",
      Pass::TidyBlocks => "tidy_blocks",
      Pass::RestructureConditionals => "restructure_conditionals",
      Pass::MangleNames => "mangle_names",
      Pass::FoldExpressions => "fold_expressions",
    }
  }

  pub fn from_name(name: &str) -> Option<Pass> {
    let pass = match name {
      "hoist_functions" => Pass::HoistFunctions,
      "fold_constants" => Pass::FoldConstants,
      "hoist_vars" => Pass::HoistVars,
      "fold_assignments" => Pass::FoldAssignments,
      "group_statements" => Pass::GroupStatements,
      "tidy_blocks" => Pass::TidyBlocks,
      "restructure_conditionals" => Pass::RestructureConditionals,
      "mangle_names" => Pass::MangleNames,
      "fold_expressions" => Pass::FoldExpressions,
      _ => return None,
    };
    Some(pass)
  }
}

pub struct MinifyOptions {
  pub passes: Vec<Pass>,
}

impl Default for MinifyOptions {
  // The grouping and tidying passes run again at the end, since renaming and
  // expression folding expose new opportunities for them.
  fn default() -> MinifyOptions {
    MinifyOptions {
      passes: vec![
        Pass::HoistFunctions,
        Pass::FoldConstants,
        Pass::HoistVars,
        Pass::FoldAssignments,
        Pass::GroupStatements,
        Pass::TidyBlocks,
        Pass::RestructureConditionals,
        Pass::MangleNames,
        Pass::FoldExpressions,
        Pass::GroupStatements,
        Pass::TidyBlocks,
      ],
    }
  }
}

pub fn minify_tree(
  scope_map: &mut ScopeMap,
  node_map: &mut NodeMap,
  top_level_scope: ScopeId,
  top_level_node: NodeId,
  options: &MinifyOptions,
) {
  for pass in options.passes.iter() {
    debug!("running pass {}", pass.name());
    match pass {
      Pass::HoistFunctions => hoist::hoist_functions(node_map, top_level_node),
      Pass::FoldConstants => fold::fold_constants(node_map, top_level_node),
      Pass::HoistVars => vars::hoist_vars(scope_map, node_map, top_level_node),
      Pass::FoldAssignments => vars::fold_assignments(scope_map, node_map, top_level_node),
      Pass::GroupStatements => group::group_statements(node_map, top_level_node),
      Pass::TidyBlocks => blocks::tidy_blocks(node_map, top_level_node),
      Pass::RestructureConditionals => returns::restructure_conditionals(node_map, top_level_node),
      Pass::MangleNames => {
        names::mangle_names(scope_map, node_map, top_level_scope, top_level_node)
      }
      Pass::FoldExpressions => algebra::fold_expressions(scope_map, node_map, top_level_node),
    };
  }
}

/// Runs the full default pipeline.
pub fn minify_js(
  scope_map: &mut ScopeMap,
  node_map: &mut NodeMap,
  top_level_scope: ScopeId,
  top_level_node: NodeId,
) {
  minify_tree(
    scope_map,
    node_map,
    top_level_scope,
    top_level_node,
    &MinifyOptions::default(),
  );
}

// A statement-list-bearing syntax node; switch branches count, since their
// bodies are plain statement lists.
pub(crate) fn statement_list(stx: &mut Syntax) -> Option<&mut Vec<NodeId>> {
  match stx {
    Syntax::TopLevel { body } | Syntax::BlockStmt { body } | Syntax::SwitchBranch { body, .. } => {
      Some(body)
    }
    _ => None,
  }
}

// A directive-prologue entry, e.g. `"use strict"`, which must stay first in
// its list and must not be merged into another expression.
pub(crate) fn is_directive(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::ExpressionStmt { expression } => {
      matches!(map[*expression].stx(), Syntax::LiteralStringExpr { .. })
    }
    _ => false,
  }
}

pub(crate) fn is_empty_stmt(map: &NodeMap, n: NodeId) -> bool {
  matches!(map[n].stx(), Syntax::EmptyStmt {})
}
