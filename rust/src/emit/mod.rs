use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::PropertyKey;
use crate::ast::Syntax;
use crate::ast::ForInLhs;
use crate::ast::ForInit;
use crate::coerce;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use ahash::AHashMap;
use lazy_static::lazy_static;

#[cfg(test)]
mod tests;

lazy_static! {
  static ref BINARY_OPERATOR_SYNTAX: AHashMap<OperatorName, &'static str> = {
    let mut map = AHashMap::<OperatorName, &'static str>::new();
    map.insert(OperatorName::Addition, "+");
    map.insert(OperatorName::Assignment, "=");
    map.insert(OperatorName::AssignmentAddition, "+=");
    map.insert(OperatorName::AssignmentBitwiseAnd, "&=");
    map.insert(OperatorName::AssignmentBitwiseLeftShift, "<<=");
    map.insert(OperatorName::AssignmentBitwiseOr, "|=");
    map.insert(OperatorName::AssignmentBitwiseRightShift, ">>=");
    map.insert(OperatorName::AssignmentBitwiseUnsignedRightShift, ">>>=");
    map.insert(OperatorName::AssignmentBitwiseXor, "^=");
    map.insert(OperatorName::AssignmentDivision, "/=");
    map.insert(OperatorName::AssignmentMultiplication, "*=");
    map.insert(OperatorName::AssignmentRemainder, "%=");
    map.insert(OperatorName::AssignmentSubtraction, "-=");
    map.insert(OperatorName::BitwiseAnd, "&");
    map.insert(OperatorName::BitwiseLeftShift, "<<");
    map.insert(OperatorName::BitwiseOr, "|");
    map.insert(OperatorName::BitwiseRightShift, ">>");
    map.insert(OperatorName::BitwiseUnsignedRightShift, ">>>");
    map.insert(OperatorName::BitwiseXor, "^");
    map.insert(OperatorName::Comma, ",");
    map.insert(OperatorName::Division, "/");
    map.insert(OperatorName::Equality, "==");
    map.insert(OperatorName::GreaterThan, ">");
    map.insert(OperatorName::GreaterThanOrEqual, ">=");
    map.insert(OperatorName::In, " in ");
    map.insert(OperatorName::Inequality, "!=");
    map.insert(OperatorName::Instanceof, " instanceof ");
    map.insert(OperatorName::LessThan, "<");
    map.insert(OperatorName::LessThanOrEqual, "<=");
    map.insert(OperatorName::LogicalAnd, "&&");
    map.insert(OperatorName::LogicalOr, "||");
    map.insert(OperatorName::Multiplication, "*");
    map.insert(OperatorName::Remainder, "%");
    map.insert(OperatorName::StrictEquality, "===");
    map.insert(OperatorName::StrictInequality, "!==");
    map.insert(OperatorName::Subtraction, "-");
    map
  };
  static ref UNARY_OPERATOR_SYNTAX: AHashMap<OperatorName, &'static str> = {
    let mut map = AHashMap::<OperatorName, &'static str>::new();
    map.insert(OperatorName::BitwiseNot, "~");
    map.insert(OperatorName::Delete, "delete");
    map.insert(OperatorName::LogicalNot, "!");
    map.insert(OperatorName::PrefixDecrement, "--");
    map.insert(OperatorName::PrefixIncrement, "++");
    map.insert(OperatorName::Typeof, "typeof");
    map.insert(OperatorName::UnaryNegation, "-");
    map.insert(OperatorName::UnaryPlus, "+");
    map.insert(OperatorName::Void, "void");
    map
  };
}

pub struct EmitOptions {
  // Re-emit the comment text that preceded the first token, ahead of the
  // program.
  pub preserve_leading_comments: bool,
}

impl Default for EmitOptions {
  fn default() -> EmitOptions {
    EmitOptions {
      preserve_leading_comments: false,
    }
  }
}

fn op_precedence(name: OperatorName) -> u8 {
  OPERATORS[&name].precedence
}

/// The effective precedence an expression node binds with when printed.
/// None means the node is atomic and never needs wrapping. Boolean literals
/// print as `!0`/`!1` and negative numbers with a leading `-`, so they carry
/// unary precedence.
pub fn node_precedence(map: &NodeMap, n: NodeId) -> Option<u8> {
  match map[n].stx() {
    Syntax::BinaryExpr { operator, .. } => Some(op_precedence(*operator)),
    Syntax::ConditionalExpr { .. } => Some(op_precedence(OperatorName::Conditional)),
    Syntax::UnaryExpr { operator, .. } => Some(op_precedence(*operator)),
    Syntax::UnaryPostfixExpr { operator, .. } => Some(op_precedence(*operator)),
    Syntax::CallExpr { .. } => Some(op_precedence(OperatorName::Call)),
    Syntax::MemberExpr { .. } | Syntax::ComputedMemberExpr { .. } => {
      Some(op_precedence(OperatorName::MemberAccess))
    }
    Syntax::NewExpr { .. } => Some(op_precedence(OperatorName::New)),
    Syntax::LiteralBooleanExpr { .. } => Some(op_precedence(OperatorName::LogicalNot)),
    Syntax::LiteralNumberExpr { value } if value.0 < 0.0 => {
      Some(op_precedence(OperatorName::UnaryNegation))
    }
    _ => None,
  }
}

/// Whether a `new` with no argument list sits somewhere `(new X)` and
/// `new X.y` would parse differently, requiring parentheses.
fn is_bare_new(map: &NodeMap, n: NodeId) -> bool {
  matches!(map[n].stx(), Syntax::NewExpr {
    arguments: None,
    ..
  })
}

// A `new` callee containing a call must be parenthesised, as the argument
// list would otherwise bind to the `new`.
fn callee_contains_call(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::CallExpr { .. } => true,
    Syntax::MemberExpr { left, .. } => callee_contains_call(map, *left),
    Syntax::ComputedMemberExpr { object, .. } => callee_contains_call(map, *object),
    _ => false,
  }
}

fn is_identifier_continue(c: u8) -> bool {
  c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

/// Whether the rendered text of an expression statement would start with a
/// token that makes it parse as a declaration or block.
fn starts_with_ambiguous_token(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::FunctionExpr { .. } | Syntax::LiteralObjectExpr { .. } => true,
    Syntax::BinaryExpr { left, .. } => starts_with_ambiguous_token(map, *left),
    Syntax::ConditionalExpr { test, .. } => starts_with_ambiguous_token(map, *test),
    Syntax::UnaryPostfixExpr { argument, .. } => starts_with_ambiguous_token(map, *argument),
    Syntax::CallExpr { callee, .. } => starts_with_ambiguous_token(map, *callee),
    Syntax::MemberExpr { left, .. } => starts_with_ambiguous_token(map, *left),
    Syntax::ComputedMemberExpr { object, .. } => starts_with_ambiguous_token(map, *object),
    _ => false,
  }
}

/// An unbraced `if` without an `else` at the end of a statement would
/// capture a following `else`.
pub fn ends_with_dangling_if(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::IfStmt {
      alternate: None, ..
    } => true,
    Syntax::IfStmt {
      alternate: Some(alternate),
      ..
    } => ends_with_dangling_if(map, *alternate),
    Syntax::WhileStmt { body, .. }
    | Syntax::WithStmt { body, .. }
    | Syntax::ForStmt { body, .. }
    | Syntax::ForInStmt { body, .. } => ends_with_dangling_if(map, *body),
    Syntax::LabelStmt { statement, .. } => ends_with_dangling_if(map, *statement),
    _ => false,
  }
}

// Whether a semicolon must separate this statement from a following one.
// Statements ending in a brace (and the empty statement, which renders as
// its own semicolon) need none; control statements defer to their leaf
// substatement.
fn needs_semicolon(map: &NodeMap, n: NodeId) -> bool {
  match map[n].stx() {
    Syntax::BlockStmt { .. }
    | Syntax::EmptyStmt {}
    | Syntax::FunctionDecl { .. }
    | Syntax::SwitchStmt { .. }
    | Syntax::TryStmt { .. } => false,
    Syntax::IfStmt {
      consequent,
      alternate,
      ..
    } => needs_semicolon(map, alternate.unwrap_or(*consequent)),
    Syntax::WhileStmt { body, .. }
    | Syntax::WithStmt { body, .. }
    | Syntax::ForStmt { body, .. }
    | Syntax::ForInStmt { body, .. } => needs_semicolon(map, *body),
    Syntax::LabelStmt { statement, .. } => needs_semicolon(map, *statement),
    _ => true,
  }
}

pub fn emit_js(out: &mut Vec<u8>, map: &NodeMap, n: NodeId) {
  emit_js_under_operator(out, map, n, None);
}

pub fn emit_program(
  out: &mut Vec<u8>,
  map: &NodeMap,
  top_level: NodeId,
  leading_comments: &str,
  options: &EmitOptions,
) {
  if options.preserve_leading_comments && !leading_comments.is_empty() {
    out.extend_from_slice(leading_comments.as_bytes());
    out.push(b'\n');
  };
  emit_js(out, map, top_level);
}

/// Renders a node to a fresh buffer; used by passes that gate a rewrite on
/// output length.
pub fn emitted_len(map: &NodeMap, n: NodeId) -> usize {
  let mut out = Vec::<u8>::new();
  emit_js(&mut out, map, n);
  out.len()
}

fn emit_wrapped(out: &mut Vec<u8>, map: &NodeMap, n: NodeId) {
  out.push(b'(');
  emit_js_under_operator(out, map, n, None);
  out.push(b')');
}

// Emits an operand, parenthesising when its precedence is too loose for the
// slot.
fn emit_operand(out: &mut Vec<u8>, map: &NodeMap, n: NodeId, slot_precedence: u8) {
  emit_js_under_operator(out, map, n, Some(slot_precedence));
}

// Emits the object of a member access or the callee of a call, which
// additionally must wrap a bare `new`.
fn emit_chain_base(out: &mut Vec<u8>, map: &NodeMap, n: NodeId) {
  if is_bare_new(map, n) {
    emit_wrapped(out, map, n);
  } else {
    emit_operand(out, map, n, op_precedence(OperatorName::MemberAccess));
  };
}

fn emit_statements(out: &mut Vec<u8>, map: &NodeMap, body: &[NodeId]) -> Option<NodeId> {
  let mut last: Option<NodeId> = None;
  for &stmt in body {
    if let Syntax::EmptyStmt {} = map[stmt].stx() {
      continue;
    };
    if let Some(prev) = last {
      if needs_semicolon(map, prev) {
        out.push(b';');
      };
    };
    emit_js_under_operator(out, map, stmt, None);
    last = Some(stmt);
  }
  last
}

// Emits a keyword-led clause body, inserting a space only when the next
// token would otherwise merge with the keyword.
fn emit_after_keyword(out: &mut Vec<u8>, rendered: &[u8]) {
  match rendered.first() {
    Some(&c) if is_identifier_continue(c) => out.push(b' '),
    _ => {}
  };
  out.extend_from_slice(rendered);
}

fn render(map: &NodeMap, n: NodeId, parent_precedence: Option<u8>) -> Vec<u8> {
  let mut buf = Vec::<u8>::new();
  emit_js_under_operator(&mut buf, map, n, parent_precedence);
  buf
}

fn emit_function_parts(
  out: &mut Vec<u8>,
  map: &NodeMap,
  name: Option<NodeId>,
  parameters: &[NodeId],
  body: NodeId,
) {
  out.extend_from_slice(b"function");
  if let Some(name) = name {
    out.push(b' ');
    emit_js_under_operator(out, map, name, None);
  };
  out.push(b'(');
  for (i, &param) in parameters.iter().enumerate() {
    if i > 0 {
      out.push(b',');
    };
    emit_js_under_operator(out, map, param, None);
  }
  out.extend_from_slice(b")");
  emit_js_under_operator(out, map, body, None);
}

fn emit_var_declarators(out: &mut Vec<u8>, map: &NodeMap, declarators: &[crate::ast::VariableDeclarator]) {
  out.extend_from_slice(b"var ");
  for (i, decl) in declarators.iter().enumerate() {
    if i > 0 {
      out.push(b',');
    };
    emit_js_under_operator(out, map, decl.pattern, None);
    if let Some(init) = decl.initializer {
      out.push(b'=');
      emit_operand(out, map, init, op_precedence(OperatorName::Assignment));
    };
  }
}

fn emit_js_under_operator(
  out: &mut Vec<u8>,
  map: &NodeMap,
  node: NodeId,
  parent_precedence: Option<u8>,
) {
  if let (Some(ceiling), Some(mine)) = (parent_precedence, node_precedence(map, node)) {
    if ceiling > mine {
      emit_wrapped(out, map, node);
      return;
    };
  };
  match map[node].stx() {
    Syntax::IdentifierExpr { name } | Syntax::IdentifierPattern { name } => {
      out.extend_from_slice(name.as_bytes());
    }
    Syntax::ThisExpr {} => out.extend_from_slice(b"this"),
    Syntax::LiteralNull {} => out.extend_from_slice(b"null"),
    Syntax::LiteralBooleanExpr { value } => {
      out.extend_from_slice(if *value { b"!0" } else { b"!1" });
    }
    Syntax::LiteralNumberExpr { value } => emit_number(out, value.0),
    Syntax::LiteralStringExpr { value } => emit_string(out, value),
    Syntax::LiteralRegexExpr { value } => out.extend_from_slice(value.as_bytes()),
    Syntax::LiteralArrayExpr { elements } => {
      out.push(b'[');
      for (i, element) in elements.iter().enumerate() {
        if i > 0 {
          out.push(b',');
        };
        if let Some(element) = element {
          emit_operand(out, map, *element, op_precedence(OperatorName::Assignment));
        };
      }
      // A trailing elision needs one extra comma to count.
      if let Some(None) = elements.last() {
        out.push(b',');
      };
      out.push(b']');
    }
    Syntax::LiteralObjectExpr { members } => {
      out.push(b'{');
      for (i, &member) in members.iter().enumerate() {
        if i > 0 {
          out.push(b',');
        };
        emit_js_under_operator(out, map, member, None);
      }
      out.push(b'}');
    }
    Syntax::ObjectMember { key, value } => {
      match key {
        PropertyKey::Identifier(name) => out.extend_from_slice(name.as_bytes()),
        PropertyKey::String(value) => emit_string(out, value),
        PropertyKey::Number(value) => emit_number(out, value.0),
      };
      out.push(b':');
      emit_operand(out, map, *value, op_precedence(OperatorName::Assignment));
    }
    Syntax::ParenthesisedExpr { expression } => {
      emit_wrapped(out, map, *expression);
    }
    Syntax::FunctionExpr {
      name,
      parameters,
      body,
    } => {
      emit_function_parts(out, map, *name, parameters, *body);
    }
    Syntax::MemberExpr { left, right } => {
      let base = render(map, *left, Some(op_precedence(OperatorName::MemberAccess)));
      if is_bare_new(map, *left) {
        out.push(b'(');
        out.extend_from_slice(&base);
        out.push(b')');
      } else {
        out.extend_from_slice(&base);
        // `1.x` is a malformed number; the dot must not be mistaken for a
        // decimal point.
        if base.iter().all(|c| c.is_ascii_digit()) {
          out.push(b'.');
        };
      };
      out.push(b'.');
      out.extend_from_slice(right.as_bytes());
    }
    Syntax::ComputedMemberExpr { object, member } => {
      emit_chain_base(out, map, *object);
      out.push(b'[');
      emit_js_under_operator(out, map, *member, None);
      out.push(b']');
    }
    Syntax::CallExpr { callee, arguments } => {
      emit_chain_base(out, map, *callee);
      out.push(b'(');
      for (i, &arg) in arguments.iter().enumerate() {
        if i > 0 {
          out.push(b',');
        };
        emit_operand(out, map, arg, op_precedence(OperatorName::Assignment));
      }
      out.push(b')');
    }
    Syntax::NewExpr { callee, arguments } => {
      out.extend_from_slice(b"new");
      let rendered = if callee_contains_call(map, *callee) {
        let mut buf = Vec::<u8>::new();
        emit_wrapped(&mut buf, map, *callee);
        buf
      } else {
        render(map, *callee, Some(op_precedence(OperatorName::MemberAccess)))
      };
      emit_after_keyword(out, &rendered);
      if let Some(arguments) = arguments {
        out.push(b'(');
        for (i, &arg) in arguments.iter().enumerate() {
          if i > 0 {
            out.push(b',');
          };
          emit_operand(out, map, arg, op_precedence(OperatorName::Assignment));
        }
        out.push(b')');
      };
    }
    Syntax::UnaryExpr { operator, argument } => {
      let syntax = UNARY_OPERATOR_SYNTAX[operator];
      out.extend_from_slice(syntax.as_bytes());
      let rendered = render(map, *argument, Some(op_precedence(*operator)));
      let last = syntax.as_bytes().last().copied();
      match (last, rendered.first()) {
        // `typeof x`, but `typeof!x` is fine.
        (Some(c), Some(&first)) if c.is_ascii_alphabetic() && is_identifier_continue(first) => {
          out.push(b' ');
        }
        // `- -x` must not merge into `--x`.
        (Some(op_char @ (b'-' | b'+')), Some(&first)) if first == op_char => {
          out.push(b' ');
        }
        _ => {}
      };
      out.extend_from_slice(&rendered);
    }
    Syntax::UnaryPostfixExpr { operator, argument } => {
      emit_operand(out, map, *argument, op_precedence(*operator));
      out.extend_from_slice(match operator {
        OperatorName::PostfixIncrement => b"++",
        _ => b"--",
      });
    }
    Syntax::BinaryExpr {
      operator,
      left,
      right,
    } => {
      let precedence = op_precedence(*operator);
      emit_operand(out, map, *left, precedence);
      let syntax = BINARY_OPERATOR_SYNTAX[operator];
      out.extend_from_slice(syntax.as_bytes());
      let rendered = render(map, *right, Some(precedence));
      // `a+ +b` and `a- -b` must keep the separating space; `a+ ++b` too.
      let last = syntax.as_bytes().last().copied();
      if let (Some(op_char @ (b'-' | b'+')), Some(&first)) = (last, rendered.first()) {
        if first == op_char {
          out.push(b' ');
        };
      };
      out.extend_from_slice(&rendered);
    }
    Syntax::ConditionalExpr {
      test,
      consequent,
      alternate,
    } => {
      let precedence = op_precedence(OperatorName::Conditional);
      // The test slot is the non-associative side; an equal-precedence test
      // must wrap.
      emit_operand(out, map, *test, precedence + 1);
      out.push(b'?');
      emit_operand(out, map, *consequent, op_precedence(OperatorName::Assignment));
      out.push(b':');
      emit_operand(out, map, *alternate, op_precedence(OperatorName::Assignment));
    }

    Syntax::TopLevel { body } => {
      emit_statements(out, map, body);
    }
    Syntax::BlockStmt { body } => {
      out.push(b'{');
      emit_statements(out, map, body);
      out.push(b'}');
    }
    Syntax::EmptyStmt {} => out.push(b';'),
    Syntax::DebuggerStmt {} => out.extend_from_slice(b"debugger"),
    Syntax::ExpressionStmt { expression } => {
      if starts_with_ambiguous_token(map, *expression) {
        emit_wrapped(out, map, *expression);
      } else {
        emit_js_under_operator(out, map, *expression, None);
      };
    }
    Syntax::VarStmt { declarators } => {
      emit_var_declarators(out, map, declarators);
    }
    Syntax::IfStmt {
      test,
      consequent,
      alternate,
    } => {
      out.extend_from_slice(b"if(");
      emit_js_under_operator(out, map, *test, None);
      out.push(b')');
      let braces_needed = alternate.is_some()
        && !matches!(map[*consequent].stx(), Syntax::BlockStmt { .. })
        && ends_with_dangling_if(map, *consequent);
      if braces_needed {
        out.push(b'{');
        emit_js_under_operator(out, map, *consequent, None);
        out.push(b'}');
      } else {
        emit_js_under_operator(out, map, *consequent, None);
      };
      if let Some(alternate) = alternate {
        if !braces_needed && needs_semicolon(map, *consequent) {
          out.push(b';');
        };
        out.extend_from_slice(b"else");
        let rendered = render(map, *alternate, None);
        emit_after_keyword(out, &rendered);
      };
    }
    Syntax::WhileStmt { condition, body } => {
      out.extend_from_slice(b"while(");
      emit_js_under_operator(out, map, *condition, None);
      out.push(b')');
      emit_js_under_operator(out, map, *body, None);
    }
    Syntax::DoWhileStmt { condition, body } => {
      out.extend_from_slice(b"do");
      let rendered = render(map, *body, None);
      emit_after_keyword(out, &rendered);
      if needs_semicolon(map, *body) {
        out.push(b';');
      };
      out.extend_from_slice(b"while(");
      emit_js_under_operator(out, map, *condition, None);
      out.push(b')');
    }
    Syntax::ForStmt {
      init,
      condition,
      post,
      body,
    } => {
      out.extend_from_slice(b"for(");
      match init {
        ForInit::None => {}
        ForInit::Expression(e) => emit_js_under_operator(out, map, *e, None),
        ForInit::Declaration(d) => emit_js_under_operator(out, map, *d, None),
      };
      out.push(b';');
      if let Some(condition) = condition {
        emit_js_under_operator(out, map, *condition, None);
      };
      out.push(b';');
      if let Some(post) = post {
        emit_js_under_operator(out, map, *post, None);
      };
      out.push(b')');
      emit_js_under_operator(out, map, *body, None);
    }
    Syntax::ForInStmt { lhs, rhs, body } => {
      out.extend_from_slice(b"for(");
      match lhs {
        ForInLhs::Declaration(d) => emit_js_under_operator(out, map, *d, None),
        ForInLhs::Pattern(p) => emit_js_under_operator(out, map, *p, None),
      };
      out.extend_from_slice(b" in");
      let rendered = render(map, *rhs, None);
      emit_after_keyword(out, &rendered);
      out.push(b')');
      emit_js_under_operator(out, map, *body, None);
    }
    Syntax::ReturnStmt { value } => {
      out.extend_from_slice(b"return");
      if let Some(value) = value {
        let rendered = render(map, *value, None);
        emit_after_keyword(out, &rendered);
      };
    }
    Syntax::ThrowStmt { value } => {
      out.extend_from_slice(b"throw");
      let rendered = render(map, *value, None);
      emit_after_keyword(out, &rendered);
    }
    Syntax::BreakStmt { label } => {
      out.extend_from_slice(b"break");
      if let Some(label) = label {
        out.push(b' ');
        out.extend_from_slice(label.as_bytes());
      };
    }
    Syntax::ContinueStmt { label } => {
      out.extend_from_slice(b"continue");
      if let Some(label) = label {
        out.push(b' ');
        out.extend_from_slice(label.as_bytes());
      };
    }
    Syntax::LabelStmt { name, statement } => {
      out.extend_from_slice(name.as_bytes());
      out.push(b':');
      emit_js_under_operator(out, map, *statement, None);
    }
    Syntax::WithStmt { object, body } => {
      out.extend_from_slice(b"with(");
      emit_js_under_operator(out, map, *object, None);
      out.push(b')');
      emit_js_under_operator(out, map, *body, None);
    }
    Syntax::SwitchStmt { test, branches } => {
      out.extend_from_slice(b"switch(");
      emit_js_under_operator(out, map, *test, None);
      out.extend_from_slice(b"){");
      for &branch in branches {
        emit_js_under_operator(out, map, branch, None);
      }
      out.push(b'}');
    }
    Syntax::SwitchBranch { case, body } => {
      match case {
        Some(case) => {
          out.extend_from_slice(b"case");
          let rendered = render(map, *case, None);
          emit_after_keyword(out, &rendered);
          out.push(b':');
        }
        None => out.extend_from_slice(b"default:"),
      };
      let last = emit_statements(out, map, body);
      if let Some(last) = last {
        if needs_semicolon(map, last) {
          out.push(b';');
        };
      };
    }
    Syntax::TryStmt {
      wrapped,
      catch,
      finally,
    } => {
      out.extend_from_slice(b"try");
      emit_js_under_operator(out, map, *wrapped, None);
      if let Some(catch) = catch {
        emit_js_under_operator(out, map, *catch, None);
      };
      if let Some(finally) = finally {
        out.extend_from_slice(b"finally");
        emit_js_under_operator(out, map, *finally, None);
      };
    }
    Syntax::CatchBlock { parameter, body } => {
      out.extend_from_slice(b"catch(");
      emit_js_under_operator(out, map, *parameter, None);
      out.push(b')');
      emit_js_under_operator(out, map, *body, None);
    }
    Syntax::FunctionDecl {
      name,
      parameters,
      body,
    } => {
      emit_function_parts(out, map, Some(*name), parameters, *body);
    }
  };
}

/// Renders a number as its shortest legal literal, choosing between plain
/// decimal, exponent form, bare-fraction form, and hex.
pub fn emit_number(out: &mut Vec<u8>, value: f64) {
  // Non-finite values have no literal form; these only appear as parsed
  // identifier expressions, never as number nodes, since folds refuse to
  // produce them.
  if value.is_nan() {
    out.extend_from_slice(b"NaN");
    return;
  };
  if value.is_infinite() {
    if value < 0.0 {
      out.push(b'-');
    };
    out.extend_from_slice(b"Infinity");
    return;
  };
  if value < 0.0 {
    out.push(b'-');
  };
  let mag = value.abs();
  let base = coerce::to_string(mag);
  let mut candidates = Vec::<String>::new();
  // `1e+21` the language prints; `1e21` the grammar accepts.
  candidates.push(base.replace("e+", "e"));
  if let Some(stripped) = base.strip_prefix("0.") {
    candidates.push(format!(".{}", stripped));
  };
  if base.bytes().all(|c| c.is_ascii_digit()) {
    let digits = base.trim_end_matches('0');
    let zeros = base.len() - digits.len();
    if zeros >= 3 {
      candidates.push(format!("{}e{}", digits, zeros));
    };
    if mag < 9007199254740992.0 {
      candidates.push(format!("0x{:x}", mag as u64));
    };
  };
  let mut best = 0;
  for (i, c) in candidates.iter().enumerate() {
    if c.len() < candidates[best].len() {
      best = i;
    };
  }
  out.extend_from_slice(candidates[best].as_bytes());
}

/// Renders a string literal with whichever quote needs fewer escapes,
/// preferring double quotes on a tie.
pub fn emit_string(out: &mut Vec<u8>, value: &str) {
  let singles = value.bytes().filter(|&c| c == b'\'').count();
  let doubles = value.bytes().filter(|&c| c == b'"').count();
  let quote = if doubles > singles { b'\'' } else { b'"' };
  out.push(quote);
  for c in value.chars() {
    match c {
      '\\' => out.extend_from_slice(b"\\\\"),
      '\n' => out.extend_from_slice(b"\\n"),
      '\r' => out.extend_from_slice(b"\\r"),
      '\t' => out.extend_from_slice(b"\\t"),
      '\u{08}' => out.extend_from_slice(b"\\b"),
      '\u{0b}' => out.extend_from_slice(b"\\v"),
      '\u{0c}' => out.extend_from_slice(b"\\f"),
      '\u{2028}' => out.extend_from_slice(b"\\u2028"),
      '\u{2029}' => out.extend_from_slice(b"\\u2029"),
      c if (c as u32) < 0x20 => {
        out.extend_from_slice(format!("\\x{:02x}", c as u32).as_bytes());
      }
      c if c as u32 == quote as u32 => {
        out.push(b'\\');
        out.push(quote);
      }
      c => {
        let mut buf = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
      }
    };
  }
  out.push(quote);
}
