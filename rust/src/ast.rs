use crate::num::JsNumber;
use crate::operator::OperatorName;
use crate::source::SourceRange;
use crate::symbol::ScopeId;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::Index;
use std::ops::IndexMut;

/// Handle to a node stored in a NodeMap. The handle is the node's identity:
/// two structurally identical subtrees are still distinct nodes, which is why
/// Syntax deliberately does not implement PartialEq.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn id(&self) -> usize {
        self.0
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Node #{}", self.0)
    }
}

pub struct NodeData {
    loc: SourceRange,
    scope: ScopeId,
    stx: Syntax,
}

impl NodeData {
    pub fn loc(&self) -> SourceRange {
        self.loc
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn set_scope(&mut self, scope: ScopeId) {
        self.scope = scope;
    }

    pub fn stx(&self) -> &Syntax {
        &self.stx
    }

    pub fn stx_mut(&mut self) -> &mut Syntax {
        &mut self.stx
    }

    pub fn set_stx(&mut self, stx: Syntax) {
        self.stx = stx;
    }
}

/// Arena of every node in a program tree. Nodes are never freed; rewrite
/// passes that detach a subtree simply leave it orphaned in the arena.
pub struct NodeMap {
    nodes: Vec<NodeData>,
}

impl NodeMap {
    pub fn new() -> NodeMap {
        NodeMap { nodes: Vec::new() }
    }

    pub fn create_node(&mut self, scope: ScopeId, loc: SourceRange, stx: Syntax) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(NodeData { loc, scope, stx });
        NodeId(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Moves the syntax out of a node, leaving an empty statement behind.
    /// Used by passes that need to inspect other nodes while rewriting one.
    pub fn take_stx(&mut self, n: NodeId) -> Syntax {
        std::mem::replace(&mut self.nodes[n.0].stx, Syntax::EmptyStmt {})
    }

    /// Recursively copies a subtree into fresh nodes. Used to build a
    /// speculative rewrite candidate without touching the original, which
    /// stays live in case the candidate is discarded.
    pub fn deep_copy(&mut self, n: NodeId) -> NodeId {
        let loc = self.nodes[n.0].loc;
        let scope = self.nodes[n.0].scope;
        let mut stx = self.nodes[n.0].stx.clone();
        let mut children = Vec::<NodeId>::new();
        for_each_child(&stx, |c| children.push(c));
        // A well-formed tree never repeats a child under one parent, so
        // replacing by old id is unambiguous.
        for &c in children.iter() {
            let copy = self.deep_copy(c);
            replace_child(&mut stx, c, copy);
        }
        self.create_node(scope, loc, stx)
    }
}

impl Index<NodeId> for NodeMap {
    type Output = NodeData;

    fn index(&self, n: NodeId) -> &Self::Output {
        &self.nodes[n.0]
    }
}

impl IndexMut<NodeId> for NodeMap {
    fn index_mut(&mut self, n: NodeId) -> &mut Self::Output {
        &mut self.nodes[n.0]
    }
}

#[derive(Clone, Debug)]
pub struct VariableDeclarator {
    pub pattern: NodeId,
    pub initializer: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub enum ForInit {
    None,
    Expression(NodeId),
    Declaration(NodeId),
}

#[derive(Clone, Debug)]
pub enum ForInLhs {
    Declaration(NodeId),
    Pattern(NodeId),
}

#[derive(Clone, Debug)]
pub enum PropertyKey {
    Identifier(String),
    String(String),
    Number(JsNumber),
}

// WARNING: Do not implement PartialEq; nodes are compared by NodeId.
#[derive(Clone, Debug)]
pub enum Syntax {
    // Patterns. A binding position is a pattern node, not an expression, so
    // the renamer can treat all binding occurrences uniformly.
    IdentifierPattern {
        name: String,
    },

    // Expressions.
    BinaryExpr {
        operator: OperatorName,
        left: NodeId,
        right: NodeId,
    },
    CallExpr {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    ComputedMemberExpr {
        object: NodeId,
        member: NodeId,
    },
    ConditionalExpr {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    FunctionExpr {
        // Binds in the function's own scope, unlike a declaration's name.
        name: Option<NodeId>,
        parameters: Vec<NodeId>,
        body: NodeId,
    },
    IdentifierExpr {
        name: String,
    },
    LiteralArrayExpr {
        // None is an elision.
        elements: Vec<Option<NodeId>>,
    },
    LiteralBooleanExpr {
        value: bool,
    },
    LiteralNull {},
    LiteralNumberExpr {
        value: JsNumber,
    },
    LiteralObjectExpr {
        members: Vec<NodeId>,
    },
    LiteralRegexExpr {
        // Raw source text including delimiters and flags.
        value: String,
    },
    LiteralStringExpr {
        value: String,
    },
    MemberExpr {
        left: NodeId,
        right: String,
    },
    NewExpr {
        callee: NodeId,
        // None means the argument list was omitted entirely.
        arguments: Option<Vec<NodeId>>,
    },
    ObjectMember {
        key: PropertyKey,
        value: NodeId,
    },
    // Explicit parentheses from the source. Keeping them as a node makes
    // every tree renderable as-is; a cleanup pass removes the redundant ones.
    ParenthesisedExpr {
        expression: NodeId,
    },
    ThisExpr {},
    UnaryExpr {
        operator: OperatorName,
        argument: NodeId,
    },
    UnaryPostfixExpr {
        operator: OperatorName,
        argument: NodeId,
    },

    // Statements.
    BlockStmt {
        body: Vec<NodeId>,
    },
    BreakStmt {
        label: Option<String>,
    },
    CatchBlock {
        parameter: NodeId,
        body: NodeId,
    },
    ContinueStmt {
        label: Option<String>,
    },
    DebuggerStmt {},
    DoWhileStmt {
        condition: NodeId,
        body: NodeId,
    },
    EmptyStmt {},
    ExpressionStmt {
        expression: NodeId,
    },
    ForInStmt {
        lhs: ForInLhs,
        rhs: NodeId,
        body: NodeId,
    },
    ForStmt {
        init: ForInit,
        condition: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    },
    FunctionDecl {
        // The name pattern's scope is the scope the declaration binds in,
        // which is the enclosing variable scope, not the function's own.
        name: NodeId,
        parameters: Vec<NodeId>,
        body: NodeId,
    },
    IfStmt {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    LabelStmt {
        name: String,
        statement: NodeId,
    },
    ReturnStmt {
        value: Option<NodeId>,
    },
    SwitchBranch {
        // None is the default branch.
        case: Option<NodeId>,
        body: Vec<NodeId>,
    },
    SwitchStmt {
        test: NodeId,
        branches: Vec<NodeId>,
    },
    ThrowStmt {
        value: NodeId,
    },
    TopLevel {
        body: Vec<NodeId>,
    },
    TryStmt {
        wrapped: NodeId,
        catch: Option<NodeId>,
        finally: Option<NodeId>,
    },
    VarStmt {
        declarators: Vec<VariableDeclarator>,
    },
    WhileStmt {
        condition: NodeId,
        body: NodeId,
    },
    WithStmt {
        object: NodeId,
        body: NodeId,
    },
}

/// Calls `f` once for every direct child of `stx`, in source order.
pub fn for_each_child<F: FnMut(NodeId)>(stx: &Syntax, mut f: F) {
    match stx {
        Syntax::IdentifierPattern { .. }
        | Syntax::IdentifierExpr { .. }
        | Syntax::LiteralBooleanExpr { .. }
        | Syntax::LiteralNull {}
        | Syntax::LiteralNumberExpr { .. }
        | Syntax::LiteralRegexExpr { .. }
        | Syntax::LiteralStringExpr { .. }
        | Syntax::ThisExpr {}
        | Syntax::BreakStmt { .. }
        | Syntax::ContinueStmt { .. }
        | Syntax::DebuggerStmt {}
        | Syntax::EmptyStmt {} => {}
        Syntax::BinaryExpr { left, right, .. } => {
            f(*left);
            f(*right);
        }
        Syntax::CallExpr { callee, arguments } => {
            f(*callee);
            for &a in arguments {
                f(a);
            }
        }
        Syntax::ComputedMemberExpr { object, member } => {
            f(*object);
            f(*member);
        }
        Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        } => {
            f(*test);
            f(*consequent);
            f(*alternate);
        }
        Syntax::FunctionExpr {
            name,
            parameters,
            body,
        } => {
            if let Some(name) = name {
                f(*name);
            }
            for &p in parameters {
                f(p);
            }
            f(*body);
        }
        Syntax::LiteralArrayExpr { elements } => {
            for e in elements {
                if let Some(e) = e {
                    f(*e);
                }
            }
        }
        Syntax::LiteralObjectExpr { members } => {
            for &m in members {
                f(m);
            }
        }
        Syntax::MemberExpr { left, .. } => f(*left),
        Syntax::NewExpr { callee, arguments } => {
            f(*callee);
            if let Some(arguments) = arguments {
                for &a in arguments {
                    f(a);
                }
            }
        }
        Syntax::ObjectMember { value, .. } => f(*value),
        Syntax::ParenthesisedExpr { expression } => f(*expression),
        Syntax::UnaryExpr { argument, .. } => f(*argument),
        Syntax::UnaryPostfixExpr { argument, .. } => f(*argument),
        Syntax::BlockStmt { body } | Syntax::TopLevel { body } => {
            for &s in body {
                f(s);
            }
        }
        Syntax::CatchBlock { parameter, body } => {
            f(*parameter);
            f(*body);
        }
        Syntax::DoWhileStmt { condition, body } => {
            f(*body);
            f(*condition);
        }
        Syntax::ExpressionStmt { expression } => f(*expression),
        Syntax::ForInStmt { lhs, rhs, body } => {
            match lhs {
                ForInLhs::Declaration(d) => f(*d),
                ForInLhs::Pattern(p) => f(*p),
            };
            f(*rhs);
            f(*body);
        }
        Syntax::ForStmt {
            init,
            condition,
            post,
            body,
        } => {
            match init {
                ForInit::None => {}
                ForInit::Expression(e) => f(*e),
                ForInit::Declaration(d) => f(*d),
            };
            if let Some(condition) = condition {
                f(*condition);
            }
            if let Some(post) = post {
                f(*post);
            }
            f(*body);
        }
        Syntax::FunctionDecl {
            name,
            parameters,
            body,
        } => {
            f(*name);
            for &p in parameters {
                f(p);
            }
            f(*body);
        }
        Syntax::IfStmt {
            test,
            consequent,
            alternate,
        } => {
            f(*test);
            f(*consequent);
            if let Some(alternate) = alternate {
                f(*alternate);
            }
        }
        Syntax::LabelStmt { statement, .. } => f(*statement),
        Syntax::ReturnStmt { value } => {
            if let Some(value) = value {
                f(*value);
            }
        }
        Syntax::SwitchBranch { case, body } => {
            if let Some(case) = case {
                f(*case);
            }
            for &s in body {
                f(s);
            }
        }
        Syntax::SwitchStmt { test, branches } => {
            f(*test);
            for &b in branches {
                f(b);
            }
        }
        Syntax::ThrowStmt { value } => f(*value),
        Syntax::TryStmt {
            wrapped,
            catch,
            finally,
        } => {
            f(*wrapped);
            if let Some(catch) = catch {
                f(*catch);
            }
            if let Some(finally) = finally {
                f(*finally);
            }
        }
        Syntax::VarStmt { declarators } => {
            for d in declarators {
                f(d.pattern);
                if let Some(init) = d.initializer {
                    f(init);
                }
            }
        }
        Syntax::WhileStmt { condition, body } => {
            f(*condition);
            f(*body);
        }
        Syntax::WithStmt { object, body } => {
            f(*object);
            f(*body);
        }
    };
}

/// Rewires the child slot holding `old` to hold `new`.
///
/// Panics if `old` is not a direct child; a caller holding a stale parent
/// reference is a bug that must not be silently ignored.
pub fn replace_child(stx: &mut Syntax, old: NodeId, new: NodeId) {
    let mut found = false;
    visit_child_slots(stx, |slot| {
        if *slot == old {
            *slot = new;
            found = true;
        }
    });
    if !found {
        panic!("{:?} is not a child of this node", old);
    };
}

fn visit_child_slots<F: FnMut(&mut NodeId)>(stx: &mut Syntax, mut f: F) {
    match stx {
        Syntax::IdentifierPattern { .. }
        | Syntax::IdentifierExpr { .. }
        | Syntax::LiteralBooleanExpr { .. }
        | Syntax::LiteralNull {}
        | Syntax::LiteralNumberExpr { .. }
        | Syntax::LiteralRegexExpr { .. }
        | Syntax::LiteralStringExpr { .. }
        | Syntax::ThisExpr {}
        | Syntax::BreakStmt { .. }
        | Syntax::ContinueStmt { .. }
        | Syntax::DebuggerStmt {}
        | Syntax::EmptyStmt {} => {}
        Syntax::BinaryExpr { left, right, .. } => {
            f(left);
            f(right);
        }
        Syntax::CallExpr { callee, arguments } => {
            f(callee);
            for a in arguments {
                f(a);
            }
        }
        Syntax::ComputedMemberExpr { object, member } => {
            f(object);
            f(member);
        }
        Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        } => {
            f(test);
            f(consequent);
            f(alternate);
        }
        Syntax::FunctionExpr {
            name,
            parameters,
            body,
        } => {
            if let Some(name) = name {
                f(name);
            }
            for p in parameters {
                f(p);
            }
            f(body);
        }
        Syntax::LiteralArrayExpr { elements } => {
            for e in elements {
                if let Some(e) = e {
                    f(e);
                }
            }
        }
        Syntax::LiteralObjectExpr { members } => {
            for m in members {
                f(m);
            }
        }
        Syntax::MemberExpr { left, .. } => f(left),
        Syntax::NewExpr { callee, arguments } => {
            f(callee);
            if let Some(arguments) = arguments {
                for a in arguments {
                    f(a);
                }
            }
        }
        Syntax::ObjectMember { value, .. } => f(value),
        Syntax::ParenthesisedExpr { expression } => f(expression),
        Syntax::UnaryExpr { argument, .. } => f(argument),
        Syntax::UnaryPostfixExpr { argument, .. } => f(argument),
        Syntax::BlockStmt { body } | Syntax::TopLevel { body } => {
            for s in body {
                f(s);
            }
        }
        Syntax::CatchBlock { parameter, body } => {
            f(parameter);
            f(body);
        }
        Syntax::DoWhileStmt { condition, body } => {
            f(body);
            f(condition);
        }
        Syntax::ExpressionStmt { expression } => f(expression),
        Syntax::ForInStmt { lhs, rhs, body } => {
            match lhs {
                ForInLhs::Declaration(d) => f(d),
                ForInLhs::Pattern(p) => f(p),
            };
            f(rhs);
            f(body);
        }
        Syntax::ForStmt {
            init,
            condition,
            post,
            body,
        } => {
            match init {
                ForInit::None => {}
                ForInit::Expression(e) => f(e),
                ForInit::Declaration(d) => f(d),
            };
            if let Some(condition) = condition {
                f(condition);
            }
            if let Some(post) = post {
                f(post);
            }
            f(body);
        }
        Syntax::FunctionDecl {
            name,
            parameters,
            body,
        } => {
            f(name);
            for p in parameters {
                f(p);
            }
            f(body);
        }
        Syntax::IfStmt {
            test,
            consequent,
            alternate,
        } => {
            f(test);
            f(consequent);
            if let Some(alternate) = alternate {
                f(alternate);
            }
        }
        Syntax::LabelStmt { statement, .. } => f(statement),
        Syntax::ReturnStmt { value } => {
            if let Some(value) = value {
                f(value);
            }
        }
        Syntax::SwitchBranch { case, body } => {
            if let Some(case) = case {
                f(case);
            }
            for s in body {
                f(s);
            }
        }
        Syntax::SwitchStmt { test, branches } => {
            f(test);
            for b in branches {
                f(b);
            }
        }
        Syntax::ThrowStmt { value } => f(value),
        Syntax::TryStmt {
            wrapped,
            catch,
            finally,
        } => {
            f(wrapped);
            if let Some(catch) = catch {
                f(catch);
            }
            if let Some(finally) = finally {
                f(finally);
            }
        }
        Syntax::VarStmt { declarators } => {
            for d in declarators {
                f(&mut d.pattern);
                if let Some(init) = &mut d.initializer {
                    f(init);
                }
            }
        }
        Syntax::WhileStmt { condition, body } => {
            f(condition);
            f(body);
        }
        Syntax::WithStmt { object, body } => {
            f(object);
            f(body);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::replace_child;
    use super::Syntax;
    use crate::emit::emit_js;
    use crate::lex::Lexer;
    use crate::parse::parser::Parser;
    use crate::parse::toplevel::parse_top_level;
    use crate::source::SourceRange;

    #[test]
    fn test_deep_copy_creates_fresh_nodes() {
        let mut parser = Parser::new(Lexer::new(b"x=a+b*c".to_vec()));
        let parsed = parse_top_level(&mut parser).unwrap();
        let (mut map, _) = parser.take();
        let copy = map.deep_copy(parsed.top_level_node_id);
        assert_ne!(copy, parsed.top_level_node_id);
        let mut original = Vec::<u8>::new();
        emit_js(&mut original, &map, parsed.top_level_node_id);
        let mut copied = Vec::<u8>::new();
        emit_js(&mut copied, &map, copy);
        assert_eq!(original, copied);
    }

    #[test]
    fn test_replace_child_rewires_one_slot() {
        let mut parser = Parser::new(Lexer::new(b"f(a)".to_vec()));
        let parsed = parse_top_level(&mut parser).unwrap();
        let (mut map, _) = parser.take();
        let scope = map[parsed.top_level_node_id].scope();
        let replacement = map.create_node(
            scope,
            SourceRange::anonymous(),
            Syntax::IdentifierExpr {
                name: "g".to_string(),
            },
        );
        let stmt = match map[parsed.top_level_node_id].stx() {
            Syntax::TopLevel { body } => body[0],
            _ => unreachable!(),
        };
        let call = match map[stmt].stx() {
            Syntax::ExpressionStmt { expression } => *expression,
            _ => unreachable!(),
        };
        let arg = match map[call].stx() {
            Syntax::CallExpr { arguments, .. } => arguments[0],
            _ => unreachable!(),
        };
        let mut stx = map.take_stx(call);
        replace_child(&mut stx, arg, replacement);
        map[call].set_stx(stx);
        let mut out = Vec::<u8>::new();
        emit_js(&mut out, &map, parsed.top_level_node_id);
        assert_eq!(String::from_utf8(out).unwrap(), "f(g)");
    }
}
