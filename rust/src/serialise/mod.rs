use crate::ast::ForInLhs;
use crate::ast::ForInit;
use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::PropertyKey;
use crate::ast::Syntax;
use serde_json::json;
use serde_json::Value;

fn opt(map: &NodeMap, n: Option<NodeId>) -> Value {
    match n {
        Some(n) => serialise_node(map, n),
        None => Value::Null,
    }
}

fn seq(map: &NodeMap, nodes: &[NodeId]) -> Value {
    Value::Array(nodes.iter().map(|&n| serialise_node(map, n)).collect())
}

/// Converts a subtree to a JSON value, for tests and debugging dumps. The
/// `$t` field carries the variant name.
pub fn serialise_node(map: &NodeMap, n: NodeId) -> Value {
    match map[n].stx() {
        Syntax::IdentifierPattern { name } => json!({"$t": "IdentifierPattern", "name": name}),
        Syntax::IdentifierExpr { name } => json!({"$t": "IdentifierExpr", "name": name}),
        Syntax::ThisExpr {} => json!({"$t": "ThisExpr"}),
        Syntax::LiteralNull {} => json!({"$t": "LiteralNull"}),
        Syntax::LiteralBooleanExpr { value } => json!({"$t": "LiteralBooleanExpr", "value": value}),
        Syntax::LiteralNumberExpr { value } => json!({"$t": "LiteralNumberExpr", "value": value}),
        Syntax::LiteralStringExpr { value } => json!({"$t": "LiteralStringExpr", "value": value}),
        Syntax::LiteralRegexExpr { value } => json!({"$t": "LiteralRegexExpr", "value": value}),
        Syntax::LiteralArrayExpr { elements } => json!({
            "$t": "LiteralArrayExpr",
            "elements": elements
                .iter()
                .map(|e| opt(map, *e))
                .collect::<Vec<_>>(),
        }),
        Syntax::LiteralObjectExpr { members } => json!({
            "$t": "LiteralObjectExpr",
            "members": members.iter().map(|&m| serialise_node(map, m)).collect::<Vec<_>>(),
        }),
        Syntax::ObjectMember { key, value } => json!({
            "$t": "ObjectMember",
            "key": match key {
                PropertyKey::Identifier(name) => json!({"identifier": name}),
                PropertyKey::String(value) => json!({"string": value}),
                PropertyKey::Number(value) => json!({"number": value}),
            },
            "value": serialise_node(map, *value),
        }),
        Syntax::BinaryExpr {
            operator,
            left,
            right,
        } => json!({
            "$t": "BinaryExpr",
            "operator": format!("{:?}", operator),
            "left": serialise_node(map, *left),
            "right": serialise_node(map, *right),
        }),
        Syntax::ConditionalExpr {
            test,
            consequent,
            alternate,
        } => json!({
            "$t": "ConditionalExpr",
            "test": serialise_node(map, *test),
            "consequent": serialise_node(map, *consequent),
            "alternate": serialise_node(map, *alternate),
        }),
        Syntax::UnaryExpr { operator, argument } => json!({
            "$t": "UnaryExpr",
            "operator": format!("{:?}", operator),
            "argument": serialise_node(map, *argument),
        }),
        Syntax::UnaryPostfixExpr { operator, argument } => json!({
            "$t": "UnaryPostfixExpr",
            "operator": format!("{:?}", operator),
            "argument": serialise_node(map, *argument),
        }),
        Syntax::CallExpr { callee, arguments } => json!({
            "$t": "CallExpr",
            "callee": serialise_node(map, *callee),
            "arguments": seq(map, arguments),
        }),
        Syntax::NewExpr { callee, arguments } => json!({
            "$t": "NewExpr",
            "callee": serialise_node(map, *callee),
            "arguments": match arguments {
                Some(arguments) => seq(map, arguments),
                None => Value::Null,
            },
        }),
        Syntax::MemberExpr { left, right } => json!({
            "$t": "MemberExpr",
            "left": serialise_node(map, *left),
            "right": right,
        }),
        Syntax::ComputedMemberExpr { object, member } => json!({
            "$t": "ComputedMemberExpr",
            "object": serialise_node(map, *object),
            "member": serialise_node(map, *member),
        }),
        Syntax::ParenthesisedExpr { expression } => json!({
            "$t": "ParenthesisedExpr",
            "expression": serialise_node(map, *expression),
        }),
        Syntax::FunctionExpr {
            name,
            parameters,
            body,
        } => json!({
            "$t": "FunctionExpr",
            "name": opt(map, *name),
            "parameters": seq(map, parameters),
            "body": serialise_node(map, *body),
        }),
        Syntax::FunctionDecl {
            name,
            parameters,
            body,
        } => json!({
            "$t": "FunctionDecl",
            "name": serialise_node(map, *name),
            "parameters": seq(map, parameters),
            "body": serialise_node(map, *body),
        }),
        Syntax::TopLevel { body } => json!({"$t": "TopLevel", "body": seq(map, body)}),
        Syntax::BlockStmt { body } => json!({"$t": "BlockStmt", "body": seq(map, body)}),
        Syntax::EmptyStmt {} => json!({"$t": "EmptyStmt"}),
        Syntax::DebuggerStmt {} => json!({"$t": "DebuggerStmt"}),
        Syntax::ExpressionStmt { expression } => json!({
            "$t": "ExpressionStmt",
            "expression": serialise_node(map, *expression),
        }),
        Syntax::VarStmt { declarators } => json!({
            "$t": "VarStmt",
            "declarators": declarators
                .iter()
                .map(|d| json!({
                    "pattern": serialise_node(map, d.pattern),
                    "initializer": opt(map, d.initializer),
                }))
                .collect::<Vec<_>>(),
        }),
        Syntax::IfStmt {
            test,
            consequent,
            alternate,
        } => json!({
            "$t": "IfStmt",
            "test": serialise_node(map, *test),
            "consequent": serialise_node(map, *consequent),
            "alternate": opt(map, *alternate),
        }),
        Syntax::WhileStmt { condition, body } => json!({
            "$t": "WhileStmt",
            "condition": serialise_node(map, *condition),
            "body": serialise_node(map, *body),
        }),
        Syntax::DoWhileStmt { condition, body } => json!({
            "$t": "DoWhileStmt",
            "condition": serialise_node(map, *condition),
            "body": serialise_node(map, *body),
        }),
        Syntax::ForStmt {
            init,
            condition,
            post,
            body,
        } => json!({
            "$t": "ForStmt",
            "init": match init {
                ForInit::None => Value::Null,
                ForInit::Expression(e) => serialise_node(map, *e),
                ForInit::Declaration(d) => serialise_node(map, *d),
            },
            "condition": opt(map, *condition),
            "post": opt(map, *post),
            "body": serialise_node(map, *body),
        }),
        Syntax::ForInStmt { lhs, rhs, body } => json!({
            "$t": "ForInStmt",
            "lhs": match lhs {
                ForInLhs::Declaration(d) => serialise_node(map, *d),
                ForInLhs::Pattern(p) => serialise_node(map, *p),
            },
            "rhs": serialise_node(map, *rhs),
            "body": serialise_node(map, *body),
        }),
        Syntax::ReturnStmt { value } => json!({"$t": "ReturnStmt", "value": opt(map, *value)}),
        Syntax::ThrowStmt { value } => json!({
            "$t": "ThrowStmt",
            "value": serialise_node(map, *value),
        }),
        Syntax::BreakStmt { label } => json!({"$t": "BreakStmt", "label": label}),
        Syntax::ContinueStmt { label } => json!({"$t": "ContinueStmt", "label": label}),
        Syntax::LabelStmt { name, statement } => json!({
            "$t": "LabelStmt",
            "name": name,
            "statement": serialise_node(map, *statement),
        }),
        Syntax::WithStmt { object, body } => json!({
            "$t": "WithStmt",
            "object": serialise_node(map, *object),
            "body": serialise_node(map, *body),
        }),
        Syntax::SwitchStmt { test, branches } => json!({
            "$t": "SwitchStmt",
            "test": serialise_node(map, *test),
            "branches": seq(map, branches),
        }),
        Syntax::SwitchBranch { case, body } => json!({
            "$t": "SwitchBranch",
            "case": opt(map, *case),
            "body": seq(map, body),
        }),
        Syntax::TryStmt {
            wrapped,
            catch,
            finally,
        } => json!({
            "$t": "TryStmt",
            "wrapped": serialise_node(map, *wrapped),
            "catch": opt(map, *catch),
            "finally": opt(map, *finally),
        }),
        Syntax::CatchBlock { parameter, body } => json!({
            "$t": "CatchBlock",
            "parameter": serialise_node(map, *parameter),
            "body": serialise_node(map, *body),
        }),
    }
}
