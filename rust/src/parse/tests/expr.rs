use super::parse_expr_and_serialise;
use serde_json::json;

#[test]
fn test_binary_precedence() {
    assert_eq!(
        parse_expr_and_serialise("a+b*c"),
        json!({
            "$t": "BinaryExpr",
            "operator": "Addition",
            "left": {"$t": "IdentifierExpr", "name": "a"},
            "right": {
                "$t": "BinaryExpr",
                "operator": "Multiplication",
                "left": {"$t": "IdentifierExpr", "name": "b"},
                "right": {"$t": "IdentifierExpr", "name": "c"},
            },
        })
    );
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(
        parse_expr_and_serialise("a-b-c"),
        json!({
            "$t": "BinaryExpr",
            "operator": "Subtraction",
            "left": {
                "$t": "BinaryExpr",
                "operator": "Subtraction",
                "left": {"$t": "IdentifierExpr", "name": "a"},
                "right": {"$t": "IdentifierExpr", "name": "b"},
            },
            "right": {"$t": "IdentifierExpr", "name": "c"},
        })
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(
        parse_expr_and_serialise("a=b=c"),
        json!({
            "$t": "BinaryExpr",
            "operator": "Assignment",
            "left": {"$t": "IdentifierExpr", "name": "a"},
            "right": {
                "$t": "BinaryExpr",
                "operator": "Assignment",
                "left": {"$t": "IdentifierExpr", "name": "b"},
                "right": {"$t": "IdentifierExpr", "name": "c"},
            },
        })
    );
}

#[test]
fn test_parentheses_survive_as_nodes() {
    assert_eq!(
        parse_expr_and_serialise("(a+b)*c"),
        json!({
            "$t": "BinaryExpr",
            "operator": "Multiplication",
            "left": {
                "$t": "ParenthesisedExpr",
                "expression": {
                    "$t": "BinaryExpr",
                    "operator": "Addition",
                    "left": {"$t": "IdentifierExpr", "name": "a"},
                    "right": {"$t": "IdentifierExpr", "name": "b"},
                },
            },
            "right": {"$t": "IdentifierExpr", "name": "c"},
        })
    );
}

#[test]
fn test_conditional_nests_in_alternate() {
    assert_eq!(
        parse_expr_and_serialise("a?b:c?d:e"),
        json!({
            "$t": "ConditionalExpr",
            "test": {"$t": "IdentifierExpr", "name": "a"},
            "consequent": {"$t": "IdentifierExpr", "name": "b"},
            "alternate": {
                "$t": "ConditionalExpr",
                "test": {"$t": "IdentifierExpr", "name": "c"},
                "consequent": {"$t": "IdentifierExpr", "name": "d"},
                "alternate": {"$t": "IdentifierExpr", "name": "e"},
            },
        })
    );
}

#[test]
fn test_member_chains_group_leftward() {
    assert_eq!(
        parse_expr_and_serialise("a.b[c]"),
        json!({
            "$t": "ComputedMemberExpr",
            "object": {
                "$t": "MemberExpr",
                "left": {"$t": "IdentifierExpr", "name": "a"},
                "right": "b",
            },
            "member": {"$t": "IdentifierExpr", "name": "c"},
        })
    );
}

#[test]
fn test_new_with_and_without_arguments() {
    assert_eq!(
        parse_expr_and_serialise("new a.b(c)"),
        json!({
            "$t": "NewExpr",
            "callee": {
                "$t": "MemberExpr",
                "left": {"$t": "IdentifierExpr", "name": "a"},
                "right": "b",
            },
            "arguments": [{"$t": "IdentifierExpr", "name": "c"}],
        })
    );
    assert_eq!(
        parse_expr_and_serialise("new a"),
        json!({
            "$t": "NewExpr",
            "callee": {"$t": "IdentifierExpr", "name": "a"},
            "arguments": null,
        })
    );
}

#[test]
fn test_unary_operators_stack() {
    assert_eq!(
        parse_expr_and_serialise("typeof -a"),
        json!({
            "$t": "UnaryExpr",
            "operator": "Typeof",
            "argument": {
                "$t": "UnaryExpr",
                "operator": "UnaryNegation",
                "argument": {"$t": "IdentifierExpr", "name": "a"},
            },
        })
    );
}
