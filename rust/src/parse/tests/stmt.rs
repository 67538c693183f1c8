use super::parse_stmt_and_serialise;
use serde_json::json;

#[test]
fn test_var_statement_declarators() {
    assert_eq!(
        parse_stmt_and_serialise("var a=1,b"),
        json!({
            "$t": "VarStmt",
            "declarators": [
                {
                    "pattern": {"$t": "IdentifierPattern", "name": "a"},
                    "initializer": {"$t": "LiteralNumberExpr", "value": 1.0},
                },
                {
                    "pattern": {"$t": "IdentifierPattern", "name": "b"},
                    "initializer": null,
                },
            ],
        })
    );
}

#[test]
fn test_return_value_stops_at_line_break() {
    assert_eq!(
        parse_stmt_and_serialise("return\na"),
        json!({"$t": "ReturnStmt", "value": null})
    );
    assert_eq!(
        parse_stmt_and_serialise("return a"),
        json!({
            "$t": "ReturnStmt",
            "value": {"$t": "IdentifierExpr", "name": "a"},
        })
    );
}

#[test]
fn test_dangling_else_binds_to_inner_if() {
    assert_eq!(
        parse_stmt_and_serialise("if(a)if(b)c();else d()"),
        json!({
            "$t": "IfStmt",
            "test": {"$t": "IdentifierExpr", "name": "a"},
            "consequent": {
                "$t": "IfStmt",
                "test": {"$t": "IdentifierExpr", "name": "b"},
                "consequent": {
                    "$t": "ExpressionStmt",
                    "expression": {
                        "$t": "CallExpr",
                        "callee": {"$t": "IdentifierExpr", "name": "c"},
                        "arguments": [],
                    },
                },
                "alternate": {
                    "$t": "ExpressionStmt",
                    "expression": {
                        "$t": "CallExpr",
                        "callee": {"$t": "IdentifierExpr", "name": "d"},
                        "arguments": [],
                    },
                },
            },
            "alternate": null,
        })
    );
}

#[test]
fn test_for_in_header_forms() {
    assert_eq!(
        parse_stmt_and_serialise("for(var k in o)f(k)"),
        json!({
            "$t": "ForInStmt",
            "lhs": {
                "$t": "VarStmt",
                "declarators": [
                    {
                        "pattern": {"$t": "IdentifierPattern", "name": "k"},
                        "initializer": null,
                    },
                ],
            },
            "rhs": {"$t": "IdentifierExpr", "name": "o"},
            "body": {
                "$t": "ExpressionStmt",
                "expression": {
                    "$t": "CallExpr",
                    "callee": {"$t": "IdentifierExpr", "name": "f"},
                    "arguments": [{"$t": "IdentifierExpr", "name": "k"}],
                },
            },
        })
    );
    assert_eq!(
        parse_stmt_and_serialise("for(k in o);"),
        json!({
            "$t": "ForInStmt",
            "lhs": {"$t": "IdentifierExpr", "name": "k"},
            "rhs": {"$t": "IdentifierExpr", "name": "o"},
            "body": {"$t": "EmptyStmt"},
        })
    );
}

#[test]
fn test_labelled_break_carries_the_label() {
    assert_eq!(
        parse_stmt_and_serialise("x:while(a)break x"),
        json!({
            "$t": "LabelStmt",
            "name": "x",
            "statement": {
                "$t": "WhileStmt",
                "condition": {"$t": "IdentifierExpr", "name": "a"},
                "body": {"$t": "BreakStmt", "label": "x"},
            },
        })
    );
}

#[test]
fn test_try_catch_finally() {
    assert_eq!(
        parse_stmt_and_serialise("try{a()}catch(e){b()}finally{}"),
        json!({
            "$t": "TryStmt",
            "wrapped": {
                "$t": "BlockStmt",
                "body": [
                    {
                        "$t": "ExpressionStmt",
                        "expression": {
                            "$t": "CallExpr",
                            "callee": {"$t": "IdentifierExpr", "name": "a"},
                            "arguments": [],
                        },
                    },
                ],
            },
            "catch": {
                "$t": "CatchBlock",
                "parameter": {"$t": "IdentifierPattern", "name": "e"},
                "body": {
                    "$t": "BlockStmt",
                    "body": [
                        {
                            "$t": "ExpressionStmt",
                            "expression": {
                                "$t": "CallExpr",
                                "callee": {"$t": "IdentifierExpr", "name": "b"},
                                "arguments": [],
                            },
                        },
                    ],
                },
            },
            "finally": {"$t": "BlockStmt", "body": []},
        })
    );
}
