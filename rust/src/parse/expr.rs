use crate::ast::NodeId;
use crate::ast::PropertyKey;
use crate::ast::Syntax;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::num::JsNumber;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::parse::literal::parse_number_value;
use crate::parse::literal::parse_string_value;
use crate::parse::parser::Parser;
use crate::parse::stmt::parse_function_expr;
use crate::symbol::ScopeId;
use crate::token::Token;
use crate::token::TokenType;

/// Parses a full expression, comma operator included.
pub fn parse_expr(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    parse_expr_with_min_prec(p, scope, operator_precedence(OperatorName::Comma), true)
}

/// Parses a full expression but stops at a top-level `in`, as required inside
/// a `for` header.
pub fn parse_expr_no_in(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    parse_expr_with_min_prec(p, scope, operator_precedence(OperatorName::Comma), false)
}

/// Parses an assignment-level expression; a comma ends it.
pub fn parse_assignment(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    parse_expr_with_min_prec(p, scope, operator_precedence(OperatorName::Assignment), true)
}

pub fn parse_assignment_no_in(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    parse_expr_with_min_prec(p, scope, operator_precedence(OperatorName::Assignment), false)
}

fn operator_precedence(name: OperatorName) -> u8 {
    OPERATORS[&name].precedence
}

fn binary_operator_for(typ: TokenType, allow_in: bool) -> Option<OperatorName> {
    let name = match typ {
        TokenType::Ampersand => OperatorName::BitwiseAnd,
        TokenType::AmpersandAmpersand => OperatorName::LogicalAnd,
        TokenType::AmpersandEquals => OperatorName::AssignmentBitwiseAnd,
        TokenType::Asterisk => OperatorName::Multiplication,
        TokenType::AsteriskEquals => OperatorName::AssignmentMultiplication,
        TokenType::Bar => OperatorName::BitwiseOr,
        TokenType::BarBar => OperatorName::LogicalOr,
        TokenType::BarEquals => OperatorName::AssignmentBitwiseOr,
        TokenType::Caret => OperatorName::BitwiseXor,
        TokenType::CaretEquals => OperatorName::AssignmentBitwiseXor,
        TokenType::ChevronLeft => OperatorName::LessThan,
        TokenType::ChevronLeftChevronLeft => OperatorName::BitwiseLeftShift,
        TokenType::ChevronLeftChevronLeftEquals => OperatorName::AssignmentBitwiseLeftShift,
        TokenType::ChevronLeftEquals => OperatorName::LessThanOrEqual,
        TokenType::ChevronRight => OperatorName::GreaterThan,
        TokenType::ChevronRightChevronRight => OperatorName::BitwiseRightShift,
        TokenType::ChevronRightChevronRightChevronRight => {
            OperatorName::BitwiseUnsignedRightShift
        }
        TokenType::ChevronRightChevronRightChevronRightEquals => {
            OperatorName::AssignmentBitwiseUnsignedRightShift
        }
        TokenType::ChevronRightChevronRightEquals => OperatorName::AssignmentBitwiseRightShift,
        TokenType::ChevronRightEquals => OperatorName::GreaterThanOrEqual,
        TokenType::Comma => OperatorName::Comma,
        TokenType::Equals => OperatorName::Assignment,
        TokenType::EqualsEquals => OperatorName::Equality,
        TokenType::EqualsEqualsEquals => OperatorName::StrictEquality,
        TokenType::ExclamationEquals => OperatorName::Inequality,
        TokenType::ExclamationEqualsEquals => OperatorName::StrictInequality,
        TokenType::Hyphen => OperatorName::Subtraction,
        TokenType::HyphenEquals => OperatorName::AssignmentSubtraction,
        TokenType::KeywordIn if allow_in => OperatorName::In,
        TokenType::KeywordInstanceof => OperatorName::Instanceof,
        TokenType::Percent => OperatorName::Remainder,
        TokenType::PercentEquals => OperatorName::AssignmentRemainder,
        TokenType::Plus => OperatorName::Addition,
        TokenType::PlusEquals => OperatorName::AssignmentAddition,
        TokenType::Slash => OperatorName::Division,
        TokenType::SlashEquals => OperatorName::AssignmentDivision,
        _ => return None,
    };
    Some(name)
}

fn is_assignment_operator(name: OperatorName) -> bool {
    matches!(
        name,
        OperatorName::Assignment
            | OperatorName::AssignmentAddition
            | OperatorName::AssignmentBitwiseAnd
            | OperatorName::AssignmentBitwiseLeftShift
            | OperatorName::AssignmentBitwiseOr
            | OperatorName::AssignmentBitwiseRightShift
            | OperatorName::AssignmentBitwiseUnsignedRightShift
            | OperatorName::AssignmentBitwiseXor
            | OperatorName::AssignmentDivision
            | OperatorName::AssignmentMultiplication
            | OperatorName::AssignmentRemainder
            | OperatorName::AssignmentSubtraction
    )
}

/// A valid assignment target is an identifier or a property access, possibly
/// parenthesised.
fn check_assignment_target(p: &mut Parser, target: NodeId, loc: Token) -> SyntaxResult<()> {
    let ok = match p.node_map()[target].stx() {
        Syntax::IdentifierExpr { .. }
        | Syntax::MemberExpr { .. }
        | Syntax::ComputedMemberExpr { .. } => true,
        Syntax::ParenthesisedExpr { expression } => {
            let inner = *expression;
            return check_assignment_target(p, inner, loc);
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(SyntaxError::from_loc(
            loc.loc,
            SyntaxErrorType::InvalidAssigmentTarget,
            Some(loc.typ),
        ))
    }
}

fn parse_expr_with_min_prec(
    p: &mut Parser,
    scope: ScopeId,
    min_prec: u8,
    allow_in: bool,
) -> SyntaxResult<NodeId> {
    let mut left = parse_unary(p, scope)?;
    loop {
        let t = p.peek()?;
        if t.typ == TokenType::Question {
            let prec = operator_precedence(OperatorName::Conditional);
            if prec < min_prec {
                break;
            };
            p.next()?;
            let consequent = parse_assignment(p, scope)?;
            p.require(TokenType::Colon)?;
            // The branch after the colon inherits the no-in restriction.
            let alternate = parse_expr_with_min_prec(
                p,
                scope,
                operator_precedence(OperatorName::Assignment),
                allow_in,
            )?;
            let mut loc = p.node_map()[left].loc();
            loc.extend(p.node_map()[alternate].loc());
            left = p.create_node(scope, loc, Syntax::ConditionalExpr {
                test: left,
                consequent,
                alternate,
            });
            continue;
        };
        let operator = match binary_operator_for(t.typ, allow_in) {
            Some(op) => op,
            None => break,
        };
        let op = &OPERATORS[&operator];
        if op.precedence < min_prec {
            break;
        };
        p.next()?;
        if is_assignment_operator(operator) {
            check_assignment_target(p, left, t)?;
        };
        let next_min_prec = match op.associativity {
            Associativity::Left => op.precedence + 1,
            Associativity::Right => op.precedence,
        };
        let right = parse_expr_with_min_prec(p, scope, next_min_prec, allow_in)?;
        let mut loc = p.node_map()[left].loc();
        loc.extend(p.node_map()[right].loc());
        left = p.create_node(scope, loc, Syntax::BinaryExpr {
            operator,
            left,
            right,
        });
    }
    Ok(left)
}

fn parse_unary(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let t = p.peek()?;
    let operator = match t.typ {
        TokenType::Exclamation => Some(OperatorName::LogicalNot),
        TokenType::Tilde => Some(OperatorName::BitwiseNot),
        TokenType::Plus => Some(OperatorName::UnaryPlus),
        TokenType::Hyphen => Some(OperatorName::UnaryNegation),
        TokenType::PlusPlus => Some(OperatorName::PrefixIncrement),
        TokenType::HyphenHyphen => Some(OperatorName::PrefixDecrement),
        TokenType::KeywordTypeof => Some(OperatorName::Typeof),
        TokenType::KeywordVoid => Some(OperatorName::Void),
        TokenType::KeywordDelete => Some(OperatorName::Delete),
        _ => None,
    };
    if let Some(operator) = operator {
        p.next()?;
        let argument = parse_unary(p, scope)?;
        let mut loc = t.loc;
        loc.extend(p.node_map()[argument].loc());
        return Ok(p.create_node(scope, loc, Syntax::UnaryExpr { operator, argument }));
    };
    let mut expr = parse_member_or_call(p, scope, true)?;
    // Restricted production: a postfix operator must be on the same line as
    // its operand.
    loop {
        let t = p.peek()?;
        let operator = match t.typ {
            TokenType::PlusPlus if !t.preceded_by_line_terminator => {
                OperatorName::PostfixIncrement
            }
            TokenType::HyphenHyphen if !t.preceded_by_line_terminator => {
                OperatorName::PostfixDecrement
            }
            _ => break,
        };
        p.next()?;
        check_assignment_target(p, expr, t)?;
        let mut loc = p.node_map()[expr].loc();
        loc.extend(t.loc);
        expr = p.create_node(scope, loc, Syntax::UnaryPostfixExpr {
            operator,
            argument: expr,
        });
    }
    Ok(expr)
}

fn parse_member_or_call(p: &mut Parser, scope: ScopeId, allow_call: bool) -> SyntaxResult<NodeId> {
    let t = p.peek()?;
    let mut left = if t.typ == TokenType::KeywordNew {
        parse_new(p, scope)?
    } else {
        parse_primary(p, scope)?
    };
    loop {
        let t = p.peek()?;
        match t.typ {
            TokenType::Dot => {
                p.next()?;
                let member = p.require(TokenType::Identifier)?;
                let mut loc = p.node_map()[left].loc();
                loc.extend(member.loc);
                let right = p.string(member.loc);
                left = p.create_node(scope, loc, Syntax::MemberExpr { left, right });
            }
            TokenType::BracketOpen => {
                p.next()?;
                let member = parse_expr(p, scope)?;
                let end = p.require(TokenType::BracketClose)?;
                let mut loc = p.node_map()[left].loc();
                loc.extend(end.loc);
                left = p.create_node(scope, loc, Syntax::ComputedMemberExpr {
                    object: left,
                    member,
                });
            }
            TokenType::ParenthesisOpen if allow_call => {
                let (arguments, end) = parse_call_args(p, scope)?;
                let mut loc = p.node_map()[left].loc();
                loc.extend(end);
                left = p.create_node(scope, loc, Syntax::CallExpr {
                    callee: left,
                    arguments,
                });
            }
            _ => break,
        };
    }
    Ok(left)
}

fn parse_new(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordNew)?;
    // The callee may chain property accesses but not calls; a call ends the
    // `new` target and supplies the construction arguments.
    let callee = parse_member_or_call(p, scope, false)?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[callee].loc());
    let arguments = if p.peek()?.typ == TokenType::ParenthesisOpen {
        let (args, end) = parse_call_args(p, scope)?;
        loc.extend(end);
        Some(args)
    } else {
        None
    };
    Ok(p.create_node(scope, loc, Syntax::NewExpr { callee, arguments }))
}

fn parse_call_args(
    p: &mut Parser,
    scope: ScopeId,
) -> SyntaxResult<(Vec<NodeId>, crate::source::SourceRange)> {
    p.require(TokenType::ParenthesisOpen)?;
    let mut arguments = Vec::<NodeId>::new();
    loop {
        if p.peek()?.typ == TokenType::ParenthesisClose {
            break;
        };
        arguments.push(parse_assignment(p, scope)?);
        if p.consume_if(TokenType::Comma)?.is_none() {
            break;
        };
    }
    let end = p.require(TokenType::ParenthesisClose)?;
    Ok((arguments, end.loc))
}

fn parse_primary(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    // Operand position, so a slash starts a regex literal.
    let t = p.peek_with_mode(LexMode::SlashIsRegex)?;
    let node = match t.typ {
        TokenType::Identifier => {
            p.next()?;
            let name = p.string(t.loc);
            p.create_node(scope, t.loc, Syntax::IdentifierExpr { name })
        }
        TokenType::KeywordThis => {
            p.next()?;
            p.create_node(scope, t.loc, Syntax::ThisExpr {})
        }
        TokenType::LiteralTrue | TokenType::LiteralFalse => {
            p.next()?;
            p.create_node(scope, t.loc, Syntax::LiteralBooleanExpr {
                value: t.typ == TokenType::LiteralTrue,
            })
        }
        TokenType::LiteralNull => {
            p.next()?;
            p.create_node(scope, t.loc, Syntax::LiteralNull {})
        }
        TokenType::LiteralNumber => {
            p.next()?;
            let raw = p.string(t.loc);
            let value = parse_number_value(t.loc, &raw)?;
            p.create_node(scope, t.loc, Syntax::LiteralNumberExpr {
                value: JsNumber(value),
            })
        }
        TokenType::LiteralString => {
            p.next()?;
            let raw = p.string(t.loc);
            let value = parse_string_value(t.loc, &raw)?;
            p.create_node(scope, t.loc, Syntax::LiteralStringExpr { value })
        }
        TokenType::LiteralRegex => {
            p.next_with_mode(LexMode::SlashIsRegex)?;
            let value = p.string(t.loc);
            p.create_node(scope, t.loc, Syntax::LiteralRegexExpr { value })
        }
        TokenType::BracketOpen => parse_array_literal(p, scope)?,
        TokenType::BraceOpen => parse_object_literal(p, scope)?,
        TokenType::ParenthesisOpen => {
            p.next()?;
            let expression = parse_expr(p, scope)?;
            let end = p.require(TokenType::ParenthesisClose)?;
            let mut loc = t.loc;
            loc.extend(end.loc);
            p.create_node(scope, loc, Syntax::ParenthesisedExpr { expression })
        }
        TokenType::KeywordFunction => parse_function_expr(p, scope)?,
        _ => {
            return Err(SyntaxError::from_loc(
                t.loc,
                SyntaxErrorType::ExpectedSyntax("expression"),
                Some(t.typ),
            ))
        }
    };
    Ok(node)
}

fn parse_array_literal(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::BracketOpen)?;
    let mut elements = Vec::<Option<NodeId>>::new();
    loop {
        if p.peek()?.typ == TokenType::BracketClose {
            break;
        };
        if p.consume_if(TokenType::Comma)?.is_some() {
            // Elision.
            elements.push(None);
            continue;
        };
        elements.push(Some(parse_assignment(p, scope)?));
        if p.consume_if(TokenType::Comma)?.is_none() {
            break;
        };
    }
    let end = p.require(TokenType::BracketClose)?;
    let mut loc = start.loc;
    loc.extend(end.loc);
    Ok(p.create_node(scope, loc, Syntax::LiteralArrayExpr { elements }))
}

fn parse_object_literal(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::BraceOpen)?;
    let mut members = Vec::<NodeId>::new();
    loop {
        let t = p.peek()?;
        if t.typ == TokenType::BraceClose {
            break;
        };
        let key = match t.typ {
            TokenType::Identifier => {
                p.next()?;
                PropertyKey::Identifier(p.string(t.loc))
            }
            TokenType::LiteralString => {
                p.next()?;
                let raw = p.string(t.loc);
                PropertyKey::String(parse_string_value(t.loc, &raw)?)
            }
            TokenType::LiteralNumber => {
                p.next()?;
                let raw = p.string(t.loc);
                PropertyKey::Number(JsNumber(parse_number_value(t.loc, &raw)?))
            }
            _ => {
                return Err(SyntaxError::from_loc(
                    t.loc,
                    SyntaxErrorType::ExpectedSyntax("property name"),
                    Some(t.typ),
                ))
            }
        };
        p.require(TokenType::Colon)?;
        let value = parse_assignment(p, scope)?;
        let mut loc = t.loc;
        loc.extend(p.node_map()[value].loc());
        let member = p.create_node(scope, loc, Syntax::ObjectMember { key, value });
        members.push(member);
        if p.consume_if(TokenType::Comma)?.is_none() {
            break;
        };
    }
    let end = p.require(TokenType::BraceClose)?;
    let mut loc = start.loc;
    loc.extend(end.loc);
    Ok(p.create_node(scope, loc, Syntax::LiteralObjectExpr { members }))
}
