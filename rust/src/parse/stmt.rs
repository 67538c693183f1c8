use crate::ast::ForInLhs;
use crate::ast::ForInit;
use crate::ast::NodeId;
use crate::ast::Syntax;
use crate::ast::VariableDeclarator;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::parse::expr::parse_assignment;
use crate::parse::expr::parse_assignment_no_in;
use crate::parse::expr::parse_expr;
use crate::parse::expr::parse_expr_no_in;
use crate::parse::parser::Parser;
use crate::source::SourceRange;
use crate::symbol::ScopeId;
use crate::symbol::ScopeType;
use crate::symbol::Symbol;
use crate::token::Token;
use crate::token::TokenType;

pub fn parse_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let t = p.peek()?;
    match t.typ {
        TokenType::BraceOpen => parse_block_stmt(p, scope),
        TokenType::Semicolon => {
            p.next()?;
            Ok(p.create_node(scope, t.loc, Syntax::EmptyStmt {}))
        }
        TokenType::KeywordVar => {
            let stmt = parse_var_stmt(p, scope, true)?;
            p.require_statement_end()?;
            Ok(stmt)
        }
        TokenType::KeywordIf => parse_if_stmt(p, scope),
        TokenType::KeywordWhile => parse_while_stmt(p, scope),
        TokenType::KeywordDo => parse_do_while_stmt(p, scope),
        TokenType::KeywordFor => parse_for_stmt(p, scope),
        TokenType::KeywordBreak | TokenType::KeywordContinue => parse_break_or_continue(p, scope),
        TokenType::KeywordReturn => parse_return_stmt(p, scope),
        TokenType::KeywordWith => parse_with_stmt(p, scope),
        TokenType::KeywordSwitch => parse_switch_stmt(p, scope),
        TokenType::KeywordThrow => parse_throw_stmt(p, scope),
        TokenType::KeywordTry => parse_try_stmt(p, scope),
        TokenType::KeywordFunction => parse_function_decl(p, scope),
        TokenType::KeywordDebugger => {
            p.next()?;
            p.require_statement_end()?;
            Ok(p.create_node(scope, t.loc, Syntax::DebuggerStmt {}))
        }
        _ => parse_label_or_expr_stmt(p, scope),
    }
}

pub fn parse_statements_until(
    p: &mut Parser,
    scope: ScopeId,
    end: TokenType,
) -> SyntaxResult<Vec<NodeId>> {
    let mut body = Vec::<NodeId>::new();
    while p.peek()?.typ != end {
        body.push(parse_stmt(p, scope)?);
    }
    Ok(body)
}

// Blocks do not open a scope; only functions and catch clauses do.
fn parse_block_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::BraceOpen)?;
    let body = parse_statements_until(p, scope, TokenType::BraceClose)?;
    let end = p.require(TokenType::BraceClose)?;
    let mut loc = start.loc;
    loc.extend(end.loc);
    Ok(p.create_node(scope, loc, Syntax::BlockStmt { body }))
}

fn declare_pattern(p: &mut Parser, scope: ScopeId, target: ScopeId, name: Token) -> NodeId {
    let text = p.string(name.loc);
    let pattern = p.create_node(scope, name.loc, Syntax::IdentifierPattern { name: text.clone() });
    p.scope_map()[target].declare(text, Symbol::new(pattern));
    pattern
}

/// Parses `var` and its declarators, which bind in the nearest enclosing
/// variable scope. Does not consume the statement terminator, since the
/// statement may be a `for` header component.
fn parse_var_stmt(p: &mut Parser, scope: ScopeId, allow_in: bool) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordVar)?;
    let target = p.scope_map()[scope].variable_scope();
    let mut loc = start.loc;
    let mut declarators = Vec::<VariableDeclarator>::new();
    loop {
        let name = p.require(TokenType::Identifier)?;
        loc.extend(name.loc);
        let pattern = declare_pattern(p, scope, target, name);
        let initializer = if p.consume_if(TokenType::Equals)?.is_some() {
            let init = if allow_in {
                parse_assignment(p, scope)?
            } else {
                parse_assignment_no_in(p, scope)?
            };
            loc.extend(p.node_map()[init].loc());
            Some(init)
        } else {
            None
        };
        declarators.push(VariableDeclarator {
            pattern,
            initializer,
        });
        if p.consume_if(TokenType::Comma)?.is_none() {
            break;
        };
    }
    Ok(p.create_node(scope, loc, Syntax::VarStmt { declarators }))
}

fn parse_if_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordIf)?;
    p.require(TokenType::ParenthesisOpen)?;
    let test = parse_expr(p, scope)?;
    p.require(TokenType::ParenthesisClose)?;
    let consequent = parse_stmt(p, scope)?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[consequent].loc());
    let alternate = if p.consume_if(TokenType::KeywordElse)?.is_some() {
        let alternate = parse_stmt(p, scope)?;
        loc.extend(p.node_map()[alternate].loc());
        Some(alternate)
    } else {
        None
    };
    Ok(p.create_node(scope, loc, Syntax::IfStmt {
        test,
        consequent,
        alternate,
    }))
}

fn parse_while_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordWhile)?;
    p.require(TokenType::ParenthesisOpen)?;
    let condition = parse_expr(p, scope)?;
    p.require(TokenType::ParenthesisClose)?;
    let body = parse_stmt(p, scope)?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[body].loc());
    Ok(p.create_node(scope, loc, Syntax::WhileStmt { condition, body }))
}

fn parse_do_while_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordDo)?;
    let body = parse_stmt(p, scope)?;
    p.require(TokenType::KeywordWhile)?;
    p.require(TokenType::ParenthesisOpen)?;
    let condition = parse_expr(p, scope)?;
    let end = p.require(TokenType::ParenthesisClose)?;
    // The terminating semicolon is optional even without a line terminator.
    p.consume_if(TokenType::Semicolon)?;
    let mut loc = start.loc;
    loc.extend(end.loc);
    Ok(p.create_node(scope, loc, Syntax::DoWhileStmt { condition, body }))
}

fn parse_for_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordFor)?;
    p.require(TokenType::ParenthesisOpen)?;
    let t = p.peek()?;
    // The header is ambiguous until either `in` or `;` is seen.
    let init = match t.typ {
        TokenType::Semicolon => ForInit::None,
        TokenType::KeywordVar => {
            let decl = parse_var_stmt(p, scope, false)?;
            if p.consume_if(TokenType::KeywordIn)?.is_some() {
                let declarators = match p.node_map()[decl].stx() {
                    Syntax::VarStmt { declarators } => declarators.len(),
                    _ => 0,
                };
                if declarators != 1 {
                    return Err(SyntaxError::from_loc(
                        t.loc,
                        SyntaxErrorType::ForLoopHeaderHasMultipleDeclarators,
                        None,
                    ));
                };
                return parse_for_in_tail(p, scope, start, ForInLhs::Declaration(decl));
            };
            ForInit::Expression(decl)
        }
        _ => {
            let expr = parse_expr_no_in(p, scope)?;
            if p.consume_if(TokenType::KeywordIn)?.is_some() {
                return parse_for_in_tail(p, scope, start, ForInLhs::Pattern(expr));
            };
            ForInit::Expression(expr)
        }
    };
    // Re-tag a var declaration now the header form is known.
    let init = match init {
        ForInit::Expression(n) if matches!(p.node_map()[n].stx(), Syntax::VarStmt { .. }) => {
            ForInit::Declaration(n)
        }
        other => other,
    };
    p.require(TokenType::Semicolon)?;
    let condition = if p.peek()?.typ == TokenType::Semicolon {
        None
    } else {
        Some(parse_expr(p, scope)?)
    };
    p.require(TokenType::Semicolon)?;
    let post = if p.peek()?.typ == TokenType::ParenthesisClose {
        None
    } else {
        Some(parse_expr(p, scope)?)
    };
    p.require(TokenType::ParenthesisClose)?;
    let body = parse_stmt(p, scope)?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[body].loc());
    Ok(p.create_node(scope, loc, Syntax::ForStmt {
        init,
        condition,
        post,
        body,
    }))
}

fn parse_for_in_tail(
    p: &mut Parser,
    scope: ScopeId,
    start: Token,
    lhs: ForInLhs,
) -> SyntaxResult<NodeId> {
    let rhs = parse_expr(p, scope)?;
    p.require(TokenType::ParenthesisClose)?;
    let body = parse_stmt(p, scope)?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[body].loc());
    Ok(p.create_node(scope, loc, Syntax::ForInStmt { lhs, rhs, body }))
}

fn parse_break_or_continue(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.next()?;
    let mut loc = start.loc;
    // Restricted production: a label must be on the same line.
    let next = p.peek()?;
    let label = if next.typ == TokenType::Identifier && !next.preceded_by_line_terminator {
        p.next()?;
        loc.extend(next.loc);
        Some(p.string(next.loc))
    } else {
        None
    };
    p.require_statement_end()?;
    let stx = if start.typ == TokenType::KeywordBreak {
        Syntax::BreakStmt { label }
    } else {
        Syntax::ContinueStmt { label }
    };
    Ok(p.create_node(scope, loc, stx))
}

fn parse_return_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordReturn)?;
    let mut loc = start.loc;
    let next = p.peek()?;
    // Restricted production: a line terminator after `return` ends it.
    let value = if next.preceded_by_line_terminator
        || next.typ == TokenType::Semicolon
        || next.typ == TokenType::BraceClose
        || next.typ == TokenType::EOF
    {
        None
    } else {
        let value = parse_expr(p, scope)?;
        loc.extend(p.node_map()[value].loc());
        Some(value)
    };
    p.require_statement_end()?;
    Ok(p.create_node(scope, loc, Syntax::ReturnStmt { value }))
}

fn parse_with_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordWith)?;
    p.require(TokenType::ParenthesisOpen)?;
    let object = parse_expr(p, scope)?;
    p.require(TokenType::ParenthesisClose)?;
    let body = parse_stmt(p, scope)?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[body].loc());
    Ok(p.create_node(scope, loc, Syntax::WithStmt { object, body }))
}

fn parse_switch_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordSwitch)?;
    p.require(TokenType::ParenthesisOpen)?;
    let test = parse_expr(p, scope)?;
    p.require(TokenType::ParenthesisClose)?;
    p.require(TokenType::BraceOpen)?;
    let mut branches = Vec::<NodeId>::new();
    loop {
        let t = p.peek()?;
        let case = match t.typ {
            TokenType::BraceClose => break,
            TokenType::KeywordCase => {
                p.next()?;
                Some(parse_expr(p, scope)?)
            }
            TokenType::KeywordDefault => {
                p.next()?;
                None
            }
            _ => {
                return Err(SyntaxError::from_loc(
                    t.loc,
                    SyntaxErrorType::ExpectedSyntax("case or default"),
                    Some(t.typ),
                ))
            }
        };
        p.require(TokenType::Colon)?;
        let mut body = Vec::<NodeId>::new();
        loop {
            let next = p.peek()?;
            if matches!(
                next.typ,
                TokenType::KeywordCase | TokenType::KeywordDefault | TokenType::BraceClose
            ) {
                break;
            };
            body.push(parse_stmt(p, scope)?);
        }
        branches.push(p.create_node(scope, t.loc, Syntax::SwitchBranch { case, body }));
    }
    let end = p.require(TokenType::BraceClose)?;
    let mut loc = start.loc;
    loc.extend(end.loc);
    Ok(p.create_node(scope, loc, Syntax::SwitchStmt { test, branches }))
}

fn parse_throw_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordThrow)?;
    let next = p.peek()?;
    if next.preceded_by_line_terminator {
        // Restricted production: the thrown value must start on the same line.
        return Err(SyntaxError::from_loc(
            next.loc,
            SyntaxErrorType::ExpectedSyntax("expression to throw"),
            Some(next.typ),
        ));
    };
    let value = parse_expr(p, scope)?;
    p.require_statement_end()?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[value].loc());
    Ok(p.create_node(scope, loc, Syntax::ThrowStmt { value }))
}

fn parse_try_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordTry)?;
    let wrapped = parse_block_stmt(p, scope)?;
    let mut loc = start.loc;
    loc.extend(p.node_map()[wrapped].loc());
    let catch = if p.consume_if(TokenType::KeywordCatch)?.is_some() {
        // The catch scope holds only the caught name; `var` inside the body
        // still binds in the enclosing closure.
        let catch_scope = p.scope_map().create_scope(Some(scope), ScopeType::Catch);
        p.require(TokenType::ParenthesisOpen)?;
        let name = p.require(TokenType::Identifier)?;
        let parameter = declare_pattern(p, catch_scope, catch_scope, name);
        p.require(TokenType::ParenthesisClose)?;
        let body = parse_block_stmt(p, catch_scope)?;
        let mut catch_loc = name.loc;
        catch_loc.extend(p.node_map()[body].loc());
        loc.extend(catch_loc);
        Some(p.create_node(catch_scope, catch_loc, Syntax::CatchBlock { parameter, body }))
    } else {
        None
    };
    let finally = if p.consume_if(TokenType::KeywordFinally)?.is_some() {
        let finally = parse_block_stmt(p, scope)?;
        loc.extend(p.node_map()[finally].loc());
        Some(finally)
    } else {
        None
    };
    if catch.is_none() && finally.is_none() {
        return Err(SyntaxError::from_loc(
            start.loc,
            SyntaxErrorType::TryStatementHasNoCatchOrFinally,
            None,
        ));
    };
    Ok(p.create_node(scope, loc, Syntax::TryStmt {
        wrapped,
        catch,
        finally,
    }))
}

fn parse_function_decl(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordFunction)?;
    let name_token = p.require(TokenType::Identifier)?;
    // The name binds in the enclosing variable scope, so the name pattern
    // lives in the enclosing scope, unlike the parameters and body.
    let target = p.scope_map()[scope].variable_scope();
    let text = p.string(name_token.loc);
    let name = p.create_node(scope, name_token.loc, Syntax::IdentifierPattern {
        name: text.clone(),
    });
    let mut symbol = Symbol::new(name);
    symbol.is_function = true;
    p.scope_map()[target].declare(text, symbol);
    let (parameters, body, end) = parse_function_rest(p, scope)?;
    let mut loc = start.loc;
    loc.extend(end);
    Ok(p.create_node(scope, loc, Syntax::FunctionDecl {
        name,
        parameters,
        body,
    }))
}

pub fn parse_function_expr(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let start = p.require(TokenType::KeywordFunction)?;
    let name_token = p.consume_if(TokenType::Identifier)?;
    let (parameters, body, end) = parse_function_rest(p, scope)?;
    let fn_scope = p.node_map()[body].scope();
    // A function expression's name binds inside the function itself.
    let name = match name_token {
        Some(t) => {
            let text = p.string(t.loc);
            let name = p.create_node(fn_scope, t.loc, Syntax::IdentifierPattern {
                name: text.clone(),
            });
            let mut symbol = Symbol::new(name);
            symbol.is_function = true;
            p.scope_map()[fn_scope].declare(text, symbol);
            Some(name)
        }
        None => None,
    };
    let mut loc = start.loc;
    loc.extend(end);
    Ok(p.create_node(scope, loc, Syntax::FunctionExpr {
        name,
        parameters,
        body,
    }))
}

fn parse_function_rest(
    p: &mut Parser,
    scope: ScopeId,
) -> SyntaxResult<(Vec<NodeId>, NodeId, SourceRange)> {
    let fn_scope = p.scope_map().create_scope(Some(scope), ScopeType::Closure);
    p.require(TokenType::ParenthesisOpen)?;
    let mut parameters = Vec::<NodeId>::new();
    loop {
        if p.peek()?.typ == TokenType::ParenthesisClose {
            break;
        };
        let name = p.require(TokenType::Identifier)?;
        let text = p.string(name.loc);
        let pattern = p.create_node(fn_scope, name.loc, Syntax::IdentifierPattern {
            name: text.clone(),
        });
        let mut symbol = Symbol::new(pattern);
        symbol.is_param = true;
        p.scope_map()[fn_scope].declare(text, symbol);
        parameters.push(pattern);
        if p.consume_if(TokenType::Comma)?.is_none() {
            break;
        };
    }
    p.require(TokenType::ParenthesisClose)?;
    let start = p.require(TokenType::BraceOpen)?;
    let body_stmts = parse_statements_until(p, fn_scope, TokenType::BraceClose)?;
    let end = p.require(TokenType::BraceClose)?;
    let mut body_loc = start.loc;
    body_loc.extend(end.loc);
    let body = p.create_node(fn_scope, body_loc, Syntax::BlockStmt { body: body_stmts });
    Ok((parameters, body, body_loc))
}

fn parse_label_or_expr_stmt(p: &mut Parser, scope: ScopeId) -> SyntaxResult<NodeId> {
    let checkpoint = p.checkpoint();
    let t = p.peek()?;
    if t.typ == TokenType::Identifier {
        p.next()?;
        if p.consume_if(TokenType::Colon)?.is_some() {
            let name = p.string(t.loc);
            let statement = parse_stmt(p, scope)?;
            let mut loc = t.loc;
            loc.extend(p.node_map()[statement].loc());
            return Ok(p.create_node(scope, loc, Syntax::LabelStmt { name, statement }));
        };
        p.restore_checkpoint(checkpoint);
    };
    let expression = parse_expr(p, scope)?;
    p.require_statement_end()?;
    let loc = p.node_map()[expression].loc();
    Ok(p.create_node(scope, loc, Syntax::ExpressionStmt { expression }))
}
