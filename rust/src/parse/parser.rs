use crate::ast::NodeId;
use crate::ast::NodeMap;
use crate::ast::Syntax;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::lex::LexerCheckpoint;
use crate::source::SourceRange;
use crate::symbol::ScopeId;
use crate::symbol::ScopeMap;
use crate::token::Token;
use crate::token::TokenType;

#[derive(Clone, Copy)]
pub struct ParserCheckpoint {
    lexer: LexerCheckpoint,
}

struct BufferedToken {
    token: Token,
    lex_mode: LexMode,
    // Lexer position before the token, so it can be re-lexed in a different
    // mode. A `/` means division in one mode and starts a regex in the other.
    before: LexerCheckpoint,
}

pub struct Parser {
    lexer: Lexer,
    buffered: Option<BufferedToken>,
    node_map: NodeMap,
    scope_map: ScopeMap,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Parser {
        Parser {
            lexer,
            buffered: None,
            node_map: NodeMap::new(),
            scope_map: ScopeMap::new(),
        }
    }

    pub fn take(self) -> (NodeMap, ScopeMap) {
        (self.node_map, self.scope_map)
    }

    pub fn node_map(&mut self) -> &mut NodeMap {
        &mut self.node_map
    }

    pub fn scope_map(&mut self) -> &mut ScopeMap {
        &mut self.scope_map
    }

    pub fn leading_comments(&self) -> &str {
        self.lexer.leading_comments()
    }

    pub fn create_node(&mut self, scope: ScopeId, loc: SourceRange, stx: Syntax) -> NodeId {
        self.node_map.create_node(scope, loc, stx)
    }

    pub fn string(&self, loc: SourceRange) -> String {
        self.lexer.source_str(loc).to_string()
    }

    pub fn checkpoint(&self) -> ParserCheckpoint {
        ParserCheckpoint {
            lexer: match &self.buffered {
                Some(b) => b.before,
                None => self.lexer.checkpoint(),
            },
        }
    }

    pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
        self.lexer.restore(checkpoint.lexer);
        self.buffered = None;
    }

    pub fn peek_with_mode(&mut self, mode: LexMode) -> SyntaxResult<Token> {
        if let Some(b) = &self.buffered {
            if b.lex_mode == mode {
                return Ok(b.token);
            };
            let before = b.before;
            self.lexer.restore(before);
            self.buffered = None;
        };
        let before = self.lexer.checkpoint();
        let token = self.lexer.next_token(mode)?;
        self.buffered = Some(BufferedToken {
            token,
            lex_mode: mode,
            before,
        });
        Ok(token)
    }

    pub fn peek(&mut self) -> SyntaxResult<Token> {
        self.peek_with_mode(LexMode::Standard)
    }

    pub fn next_with_mode(&mut self, mode: LexMode) -> SyntaxResult<Token> {
        let token = self.peek_with_mode(mode)?;
        self.buffered = None;
        Ok(token)
    }

    pub fn next(&mut self) -> SyntaxResult<Token> {
        self.next_with_mode(LexMode::Standard)
    }

    pub fn consume_if(&mut self, typ: TokenType) -> SyntaxResult<Option<Token>> {
        let token = self.peek()?;
        if token.typ == typ {
            self.buffered = None;
            Ok(Some(token))
        } else {
            Ok(None)
        }
    }

    pub fn require(&mut self, typ: TokenType) -> SyntaxResult<Token> {
        let token = self.next()?;
        if token.typ != typ {
            Err(SyntaxError::from_loc(
                token.loc,
                SyntaxErrorType::RequiredTokenNotFound(typ),
                Some(token.typ),
            ))
        } else {
            Ok(token)
        }
    }

    /// Consumes a statement terminator, applying automatic semicolon
    /// insertion: a line terminator, a closing brace, or end of input also
    /// ends a statement.
    pub fn require_statement_end(&mut self) -> SyntaxResult<()> {
        if self.consume_if(TokenType::Semicolon)?.is_some() {
            return Ok(());
        };
        let token = self.peek()?;
        if token.typ == TokenType::BraceClose
            || token.typ == TokenType::EOF
            || token.preceded_by_line_terminator
        {
            return Ok(());
        };
        Err(SyntaxError::from_loc(
            token.loc,
            SyntaxErrorType::RequiredTokenNotFound(TokenType::Semicolon),
            Some(token.typ),
        ))
    }
}
