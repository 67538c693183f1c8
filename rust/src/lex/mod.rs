use crate::char::DIGIT;
use crate::char::DIGIT_HEX;
use crate::char::ID_CONTINUE;
use crate::char::ID_START;
use crate::char::LINE_TERMINATOR;
use crate::char::WHITESPACE;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::source::SourceRange;
use crate::token::Token;
use crate::token::TokenType;
use ahash::AHashMap;
use ahash::AHashSet;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::MatchKind;
use lazy_static::lazy_static;
use memchr::memchr;
use memchr::memmem;

#[derive(Clone, Copy, Eq, PartialEq)]
pub enum LexMode {
    SlashIsRegex,
    Standard,
}

#[derive(Clone, Copy)]
pub struct LexerCheckpoint {
    next: usize,
}

struct PunctuatorSet {
    automaton: AhoCorasick,
    types: Vec<TokenType>,
}

fn build_punctuators(punctuators: &[(&str, TokenType)]) -> PunctuatorSet {
    PunctuatorSet {
        automaton: AhoCorasickBuilder::new()
            .anchored(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(punctuators.iter().map(|(pat, _)| pat)),
        types: punctuators.iter().map(|&(_, typ)| typ).collect(),
    }
}

lazy_static! {
    static ref PUNCTUATORS: PunctuatorSet = build_punctuators(&[
        ("&", TokenType::Ampersand),
        ("&&", TokenType::AmpersandAmpersand),
        ("&=", TokenType::AmpersandEquals),
        ("*", TokenType::Asterisk),
        ("*=", TokenType::AsteriskEquals),
        ("|", TokenType::Bar),
        ("||", TokenType::BarBar),
        ("|=", TokenType::BarEquals),
        ("}", TokenType::BraceClose),
        ("{", TokenType::BraceOpen),
        ("]", TokenType::BracketClose),
        ("[", TokenType::BracketOpen),
        ("^", TokenType::Caret),
        ("^=", TokenType::CaretEquals),
        ("<", TokenType::ChevronLeft),
        ("<<", TokenType::ChevronLeftChevronLeft),
        ("<<=", TokenType::ChevronLeftChevronLeftEquals),
        ("<=", TokenType::ChevronLeftEquals),
        (">", TokenType::ChevronRight),
        (">>", TokenType::ChevronRightChevronRight),
        (">>>", TokenType::ChevronRightChevronRightChevronRight),
        (">>>=", TokenType::ChevronRightChevronRightChevronRightEquals),
        (">>=", TokenType::ChevronRightChevronRightEquals),
        (">=", TokenType::ChevronRightEquals),
        (":", TokenType::Colon),
        (",", TokenType::Comma),
        (".", TokenType::Dot),
        ("=", TokenType::Equals),
        ("==", TokenType::EqualsEquals),
        ("===", TokenType::EqualsEqualsEquals),
        ("!", TokenType::Exclamation),
        ("!=", TokenType::ExclamationEquals),
        ("!==", TokenType::ExclamationEqualsEquals),
        ("-", TokenType::Hyphen),
        ("-=", TokenType::HyphenEquals),
        ("--", TokenType::HyphenHyphen),
        (")", TokenType::ParenthesisClose),
        ("(", TokenType::ParenthesisOpen),
        ("%", TokenType::Percent),
        ("%=", TokenType::PercentEquals),
        ("+", TokenType::Plus),
        ("+=", TokenType::PlusEquals),
        ("++", TokenType::PlusPlus),
        ("?", TokenType::Question),
        (";", TokenType::Semicolon),
        ("/", TokenType::Slash),
        ("/=", TokenType::SlashEquals),
        ("~", TokenType::Tilde),
    ]);
    static ref KEYWORDS: AHashMap<&'static [u8], TokenType> = {
        let mut map = AHashMap::<&'static [u8], TokenType>::new();
        map.insert(b"break".as_slice(), TokenType::KeywordBreak);
        map.insert(b"case".as_slice(), TokenType::KeywordCase);
        map.insert(b"catch".as_slice(), TokenType::KeywordCatch);
        map.insert(b"continue".as_slice(), TokenType::KeywordContinue);
        map.insert(b"debugger".as_slice(), TokenType::KeywordDebugger);
        map.insert(b"default".as_slice(), TokenType::KeywordDefault);
        map.insert(b"delete".as_slice(), TokenType::KeywordDelete);
        map.insert(b"do".as_slice(), TokenType::KeywordDo);
        map.insert(b"else".as_slice(), TokenType::KeywordElse);
        map.insert(b"false".as_slice(), TokenType::LiteralFalse);
        map.insert(b"finally".as_slice(), TokenType::KeywordFinally);
        map.insert(b"for".as_slice(), TokenType::KeywordFor);
        map.insert(b"function".as_slice(), TokenType::KeywordFunction);
        map.insert(b"if".as_slice(), TokenType::KeywordIf);
        map.insert(b"in".as_slice(), TokenType::KeywordIn);
        map.insert(b"instanceof".as_slice(), TokenType::KeywordInstanceof);
        map.insert(b"new".as_slice(), TokenType::KeywordNew);
        map.insert(b"null".as_slice(), TokenType::LiteralNull);
        map.insert(b"return".as_slice(), TokenType::KeywordReturn);
        map.insert(b"switch".as_slice(), TokenType::KeywordSwitch);
        map.insert(b"this".as_slice(), TokenType::KeywordThis);
        map.insert(b"throw".as_slice(), TokenType::KeywordThrow);
        map.insert(b"true".as_slice(), TokenType::LiteralTrue);
        map.insert(b"try".as_slice(), TokenType::KeywordTry);
        map.insert(b"typeof".as_slice(), TokenType::KeywordTypeof);
        map.insert(b"var".as_slice(), TokenType::KeywordVar);
        map.insert(b"void".as_slice(), TokenType::KeywordVoid);
        map.insert(b"while".as_slice(), TokenType::KeywordWhile);
        map.insert(b"with".as_slice(), TokenType::KeywordWith);
        map
    };
    // Names the renamer must never generate: keywords plus the words the
    // language reserves for future use.
    pub static ref RESERVED_STRS: AHashSet<&'static str> = {
        let mut set = AHashSet::<&'static str>::new();
        for word in [
            "abstract", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
            "continue", "debugger", "default", "delete", "do", "double", "else", "enum", "export",
            "extends", "false", "final", "finally", "float", "for", "function", "goto", "if",
            "implements", "import", "in", "instanceof", "int", "interface", "long", "native",
            "new", "null", "package", "private", "protected", "public", "return", "short",
            "static", "super", "switch", "synchronized", "this", "throw", "throws", "transient",
            "true", "try", "typeof", "var", "void", "volatile", "while", "with",
        ] {
            set.insert(word);
        }
        set
    };
}

pub struct Lexer {
    code: Vec<u8>,
    next: usize,
    // Comment text before the first token, which the emitter can optionally
    // preserve ahead of the output.
    leading_comments: String,
    seen_token: bool,
}

impl Lexer {
    pub fn new(code: Vec<u8>) -> Lexer {
        Lexer {
            code,
            next: 0,
            leading_comments: String::new(),
            seen_token: false,
        }
    }

    pub fn source(&self) -> &[u8] {
        &self.code
    }

    pub fn source_str(&self, loc: SourceRange) -> &str {
        // The lexer only ever slices at byte positions it has already
        // validated as ASCII token boundaries.
        std::str::from_utf8(&self.code[loc.start..loc.end]).unwrap_or("")
    }

    pub fn leading_comments(&self) -> &str {
        &self.leading_comments
    }

    pub fn checkpoint(&self) -> LexerCheckpoint {
        LexerCheckpoint { next: self.next }
    }

    pub fn restore(&mut self, checkpoint: LexerCheckpoint) {
        self.next = checkpoint.next;
    }

    fn at_end(&self) -> bool {
        self.next >= self.code.len()
    }

    fn peek_byte(&self, offset: usize) -> u8 {
        self.code.get(self.next + offset).copied().unwrap_or(0)
    }

    fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
        SyntaxError::new(typ, self.next, None)
    }

    // Consumes whitespace and comments; returns whether a line terminator was
    // crossed, for automatic semicolon insertion.
    fn skip_trivia(&mut self) -> SyntaxResult<bool> {
        let mut line_terminator = false;
        loop {
            let c = self.peek_byte(0);
            if !self.at_end() && (WHITESPACE.has(c) || LINE_TERMINATOR.has(c)) {
                line_terminator |= LINE_TERMINATOR.has(c);
                self.next += 1;
                continue;
            };
            if c == b'/' && self.peek_byte(1) == b'/' {
                let start = self.next;
                let rest = &self.code[self.next..];
                let len = memchr(b'\n', rest).unwrap_or(rest.len());
                self.next += len;
                self.record_leading_comment(start, self.next);
                continue;
            };
            if c == b'/' && self.peek_byte(1) == b'*' {
                let start = self.next;
                let rest = &self.code[self.next + 2..];
                match memmem::find(rest, b"*/") {
                    Some(pos) => {
                        let body = &rest[..pos];
                        line_terminator |= body.iter().any(|&c| LINE_TERMINATOR.has(c));
                        self.next += 2 + pos + 2;
                    }
                    None => return Err(self.error(SyntaxErrorType::UnexpectedEnd)),
                };
                self.record_leading_comment(start, self.next);
                continue;
            };
            return Ok(line_terminator);
        }
    }

    fn record_leading_comment(&mut self, start: usize, end: usize) {
        if self.seen_token {
            return;
        };
        if let Ok(text) = std::str::from_utf8(&self.code[start..end]) {
            if !self.leading_comments.is_empty() {
                self.leading_comments.push('\n');
            };
            self.leading_comments.push_str(text);
        };
    }

    pub fn next_token(&mut self, mode: LexMode) -> SyntaxResult<Token> {
        let preceded_by_line_terminator = self.skip_trivia()?;
        let start = self.next;
        if self.at_end() {
            return Ok(Token::new(
                SourceRange::new(start, start),
                TokenType::EOF,
                preceded_by_line_terminator,
            ));
        };
        self.seen_token = true;
        let c = self.peek_byte(0);
        let typ = if ID_START.has(c) {
            self.lex_identifier_or_keyword()
        } else if DIGIT.has(c) || (c == b'.' && DIGIT.has(self.peek_byte(1))) {
            self.lex_number()?
        } else if c == b'"' || c == b'\'' {
            self.lex_string()?
        } else if c == b'/' && mode == LexMode::SlashIsRegex {
            self.lex_regex()?
        } else {
            match PUNCTUATORS.automaton.find(&self.code[self.next..]) {
                Some(m) => {
                    self.next += m.end();
                    PUNCTUATORS.types[m.pattern()]
                }
                None => return Err(self.error(SyntaxErrorType::ExpectedNotFound)),
            }
        };
        Ok(Token::new(
            SourceRange::new(start, self.next),
            typ,
            preceded_by_line_terminator,
        ))
    }

    fn lex_identifier_or_keyword(&mut self) -> TokenType {
        let start = self.next;
        self.next += 1;
        while !self.at_end() && ID_CONTINUE.has(self.peek_byte(0)) {
            self.next += 1;
        }
        match KEYWORDS.get(&self.code[start..self.next]) {
            Some(&typ) => typ,
            None => TokenType::Identifier,
        }
    }

    fn lex_number(&mut self) -> SyntaxResult<TokenType> {
        if self.peek_byte(0) == b'0' && (self.peek_byte(1) == b'x' || self.peek_byte(1) == b'X') {
            self.next += 2;
            let digits_start = self.next;
            while !self.at_end() && DIGIT_HEX.has(self.peek_byte(0)) {
                self.next += 1;
            }
            if self.next == digits_start {
                return Err(self.error(SyntaxErrorType::MalformedLiteralNumber));
            };
            return Ok(TokenType::LiteralNumber);
        };
        while !self.at_end() && DIGIT.has(self.peek_byte(0)) {
            self.next += 1;
        }
        if self.peek_byte(0) == b'.' {
            self.next += 1;
            while !self.at_end() && DIGIT.has(self.peek_byte(0)) {
                self.next += 1;
            }
        };
        if self.peek_byte(0) == b'e' || self.peek_byte(0) == b'E' {
            self.next += 1;
            if self.peek_byte(0) == b'+' || self.peek_byte(0) == b'-' {
                self.next += 1;
            };
            let digits_start = self.next;
            while !self.at_end() && DIGIT.has(self.peek_byte(0)) {
                self.next += 1;
            }
            if self.next == digits_start {
                return Err(self.error(SyntaxErrorType::MalformedLiteralNumber));
            };
        };
        // A number must not run straight into an identifier (e.g. `12px`).
        if !self.at_end() && ID_START.has(self.peek_byte(0)) {
            return Err(self.error(SyntaxErrorType::MalformedLiteralNumber));
        };
        Ok(TokenType::LiteralNumber)
    }

    fn lex_string(&mut self) -> SyntaxResult<TokenType> {
        let quote = self.peek_byte(0);
        self.next += 1;
        loop {
            if self.at_end() {
                return Err(self.error(SyntaxErrorType::UnexpectedEnd));
            };
            let c = self.peek_byte(0);
            if c == quote {
                self.next += 1;
                return Ok(TokenType::LiteralString);
            };
            if c == b'\\' {
                // The escaped character may itself be a line terminator
                // (line continuation), which is fine.
                self.next += 2;
                continue;
            };
            if LINE_TERMINATOR.has(c) {
                return Err(self.error(SyntaxErrorType::LineTerminatorInString));
            };
            self.next += 1;
        }
    }

    fn lex_regex(&mut self) -> SyntaxResult<TokenType> {
        // Past the opening slash.
        self.next += 1;
        let mut in_class = false;
        loop {
            if self.at_end() {
                return Err(self.error(SyntaxErrorType::UnexpectedEnd));
            };
            let c = self.peek_byte(0);
            if LINE_TERMINATOR.has(c) {
                return Err(self.error(SyntaxErrorType::LineTerminatorInRegex));
            };
            self.next += 1;
            match c {
                b'\\' => {
                    self.next += 1;
                }
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => break,
                _ => {}
            };
        }
        while !self.at_end() && ID_CONTINUE.has(self.peek_byte(0)) {
            self.next += 1;
        }
        Ok(TokenType::LiteralRegex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(src: &str) -> Vec<TokenType> {
        let mut lexer = Lexer::new(src.as_bytes().to_vec());
        let mut types = Vec::new();
        loop {
            let t = lexer.next_token(LexMode::Standard).unwrap();
            if t.typ == TokenType::EOF {
                break;
            };
            types.push(t.typ);
        }
        types
    }

    #[test]
    fn test_longest_punctuator_wins() {
        assert_eq!(lex_all(">>>="), vec![
            TokenType::ChevronRightChevronRightChevronRightEquals
        ]);
        assert_eq!(lex_all(">>>"), vec![
            TokenType::ChevronRightChevronRightChevronRight
        ]);
        assert_eq!(lex_all("==="), vec![TokenType::EqualsEqualsEquals]);
        assert_eq!(lex_all("== ="), vec![
            TokenType::EqualsEquals,
            TokenType::Equals
        ]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(lex_all("var varx in instance"), vec![
            TokenType::KeywordVar,
            TokenType::Identifier,
            TokenType::KeywordIn,
            TokenType::Identifier,
        ]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex_all("1 1.5 .5 0x1F 1e3 1e+3"), vec![
            TokenType::LiteralNumber;
            6
        ]);
        let mut lexer = Lexer::new(b"12px".to_vec());
        assert!(lexer.next_token(LexMode::Standard).is_err());
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex_all(r#" "a\"b" 'c' "#), vec![
            TokenType::LiteralString,
            TokenType::LiteralString
        ]);
        let mut lexer = Lexer::new(b"\"a\nb\"".to_vec());
        assert!(lexer.next_token(LexMode::Standard).is_err());
    }

    #[test]
    fn test_regex_mode() {
        let mut lexer = Lexer::new(b"/a[/]b/gi".to_vec());
        let t = lexer.next_token(LexMode::SlashIsRegex).unwrap();
        assert_eq!(t.typ, TokenType::LiteralRegex);
        assert_eq!(t.loc.len(), 9);
        let mut lexer = Lexer::new(b"/= 2".to_vec());
        let t = lexer.next_token(LexMode::Standard).unwrap();
        assert_eq!(t.typ, TokenType::SlashEquals);
    }

    #[test]
    fn test_comments_and_line_terminators() {
        let mut lexer = Lexer::new(b"a // c\nb /* d */ c".to_vec());
        let a = lexer.next_token(LexMode::Standard).unwrap();
        assert!(!a.preceded_by_line_terminator);
        let b = lexer.next_token(LexMode::Standard).unwrap();
        assert!(b.preceded_by_line_terminator);
        let c = lexer.next_token(LexMode::Standard).unwrap();
        assert!(!c.preceded_by_line_terminator);
    }

    #[test]
    fn test_leading_comments_captured() {
        let mut lexer = Lexer::new(b"/* hello */ a".to_vec());
        lexer.next_token(LexMode::Standard).unwrap();
        assert_eq!(lexer.leading_comments(), "/* hello */");
    }
}
