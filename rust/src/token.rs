use crate::source::SourceRange;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TokenType {
    // Used to represent a type that should never be seen in actual code. Similar
    // to 0 in C code, nullptr in C++ code, or null in Java code.
    _Dummy,
    Ampersand,
    AmpersandAmpersand,
    AmpersandEquals,
    Asterisk,
    AsteriskEquals,
    Bar,
    BarBar,
    BarEquals,
    BraceClose,
    BraceOpen,
    BracketClose,
    BracketOpen,
    Caret,
    CaretEquals,
    ChevronLeft,
    ChevronLeftChevronLeft,
    ChevronLeftChevronLeftEquals,
    ChevronLeftEquals,
    ChevronRight,
    ChevronRightChevronRight,
    ChevronRightChevronRightChevronRight,
    ChevronRightChevronRightChevronRightEquals,
    ChevronRightChevronRightEquals,
    ChevronRightEquals,
    Colon,
    Comma,
    Dot,
    EOF,
    Equals,
    EqualsEquals,
    EqualsEqualsEquals,
    Exclamation,
    ExclamationEquals,
    ExclamationEqualsEquals,
    Hyphen,
    HyphenEquals,
    HyphenHyphen,
    Identifier,
    KeywordBreak,
    KeywordCase,
    KeywordCatch,
    KeywordContinue,
    KeywordDebugger,
    KeywordDefault,
    KeywordDelete,
    KeywordDo,
    KeywordElse,
    KeywordFinally,
    KeywordFor,
    KeywordFunction,
    KeywordIf,
    KeywordIn,
    KeywordInstanceof,
    KeywordNew,
    KeywordReturn,
    KeywordSwitch,
    KeywordThis,
    KeywordThrow,
    KeywordTry,
    KeywordTypeof,
    KeywordVar,
    KeywordVoid,
    KeywordWhile,
    KeywordWith,
    LiteralFalse,
    LiteralNull,
    LiteralNumber,
    LiteralRegex,
    LiteralString,
    LiteralTrue,
    ParenthesisClose,
    ParenthesisOpen,
    Percent,
    PercentEquals,
    Plus,
    PlusEquals,
    PlusPlus,
    Question,
    Semicolon,
    Slash,
    SlashEquals,
    Tilde,
}

#[derive(Clone, Copy, Debug)]
pub struct Token {
    pub loc: SourceRange,
    // Whether one or more line terminators precede this token, used for
    // automatic semicolon insertion and the restricted productions.
    pub preceded_by_line_terminator: bool,
    pub typ: TokenType,
}

impl Token {
    pub fn new(loc: SourceRange, typ: TokenType, preceded_by_line_terminator: bool) -> Token {
        Token {
            loc,
            typ,
            preceded_by_line_terminator,
        }
    }
}
