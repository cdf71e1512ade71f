mod span;

use compact_str::CompactString;
pub use span::Span;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("fn", TokenKind::KeywordFn);
    map.insert("let", TokenKind::KeywordLet);
    map.insert("true", TokenKind::KeywordTrue);
    map.insert("false", TokenKind::KeywordFalse);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("return", TokenKind::KeywordReturn);
    map
});

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Literals
    Ident,
    IntegerLiteral,
    StringLiteral,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Star,
    Slash,
    LessThan,
    GreaterThan,
    EqualEqual,
    BangEqual,

    // Delimiters
    Comma,
    Semicolon,
    LeftParenthesis,
    RightParenthesis,
    LeftBrace,
    RightBrace,

    // Keywords
    KeywordFn,
    KeywordLet,
    KeywordTrue,
    KeywordFalse,
    KeywordIf,
    KeywordElse,
    KeywordReturn,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Illegal => write!(f, "ILLEGAL"),
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Ident => write!(f, "IDENT"),
            TokenKind::IntegerLiteral => write!(f, "INT"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::LessThan => write!(f, "<"),
            TokenKind::GreaterThan => write!(f, ">"),
            TokenKind::EqualEqual => write!(f, "=="),
            TokenKind::BangEqual => write!(f, "!="),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::LeftParenthesis => write!(f, "("),
            TokenKind::RightParenthesis => write!(f, ")"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::KeywordFn => write!(f, "FUNCTION"),
            TokenKind::KeywordLet => write!(f, "LET"),
            TokenKind::KeywordTrue => write!(f, "TRUE"),
            TokenKind::KeywordFalse => write!(f, "FALSE"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordReturn => write!(f, "RETURN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: CompactString,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<CompactString>, span: Span) -> Self {
        Self {
            kind,
            literal: literal.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
