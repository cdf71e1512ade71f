pub mod formatter;
mod token;

use std::{iter::Peekable, str::CharIndices};
pub use token::{Span, Token, TokenKind, KEYWORD_HASHMAP};

/// A forward-only producer of tokens.
///
/// Implementors must keep yielding [`TokenKind::Eof`] once the input is exhausted.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

#[derive(Debug, Clone, Copy)]
struct SourceChar {
    value: char,
    offset: usize,
}

impl SourceChar {
    fn next_offset(&self) -> usize {
        self.offset + self.value.len_utf8()
    }
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }
}

impl<'src> Lexer<'src> {
    fn next_char(&mut self) -> Option<SourceChar> {
        self.chars
            .next()
            .map(|(offset, value)| SourceChar { value, offset })
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn eat_while(&mut self, start: usize, predicate: impl Fn(char) -> bool) -> usize {
        let mut end = start;
        while let Some(&(offset, c)) = self.chars.peek() {
            if !predicate(c) {
                break;
            }
            end = offset + c.len_utf8();
            let _ = self.chars.next();
        }
        end
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_ascii_whitespace() {
                break;
            }
            let _ = self.chars.next();
        }
    }

    fn lex_ident_or_keyword(&mut self, first: SourceChar) -> Token {
        let end = self.eat_while(first.next_offset(), is_identifier_char);
        let span = Span::new(first.offset, end - first.offset);
        let lexeme = &self.source[span.range()];
        let kind = KEYWORD_HASHMAP
            .get(lexeme)
            .copied()
            .unwrap_or(TokenKind::Ident);
        Token::new(kind, lexeme, span)
    }

    fn lex_integer(&mut self, first: SourceChar) -> Token {
        let end = self.eat_while(first.next_offset(), |c| c.is_ascii_digit());
        let span = Span::new(first.offset, end - first.offset);
        Token::new(TokenKind::IntegerLiteral, &self.source[span.range()], span)
    }

    fn lex_string(&mut self, quote: SourceChar) -> Token {
        let start = quote.next_offset();
        let end = self.eat_while(start, |c| c != '"');
        // Consume the closing quote if there is one.
        let closing = self.next_char().map(|c| c.next_offset()).unwrap_or(end);
        Token::new(
            TokenKind::StringLiteral,
            &self.source[start..end],
            Span::new(quote.offset, closing - quote.offset),
        )
    }

    fn lex_one_or_two(
        &mut self,
        first: SourceChar,
        single: TokenKind,
        double: TokenKind,
    ) -> Token {
        if self.peek_char() == Some('=') {
            let _ = self.chars.next();
            let span = Span::new(first.offset, first.value.len_utf8() + 1);
            Token::new(double, &self.source[span.range()], span)
        } else {
            let span = Span::new(first.offset, first.value.len_utf8());
            Token::new(single, &self.source[span.range()], span)
        }
    }
}

impl<'src> TokenSource for Lexer<'src> {
    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.next_char() else {
            return Token::new(TokenKind::Eof, "", Span::new(self.source.len(), 0));
        };

        let source = self.source;
        let just = |kind: TokenKind| {
            let span = Span::new(c.offset, c.value.len_utf8());
            Token::new(kind, &source[span.range()], span)
        };

        match c.value {
            '=' => self.lex_one_or_two(c, TokenKind::Assign, TokenKind::EqualEqual),
            '!' => self.lex_one_or_two(c, TokenKind::Bang, TokenKind::BangEqual),
            '+' => just(TokenKind::Plus),
            '-' => just(TokenKind::Minus),
            '*' => just(TokenKind::Star),
            '/' => just(TokenKind::Slash),
            '<' => just(TokenKind::LessThan),
            '>' => just(TokenKind::GreaterThan),
            ',' => just(TokenKind::Comma),
            ';' => just(TokenKind::Semicolon),
            '(' => just(TokenKind::LeftParenthesis),
            ')' => just(TokenKind::RightParenthesis),
            '{' => just(TokenKind::LeftBrace),
            '}' => just(TokenKind::RightBrace),
            '"' => self.lex_string(c),
            v if is_identifier_char(v) => self.lex_ident_or_keyword(c),
            v if v.is_ascii_digit() => self.lex_integer(c),
            _ => just(TokenKind::Illegal),
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
