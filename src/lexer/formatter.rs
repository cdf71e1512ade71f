use super::{Lexer, Token, TokenKind};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
}

pub trait ToFormatter<F>
where
    F: TokenFormatter,
{
    fn create_formatter(&self) -> F;
}

pub struct BasicFormatter<'src> {
    text: &'src str,
}

impl<'src> ToFormatter<BasicFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> BasicFormatter<'src> {
        BasicFormatter {
            text: self.get_source(),
        }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        match token.kind {
            TokenKind::Eof => "EOF".into(),
            TokenKind::StringLiteral => {
                let lexeme = self.text.get(token.span.range()).unwrap_or_default();
                format!("STRING {lexeme} {}", token.literal)
            }
            TokenKind::Ident | TokenKind::IntegerLiteral | TokenKind::Illegal => {
                format!("{} {}", token.kind, token.literal)
            }
            kind => format!("{kind}"),
        }
    }
}

pub struct DebugFormatter;

impl<'src> ToFormatter<DebugFormatter> for Lexer<'src> {
    fn create_formatter(&self) -> DebugFormatter {
        DebugFormatter {}
    }
}

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }
}
