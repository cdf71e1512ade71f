use super::{ParserError, ParserErrorKind, Program};
use ariadne::{Color, Label, Report, ReportKind, Source};

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
}

pub struct DebugProgramFormatter;

impl ProgramFormatter for DebugProgramFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:#?}")
    }
}

/// Renders the fully parenthesised canonical form of a program.
pub struct CanonicalFormatter;

impl ProgramFormatter for CanonicalFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program}")
    }
}

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;

    fn format_errors(&self, errors: &[ParserError]) -> String {
        errors
            .iter()
            .map(|e| self.format_error(e))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One tab indented message per error.
pub struct BasicParserFormatter;

impl ParserFormatter for BasicParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("\t{error}")
    }
}

pub struct PrettyParserFormatter<'src> {
    text: &'src str,
    path: &'src str,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src str) -> Self {
        Self { text, path }
    }
}

impl<'src> ParserFormatter for PrettyParserFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = self.path;
        let range = error.span.range();
        let label = match error.kind {
            ParserErrorKind::UnexpectedToken { actual, expected } => {
                format!("Expected {expected} but got {actual}")
            }
            ParserErrorKind::NonExpression(kind) => format!("{kind} can not start an expression"),
            ParserErrorKind::InvalidInteger(_) => "Integer literal out of range".into(),
        };
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_code(error.code())
            .with_message(error.to_string())
            .with_label(
                Label::new((path, range))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
