use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::{fs::read_to_string, process::ExitCode};

const PROMPT: &str = ">> ";

#[derive(Debug, Parser)]
#[clap(name = "monk", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: MonkCommand,
}

#[derive(Debug, Subcommand)]
pub enum MonkCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "canonical")]
        format: ProgramFormat,
    },
    Run {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: ValueFormat,
    },
    Repl,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    Canonical,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ValueFormat {
    Debug,
    Basic,
}

fn main() -> ExitCode {
    monk_main().expect("Encountered an error!")
}

fn monk_main() -> Result<ExitCode> {
    color_eyre::install().expect("Can't fail at first call!");
    init_tracing();
    let args = CLArgs::parse();
    match args.routine {
        MonkCommand::Tokenize { path, format } => {
            eprintln!("Tokenizing {:?}...", path);
            let src = read_to_string(path)?;
            tokenize(&src, &format);
        }
        MonkCommand::Parse { path, format } => {
            eprintln!("Parsing {:?}...", path);
            let src = read_to_string(&path)?;
            if !parse(&src, &path.to_string_lossy(), &format) {
                return Ok(ExitCode::from(65));
            }
        }
        MonkCommand::Run { path, format } => {
            eprintln!("Running {:?}...", path);
            let src = read_to_string(&path)?;
            return Ok(run(&src, &path.to_string_lossy(), &format));
        }
        MonkCommand::Repl => {
            repl()?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Installs a log subscriber when `RUST_LOG` is set, e.g. `RUST_LOG=monk=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}

fn tokenize(src: &str, format: &TokenFormat) {
    use monk::lexer::formatter::{BasicFormatter, DebugFormatter, ToFormatter, TokenFormatter};
    use monk::lexer::{Lexer, TokenKind, TokenSource};

    let mut lexer = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter + '_> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&lexer)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&lexer)),
    };
    loop {
        let token = lexer.next_token();
        println!("{}", formatter.format(&token));
        if token.is(TokenKind::Eof) {
            break;
        }
    }
}

fn parse(src: &str, path: &str, format: &ProgramFormat) -> bool {
    use monk::parser::formatter::{
        CanonicalFormatter, DebugProgramFormatter, ParserFormatter, PrettyParserFormatter,
        ProgramFormatter,
    };
    use monk::parser::Parser;

    let (program, errors) = Parser::from_source(src).parse();
    if !errors.is_empty() {
        let formatter = PrettyParserFormatter::new(src, path);
        eprintln!("{}", formatter.format_errors(&errors));
        return false;
    }
    let formatter: Box<dyn ProgramFormatter> = match format {
        ProgramFormat::Debug => Box::new(DebugProgramFormatter {}),
        ProgramFormat::Canonical => Box::new(CanonicalFormatter {}),
    };
    println!("{}", formatter.format(&program));
    true
}

fn run(src: &str, path: &str, format: &ValueFormat) -> ExitCode {
    use monk::environment::Environment;
    use monk::evaluator::evaluate_program;
    use monk::parser::formatter::{ParserFormatter, PrettyParserFormatter};
    use monk::parser::Parser;
    use monk::value::formatter::{BasicFormatter, DebugFormatter, ValueFormatter};

    let (program, errors) = Parser::from_source(src).parse();
    if !errors.is_empty() {
        let formatter = PrettyParserFormatter::new(src, path);
        eprintln!("{}", formatter.format_errors(&errors));
        return ExitCode::from(65);
    }

    let formatter: Box<dyn ValueFormatter> = match format {
        ValueFormat::Debug => Box::new(DebugFormatter {}),
        ValueFormat::Basic => Box::new(BasicFormatter {}),
    };
    let environment = Environment::new();
    match evaluate_program(&program, &environment) {
        Some(value) if value.is_error() => {
            eprintln!("{}", formatter.format(&value));
            ExitCode::from(70)
        }
        Some(value) => {
            println!("{}", formatter.format(&value));
            ExitCode::SUCCESS
        }
        None => ExitCode::SUCCESS,
    }
}

fn repl() -> Result<()> {
    use monk::environment::Environment;
    use monk::evaluator::evaluate_program;
    use monk::parser::formatter::{BasicParserFormatter, ParserFormatter};
    use monk::parser::Parser;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let environment = Environment::new();
    let mut line = String::new();
    loop {
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let (program, errors) = Parser::from_source(&line).parse();
        if !errors.is_empty() {
            writeln!(stdout, "{}", BasicParserFormatter {}.format_errors(&errors))?;
            continue;
        }

        if let Some(value) = evaluate_program(&program, &environment) {
            writeln!(stdout, "{value}")?;
        }
    }
}
