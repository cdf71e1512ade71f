use color_eyre::eyre::{Context, Result};
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use monk::{
    lexer::{Span, Token, TokenKind, TokenSource},
    parser::{
        expression::{Expression, Identifier, InfixOperator, PrefixOperator},
        formatter::{BasicParserFormatter, ParserFormatter},
        statement::Statement,
        ParserErrorKind, Parser, Program,
    },
};

fn parse_ok(input: &str) -> Program {
    let (program, errors) = Parser::from_source(input).parse();
    let messages = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>();
    assert!(
        errors.is_empty(),
        "Unexpected errors when parsing {input:?}: {messages:?}"
    );
    program
}

fn check(input: &str, expected: &str) {
    let program = parse_ok(input);
    assert_eq!(program.to_string(), expected, "Failed to parse {input:?}");
}

fn check_errors(input: &str, expected: &[&str]) {
    let mut parser = Parser::from_source(input);
    let _ = parser.parse_program();
    assert_eq!(parser.error_messages(), expected, "Failed on {input:?}");
}

#[test]
fn test_let_statements() {
    let program = parse_ok("let x = 5;\nlet y = true;\nlet foobar = y;");
    assert_eq!(program.len(), 3);

    let expected = [
        ("x", Expression::IntegerLiteral(5)),
        ("y", Expression::BooleanLiteral(true)),
        ("foobar", Expression::Identifier(Identifier::new("y"))),
    ];
    for (stmt, (expected_name, expected_value)) in program.iter().zip(expected) {
        let Statement::Let { name, value } = stmt else {
            panic!("Expected a let statement but got {stmt:?}");
        };
        assert_eq!(name.name, expected_name);
        assert_eq!(*value, expected_value);
    }
}

#[test]
fn test_return_statements() {
    let program = parse_ok("return 5;\nreturn true;\nreturn foobar;");
    assert_eq!(program.len(), 3);
    assert!(program.iter().all(|s| matches!(s, Statement::Return(_))));
    assert_eq!(program.to_string(), "return 5;return true;return foobar;");
}

#[test]
fn test_let_without_semicolon_stops_at_end_of_input() {
    check("let x = 1 + 2", "let x = (1 + 2);");
    check("return x", "return x;");
}

#[test]
fn test_literals() {
    let program = parse_ok(r#"foobar; 5; "hello world"; false;"#);
    let expressions = program
        .iter()
        .map(|s| match s {
            Statement::Expression(expr) => expr.clone(),
            stmt => panic!("Expected an expression statement but got {stmt:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(
        expressions,
        vec![
            Expression::Identifier(Identifier::new("foobar")),
            Expression::IntegerLiteral(5),
            Expression::StringLiteral("hello world".into()),
            Expression::BooleanLiteral(false),
        ]
    );
}

#[test]
fn test_prefix_expressions() {
    let cases = [
        ("!5;", PrefixOperator::Bang, Expression::IntegerLiteral(5)),
        ("-15;", PrefixOperator::Minus, Expression::IntegerLiteral(15)),
        ("!true;", PrefixOperator::Bang, Expression::BooleanLiteral(true)),
        ("!false;", PrefixOperator::Bang, Expression::BooleanLiteral(false)),
    ];
    for (input, expected_operator, expected_operand) in cases {
        let program = parse_ok(input);
        let Some(Statement::Expression(Expression::Prefix { operator, operand })) =
            program.get_statement(0)
        else {
            panic!("Expected a prefix expression for {input:?}");
        };
        assert_eq!(*operator, expected_operator);
        assert_eq!(**operand, expected_operand);
    }
}

#[test]
fn test_infix_expressions() {
    let cases = [
        ("5 + 5;", InfixOperator::Add),
        ("5 - 5;", InfixOperator::Subtract),
        ("5 * 5;", InfixOperator::Multiply),
        ("5 / 5;", InfixOperator::Divide),
        ("5 > 5;", InfixOperator::GreaterThan),
        ("5 < 5;", InfixOperator::LessThan),
        ("5 == 5;", InfixOperator::EqualEqual),
        ("5 != 5;", InfixOperator::BangEqual),
    ];
    for (input, expected_operator) in cases {
        let program = parse_ok(input);
        let Some(Statement::Expression(Expression::Infix { operator, lhs, rhs })) =
            program.get_statement(0)
        else {
            panic!("Expected an infix expression for {input:?}");
        };
        assert_eq!(*operator, expected_operator);
        assert_eq!(**lhs, Expression::IntegerLiteral(5));
        assert_eq!(**rhs, Expression::IntegerLiteral(5));
    }
}

#[test]
fn test_operator_precedence() {
    let cases = [
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a - b - c", "((a - b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        (
            "3 + 4 * 5 == 3 * 1 + 4 * 5",
            "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
        ),
        ("1 + 2 * 3", "(1 + (2 * 3))"),
        ("true", "true"),
        ("false", "false"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("3 < 5 == true", "((3 < 5) == true)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
        ("add(1)(2)", "add(1)(2)"),
    ];
    for (input, expected) in cases {
        check(input, expected);
    }
}

#[test]
fn test_if_expression() {
    let program = parse_ok("if (x < y) { x }");
    let Some(Statement::Expression(Expression::If {
        condition,
        consequence,
        alternative,
    })) = program.get_statement(0)
    else {
        panic!("Expected an if expression");
    };
    assert_eq!(condition.to_string(), "(x < y)");
    assert_eq!(consequence.statements.len(), 1);
    assert_eq!(consequence.to_string(), "x");
    assert!(alternative.is_none());
}

#[test]
fn test_if_else_expression() {
    let program = parse_ok("if (x < y) { x } else { y }");
    let Some(Statement::Expression(Expression::If { alternative, .. })) = program.get_statement(0)
    else {
        panic!("Expected an if expression");
    };
    assert_eq!(alternative.as_ref().map(|a| a.to_string()), Some("y".into()));
    assert_eq!(program.to_string(), "if(x < y) xelse y");
}

#[test]
fn test_function_literal() {
    let program = parse_ok("fn(x, y) { x + y; }");
    let Some(Statement::Expression(Expression::Function { parameters, body })) =
        program.get_statement(0)
    else {
        panic!("Expected a function literal");
    };
    let names = parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["x", "y"]);
    assert_eq!(body.to_string(), "(x + y)");
    assert_eq!(program.to_string(), "fn(x, y)(x + y)");
}

#[test]
fn test_function_parameters() {
    let cases: [(&str, &[&str]); 3] = [
        ("fn() {};", &[]),
        ("fn(x) {};", &["x"]),
        ("fn(x, y, z) {};", &["x", "y", "z"]),
    ];
    for (input, expected) in cases {
        let program = parse_ok(input);
        let Some(Statement::Expression(Expression::Function { parameters, .. })) =
            program.get_statement(0)
        else {
            panic!("Expected a function literal for {input:?}");
        };
        let names = parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, expected);
    }
}

#[test]
fn test_call_expression() {
    let program = parse_ok("add(1, 2 * 3, 4 + 5);");
    let Some(Statement::Expression(Expression::Call { callee, arguments })) =
        program.get_statement(0)
    else {
        panic!("Expected a call expression");
    };
    assert_eq!(**callee, Expression::Identifier(Identifier::new("add")));
    let arguments = arguments.iter().map(|a| a.to_string()).collect::<Vec<_>>();
    assert_eq!(arguments, ["1", "(2 * 3)", "(4 + 5)"]);
}

#[test]
fn test_string_rendering() {
    check(r#"let s = "hello world";"#, "let s = hello world;");
}

#[test]
fn test_let_errors() {
    check_errors(
        "let x 5; let = 10; let 838383;",
        &[
            "expected next token to be =, got=INT instead",
            "expected next token to be IDENT, got== instead",
            "no prefix parse function for = found",
            "expected next token to be IDENT, got=INT instead",
        ],
    );
}

#[test]
fn test_missing_prefix_function() {
    check_errors("5 + ;", &["no prefix parse function for ; found"]);
}

#[test]
fn test_failed_initializer_skips_to_terminator() {
    check_errors("let x = ); let y = 5;", &["no prefix parse function for ) found"]);
    check_errors("return ); 5;", &["no prefix parse function for ) found"]);

    let (program, errors) = Parser::from_source("let x = ); let y = 5;").parse();
    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "let y = 5;");
}

#[test]
fn test_empty_program() {
    let program = parse_ok("");
    assert!(program.is_empty());
    assert!(!parse_ok("1;").is_empty());
}

#[test]
fn test_unclosed_group() {
    check_errors("(1 + 2", &["expected next token to be ), got=EOF instead"]);
}

#[test]
fn test_integer_out_of_range() {
    check_errors(
        "99999999999999999999",
        &[r#"could not parse "99999999999999999999" as integer"#],
    );
}

#[test]
fn test_invalid_parameter() {
    let (_, errors) = Parser::from_source("fn(1) {}").parse();
    assert_eq!(
        errors.first().map(|e| e.kind.clone()),
        Some(ParserErrorKind::UnexpectedToken {
            actual: TokenKind::IntegerLiteral,
            expected: TokenKind::Ident,
        })
    );
}

#[test]
fn test_error_span() {
    let (_, errors) = Parser::from_source("let x 5;").parse();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].span, Span::new(6, 1));
    assert_eq!(errors[0].code(), "SY001");
}

/// A token source that replays a fixed list of tokens.
struct ReplaySource {
    tokens: std::vec::IntoIter<Token>,
}

impl TokenSource for ReplaySource {
    fn next_token(&mut self) -> Token {
        self.tokens
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", Span::default()))
    }
}

#[test]
fn test_parser_over_custom_token_source() {
    let tokens = [
        (TokenKind::Ident, "a"),
        (TokenKind::Plus, "+"),
        (TokenKind::IntegerLiteral, "1"),
        (TokenKind::Star, "*"),
        (TokenKind::Ident, "b"),
    ]
    .into_iter()
    .map(|(kind, literal)| Token::new(kind, literal, Span::default()))
    .collect::<Vec<_>>();
    let source = ReplaySource {
        tokens: tokens.into_iter(),
    };
    let (program, errors) = Parser::new(source).parse();
    assert!(errors.is_empty());
    assert_eq!(program.to_string(), "(a + (1 * b))");
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/parser/in");
    let output_dir = Path::new("./test_data/parser/out");

    let mut failures = Vec::new();
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let path = entry?.path();
        if path.extension().and_then(|extension| extension.to_str()) != Some("monk") {
            continue;
        }
        let Some(test_name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let input = read_to_string(&path).context("Failed to open input test data file")?;
        let expected = read_to_string(output_dir.join(format!("{test_name}.txt")))
            .context("Failed to open output test data file")?;

        let (program, errors) = Parser::from_source(&input).parse();
        let actual = if errors.is_empty() {
            program.to_string()
        } else {
            BasicParserFormatter {}.format_errors(&errors)
        };
        if actual.trim_end() != expected.trim_end() {
            eprintln!("Failed the test {test_name}:\n{actual}\n!=\n{expected}");
            failures.push(test_name);
        }
    }

    assert!(failures.is_empty(), "Failed tests: {failures:?}");
    Ok(())
}

// Property-based tests

fn expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0..1_000_000i64).prop_map(|v| v.to_string()),
        "[a-z][a-z_]{0,6}"
            .prop_filter("keywords are not identifiers", |s| {
                !["fn", "let", "true", "false", "if", "else", "return"].contains(&s.as_str())
            }),
        prop_oneof![Just("true".to_string()), Just("false".to_string())],
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop_oneof![
                    Just("+"),
                    Just("-"),
                    Just("*"),
                    Just("/"),
                    Just("<"),
                    Just(">"),
                    Just("=="),
                    Just("!=")
                ],
                inner.clone()
            )
                .prop_map(|(lhs, op, rhs)| format!("{lhs} {op} {rhs}")),
            (prop_oneof![Just("!"), Just("-")], inner.clone())
                .prop_map(|(op, operand)| format!("{op}{operand}")),
            inner.clone().prop_map(|e| format!("({e})")),
            ("[a-z]{1,4}", prop::collection::vec(inner, 0..3))
                .prop_filter("keywords are not identifiers", |(callee, _)| {
                    !["fn", "let", "if", "else"].contains(&callee.as_str())
                })
                .prop_map(|(callee, args)| format!("{callee}({})", args.join(", "))),
        ]
    })
}

proptest! {
    #[test]
    fn canonical_rendering_reparses_to_itself(input in expression_strategy()) {
        let (program, errors) = Parser::from_source(&input).parse();
        prop_assert!(errors.is_empty(), "{:?}", errors);
        let rendered = program.to_string();

        let (reparsed, errors) = Parser::from_source(&rendered).parse();
        prop_assert!(errors.is_empty(), "{:?}", errors);
        prop_assert_eq!(reparsed.to_string(), rendered);
    }
}
