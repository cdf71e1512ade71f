pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod value;
