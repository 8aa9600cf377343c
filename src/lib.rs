pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod lox;
pub mod parser;
pub mod reporter;
pub mod resolver;
pub mod scanner;
pub mod stack;
pub mod stmt;
pub mod token;
pub mod value;
