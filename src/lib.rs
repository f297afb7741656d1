// plox interpreter library
//
// Scanner, recursive-descent parser and tree-walking interpreter for a small
// dynamically-typed scripting language, plus the driver that runs them.

// Public modules
pub mod ast;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod repl;
pub mod runner;
pub mod scanner;
pub mod session;
pub mod stack;
pub mod token;
pub mod value;

// Re-export commonly used items
pub use ast::{Expr, Program, Stmt};
pub use error::{PloxError, Span};
pub use interpreter::Interpreter;
pub use parser::Parser;
pub use printer::AstPrinter;
pub use runner::RunOptions;
pub use scanner::Scanner;
pub use session::Session;
pub use token::{Token, TokenType};
pub use value::Value;

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
