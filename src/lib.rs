pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runner;
pub mod utils;

pub use environment::Environment;
pub use interpreter::{Interpreter, RuntimeError};
pub use lexer::{Literal, Scanner, Token, TokenType};
pub use parser::{Expr, Parser, Stmt};
