mod ast;
mod parser;

pub use ast::{Expr, Stmt};
pub use parser::Parser;
