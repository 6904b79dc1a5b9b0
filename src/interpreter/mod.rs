use std::fmt;

use log::{error as log_error, info};

use crate::environment::{Environment, Value};
use crate::lexer::{format_number, Token, TokenType};
use crate::parser::{Expr, Stmt};
use crate::utils::runtime_error as report_runtime_error;

/// A runtime error: a type mismatch in an operator or a read/assign of an
/// undeclared variable. Carries the offending token so callers (tests,
/// logging) can inspect the source line even though the user-facing
/// rendering (`Display`) is just the bare message, with no line prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: Token, message: impl Into<String>) -> Self {
        Self {
            token,
            message: message.into(),
        }
    }

    pub fn undefined_variable(name: &Token) -> Self {
        Self::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme))
    }

    fn operands_must_be_numbers(op: &Token) -> Self {
        Self::new(op.clone(), "Operands must be numbers.")
    }

    fn operand_must_be_a_number(op: &Token) -> Self {
        Self::new(op.clone(), "Operand must be a number.")
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Walks statements and expressions against a lexically scoped environment
/// chain, producing `print` side effects and propagating the first runtime
/// error it hits. Execution is depth-first and single-threaded throughout;
/// there is no suspension point and no shared state beyond `self.env`.
pub struct Interpreter {
    env: Environment,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Executes every statement in order, stopping at the first runtime
    /// error. Statements after the failure point are never reached, but any
    /// `print` output already produced remains observable.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        info!("executing {} top-level statement(s)", statements.len());
        for stmt in statements {
            if let Err(err) = self.execute(stmt) {
                log_error!("runtime error: {}", err.message);
                report_runtime_error(&err.message);
                return Err(err);
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                println!("{}", stringify(&value));
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = self.evaluate(initializer)?;
                self.env.define(name.lexeme.clone(), value);
                Ok(())
            }
            Stmt::Block(statements) => self.execute_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while is_truthy(&self.evaluate(condition)?) {
                    self.execute(body)?;
                }
                Ok(())
            }
        }
    }

    /// Creates a child environment for the block, executes its statements,
    /// and restores the enclosing environment unconditionally — even when a
    /// statement inside the block returns a runtime error.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        let previous = std::mem::take(&mut self.env);
        self.env = previous.child();

        let result = (|| {
            for stmt in statements {
                self.execute(stmt)?;
            }
            Ok(())
        })();

        let child = std::mem::take(&mut self.env);
        self.env = child.into_enclosing();
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Variable { name } => self.env.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.env.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Grouping { inner } => self.evaluate(inner),
            Expr::Unary { op, right } => self.evaluate_unary(op, right),
            Expr::Binary { left, op, right } => self.evaluate_binary(left, op, right),
            Expr::Logical { left, op, right } => self.evaluate_logical(left, op, right),
        }
    }

    fn evaluate_unary(&mut self, op: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        let right = self.evaluate(right)?;
        match op.token_type {
            TokenType::Minus => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::operand_must_be_a_number(op)),
            },
            TokenType::Bang => Ok(Value::Bool(!is_truthy(&right))),
            _ => unreachable!("parser only produces Bang/Minus unary operators"),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        // Both operands are evaluated before any type check, so `+`'s type
        // error fires only after both sides have run (no short-circuiting
        // for non-logical binary operators).
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match op.token_type {
            TokenType::Greater => number_cmp(op, &left, &right, |a, b| a > b),
            TokenType::GreaterEqual => number_cmp(op, &left, &right, |a, b| a >= b),
            TokenType::Less => number_cmp(op, &left, &right, |a, b| a < b),
            TokenType::LessEqual => number_cmp(op, &left, &right, |a, b| a <= b),
            TokenType::EqualEqual => Ok(Value::Bool(is_equal(&left, &right))),
            TokenType::BangEqual => Ok(Value::Bool(!is_equal(&left, &right))),
            TokenType::Minus => number_op(op, &left, &right, |a, b| a - b),
            TokenType::Slash => number_op(op, &left, &right, |a, b| a / b),
            TokenType::Star => number_op(op, &left, &right, |a, b| a * b),
            TokenType::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
                _ => Err(RuntimeError::operands_must_be_numbers(op)),
            },
            _ => unreachable!("parser only produces binary-operator tokens here"),
        }
    }

    fn evaluate_logical(&mut self, left: &Expr, op: &Token, right: &Expr) -> Result<Value, RuntimeError> {
        let left = self.evaluate(left)?;
        match op.token_type {
            TokenType::Or if is_truthy(&left) => Ok(left),
            TokenType::And if !is_truthy(&left) => Ok(left),
            TokenType::Or | TokenType::And => self.evaluate(right),
            _ => unreachable!("parser only produces And/Or logical operators"),
        }
    }
}

fn number_op(op: &Token, left: &Value, right: &Value, f: impl Fn(f64, f64) -> f64) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(f(*a, *b))),
        _ => Err(RuntimeError::operands_must_be_numbers(op)),
    }
}

fn number_cmp(op: &Token, left: &Value, right: &Value, f: impl Fn(f64, f64) -> bool) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(f(*a, *b))),
        _ => Err(RuntimeError::operands_must_be_numbers(op)),
    }
}

/// `nil` and `false` are falsy; everything else (including `0`, `0.0`, and
/// `""`) is truthy.
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Nil | Value::Bool(false))
}

/// `==`/`!=`: same-kind comparison, any cross-kind pair is unequal (no
/// implicit coercion).
fn is_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => false,
    }
}

/// Renders a value the way `print` and the `run` command's output do:
/// integer-valued numbers with no trailing decimals, other numbers with 15
/// significant digits, booleans as `true`/`false`, `nil` as `nil`, strings
/// with no surrounding quotes.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n, false),
        Value::String(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;

    fn run(src: &str) -> Result<(), RuntimeError> {
        let (tokens, had_scan_error) = Scanner::new(src.to_string()).scan_tokens();
        assert!(!had_scan_error, "source failed to scan: {src}");
        let (stmts, had_parse_error) = Parser::new(tokens).parse();
        assert!(!had_parse_error, "source failed to parse: {src}");
        Interpreter::new().interpret(&stmts)
    }

    #[test]
    fn arithmetic_and_print() {
        assert!(run("print 1 + 2;").is_ok());
    }

    #[test]
    fn string_concatenation() {
        assert!(run(r#"var a = "hi"; var b = " there"; print a + b;"#).is_ok());
    }

    #[test]
    fn while_loop_counts_up() {
        assert!(run("var i = 0; while (i < 3) { print i; i = i + 1; }").is_ok());
    }

    #[test]
    fn if_else_picks_branch() {
        assert!(run(r#"if (true) print "y"; else print "n";"#).is_ok());
    }

    #[test]
    fn unary_minus_on_string_is_a_runtime_error() {
        let err = run(r#"print -"x";"#).unwrap_err();
        assert_eq!(err.message, "Operand must be a number.");
    }

    #[test]
    fn reading_undefined_variable_is_a_runtime_error() {
        let err = run("print undef;").unwrap_err();
        assert_eq!(err.message, "Undefined variable 'undef'.");
    }

    #[test]
    fn nested_block_shadows_then_restores_outer_binding() {
        // can't observe prints directly here, but shadowing must not error
        // and the outer binding must survive the inner block's exit.
        assert!(run("{ var x = 1; { var x = 2; print x; } print x; }").is_ok());
    }

    #[test]
    fn logical_or_short_circuits_and_returns_operand() {
        assert!(run("print nil or 3; print false and 4;").is_ok());
    }

    #[test]
    fn division_by_zero_is_infinity_not_an_error() {
        assert!(run("print 1/0;").is_ok());
    }

    #[test]
    fn block_restores_environment_even_after_runtime_error() {
        let mut interpreter = Interpreter::new();
        interpreter.env.define("outer", Value::Number(1.0));
        let (tokens, _) = Scanner::new("{ var inner = 1; print undef; }".to_string()).scan_tokens();
        let (stmts, _) = Parser::new(tokens).parse();
        assert!(interpreter.interpret(&stmts).is_err());
        // the outer binding must still be visible: the child environment
        // was torn down even though the block body errored.
        assert_eq!(interpreter.env.get(&Token::new(
            TokenType::Identifier,
            "outer".to_string(),
            crate::lexer::Literal::Nil,
            1,
        )).unwrap(), Value::Number(1.0));
    }
}
