use std::collections::HashMap;

use crate::interpreter::RuntimeError;
use crate::lexer::{Literal, Token};

/// `Literal` doubles as the runtime `Value` type: the same four-variant sum
/// works as both the token payload and the interpreter's datum, and every
/// variant is cheap to clone.
pub type Value = Literal;

/// A scope-local name→value mapping with an owned link to its enclosing
/// scope. Environments are created on block entry and dropped on block
/// exit (the `Box` makes that drop automatic and LIFO-ordered); the global
/// environment has no enclosing scope and lives for the whole run.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Box<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detaches `self` as the enclosing scope of a fresh child environment.
    pub fn child(self) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(Box::new(self)),
        }
    }

    /// Discards the innermost scope, returning its enclosing environment.
    /// Panics if called on the global environment — callers only invoke
    /// this after having entered a block with `child`.
    pub fn into_enclosing(self) -> Self {
        *self.enclosing.expect("environment has no enclosing scope")
    }

    /// Unconditionally writes `name -> value` in the current scope,
    /// shadowing any binding of the same name in an enclosing scope.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Looks up `name`, walking the enclosing chain to the global scope.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(parent) = &self.enclosing {
            return parent.get(name);
        }
        Err(RuntimeError::undefined_variable(name))
    }

    /// Writes `value` into the nearest scope (starting at the current one)
    /// that already declares `name`. Unlike `define`, this never creates a
    /// new binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }
        if let Some(parent) = &mut self.enclosing {
            return parent.assign(name, value);
        }
        Err(RuntimeError::undefined_variable(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenType;

    fn tok(name: &str) -> Token {
        Token::new(TokenType::Identifier, name.to_string(), Literal::Nil, 1)
    }

    #[test]
    fn define_then_get_round_trips() {
        let mut env = Environment::new();
        env.define("a", Value::Number(1.0));
        assert_eq!(env.get(&tok("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn get_missing_variable_is_a_runtime_error() {
        let env = Environment::new();
        assert!(env.get(&tok("missing")).is_err());
    }

    #[test]
    fn child_scope_sees_enclosing_bindings() {
        let mut global = Environment::new();
        global.define("a", Value::Number(1.0));
        let child = global.child();
        assert_eq!(child.get(&tok("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn define_in_child_shadows_without_mutating_parent() {
        let mut global = Environment::new();
        global.define("a", Value::Number(1.0));
        let mut child = global.child();
        child.define("a", Value::Number(2.0));
        assert_eq!(child.get(&tok("a")).unwrap(), Value::Number(2.0));

        let global = child.into_enclosing();
        assert_eq!(global.get(&tok("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_writes_into_nearest_declaring_scope() {
        let mut global = Environment::new();
        global.define("a", Value::Number(1.0));
        let mut child = global.child();
        child.assign(&tok("a"), Value::Number(9.0)).unwrap();

        let global = child.into_enclosing();
        assert_eq!(global.get(&tok("a")).unwrap(), Value::Number(9.0));
    }

    #[test]
    fn assign_to_undeclared_name_is_a_runtime_error() {
        let mut env = Environment::new();
        assert!(env.assign(&tok("missing"), Value::Nil).is_err());
    }
}
