//! Lexical scope chain

use rustc_hash::FxHashMap;

use super::value::Value;

/// Stack of scopes, innermost last. The first scope is the program scope and
/// is never popped.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<FxHashMap<String, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        debug_assert!(self.scopes.len() > 1, "popped the program scope");
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the innermost scope, replacing any binding of the same name there
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), value);
        }
    }

    /// Look `name` up from the innermost scope outwards
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1));
        env.push_scope();
        env.define("x", Value::Number(2));
        assert_eq!(env.get("x"), Some(&Value::Number(2)));
        env.pop_scope();
        assert_eq!(env.get("x"), Some(&Value::Number(1)));
    }

    #[test]
    fn test_define_overwrites_same_scope() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1));
        env.define("x", Value::from("one"));
        assert_eq!(env.get("x"), Some(&Value::from("one")));
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_outer_visible_from_inner() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1));
        env.push_scope();
        assert_eq!(env.get("x"), Some(&Value::Number(1)));
        assert_eq!(env.get("y"), None);
    }
}
