use std::collections::HashMap;
use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Undefined variable '{0}'.")]
pub struct UndefinedVariable(pub String);

/// Handle to a scope inside [`Environments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// One scope: its own bindings plus the id of the scope that encloses it.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<ScopeId>,
}

/// Arena of scopes. Index 0 is the global scope and lives as long as the
/// arena; block scopes are pushed on entry and released on exit, so the
/// arena always holds exactly the chain of scopes currently alive.
#[derive(Debug, Clone)]
pub struct Environments {
    scopes: Vec<Environment>,
}

impl Default for Environments {
    fn default() -> Self {
        Self::new()
    }
}

impl Environments {
    pub fn new() -> Self {
        Self {
            scopes: vec![Environment::default()],
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Number of live scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push(&mut self, enclosing: ScopeId) -> ScopeId {
        self.scopes.push(Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        });
        ScopeId(self.scopes.len() - 1)
    }

    /// Releases `scope` and every scope created after it. The global scope is never released.
    pub fn pop(&mut self, scope: ScopeId) {
        if scope.0 > 0 {
            self.scopes.truncate(scope.0);
        }
    }

    /// Binds `name` in `scope` itself, shadowing any outer binding.
    pub fn define(&mut self, scope: ScopeId, name: &str, value: Value) {
        self.scopes[scope.0].values.insert(name.to_string(), value);
    }

    pub fn get(&self, scope: ScopeId, name: &str) -> Result<&Value, UndefinedVariable> {
        let mut next = Some(scope);
        while let Some(id) = next {
            let environment = &self.scopes[id.0];
            if let Some(value) = environment.values.get(name) {
                return Ok(value);
            }
            next = environment.enclosing;
        }
        Err(UndefinedVariable(name.to_string()))
    }

    /// Overwrites the binding in the nearest scope that declares `name`.
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) -> Result<(), UndefinedVariable> {
        let mut next = Some(scope);
        while let Some(id) = next {
            let environment = &mut self.scopes[id.0];
            if let Some(slot) = environment.values.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            next = environment.enclosing;
        }
        Err(UndefinedVariable(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let mut envs = Environments::new();
        let global = envs.global();
        envs.define(global, "a", Value::Number(1.0));

        let inner = envs.push(global);
        let innermost = envs.push(inner);
        assert_eq!(envs.get(innermost, "a"), Ok(&Value::Number(1.0)));
    }

    #[test]
    fn define_shadows_outer_binding() {
        let mut envs = Environments::new();
        let global = envs.global();
        envs.define(global, "a", Value::Number(1.0));

        let inner = envs.push(global);
        envs.define(inner, "a", Value::Number(2.0));
        assert_eq!(envs.get(inner, "a"), Ok(&Value::Number(2.0)));
        assert_eq!(envs.get(global, "a"), Ok(&Value::Number(1.0)));
    }

    #[test]
    fn assign_updates_declaring_scope() {
        let mut envs = Environments::new();
        let global = envs.global();
        envs.define(global, "a", Value::Number(1.0));

        let inner = envs.push(global);
        envs.assign(inner, "a", Value::Bool(true)).unwrap();
        envs.pop(inner);
        assert_eq!(envs.get(global, "a"), Ok(&Value::Bool(true)));
    }

    #[test]
    fn missing_names_fail() {
        let mut envs = Environments::new();
        let global = envs.global();
        let inner = envs.push(global);

        assert_eq!(envs.get(inner, "nope"), Err(UndefinedVariable("nope".to_string())));
        assert_eq!(
            envs.assign(inner, "nope", Value::Nil).unwrap_err().to_string(),
            "Undefined variable 'nope'."
        );
    }

    #[test]
    fn pop_releases_nested_scopes() {
        let mut envs = Environments::new();
        let global = envs.global();
        let inner = envs.push(global);
        let _innermost = envs.push(inner);
        assert_eq!(envs.depth(), 3);

        envs.pop(inner);
        assert_eq!(envs.depth(), 1);

        envs.pop(global);
        assert_eq!(envs.depth(), 1);
    }
}
