//! Variable registry: declared names and their fixed levels.

use std::collections::HashMap;

use log::debug;

use crate::error::{MtbddError, Result};
use crate::types::{Level, Var};

/// Ordered list of declared variable names.
///
/// Levels are assigned in declaration order and never change.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    names: Vec<String>,
    levels: HashMap<String, Var>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a variable, returning its id.
    ///
    /// Re-declaring a known name returns the existing variable.
    pub fn declare(&mut self, name: &str) -> Result<Var> {
        if name.is_empty() {
            return Err(MtbddError::VariableNotDeclared(
                "variable names must not be empty".to_string(),
            ));
        }
        if let Some(&var) = self.levels.get(name) {
            return Ok(var);
        }
        let var = Var::new(self.names.len() as u32);
        debug!("declare({}) -> {}", name, var.level());
        self.names.push(name.to_string());
        self.levels.insert(name.to_string(), var);
        Ok(var)
    }

    pub fn lookup(&self, name: &str) -> Option<Var> {
        self.levels.get(name).copied()
    }

    pub fn var_of(&self, name: &str) -> Result<Var> {
        self.lookup(name)
            .ok_or_else(|| MtbddError::VariableNotDeclared(name.to_string()))
    }

    pub fn level_of(&self, name: &str) -> Result<Level> {
        self.var_of(name).map(Var::level)
    }

    pub fn name_at(&self, level: Level) -> Option<&str> {
        self.names.get(level.index()).map(String::as_str)
    }

    pub fn name_of(&self, var: Var) -> Option<&str> {
        self.name_at(var.level())
    }

    pub fn var_at(&self, level: Level) -> Option<Var> {
        (level.index() < self.names.len()).then(|| level.var())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Declared names in level order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_declare_assigns_levels_in_order() {
        let mut reg = VariableRegistry::new();
        let x = reg.declare("x").unwrap();
        let y = reg.declare("y").unwrap();
        assert_eq!(x.level(), Level::new(0));
        assert_eq!(y.level(), Level::new(1));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_declare_is_idempotent() {
        let mut reg = VariableRegistry::new();
        let x1 = reg.declare("x").unwrap();
        reg.declare("y").unwrap();
        let x2 = reg.declare("x").unwrap();
        assert_eq!(x1, x2);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_lookups() {
        let mut reg = VariableRegistry::new();
        reg.declare("a").unwrap();
        reg.declare("b").unwrap();
        assert_eq!(reg.level_of("b"), Ok(Level::new(1)));
        assert_eq!(reg.name_at(Level::new(0)), Some("a"));
        assert_eq!(reg.name_at(Level::new(2)), None);
        assert_eq!(reg.var_at(Level::new(1)), Some(Var::new(1)));
        assert_eq!(reg.var_at(Level::new(5)), None);
    }

    #[test]
    fn test_undeclared() {
        let reg = VariableRegistry::new();
        assert_eq!(
            reg.level_of("nope"),
            Err(MtbddError::VariableNotDeclared("nope".to_string()))
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut reg = VariableRegistry::new();
        assert!(reg.declare("").is_err());
        assert!(reg.is_empty());
    }
}
