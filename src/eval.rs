//! Evaluation of a diagram under a variable assignment.

use std::collections::HashMap;

use log::debug;

use crate::error::{MtbddError, Result};
use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::reference::NodeId;
use crate::types::Var;
use crate::value::Value;

/// Boolean values of (some of) the declared variables, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: HashMap<String, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: bool) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (S, bool)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(name, value)| (name.into(), value)).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[(S, bool); N]> for Assignment {
    fn from(pairs: [(S, bool); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Mtbdd {
    /// Follows the single path selected by `assignment` from `node` down to a
    /// terminal and returns its value.
    ///
    /// Only the variables tested along that path need a binding.
    pub fn evaluate(&self, node: NodeId, assignment: &Assignment) -> Result<Value> {
        debug!("evaluate(node = {}, assignment = {:?})", node, assignment);
        self.evaluate_with(node, |var| {
            let name = self.registry.name_of(var)?;
            assignment.get(name)
        })
    }

    /// Like [`Mtbdd::evaluate`], with bindings given by a lookup on variable ids.
    pub fn evaluate_with<F>(&self, node: NodeId, mut lookup: F) -> Result<Value>
    where
        F: FnMut(Var) -> Option<bool>,
    {
        let mut current = node;
        loop {
            match *self.node(current)? {
                Node::Terminal { value } => return Ok(value),
                Node::Internal { var, low, high, .. } => {
                    current = match lookup(var) {
                        Some(true) => high,
                        Some(false) => low,
                        None => {
                            let name = self
                                .registry
                                .name_of(var)
                                .map_or_else(|| var.to_string(), str::to_string);
                            return Err(MtbddError::InvalidAssignment(name));
                        }
                    };
                }
            }
        }
    }
}
