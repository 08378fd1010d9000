use std::collections::{BTreeSet, HashMap};

use num_bigint::BigUint;

use crate::error::Result;
use crate::eval::Assignment;
use crate::mtbdd::Mtbdd;
use crate::node::Node;
use crate::reference::NodeId;
use crate::types::Var;
use crate::value::Value;

impl Mtbdd {
    /// Variables `f` depends on, ordered by level.
    pub fn support_vars(&self, f: NodeId) -> Result<Vec<Var>> {
        let mut vars = BTreeSet::new();
        for id in self.descendants([f])? {
            if let Some(var) = self.node(id)?.var() {
                vars.insert(var);
            }
        }
        Ok(vars.into_iter().collect())
    }

    /// Names of the variables `f` depends on, ordered by level.
    pub fn support(&self, f: NodeId) -> Result<Vec<String>> {
        Ok(self
            .support_vars(f)?
            .into_iter()
            .map(|var| self.registry.name_of(var).map_or_else(|| var.to_string(), str::to_string))
            .collect())
    }

    /// Distinct terminal values reachable from `f`, ordered by terminal handle.
    pub fn terminal_values(&self, f: NodeId) -> Result<Vec<Value>> {
        let mut terminals = Vec::new();
        for id in self.descendants([f])? {
            if let Some(value) = self.node(id)?.value() {
                terminals.push((id, value));
            }
        }
        terminals.sort_unstable_by_key(|&(id, _)| id);
        Ok(terminals.into_iter().map(|(_, value)| value).collect())
    }

    /// Returns one satisfying assignment of a boolean function, if any exists.
    ///
    /// Only the variables on the chosen path are bound.
    pub fn one_sat(&self, f: NodeId) -> Result<Option<Assignment>> {
        self.expect_boolean("ONE_SAT", f)?;
        if self.is_zero(f) {
            return Ok(None);
        }

        let mut path = Assignment::new();
        let mut current = f;

        // Every non-false node of a boolean function has a path to true.
        while let Node::Internal { var, low, high, .. } = *self.node(current)? {
            let name = self.registry.name_of(var).map_or_else(|| var.to_string(), str::to_string);
            if !self.is_zero(high) {
                path.set(name, true);
                current = high;
            } else {
                path.set(name, false);
                current = low;
            }
        }

        Ok(Some(path))
    }

    /// Number of assignments to all declared variables under which the
    /// boolean function `f` is true.
    pub fn sat_count(&self, f: NodeId) -> Result<BigUint> {
        self.expect_boolean("SAT_COUNT", f)?;
        let max = BigUint::from(1u32) << self.registry.len();
        let mut cache = HashMap::new();
        self.sat_count_(f, &max, &mut cache)
    }

    fn sat_count_(&self, f: NodeId, max: &BigUint, cache: &mut HashMap<NodeId, BigUint>) -> Result<BigUint> {
        if self.is_zero(f) {
            return Ok(BigUint::ZERO);
        } else if self.is_one(f) {
            return Ok(max.clone());
        }

        if let Some(count) = cache.get(&f) {
            return Ok(count.clone());
        }

        let low = self.low(f)?;
        let high = self.high(f)?;

        let count_low = self.sat_count_(low, max, cache)?;
        let count_high = self.sat_count_(high, max, cache)?;
        let count: BigUint = (count_low + count_high) >> 1;

        cache.insert(f, count.clone());
        Ok(count)
    }
}
