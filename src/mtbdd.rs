//! The MTBDD manager.
//!
//! All operations go through [`Mtbdd`], which owns:
//!
//! - the [variable registry][crate::registry::VariableRegistry] (names and fixed levels);
//! - the [node store][crate::store::NodeStore] (arena + unique tables, the source of canonicity);
//! - the [operation cache][crate::cache::OpCache];
//! - the set of retained roots used by [garbage collection][crate::gc].
//!
//! Operations that may create nodes take `&mut self`; pure reads take `&self`.
//! To share a manager between threads see [`SharedMtbdd`][crate::shared::SharedMtbdd].
//!
//! # Example
//!
//! ```
//! use mtbdd::mtbdd::Mtbdd;
//! use mtbdd::value::Value;
//!
//! let mut mgr = Mtbdd::new();
//! mgr.declare(["x", "y"]).unwrap();
//! let x = mgr.var("x").unwrap();
//! let y = mgr.var("y").unwrap();
//! let f = mgr.apply_and(x, y).unwrap();
//!
//! let price = mgr.constant(100);
//! let zero = mgr.constant(0);
//! let p = mgr.ite(f, price, zero).unwrap();
//! assert_eq!(mgr.terminal_value(p), None);
//! assert_eq!(mgr.evaluate(p, &[("x", true), ("y", true)].into()).unwrap(), Value::Int(100));
//! ```
//!
//! # Performance
//!
//! Decision diagrams can grow exponentially in the number of variables for
//! adversarial functions. Every operation is nevertheless total and
//! deterministic.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use crate::cache::OpCache;
use crate::error::{invariant_violation, MtbddError, Result};
use crate::node::Node;
use crate::reference::NodeId;
use crate::registry::VariableRegistry;
use crate::store::NodeStore;
use crate::types::{Level, Var};
use crate::value::Value;

/// Sizing of a manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MtbddConfig {
    /// Initial number of node slots.
    pub node_capacity: usize,
    /// Maximum number of operation cache entries; a full cache is flushed.
    pub cache_capacity: usize,
}

impl Default for MtbddConfig {
    fn default() -> Self {
        Self {
            node_capacity: 1 << 12,
            cache_capacity: 1 << 16,
        }
    }
}

/// Observability snapshot, see [`Mtbdd::memory_stats`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MemoryStats {
    pub total_nodes: usize,
    pub variable_count: usize,
    pub cache_size: usize,
    pub root_count: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

pub struct Mtbdd {
    pub(crate) registry: VariableRegistry,
    pub(crate) store: NodeStore,
    pub(crate) cache: OpCache,
    /// Retained roots with their reference counts.
    pub(crate) roots: HashMap<NodeId, usize>,
}

impl Mtbdd {
    pub fn new() -> Self {
        Self::with_config(MtbddConfig::default())
    }

    pub fn with_config(config: MtbddConfig) -> Self {
        Self {
            registry: VariableRegistry::new(),
            store: NodeStore::new(config.node_capacity),
            cache: OpCache::new(config.cache_capacity),
            roots: HashMap::new(),
        }
    }
}

impl Default for Mtbdd {
    fn default() -> Self {
        Mtbdd::new()
    }
}

impl Debug for Mtbdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mtbdd")
            .field("variables", &self.registry.len())
            .field("nodes", &self.store.len())
            .field("capacity", &self.store.capacity())
            .field("cache", &self.cache.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}

// Declaration
impl Mtbdd {
    /// Declares variables in order. Already-known names are skipped.
    pub fn declare<I, S>(&mut self, names: I) -> Result<Vec<Var>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.registry.declare(name.as_ref()))
            .collect()
    }

    pub fn declare_var(&mut self, name: &str) -> Result<Var> {
        self.registry.declare(name)
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn variable_count(&self) -> usize {
        self.registry.len()
    }

    pub fn level_of(&self, name: &str) -> Result<Level> {
        self.registry.level_of(name)
    }

    pub fn name_of(&self, var: Var) -> Option<&str> {
        self.registry.name_of(var)
    }

    /// The single-variable function testing `name` directly.
    pub fn var(&mut self, name: &str) -> Result<NodeId> {
        let var = self.registry.var_of(name)?;
        self.mk_var(var)
    }

    pub fn mk_var(&mut self, var: Var) -> Result<NodeId> {
        self.mk_node(var, NodeId::FALSE, NodeId::TRUE)
    }
}

// Construction
impl Mtbdd {
    pub fn zero(&self) -> NodeId {
        NodeId::FALSE
    }

    pub fn one(&self) -> NodeId {
        NodeId::TRUE
    }

    /// Returns the terminal holding `value`.
    pub fn constant(&mut self, value: impl Into<Value>) -> NodeId {
        self.store.mk_terminal(value.into())
    }

    /// Returns the node "if `var` then `high` else `low`", applying the
    /// reduction rule when `low == high`.
    pub fn mk_node(&mut self, var: Var, low: NodeId, high: NodeId) -> Result<NodeId> {
        if var.id() as usize >= self.registry.len() {
            return Err(MtbddError::VariableNotDeclared(var.to_string()));
        }
        self.store.mk_node(var, low, high)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.store.node(id)
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.store.is_live(id)
    }

    pub fn is_zero(&self, id: NodeId) -> bool {
        id == NodeId::FALSE
    }

    pub fn is_one(&self, id: NodeId) -> bool {
        id == NodeId::TRUE
    }

    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.store.get(id).is_some_and(Node::is_terminal)
    }

    /// Value of a terminal, or `None` for internal and invalid handles.
    pub fn terminal_value(&self, id: NodeId) -> Option<Value> {
        self.store.get(id).and_then(Node::value)
    }

    /// Whether every terminal reachable from `id` is boolean.
    pub fn is_boolean(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.is_boolean())
    }

    pub fn variable(&self, id: NodeId) -> Result<Option<Var>> {
        Ok(self.node(id)?.var())
    }

    pub fn level(&self, id: NodeId) -> Result<Level> {
        Ok(self.node(id)?.level())
    }

    pub fn low(&self, id: NodeId) -> Result<NodeId> {
        self.children(id).map(|(low, _)| low)
    }

    pub fn high(&self, id: NodeId) -> Result<NodeId> {
        self.children(id).map(|(_, high)| high)
    }

    fn children(&self, id: NodeId) -> Result<(NodeId, NodeId)> {
        self.node(id)?.children().ok_or_else(|| {
            MtbddError::UnsupportedOperation(format!("{} is a terminal and has no children", id))
        })
    }

    /// Cofactors of `node` with respect to the variable at `level`.
    ///
    /// If `node` does not test that variable at its top, it is returned for
    /// both cofactors.
    pub fn top_cofactors(&self, node: NodeId, level: Level) -> Result<(NodeId, NodeId)> {
        match *self.node(node)? {
            Node::Internal { level: l, low, high, .. } if l == level => Ok((low, high)),
            Node::Internal { level: l, .. } if l < level => Err(invariant_violation(format!(
                "cofactor on {} requested below the top {} of {}",
                level, l, node
            ))),
            _ => Ok((node, node)),
        }
    }

    /// Minimum level among the top variables of the given nodes.
    pub(crate) fn top_level(&self, nodes: &[NodeId]) -> Result<Level> {
        let mut m = Level::TERMINAL;
        for &n in nodes {
            m = m.min(self.level(n)?);
        }
        Ok(m)
    }
}

// Observability
impl Mtbdd {
    pub fn memory_stats(&self) -> MemoryStats {
        MemoryStats {
            total_nodes: self.store.len(),
            variable_count: self.registry.len(),
            cache_size: self.cache.len(),
            root_count: self.roots.len(),
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
        }
    }

    /// All nodes reachable from `nodes`, including terminals.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = NodeId>) -> Result<HashSet<NodeId>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) {
                if let Some((low, high)) = self.node(node)?.children() {
                    queue.push_back(low);
                    queue.push_back(high);
                }
            }
        }

        Ok(visited)
    }

    /// Number of nodes reachable from `f`, terminals included.
    pub fn size(&self, f: NodeId) -> Result<usize> {
        Ok(self.descendants([f])?.len())
    }

    pub fn to_bracket_string(&self, node: NodeId) -> String {
        match self.store.get(node) {
            None => format!("{}:(invalid)", node),
            Some(Node::Terminal { value }) => format!("({})", value),
            Some(&Node::Internal { var, low, high, .. }) => {
                let name = self.registry.name_of(var).map_or_else(|| var.to_string(), str::to_string);
                format!(
                    "{}:({}, {}, {})",
                    node,
                    name,
                    self.to_bracket_string(high),
                    self.to_bracket_string(low)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x"]).unwrap();
        let x = mgr.var("x").unwrap();

        assert_eq!(mgr.variable(x).unwrap(), Some(Var::new(0)));
        assert_eq!(mgr.high(x).unwrap(), mgr.one());
        assert_eq!(mgr.low(x).unwrap(), mgr.zero());
        assert_eq!(mgr.var("x").unwrap(), x);
    }

    #[test]
    fn test_var_undeclared() {
        let mut mgr = Mtbdd::new();
        assert_eq!(
            mgr.var("x"),
            Err(MtbddError::VariableNotDeclared("x".to_string()))
        );
        assert_eq!(
            mgr.mk_node(Var::new(0), NodeId::FALSE, NodeId::TRUE),
            Err(MtbddError::VariableNotDeclared("x0".to_string()))
        );
    }

    #[test]
    fn test_declare_idempotent() {
        let mut mgr = Mtbdd::new();
        let vars = mgr.declare(["a", "b", "a"]).unwrap();
        assert_eq!(vars, vec![Var::new(0), Var::new(1), Var::new(0)]);
        assert_eq!(mgr.variable_count(), 2);
        assert_eq!(mgr.level_of("b"), Ok(Level::new(1)));
    }

    #[test]
    fn test_terminal() {
        let mut mgr = Mtbdd::new();

        assert!(mgr.is_terminal(mgr.zero()));
        assert!(mgr.is_zero(mgr.zero()));
        assert!(!mgr.is_one(mgr.zero()));
        assert!(mgr.is_terminal(mgr.one()));
        assert_eq!(mgr.terminal_value(mgr.one()), Some(Value::Bool(true)));

        let c = mgr.constant(42);
        assert!(mgr.is_terminal(c));
        assert_eq!(mgr.terminal_value(c), Some(Value::Int(42)));
        assert_eq!(mgr.constant(42.0), c);
        assert_eq!(mgr.constant(true), mgr.one());
        assert!(!mgr.is_terminal(NodeId::NULL));
        assert_eq!(mgr.terminal_value(NodeId::NULL), None);
    }

    #[test]
    fn test_mk_node_reduction() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x"]).unwrap();
        let c = mgr.constant(3);
        assert_eq!(mgr.mk_node(Var::new(0), c, c), Ok(c));
    }

    #[test]
    fn test_top_cofactors() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x", "y"]).unwrap();
        let x = mgr.var("x").unwrap();
        let y = mgr.var("y").unwrap();
        assert_eq!(mgr.top_cofactors(x, Level::new(0)), Ok((mgr.zero(), mgr.one())));
        assert_eq!(mgr.top_cofactors(y, Level::new(0)), Ok((y, y)));
        assert_eq!(mgr.top_cofactors(mgr.one(), Level::new(0)), Ok((mgr.one(), mgr.one())));
    }

    #[test]
    fn test_size_and_stats() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x", "y"]).unwrap();
        let x = mgr.var("x").unwrap();
        let y = mgr.var("y").unwrap();
        let f = mgr.apply_and(x, y).unwrap();
        assert_eq!(mgr.size(f).unwrap(), 4);

        let stats = mgr.memory_stats();
        assert_eq!(stats.variable_count, 2);
        assert!(stats.total_nodes >= 5);
        assert!(stats.cache_size >= 1);
    }

    #[test]
    fn test_bracket_string() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x"]).unwrap();
        let x = mgr.var("x").unwrap();
        let ten = mgr.constant(10);
        let f = mgr.ite(x, ten, mgr.zero()).unwrap();
        assert_eq!(mgr.to_bracket_string(f), format!("{}:(x, (10), (false))", f));
    }

    #[test]
    fn test_tiny_cache_gives_same_functions() {
        use crate::eval::Assignment;

        let names = ["a", "b", "c", "d"];
        let build = |config: MtbddConfig| {
            let mut mgr = Mtbdd::with_config(config);
            mgr.declare(names).unwrap();
            let mut price = mgr.constant(0);
            for (i, name) in names.iter().enumerate() {
                let v = mgr.var(name).unwrap();
                let cost = mgr.constant(10 * (i as i64 + 1));
                let term = mgr.ite(v, cost, mgr.zero()).unwrap();
                price = mgr.apply_add(price, term).unwrap();
            }
            let expensive = mgr.threshold(price, 50).unwrap();
            (mgr, price, expensive)
        };

        let (big, price, expensive) = build(MtbddConfig::default());
        let (small, small_price, small_expensive) = build(MtbddConfig {
            node_capacity: 2,
            cache_capacity: 3,
        });
        assert!(small.memory_stats().cache_size <= 3);
        assert_eq!(small.size(small_price).unwrap(), big.size(price).unwrap());
        assert_eq!(small.size(small_expensive).unwrap(), big.size(expensive).unwrap());
        for bits in 0..16u32 {
            let asg: Assignment = names.iter().enumerate().map(|(i, &n)| (n, bits >> i & 1 == 1)).collect();
            assert_eq!(small.evaluate(small_price, &asg), big.evaluate(price, &asg));
            assert_eq!(small.evaluate(small_expensive, &asg), big.evaluate(expensive, &asg));
        }
    }
}
