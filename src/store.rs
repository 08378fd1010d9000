//! Node store: the node arena and its unique tables.
//!
//! Nodes live in a `Vec` indexed by [`NodeId`]. Two hash maps make the
//! storage *hash-consed*:
//!
//! ```text
//! internal:  (var, low, high) -> NodeId
//! terminals: value            -> NodeId
//! ```
//!
//! Every node is created through [`NodeStore::mk_terminal`] or
//! [`NodeStore::mk_node`], which consult these maps first. This is the only
//! place canonicity is established: two handles denote the same function iff
//! they are equal.
//!
//! Slots freed by garbage collection are reused by later allocations, lowest
//! index first.

use std::collections::HashMap;

use log::debug;

use crate::error::{invariant_violation, MtbddError, Result};
use crate::node::Node;
use crate::reference::NodeId;
use crate::types::Var;
use crate::value::Value;

pub struct NodeStore {
    slots: Vec<Option<Node>>,
    internal: HashMap<(Var, NodeId, NodeId), NodeId>,
    terminals: HashMap<Value, NodeId>,
    /// Index of the first *possibly* free slot.
    min_free: usize,
    /// Number of occupied slots.
    real_size: usize,
}

impl NodeStore {
    /// Creates a store pre-allocated for `capacity` nodes, holding the two
    /// boolean terminals at [`NodeId::FALSE`] and [`NodeId::TRUE`].
    pub fn new(capacity: usize) -> Self {
        let mut store = Self {
            slots: Vec::with_capacity(capacity.max(2)),
            internal: HashMap::with_capacity(capacity),
            terminals: HashMap::new(),
            min_free: 0,
            real_size: 0,
        };
        let zero = store.alloc(Node::Terminal { value: Value::Bool(false) });
        let one = store.alloc(Node::Terminal { value: Value::Bool(true) });
        assert_eq!(zero, NodeId::FALSE);
        assert_eq!(one, NodeId::TRUE);
        store.terminals.insert(Value::Bool(false), zero);
        store.terminals.insert(Value::Bool(true), one);
        store
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.real_size
    }

    pub fn is_empty(&self) -> bool {
        self.real_size == 0
    }

    /// Number of slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(MtbddError::InvalidHandle(id))
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over all live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId::new(i as u32), node)))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let index = (self.min_free..self.slots.len())
            .find(|&i| self.slots[i].is_none())
            .unwrap_or(self.slots.len());

        if index >= NodeId::NULL.index() {
            panic!("Storage is full");
        }

        if index == self.slots.len() {
            self.slots.push(Some(node));
        } else {
            self.slots[index] = Some(node);
        }
        self.min_free = index + 1;
        self.real_size += 1;

        NodeId::new(index as u32)
    }

    /// Returns the terminal holding `value`, creating it if needed.
    pub fn mk_terminal(&mut self, value: Value) -> NodeId {
        if let Some(&id) = self.terminals.get(&value) {
            return id;
        }
        let id = self.alloc(Node::Terminal { value });
        debug!("mk_terminal({}) -> new {}", value, id);
        self.terminals.insert(value, id);
        id
    }

    /// Returns the node "if `var` then `high` else `low`".
    ///
    /// If `low == high` the test is redundant and `low` is returned without
    /// creating anything.
    pub fn mk_node(&mut self, var: Var, low: NodeId, high: NodeId) -> Result<NodeId> {
        if low == high {
            self.node(low)?;
            return Ok(low);
        }

        if let Some(&id) = self.internal.get(&(var, low, high)) {
            return Ok(id);
        }

        let level = var.level();
        let low_node = *self.node(low)?;
        let high_node = *self.node(high)?;
        for child in [low_node, high_node] {
            if child.level() <= level {
                return Err(invariant_violation(format!(
                    "node on {} would have a child on {}",
                    level,
                    child.level()
                )));
            }
        }

        let id = self.alloc(Node::Internal {
            var,
            level,
            low,
            high,
            boolean: low_node.is_boolean() && high_node.is_boolean(),
        });
        debug!("mk_node(v = {}, low = {}, high = {}) -> new {}", var, low, high, id);
        self.internal.insert((var, low, high), id);
        Ok(id)
    }

    /// Removes a node, making its slot reusable.
    ///
    /// The boolean terminals are permanent and cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if id == NodeId::FALSE || id == NodeId::TRUE {
            return None;
        }
        let node = self.slots.get_mut(id.index())?.take()?;
        match node {
            Node::Terminal { value } => {
                self.terminals.remove(&value);
            }
            Node::Internal { var, low, high, .. } => {
                self.internal.remove(&(var, low, high));
            }
        }
        self.min_free = self.min_free.min(id.index());
        self.real_size -= 1;
        Some(node)
    }

    /// Shrinks trailing free slots; used after garbage collection.
    pub fn shrink(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        self.min_free = self.min_free.min(self.slots.len());
    }
}
