//! Operation cache (computed table) for MTBDD combinators.
//!
//! Results of recursive combinators are memoized by `(opcode, operands)`.
//! Unused operand slots hold [`NodeId::NULL`]. The cache is backed by a
//! [`HashMap`], so there are no collisions. Once it holds `capacity` entries,
//! the next new entry flushes it.

use std::collections::HashMap;

use log::debug;

use crate::ops::{BinaryOp, UnaryOp};
use crate::reference::NodeId;

/// Opcode of a cached computation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpCode {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Ite,
    /// `f >= k`, where the second operand is the terminal holding `k`.
    Threshold,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CacheKey {
    pub op: OpCode,
    pub f: NodeId,
    pub g: NodeId,
    pub h: NodeId,
}

impl CacheKey {
    /// Key for a binary operation, normalizing operand order when `op` is commutative.
    pub fn binary(op: BinaryOp, f: NodeId, g: NodeId) -> Self {
        let (f, g) = if op.is_commutative() && g < f { (g, f) } else { (f, g) };
        Self {
            op: OpCode::Binary(op),
            f,
            g,
            h: NodeId::NULL,
        }
    }

    pub fn unary(op: UnaryOp, f: NodeId) -> Self {
        Self {
            op: OpCode::Unary(op),
            f,
            g: NodeId::NULL,
            h: NodeId::NULL,
        }
    }

    pub fn ite(f: NodeId, g: NodeId, h: NodeId) -> Self {
        Self { op: OpCode::Ite, f, g, h }
    }

    pub fn threshold(f: NodeId, constant: NodeId) -> Self {
        Self {
            op: OpCode::Threshold,
            f,
            g: constant,
            h: NodeId::NULL,
        }
    }
}

/// Computed table of the manager.
///
/// Holds at most `capacity` entries: inserting a new key into a full cache
/// first drops every entry.
pub struct OpCache {
    map: HashMap<CacheKey, NodeId>,
    capacity: usize,
    hits: usize,
    misses: usize,
}

impl Default for OpCache {
    fn default() -> Self {
        Self::new(1 << 14)
    }
}

impl OpCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            map: HashMap::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Maximum number of entries kept at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<NodeId> {
        match self.map.get(key) {
            Some(&value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, value: NodeId) {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            debug!("cache full ({} entries), clearing", self.map.len());
            self.map.clear();
        }
        self.map.insert(key, value);
    }

    /// Drops every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates over every handle mentioned by a cache entry (keys and results).
    pub fn handles(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.map
            .iter()
            .flat_map(|(key, &res)| [key.f, key.g, key.h, res])
            .filter(|id| !id.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commutative_key() {
        let a = NodeId::new(3);
        let b = NodeId::new(7);
        assert_eq!(CacheKey::binary(BinaryOp::And, a, b), CacheKey::binary(BinaryOp::And, b, a));
        assert_eq!(CacheKey::binary(BinaryOp::Add, a, b), CacheKey::binary(BinaryOp::Add, b, a));
        assert_ne!(
            CacheKey::binary(BinaryOp::Subtract, a, b),
            CacheKey::binary(BinaryOp::Subtract, b, a)
        );
        assert_ne!(
            CacheKey::binary(BinaryOp::Implies, a, b),
            CacheKey::binary(BinaryOp::Implies, b, a)
        );
    }

    #[test]
    fn test_cache_operations() {
        let mut cache = OpCache::default();
        let key = CacheKey::binary(BinaryOp::Or, NodeId::new(2), NodeId::new(4));

        assert_eq!(cache.get(&key), None);
        assert_eq!(cache.misses(), 1);

        cache.insert(key, NodeId::new(9));
        assert_eq!(cache.get(&key), Some(NodeId::new(9)));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);

        let mut handles = cache.handles().collect::<Vec<_>>();
        handles.sort();
        assert_eq!(handles, vec![NodeId::new(2), NodeId::new(4), NodeId::new(9)]);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_capacity_bound() {
        let mut cache = OpCache::new(2);
        let key = |i| CacheKey::unary(UnaryOp::Negate, NodeId::new(i));
        cache.insert(key(2), NodeId::new(20));
        cache.insert(key(3), NodeId::new(30));
        assert_eq!(cache.len(), 2);

        // Overwriting an existing key does not evict.
        cache.insert(key(3), NodeId::new(31));
        assert_eq!(cache.len(), 2);

        cache.insert(key(4), NodeId::new(40));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key(2)), None);
        assert_eq!(cache.get(&key(4)), Some(NodeId::new(40)));
        assert_eq!(OpCache::new(0).capacity(), 1);
    }

    #[test]
    fn test_distinct_opcodes() {
        let f = NodeId::new(2);
        let g = NodeId::new(3);
        let mut cache = OpCache::default();
        cache.insert(CacheKey::binary(BinaryOp::And, f, g), NodeId::new(10));
        assert_eq!(cache.get(&CacheKey::binary(BinaryOp::Or, f, g)), None);
        assert_eq!(cache.get(&CacheKey::threshold(f, g)), None);
        assert_eq!(cache.get(&CacheKey::unary(UnaryOp::Not, f)), None);
    }
}
