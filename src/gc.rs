//! Root tracking and mark-and-sweep garbage collection.
//!
//! Handles are plain indices, so the manager cannot know which ones the
//! caller still holds. Callers register the functions they want to keep with
//! [`Mtbdd::retain`]; everything not reachable from a retained root is
//! reclaimed by [`Mtbdd::collect_garbage`]. The boolean terminals are never
//! reclaimed.
//!
//! Collection clears the operation cache first, so no cache entry can refer
//! to a reclaimed slot.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::error::Result;
use crate::mtbdd::Mtbdd;
use crate::reference::NodeId;

impl Mtbdd {
    /// Empties the operation cache.
    pub fn clear_caches(&mut self) {
        debug!("clear_caches: dropping {} entries", self.cache.len());
        self.cache.clear();
    }

    /// Registers `f` as a root, incrementing its reference count.
    pub fn retain(&mut self, f: NodeId) -> Result<NodeId> {
        self.node(f)?;
        *self.roots.entry(f).or_insert(0) += 1;
        Ok(f)
    }

    /// Decrements the reference count of the root `f`, dropping it at zero.
    ///
    /// Releasing a handle that is not a root does nothing.
    pub fn release(&mut self, f: NodeId) {
        match self.roots.get_mut(&f) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.roots.remove(&f);
            }
            None => warn!("release({}): not a retained root", f),
        }
    }

    pub fn is_root(&self, f: NodeId) -> bool {
        self.roots.contains_key(&f)
    }

    /// Currently retained roots, in handle order.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self.roots.keys().copied().collect();
        roots.sort_unstable();
        roots
    }

    /// Reclaims every node unreachable from the retained roots and returns
    /// how many were freed.
    pub fn collect_garbage(&mut self) -> usize {
        self.clear_caches();

        let marked = self.mark();
        let dead: Vec<NodeId> = self
            .store
            .iter()
            .map(|(id, _)| id)
            .filter(|id| !marked.contains(id))
            .collect();

        let mut freed = 0;
        for id in dead {
            if self.store.remove(id).is_some() {
                freed += 1;
            }
        }
        self.store.shrink();

        info!(
            "collect_garbage: freed {} nodes, {} live, {} roots",
            freed,
            self.store.len(),
            self.roots.len()
        );
        freed
    }

    fn mark(&self) -> HashSet<NodeId> {
        let mut marked = HashSet::new();
        let mut stack = vec![NodeId::FALSE, NodeId::TRUE];
        stack.extend(self.roots.keys().copied());

        while let Some(id) = stack.pop() {
            if !marked.insert(id) {
                continue;
            }
            if let Some((low, high)) = self.store.get(id).and_then(|node| node.children()) {
                stack.push(low);
                stack.push(high);
            }
        }

        marked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::error::MtbddError;
    use crate::eval::Assignment;
    use crate::value::Value;

    #[test]
    fn test_retain_release() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x"]).unwrap();
        let x = mgr.var("x").unwrap();

        mgr.retain(x).unwrap();
        mgr.retain(x).unwrap();
        assert!(mgr.is_root(x));
        assert_eq!(mgr.memory_stats().root_count, 1);

        mgr.release(x);
        assert!(mgr.is_root(x));
        mgr.release(x);
        assert!(!mgr.is_root(x));

        // Not a root anymore: no-op.
        mgr.release(x);
        assert!(mgr.roots().is_empty());
    }

    #[test]
    fn test_retain_invalid() {
        let mut mgr = Mtbdd::new();
        let bogus = NodeId::new(42);
        assert_eq!(mgr.retain(bogus), Err(MtbddError::InvalidHandle(bogus)));
    }

    #[test]
    fn test_collect_garbage() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x", "y", "z"]).unwrap();
        let x = mgr.var("x").unwrap();
        let y = mgr.var("y").unwrap();
        let z = mgr.var("z").unwrap();

        let xy = mgr.apply_and(x, y).unwrap();
        let f = mgr.apply_or(xy, z).unwrap();
        let ten = mgr.constant(10);
        let g = mgr.ite(z, ten, mgr.zero()).unwrap();
        mgr.retain(f).unwrap();

        let before = mgr.memory_stats().total_nodes;
        let freed = mgr.collect_garbage();
        assert!(freed > 0);
        assert_eq!(mgr.memory_stats().total_nodes, before - freed);
        assert_eq!(mgr.memory_stats().cache_size, 0);

        // Only what `f` reaches (plus both boolean terminals) survives.
        assert_eq!(mgr.memory_stats().total_nodes, mgr.size(f).unwrap());
        assert!(!mgr.is_live(g));
        assert!(!mgr.is_live(ten));
        assert_eq!(mgr.evaluate(g, &Assignment::new()), Err(MtbddError::InvalidHandle(g)));

        let a = Assignment::from([("x", true), ("y", true), ("z", false)]);
        assert_eq!(mgr.evaluate(f, &a), Ok(Value::Bool(true)));

        // Rebuilding yields the retained handle again.
        let x = mgr.var("x").unwrap();
        let y = mgr.var("y").unwrap();
        let z = mgr.var("z").unwrap();
        let xy = mgr.apply_and(x, y).unwrap();
        assert_eq!(mgr.apply_or(xy, z).unwrap(), f);
    }

    #[test]
    fn test_collect_garbage_nothing_retained() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x", "y"]).unwrap();
        let x = mgr.var("x").unwrap();
        let y = mgr.var("y").unwrap();
        mgr.apply_xor(x, y).unwrap();

        mgr.collect_garbage();
        assert_eq!(mgr.memory_stats().total_nodes, 2);
        assert!(mgr.is_live(mgr.zero()));
        assert!(mgr.is_live(mgr.one()));
        assert_eq!(mgr.collect_garbage(), 0);
    }

    #[test]
    fn test_clear_caches() {
        let mut mgr = Mtbdd::new();
        mgr.declare(["x", "y"]).unwrap();
        let x = mgr.var("x").unwrap();
        let y = mgr.var("y").unwrap();
        let f = mgr.apply_and(x, y).unwrap();
        assert!(mgr.memory_stats().cache_size > 0);

        mgr.clear_caches();
        assert_eq!(mgr.memory_stats().cache_size, 0);
        assert_eq!(mgr.apply_and(x, y).unwrap(), f);
    }
}
