use std::fmt::{Display, Formatter};

/// Handle to a node stored in the [`Mtbdd`][crate::mtbdd::Mtbdd] manager.
///
/// A handle is an index into the node arena. Two handles obtained from the same
/// manager denote the same function iff they are equal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The constant `false` terminal, allocated by every manager.
    pub const FALSE: NodeId = NodeId(0);

    /// The constant `true` terminal, allocated by every manager.
    pub const TRUE: NodeId = NodeId(1);

    /// Sentinel denoting "no node".
    pub const NULL: NodeId = NodeId(u32::MAX);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the internal representation of the handle.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Return the arena index of the handle.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "@null")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}
