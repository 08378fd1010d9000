use crate::reference::NodeId;
use crate::types::{Level, Var};
use crate::value::Value;

/// A node of the diagram: either a terminal holding a [`Value`], or a Shannon
/// expansion node "if `var` then `high` else `low`".
///
/// # Invariants
///
/// - `low != high` for internal nodes (redundant tests are never stored);
/// - `level == var.level()`;
/// - `level` is strictly smaller than the level of every non-terminal child.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Node {
    Terminal {
        value: Value,
    },
    Internal {
        var: Var,
        level: Level,
        low: NodeId,
        high: NodeId,
        /// Whether every terminal reachable from this node is boolean.
        boolean: bool,
    },
}

impl Node {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Node::Terminal { .. })
    }

    /// Level of the node; terminals sit at [`Level::TERMINAL`].
    pub fn level(&self) -> Level {
        match *self {
            Node::Terminal { .. } => Level::TERMINAL,
            Node::Internal { level, .. } => level,
        }
    }

    pub fn is_boolean(&self) -> bool {
        match *self {
            Node::Terminal { value } => value.is_bool(),
            Node::Internal { boolean, .. } => boolean,
        }
    }

    pub fn value(&self) -> Option<Value> {
        match *self {
            Node::Terminal { value } => Some(value),
            Node::Internal { .. } => None,
        }
    }

    pub fn var(&self) -> Option<Var> {
        match *self {
            Node::Terminal { .. } => None,
            Node::Internal { var, .. } => Some(var),
        }
    }

    /// Children `(low, high)` of an internal node.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match *self {
            Node::Terminal { .. } => None,
            Node::Internal { low, high, .. } => Some((low, high)),
        }
    }
}
