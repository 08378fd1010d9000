//! Errors reported by the MTBDD engine.

use thiserror::Error;

use crate::reference::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtbddError {
    /// A variable name was used before being declared.
    #[error("variable not declared: {0}")]
    VariableNotDeclared(String),

    /// Evaluation reached a node whose variable has no binding.
    #[error("invalid assignment: no value for variable '{0}'")]
    InvalidAssignment(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An internal canonicity invariant does not hold. This is an engine bug,
    /// not caller misuse.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The handle does not refer to a live node (never allocated, or reclaimed
    /// by garbage collection).
    #[error("invalid handle: {0}")]
    InvalidHandle(NodeId),
}

pub type Result<T> = std::result::Result<T, MtbddError>;

/// Reports a broken invariant.
///
/// Debug builds abort immediately; release builds reject the operation
/// without touching shared state.
pub(crate) fn invariant_violation(message: String) -> MtbddError {
    log::error!("invariant violation: {}", message);
    debug_assert!(false, "invariant violation: {}", message);
    MtbddError::InvariantViolation(message)
}
