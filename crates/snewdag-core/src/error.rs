//! Error types for snewdag-core.

use thiserror::Error;

use crate::event::Action;

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors a node can hit while handling a single event or while being built.
///
/// Every event-level variant is recoverable: the node logs it, drops the
/// event and leaves its state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The immediate upstream source does not map to any slot.
    #[error("unrecognized source {0}")]
    UnknownSource(String),

    /// The source resolved to a slot the node does not have.
    #[error("excess source {origin} detected (slot {index}, node has {slots})")]
    SlotOverflow {
        origin: String,
        index: usize,
        slots: usize,
    },

    /// The node has no handling for this action.
    #[error("unrecognized action {0}")]
    UnrecognizedAction(Action),

    /// A required payload field is absent.
    #[error("required field `{0}` not found in payload")]
    MissingField(String),

    /// A payload field is present but has the wrong shape.
    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: String, reason: String },

    /// Fewer observations than the configured rank.
    #[error("need at least {needed} observations, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    /// Rejected at construction time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
