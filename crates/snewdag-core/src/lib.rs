//! SNEWPDAG Core
//!
//! Shared vocabulary for nodes in the alert-propagation DAG.
//!
//! # Lifecycle
//!
//! Upstream sources emit timestamped events tagged with an [`Action`]:
//!
//! - **alert**: assert a condition, usually with observations attached
//! - **revoke**: withdraw an earlier alert from the same source
//! - **reset** / **report**: housekeeping, handled by the nodes that care
//!
//! Nodes consume these, combine or transform them, and emit derived events
//! downstream under the same lifecycle. Every event carries its [`History`],
//! whose last entry names the immediate upstream.
//!
//! # Host Seams
//!
//! The graph engine is not part of this crate. Nodes see it only through
//! [`SlotResolver`] (which slot a source occupies) and [`Emitter`] (where
//! output goes).

mod error;
mod event;
mod history;
mod node;

pub use error::{Error, Result};
pub use event::{Action, Event, DT_FIELD, TIMES_FIELD};
pub use history::{History, HistoryEntry};
pub use node::{Emitter, Node, SlotResolver, Watchlist};
