//! SNEWPDAG Nodes
//!
//! Processing nodes for the alert-propagation DAG.
//!
//! - [`NthTimeDiff`]: joins two sources, selects the nth observation time from
//!   each alert and emits their difference while both are live. Revocations
//!   are reported once, at the edge where a live source goes away.
//! - [`FieldPresenceGate`]: consumes events that lack a required field, with
//!   gating enabled per action.
//!
//! Both can be driven directly through their fallible methods or installed
//! in a host graph as [`snewdag_core::Node`]s.

mod field_presence_gate;
mod nth_time_diff;

#[cfg(test)]
mod testing;

pub use field_presence_gate::{FieldPresenceGate, FieldPresenceGateConfig};
pub use nth_time_diff::{NthTimeDiff, NthTimeDiffConfig, Slot, SLOT_COUNT};
