//! Bounded Order-Statistic Selection
//!
//! Picks the k-th smallest of a short observation sequence without sorting
//! it. Nodes configure a [`Rank`] once and run an
//! [`OrderStatisticSelector`] over the `times` of every incoming alert.
//!
//! # Rank
//!
//! Ranks are 1-indexed: rank 1 is the minimum, rank N of N values is the
//! maximum. A configured rank below 1 is corrected to 1 at construction via
//! [`Rank::clamped`], never per call.

mod rank;
mod selector;

pub use rank::Rank;
pub use selector::{nth_smallest, OrderStatisticSelector};
