//! Time difference between the nth observations of two sources.
//!
//! Each source owns one slot. An alert from a source makes its slot valid and
//! stores the nth smallest of the alert's `times`; a revoke invalidates it.
//!
//! # Emission
//!
//! Evaluated after every accepted update:
//!
//! - both slots valid → `alert` with `dt = slot0 - slot1` and history
//!   `(slot0.history, slot1.history)`
//! - otherwise, if this update was a revoke of a slot that was valid →
//!   `revoke` with the same pair of histories
//! - otherwise nothing
//!
//! An alert on one source while the other is invalid is silent. A revoke of
//! an already-invalid slot is silent, so each validity edge is reported once.
//!
//! Revoked slots keep their stale value and history. The history is read once
//! more to build the outgoing revoke, and the next alert overwrites both.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn_span};

use snewdag_core::{Action, Emitter, Error, Event, History, Node, Result, SlotResolver, DT_FIELD};
use snewdag_select::{OrderStatisticSelector, Rank};

/// Number of sources this node joins.
pub const SLOT_COUNT: usize = 2;

fn default_source_count() -> usize {
    SLOT_COUNT
}

/// Configuration for an [`NthTimeDiff`] node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NthTimeDiffConfig {
    /// Node name, stamped on outgoing histories by the host.
    pub name: String,

    /// Which observation to take from each source; 1 is the earliest.
    /// Values below 1 are corrected to 1.
    pub nth: i64,

    /// Must be [`SLOT_COUNT`].
    #[serde(default = "default_source_count")]
    pub source_count: usize,
}

impl NthTimeDiffConfig {
    pub fn new(name: impl Into<String>, nth: i64) -> Self {
        Self {
            name: name.into(),
            nth,
            source_count: SLOT_COUNT,
        }
    }
}

/// Per-source state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slot {
    /// Source has a live, unrevoked alert.
    pub valid: bool,
    /// nth time from the last accepted alert.
    pub value: f64,
    /// History of the last accepted alert.
    pub history: History,
}

/// Joins two sources and reports the difference of their nth times.
#[derive(Debug)]
pub struct NthTimeDiff<R> {
    name: String,
    selector: OrderStatisticSelector,
    slots: [Slot; SLOT_COUNT],
    resolver: R,
}

impl<R: SlotResolver> NthTimeDiff<R> {
    /// Build a node with all slots invalid.
    pub fn new(config: NthTimeDiffConfig, resolver: R) -> Result<Self> {
        if config.source_count != SLOT_COUNT {
            return Err(Error::InvalidConfig(format!(
                "{} joins exactly {} sources, configured for {}",
                config.name, SLOT_COUNT, config.source_count
            )));
        }

        let rank = {
            let _span = warn_span!("nth_time_diff", node = %config.name).entered();
            Rank::clamped(config.nth)
        };

        Ok(Self {
            name: config.name,
            selector: OrderStatisticSelector::new(rank),
            slots: Default::default(),
            resolver,
        })
    }

    pub fn rank(&self) -> Rank {
        self.selector.rank()
    }

    pub fn slots(&self) -> &[Slot; SLOT_COUNT] {
        &self.slots
    }

    /// Copy of the slot state, for the host to checkpoint.
    pub fn snapshot(&self) -> [Slot; SLOT_COUNT] {
        self.slots.clone()
    }

    /// Reinstate checkpointed slot state.
    pub fn restore(&mut self, slots: [Slot; SLOT_COUNT]) {
        self.slots = slots;
    }

    /// Apply one event and return what, if anything, goes downstream.
    ///
    /// On error no slot is touched.
    pub fn process(&mut self, event: &Event) -> Result<Option<Event>> {
        let index = self.slot_of(&event.history)?;

        let newly_revoked = match event.action {
            Action::Alert => {
                let times = event.times()?;
                let nth = self.selector.select(&times).ok_or(Error::InsufficientObservations {
                    needed: self.rank().get(),
                    got: times.len(),
                })?;

                let slot = &mut self.slots[index];
                slot.valid = true;
                slot.value = nth;
                slot.history = event.history.clone();
                debug!(node = %self.name, slot = index, value = nth, "slot validated");
                false
            }
            Action::Revoke => {
                let was_valid = std::mem::replace(&mut self.slots[index].valid, false);
                debug!(node = %self.name, slot = index, was_valid, "slot revoked");
                was_valid
            }
            other => return Err(Error::UnrecognizedAction(other)),
        };

        if self.slots.iter().all(|s| s.valid) {
            let dt = self.slots[0].value - self.slots[1].value;
            Ok(Some(Event::new(Action::Alert, self.joined_history()).with_field(DT_FIELD, dt)))
        } else if newly_revoked {
            Ok(Some(Event::new(Action::Revoke, self.joined_history())))
        } else {
            Ok(None)
        }
    }

    fn slot_of(&self, history: &History) -> Result<usize> {
        let origin = history
            .source()
            .ok_or_else(|| Error::UnknownSource(history.to_string()))?;

        let index = self
            .resolver
            .resolve_slot(origin)
            .ok_or_else(|| Error::UnknownSource(origin.to_string()))?;

        if index >= SLOT_COUNT {
            return Err(Error::SlotOverflow {
                origin: origin.to_string(),
                index,
                slots: SLOT_COUNT,
            });
        }
        Ok(index)
    }

    fn joined_history(&self) -> History {
        History::merge(self.slots.iter().map(|s| s.history.clone()))
    }
}

impl<R: SlotResolver> Node for NthTimeDiff<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, event: &Event, out: &mut dyn Emitter) {
        match self.process(event) {
            Ok(Some(emitted)) => {
                debug!(node = %self.name, action = %emitted.action, "emitting");
                out.emit(emitted);
            }
            Ok(None) => {}
            Err(e) => error!(node = %self.name, action = %event.action, "{e}"),
        }
    }
}
