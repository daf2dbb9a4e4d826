//! Drop events that lack a required payload field.
//!
//! Gating is opt-in per action: an action the gate is not enabled for never
//! passes, whatever the payload holds. For enabled actions the event passes
//! iff the field is present; otherwise it is consumed with a diagnostic.
//! Downstream nodes can then rely on the field without checking it again.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use snewdag_core::{Action, Emitter, Error, Event, Node, Result};

/// Configuration for a [`FieldPresenceGate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPresenceGateConfig {
    pub name: String,

    /// Payload field that must be present.
    pub required_field: String,

    /// Actions this gate lets through when the field is present.
    #[serde(default)]
    pub enabled_actions: BTreeSet<Action>,
}

impl FieldPresenceGateConfig {
    pub fn new(name: impl Into<String>, required_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_field: required_field.into(),
            enabled_actions: BTreeSet::new(),
        }
    }

    /// Enable gating for `action`.
    #[must_use]
    pub fn on(mut self, action: Action) -> Self {
        self.enabled_actions.insert(action);
        self
    }
}

/// Pass/drop filter on field presence.
#[derive(Debug, Clone)]
pub struct FieldPresenceGate {
    config: FieldPresenceGateConfig,
}

impl FieldPresenceGate {
    pub fn new(config: FieldPresenceGateConfig) -> Self {
        Self { config }
    }

    pub fn required_field(&self) -> &str {
        &self.config.required_field
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        self.config.enabled_actions.contains(&action)
    }

    /// Whether `event` may proceed under `action`.
    pub fn permit(&self, action: Action, event: &Event) -> bool {
        if !self.is_enabled(action) {
            trace!(gate = %self.config.name, %action, "action not enabled, consumed");
            return false;
        }
        match self.check(event) {
            Ok(()) => true,
            Err(e) => {
                error!(gate = %self.config.name, %action, "{e}, action consumed");
                false
            }
        }
    }

    /// Presence check alone, ignoring which actions are enabled.
    pub fn check(&self, event: &Event) -> Result<()> {
        if event.has_field(&self.config.required_field) {
            Ok(())
        } else {
            Err(Error::MissingField(self.config.required_field.clone()))
        }
    }
}

impl Node for FieldPresenceGate {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn update(&mut self, event: &Event, out: &mut dyn Emitter) {
        if self.permit(event.action, event) {
            out.emit(event.clone());
        }
    }
}
