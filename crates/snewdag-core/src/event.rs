//! Events exchanged between nodes.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::history::History;

/// Lifecycle tag carried by every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Assert a condition.
    Alert,
    /// Withdraw a previously asserted condition.
    Revoke,
    /// Clear accumulated state.
    Reset,
    /// Request a summary.
    Report,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Alert, Action::Revoke, Action::Reset, Action::Report];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Revoke => "revoke",
            Self::Reset => "reset",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload key holding raw observation times.
pub const TIMES_FIELD: &str = "times";

/// Payload key holding the derived time difference.
pub const DT_FIELD: &str = "dt";

/// A message flowing through the graph.
///
/// `action` and `history` are always present; everything else lives in the
/// flattened payload map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub action: Action,
    pub history: History,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Event {
    pub fn new(action: Action, history: History) -> Self {
        Self {
            action,
            history,
            payload: Map::new(),
        }
    }

    /// Add or replace a payload field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// Whether `name` is present, counting the fixed `action` and `history`
    /// keys as present.
    pub fn has_field(&self, name: &str) -> bool {
        matches!(name, "action" | "history") || self.payload.contains_key(name)
    }

    /// Decode the `times` payload as a list of numbers.
    pub fn times(&self) -> Result<Vec<f64>> {
        let value = self
            .field(TIMES_FIELD)
            .ok_or_else(|| Error::MissingField(TIMES_FIELD.to_string()))?;

        let items = value.as_array().ok_or_else(|| Error::MalformedField {
            field: TIMES_FIELD.to_string(),
            reason: "expected an array of numbers".to_string(),
        })?;

        items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| Error::MalformedField {
                    field: TIMES_FIELD.to_string(),
                    reason: format!("element {i} is not a number: {v}"),
                })
            })
            .collect()
    }

    /// Decode the `dt` payload, if present and numeric.
    pub fn dt(&self) -> Option<f64> {
        self.field(DT_FIELD).and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_wire_names() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
        assert!(serde_json::from_str::<Action>("\"escalate\"").is_err());
    }

    #[test]
    fn payload_is_flattened() {
        let event: Event = serde_json::from_value(json!({
            "action": "alert",
            "history": ["detector-a"],
            "times": [9, 5, 7],
            "energy": 12.5,
        }))
        .unwrap();

        assert_eq!(event.action, Action::Alert);
        assert_eq!(event.history.source(), Some("detector-a"));
        assert!(event.has_field("energy"));
        assert!(event.has_field("history"));
        assert!(!event.has_field("dt"));
        assert_eq!(event.times().unwrap(), vec![9.0, 5.0, 7.0]);

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["energy"], json!(12.5));
        assert_eq!(back["action"], json!("alert"));
    }

    #[test]
    fn times_errors() {
        let missing = Event::new(Action::Alert, History::from_source("a"));
        assert_eq!(missing.times(), Err(Error::MissingField("times".into())));

        let scalar = missing.clone().with_field("times", 3.0);
        assert!(matches!(scalar.times(), Err(Error::MalformedField { .. })));

        let mixed = missing.with_field("times", json!([1.0, "two"]));
        match mixed.times() {
            Err(Error::MalformedField { field, reason }) => {
                assert_eq!(field, "times");
                assert!(reason.contains("element 1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn accepts_joined_history_from_upstream() {
        let event: Event = serde_json::from_str(
            r#"{"action":"alert","history":[["a"],["b"],"diff"],"dt":1.0}"#,
        )
        .unwrap();
        assert_eq!(
            event.history,
            History::merge([History::from_source("a"), History::from_source("b")]).extended("diff")
        );
        assert_eq!(event.history.source(), Some("diff"));
        assert_eq!(event.dt(), Some(1.0));
    }

    #[test]
    fn dt_round_trips_through_payload() {
        let event = Event::new(Action::Alert, History::new()).with_field(DT_FIELD, 6.0);
        assert_eq!(event.dt(), Some(6.0));
    }
}
