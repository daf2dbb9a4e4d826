//! Provenance chains carried by every event.
//!
//! A history is an ordered list of entries. Plain entries name the node or
//! external source that handled the event; chain entries embed the whole
//! history of one input. A join lists one chain per input, in slot order,
//! and the host then appends the join's name. The last entry names the
//! immediate upstream of the event.
//!
//! On the wire a name is a JSON string and a chain is a JSON array, so
//! `[["a"], ["b", "gate"], "diff"]` reads as: `diff` joined the chain `a`
//! with the chain `b` then `gate`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    /// A named node or external source.
    Source(String),
    /// Full history of one joined input.
    Chain(History),
}

/// Ordered provenance chain.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<HistoryEntry>);

impl History {
    /// Empty history.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// History starting at a single named source.
    pub fn from_source(name: impl Into<String>) -> Self {
        Self(vec![HistoryEntry::Source(name.into())])
    }

    /// History with one chain entry per given history, in order.
    pub fn merge(histories: impl IntoIterator<Item = History>) -> Self {
        Self(histories.into_iter().map(HistoryEntry::Chain).collect())
    }

    /// Copy of this history with `name` appended.
    #[must_use]
    pub fn extended(&self, name: impl Into<String>) -> Self {
        let mut entries = self.0.clone();
        entries.push(HistoryEntry::Source(name.into()));
        Self(entries)
    }

    /// Append `name` in place.
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(HistoryEntry::Source(name.into()));
    }

    /// Name of the immediate upstream, if the last entry is a name.
    pub fn source(&self) -> Option<&str> {
        match self.0.last()? {
            HistoryEntry::Source(name) => Some(name),
            HistoryEntry::Chain(_) => None,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match entry {
                HistoryEntry::Source(name) => write!(f, "{name}")?,
                HistoryEntry::Chain(chain) => write!(f, "{chain}")?,
            }
        }
        write!(f, ")")
    }
}
