//! Seams between a node and the graph that hosts it.
//!
//! The host owns topology and delivery. A node only needs to know which slot
//! an upstream source occupies ([`SlotResolver`]) and where to hand its
//! output ([`Emitter`]). Delivery to one node is serialized by the host, so
//! [`Node::update`] takes `&mut self` and runs to completion.

use std::sync::Arc;

use crate::event::Event;

/// Maps an upstream source name to a stable slot index.
pub trait SlotResolver {
    /// Slot for `source`, or `None` if the node does not watch it.
    fn resolve_slot(&self, source: &str) -> Option<usize>;
}

impl<R: SlotResolver + ?Sized> SlotResolver for &R {
    fn resolve_slot(&self, source: &str) -> Option<usize> {
        (**self).resolve_slot(source)
    }
}

impl<R: SlotResolver + ?Sized> SlotResolver for Arc<R> {
    fn resolve_slot(&self, source: &str) -> Option<usize> {
        (**self).resolve_slot(source)
    }
}

/// Downstream fan-out. Fire and forget.
pub trait Emitter {
    fn emit(&mut self, event: Event);
}

impl Emitter for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// A processing node in the graph.
pub trait Node {
    /// Name stamped onto the history of everything this node emits.
    fn name(&self) -> &str;

    /// Handle one delivered event. Failures are logged and the event is
    /// dropped; nothing propagates to the host.
    fn update(&mut self, event: &Event, out: &mut dyn Emitter);
}

/// Slot resolution by position in an ordered list of watched sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    sources: Vec<String>,
}

impl Watchlist {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SlotResolver for Watchlist {
    fn resolve_slot(&self, source: &str) -> Option<usize> {
        self.sources.iter().position(|s| s == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, History};

    #[test]
    fn watchlist_resolves_by_position() {
        let watch = Watchlist::new(["a", "b", "c"]);
        assert_eq!(watch.resolve_slot("a"), Some(0));
        assert_eq!(watch.resolve_slot("c"), Some(2));
        assert_eq!(watch.resolve_slot("z"), None);
    }

    #[test]
    fn shared_resolver_delegates() {
        let watch = Arc::new(Watchlist::new(["a", "b"]));
        let by_ref = &*watch;
        assert_eq!(watch.resolve_slot("b"), Some(1));
        assert_eq!(by_ref.resolve_slot("b"), Some(1));
    }

    #[test]
    fn vec_collects_emissions() {
        let mut out: Vec<Event> = Vec::new();
        let sink: &mut dyn Emitter = &mut out;
        sink.emit(Event::new(Action::Report, History::from_source("a")));
        assert_eq!(out.len(), 1);
    }
}
