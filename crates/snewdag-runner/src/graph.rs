//! Serialized dispatch over a configured node graph.
//!
//! Delivery is a FIFO queue drained on the calling thread. Each node sees
//! its events one at a time, in queue order, and finishes each update before
//! the next delivery starts. Emissions are stamped with the emitting node's
//! name before they are routed on; emissions nobody watches leave the graph
//! as sink events.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace, warn};

use snewdag_core::{Error as NodeError, Event, Node, Watchlist};
use snewdag_nodes::{FieldPresenceGate, NthTimeDiff};

use crate::config::{NodeConfig, PipelineConfig};
use crate::error::Result;

/// Built pipeline.
pub struct Graph {
    nodes: Vec<Box<dyn Node>>,
    /// Upstream name → indices of nodes watching it.
    watchers: HashMap<String, Vec<usize>>,
}

impl Graph {
    /// Build nodes and routing from a pipeline description.
    ///
    /// A node may watch external sources and nodes declared before it, which
    /// keeps the graph acyclic.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let positions: HashMap<&str, usize> = config
            .nodes
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.as_str(), i))
            .collect();
        if positions.len() != config.nodes.len() {
            return Err(NodeError::InvalidConfig("duplicate node names".into()).into());
        }

        let mut nodes: Vec<Box<dyn Node>> = Vec::with_capacity(config.nodes.len());
        let mut watchers: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, spec) in config.nodes.iter().enumerate() {
            let mut seen = HashSet::new();
            for upstream in &spec.watch {
                if positions.get(upstream.as_str()).is_some_and(|&j| j >= i) {
                    return Err(NodeError::InvalidConfig(format!(
                        "{} watches {}, which is not declared before it",
                        spec.name, upstream
                    ))
                    .into());
                }
                if !seen.insert(upstream.as_str()) {
                    return Err(NodeError::InvalidConfig(format!(
                        "{} watches {} twice",
                        spec.name, upstream
                    ))
                    .into());
                }
                watchers.entry(upstream.clone()).or_default().push(i);
            }

            let node: Box<dyn Node> = match spec.node_config() {
                NodeConfig::NthTimeDiff(config) => {
                    let resolver = Watchlist::new(spec.watch.iter().cloned());
                    Box::new(NthTimeDiff::new(config, resolver)?)
                }
                NodeConfig::FieldPresenceGate(config) => Box::new(FieldPresenceGate::new(config)),
            };
            debug!(node = %spec.name, watch = ?spec.watch, "node installed");
            nodes.push(node);
        }

        Ok(Self { nodes, watchers })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name())
    }

    /// Deliver one external event and run the graph to quiescence.
    ///
    /// Returns sink events in emission order.
    pub fn dispatch(&mut self, event: Event) -> Vec<Event> {
        let mut queue: VecDeque<(Event, bool)> = VecDeque::from([(event, false)]);
        let mut sinks = Vec::new();

        while let Some((event, emitted)) = queue.pop_front() {
            let Some(source) = event.history.source() else {
                warn!(history = %event.history, "event has no resolvable source, dropped");
                continue;
            };

            let Some(targets) = self.watchers.get(source) else {
                if emitted {
                    sinks.push(event);
                } else {
                    warn!(source, "no node watches this source, dropped");
                }
                continue;
            };

            for &i in targets {
                let node = &mut self.nodes[i];
                trace!(node = node.name(), source, action = %event.action, "deliver");

                let mut out: Vec<Event> = Vec::new();
                node.update(&event, &mut out);
                for mut next in out {
                    next.history.push(node.name());
                    queue.push_back((next, true));
                }
            }
        }

        sinks
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_names().collect::<Vec<_>>())
            .field("watchers", &self.watchers)
            .finish()
    }
}
