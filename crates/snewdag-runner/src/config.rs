//! Pipeline configuration.
//!
//! A pipeline file lists nodes in dependency order:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "name": "validate-a", "watch": ["detector-a"],
//!       "kind": "field_presence_gate", "required_field": "times",
//!       "enabled_actions": ["alert", "revoke"] },
//!     { "name": "diff", "watch": ["validate-a", "detector-b"],
//!       "kind": "nth_time_diff", "nth": 2 }
//!   ]
//! }
//! ```
//!
//! `watch` order fixes slot indices. Names that are not nodes are external
//! sources.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use snewdag_core::Action;
use snewdag_nodes::{FieldPresenceGateConfig, NthTimeDiffConfig, SLOT_COUNT};

use crate::error::Result;

/// Environment variable naming the pipeline file.
pub const CONFIG_ENV: &str = "SNEWDAG_CONFIG";

/// Fallback pipeline file.
pub const DEFAULT_CONFIG_PATH: &str = "./pipeline.json";

fn default_source_count() -> usize {
    SLOT_COUNT
}

/// Whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub nodes: Vec<NodeSpec>,
}

/// One node and what it listens to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,

    /// Upstream names, in slot order.
    #[serde(default)]
    pub watch: Vec<String>,

    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Node type and its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    NthTimeDiff {
        nth: i64,
        #[serde(default = "default_source_count")]
        source_count: usize,
    },
    FieldPresenceGate {
        required_field: String,
        #[serde(default)]
        enabled_actions: BTreeSet<Action>,
    },
}

/// Typed configuration for one node, ready to hand to its constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeConfig {
    NthTimeDiff(NthTimeDiffConfig),
    FieldPresenceGate(FieldPresenceGateConfig),
}

impl NodeSpec {
    pub fn node_config(&self) -> NodeConfig {
        let name = self.name.clone();
        match &self.kind {
            NodeKind::NthTimeDiff { nth, source_count } => NodeConfig::NthTimeDiff(NthTimeDiffConfig {
                name,
                nth: *nth,
                source_count: *source_count,
            }),
            NodeKind::FieldPresenceGate {
                required_field,
                enabled_actions,
            } => NodeConfig::FieldPresenceGate(FieldPresenceGateConfig {
                name,
                required_field: required_field.clone(),
                enabled_actions: enabled_actions.clone(),
            }),
        }
    }
}

impl PipelineConfig {
    /// Read a pipeline from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Pick the pipeline file: explicit argument, then [`CONFIG_ENV`], then
/// [`DEFAULT_CONFIG_PATH`].
pub fn config_path(arg: Option<String>) -> PathBuf {
    arg.or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
