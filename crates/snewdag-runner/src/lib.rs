//! SNEWPDAG Runner
//!
//! A small host for SNEWPDAG nodes: reads a JSON pipeline description, wires
//! the nodes into a [`Graph`] and streams events through it.
//!
//! # Stream Format
//!
//! Input and output are JSON lines, one event per line:
//!
//! ```json
//! {"action": "alert", "history": ["detector-a"], "times": [9.0, 5.0, 7.0]}
//! ```
//!
//! Lines that do not parse as events are logged and skipped. Events leaving
//! the graph are written in the order they were emitted.
//!
//! # Example
//!
//! ```no_run
//! use snewdag_runner::{config_path, Graph, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::load(config_path(None))?;
//!     let mut graph = Graph::from_config(&config)?;
//!     let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//!     snewdag_runner::run(&mut graph, stdin, tokio::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod graph;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use snewdag_core::Event;

pub use config::{config_path, NodeConfig, NodeKind, NodeSpec, PipelineConfig};
pub use error::{Error, Result};
pub use graph::Graph;

/// Counters for one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Lines parsed as events and dispatched.
    pub received: u64,
    /// Lines that failed to decode or parse.
    pub rejected: u64,
    /// Events written out.
    pub emitted: u64,
}

/// Feed every line of `input` through `graph`, writing sink events to
/// `output` until `input` is exhausted.
pub async fn run<R, W>(graph: &mut Graph, mut input: R, mut output: W) -> Result<RunStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = RunStats::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        // Raw bytes: a line that is not UTF-8 is a rejected event, not an IO error.
        if input.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let event: Event = match serde_json::from_slice(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "unparseable event, dropped");
                stats.rejected += 1;
                continue;
            }
        };
        stats.received += 1;

        for out in graph.dispatch(event) {
            let mut bytes = serde_json::to_vec(&out)?;
            bytes.push(b'\n');
            output.write_all(&bytes).await?;
            stats.emitted += 1;
        }
        output.flush().await?;
    }

    debug!(?stats, "input exhausted");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use snewdag_core::Action;

    fn graph() -> Graph {
        let config: PipelineConfig = serde_json::from_value(json!({
            "nodes": [
                {"name": "diff", "watch": ["a", "b"], "kind": "nth_time_diff", "nth": 2}
            ]
        }))
        .unwrap();
        Graph::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn streams_json_lines() {
        let input = concat!(
            r#"{"action": "alert", "history": ["a"], "times": [9, 5, 7]}"#, "\n",
            "\n",
            r#"{"action": "escalate", "history": ["a"]}"#, "\n",
            r#"not json"#, "\n",
            r#"{"action": "alert", "history": ["b"], "times": [3, 1, 1]}"#, "\n",
            r#"{"action": "revoke", "history": ["a"]}"#, "\n",
            r#"{"action": "revoke", "history": ["a"]}"#, "\n",
        );

        let mut graph = graph();
        let mut output: Vec<u8> = Vec::new();
        let stats = run(&mut graph, input.as_bytes(), &mut output).await.unwrap();

        assert_eq!(
            stats,
            RunStats {
                received: 4,
                rejected: 2,
                emitted: 2
            }
        );

        let events: Vec<Event> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, Action::Alert);
        assert_eq!(events[0].dt(), Some(6.0));
        assert_eq!(events[1].action, Action::Revoke);
        assert_eq!(events[1].history.source(), Some("diff"));
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped() {
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(br#"{"action": "alert", "history": ["a"], "times": [9, 5, 7]}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"action": "alert", "history": ["b"], "times": [3, 1, 1]}"#);
        input.push(b'\n');

        let mut graph = graph();
        let mut output: Vec<u8> = Vec::new();
        let stats = run(&mut graph, &input[..], &mut output).await.unwrap();

        assert_eq!(
            stats,
            RunStats {
                received: 2,
                rejected: 1,
                emitted: 1
            }
        );
        let event: Event = serde_json::from_slice(&output).unwrap();
        assert_eq!(event.action, Action::Alert);
        assert_eq!(event.dt(), Some(6.0));
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let input = concat!(
            r#"{"action": "alert", "history": ["a"], "times": [1, 2]}"#, "\r\n",
            r#"{"action": "alert", "history": ["b"], "times": [1, 1]}"#,
        );
        let mut graph = graph();
        let mut output: Vec<u8> = Vec::new();
        let stats = run(&mut graph, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(stats.received, 2);
        assert_eq!(stats.emitted, 1);
    }

    #[tokio::test]
    async fn empty_input_is_fine() {
        let mut graph = graph();
        let mut output: Vec<u8> = Vec::new();
        let stats = run(&mut graph, &b""[..], &mut output).await.unwrap();
        assert_eq!(stats, RunStats::default());
        assert!(output.is_empty());
    }
}
