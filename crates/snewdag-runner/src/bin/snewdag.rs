//! snewdag binary
//!
//! Streams JSON-line events from stdin through a configured pipeline and
//! writes whatever leaves the graph to stdout.
//!
//! Usage:
//!   snewdag [pipeline.json]
//!
//! Environment:
//!   SNEWDAG_CONFIG  Pipeline file when no argument is given (default: ./pipeline.json)
//!   RUST_LOG        Log filter (default: snewdag=info); logs go to stderr

use snewdag_runner::{config_path, Graph, PipelineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries events, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snewdag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = config_path(std::env::args().nth(1));
    tracing::info!(path = %path.display(), "loading pipeline");

    let config = PipelineConfig::load(&path)?;
    let mut graph = Graph::from_config(&config)?;
    tracing::info!(nodes = graph.len(), "pipeline ready");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stats = snewdag_runner::run(&mut graph, stdin, tokio::io::stdout()).await?;

    tracing::info!(
        received = stats.received,
        rejected = stats.rejected,
        emitted = stats.emitted,
        "done"
    );
    Ok(())
}
