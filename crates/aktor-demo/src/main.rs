//! Runs the demo apps.
//!
//! ```bash
//! RUST_LOG=info cargo run -p aktor-demo
//! AKTOR_SHUTDOWN_TIMEOUT_MS=5000 RUST_LOG=trace cargo run -p aktor-demo
//! ```

use aktor::tracing::setup_tracing;
use aktor::{ActorSystem, SystemConfig};
use aktor_demo::lifecycle::run_demo;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = SystemConfig::from_env().map_err(|e| e.to_string())?;
    let system = ActorSystem::new(config);
    info!(config = ?system.config(), "Starting actor system");

    let summary = run_demo(&system, 5).await.map_err(|e| e.to_string())?;

    info!(
        jobs = summary.jobs_dispatched,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Application completed successfully"
    );
    Ok(())
}
