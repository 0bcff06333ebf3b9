//! # Observability & Tracing
//!
//! The runtime logs through the `tracing` crate with structured fields. Every actor
//! loop runs inside an `actor` span carrying its `name` and `id`, so any event emitted
//! while handling a message (including the ones from your own handlers) is attributed
//! to the actor that produced it.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle** (`info`): `Actor started`, `Actor terminated exit=...`
//! - **Faults** (`error` / `warn`): failing handlers, with the fault policy's decision
//! - **Spawning** (`debug`): scope path, actor name, id and mailbox capacity
//! - **Traffic** (`trace`): every processed message with its `Debug` payload
//! - **[`Logger`](crate::Logger)** (`info`): `[name] message` for each message
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run -p aktor-demo     # lifecycle + logger output
//! RUST_LOG=trace cargo run -p aktor-demo    # every message
//! RUST_LOG=aktor=debug cargo run -p aktor-demo
//! ```
//!
//! With `RUST_LOG=info` the demo prints lines such as:
//!
//! ```text
//! INFO actor{name="guardian" id=1}: Actor started
//! INFO actor{name="guardian" id=1}: [guardian] "ping 1"
//! INFO actor{name="guardian" id=1}: Actor terminated exit=mailbox closed
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Call once, at the start of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

/// Like [`setup_tracing`] but tolerates an already installed subscriber, for tests.
pub fn try_setup_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .with_test_writer()
        .try_init()
        .is_ok()
}
