//! # aktor
//!
//! A small, single-process actor runtime on top of Tokio: one mailbox per actor,
//! strictly sequential message processing, and structured lifetimes.
//!
//! ## Architecture Overview
//!
//! The crate is layered from the leaves up:
//!
//! 1. **[`mailbox`]** - an ordered multi-producer / single-consumer queue, unbounded by
//!    default, optionally bounded ([`MailboxCapacity`]).
//! 2. **[`Actor`]** - your behaviour. The runtime owns the mailbox and the loop
//!    (`receive` → `handle` → repeat) and guarantees one message at a time.
//! 3. **[`ActorRef`]** - the only handle the outside world gets: `tell` and nothing else.
//! 4. **[`ActorScope`]** - the spawn factory. Cancelling a scope cancels every actor in
//!    it; joining a scope waits for all of them.
//! 5. **[`ActorSystem`]** - the entry point. `app` spawns a guardian actor, runs your
//!    action, and returns only after every actor it started has terminated.
//!
//! ## Quick Start
//!
//! ```rust
//! use aktor::{Actor, ActorContext, ActorSystem, SystemConfig};
//! use async_trait::async_trait;
//! use std::convert::Infallible;
//!
//! struct Greeter {
//!     greeted: usize,
//! }
//!
//! #[async_trait]
//! impl Actor for Greeter {
//!     type Message = String;
//!     type Error = Infallible;
//!
//!     async fn handle(&mut self, name: String, ctx: &mut ActorContext<String>) -> Result<(), Infallible> {
//!         self.greeted += 1;
//!         tracing::info!("[{}] hello {name} (#{})", ctx.name(), self.greeted);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let system = ActorSystem::new(SystemConfig::default());
//!     system
//!         .app_with("greeter", Greeter { greeted: 0 }, |greeter, _scope| async move {
//!             greeter.tell("Alice".to_string()).await.unwrap();
//!             greeter.tell("Bob".to_string()).await.unwrap();
//!         })
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task.
//! - Messages are processed **sequentially** within an actor (no locks needed for its state).
//! - Different actors run concurrently; there is no ordering between them.
//! - Cancellation is cooperative: it is observed at `receive` and at every await inside a
//!   handler, never swallowed.
//!
//! ## Failure Model
//!
//! A handler error is local to its actor. [`FaultPolicy::Stop`] (the default) logs it and
//! terminates the actor; [`FaultPolicy::Resume`] logs it and drops the message. There is
//! no restart.
//!
//! ## Testing
//!
//! See [`mock`] for [`TestProbe`](mock::TestProbe) and [`Relay`](mock::Relay).

pub mod actor;
pub mod actor_ref;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod mock;
pub mod scope;
pub mod system;
pub mod tracing;

// Re-export core types for convenience
pub use actor::{Actor, ActorContext, ActorExit, Logger};
pub use actor_ref::{ActorId, ActorRef};
pub use config::{FaultPolicy, MailboxCapacity, SystemConfig};
pub use error::{ConfigError, MailboxError, SpawnError, SystemError, TellError};
pub use scope::{ActorOptions, ActorScope};
pub use system::ActorSystem;
