//! # aktor demo
//!
//! Sample actors built on [`aktor`], used by the `aktor-demo` binary and its tests.
//!
//! - **[`counter`]**: a stateful actor with a reply address in its messages.
//! - **[`foreman`]**: a guardian that spawns one worker child per job.
//! - **[`lifecycle`]**: runs both through [`aktor::ActorSystem::app`].

pub mod counter;
pub mod foreman;
pub mod lifecycle;
