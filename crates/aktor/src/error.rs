//! # Framework Errors
//!
//! This module defines the error types used throughout the actor runtime.
//! Cancellation is not an error for the actor itself: it shows up here only as
//! [`MailboxError::Cancelled`], the signal a suspended `receive` resolves to.

use std::time::Duration;

/// Errors raised while scheduling a new actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("scope {scope} is cancelled, cannot spawn {actor}")]
    ScopeCancelled { scope: String, actor: String },
    #[error("no tokio runtime available to spawn {actor}")]
    NoRuntime { actor: String },
}

/// A message that could not be delivered. The message is handed back to the caller.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TellError<M> {
    #[error("actor mailbox is closed")]
    Closed(M),
    #[error("actor mailbox is full")]
    Full(M),
}

impl<M> TellError<M> {
    /// Recovers the undelivered message.
    pub fn into_inner(self) -> M {
        match self {
            TellError::Closed(msg) | TellError::Full(msg) => msg,
        }
    }
}

/// Why a `receive` returned without a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MailboxError {
    #[error("receive cancelled")]
    Cancelled,
    #[error("mailbox closed and drained")]
    Closed,
}

/// Errors surfaced by [`ActorSystem::app`](crate::ActorSystem::app).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error("app {name} did not wind down within {after:?}, remaining actors were cancelled")]
    ShutdownTimeout { name: String, after: Duration },
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}
