//! # Configuration
//!
//! Runtime knobs for an [`ActorSystem`](crate::ActorSystem). Everything has a default,
//! and [`SystemConfig::from_env`] lets deployments override it without code changes:
//!
//! | variable | values | default |
//! |----------|--------|---------|
//! | `AKTOR_MAILBOX_CAPACITY` | `unbounded` or a positive integer | `unbounded` |
//! | `AKTOR_FAULT_POLICY` | `stop` or `resume` | `stop` |
//! | `AKTOR_SHUTDOWN_TIMEOUT_MS` | milliseconds | none (wait forever) |
//!
//! Log verbosity is not part of this struct, it comes from `RUST_LOG`
//! (see [`setup_tracing`](crate::tracing::setup_tracing)).

use crate::error::ConfigError;
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_MAILBOX_CAPACITY: &str = "AKTOR_MAILBOX_CAPACITY";
pub const ENV_FAULT_POLICY: &str = "AKTOR_FAULT_POLICY";
pub const ENV_SHUTDOWN_TIMEOUT_MS: &str = "AKTOR_SHUTDOWN_TIMEOUT_MS";

/// How many messages a mailbox holds before `tell` starts waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailboxCapacity {
    /// `tell` never waits. Memory is the only limit.
    #[default]
    Unbounded,
    /// `tell` waits while the mailbox holds this many messages.
    Bounded(NonZeroUsize),
}

impl MailboxCapacity {
    /// Convenience constructor; `0` means unbounded.
    pub fn bounded(size: usize) -> Self {
        NonZeroUsize::new(size).map_or(MailboxCapacity::Unbounded, MailboxCapacity::Bounded)
    }
}

impl FromStr for MailboxCapacity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("unbounded") {
            return Ok(MailboxCapacity::Unbounded);
        }
        s.parse::<NonZeroUsize>()
            .map(MailboxCapacity::Bounded)
            .map_err(|e| ConfigError::InvalidValue {
                key: ENV_MAILBOX_CAPACITY,
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for MailboxCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailboxCapacity::Unbounded => write!(f, "unbounded"),
            MailboxCapacity::Bounded(n) => write!(f, "{n}"),
        }
    }
}

/// What an actor does when its handler returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Log the error and terminate the actor.
    #[default]
    Stop,
    /// Log the error, drop the message and keep processing.
    Resume,
}

impl FromStr for FaultPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop" => Ok(FaultPolicy::Stop),
            "resume" => Ok(FaultPolicy::Resume),
            other => Err(ConfigError::InvalidValue {
                key: ENV_FAULT_POLICY,
                value: other.to_string(),
                reason: "expected `stop` or `resume`".to_string(),
            }),
        }
    }
}

/// Settings for one [`ActorSystem`](crate::ActorSystem).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemConfig {
    /// Default mailbox capacity for every actor spawned without explicit options.
    pub mailbox_capacity: MailboxCapacity,
    /// Default fault policy for every actor spawned without explicit options.
    pub fault_policy: FaultPolicy,
    /// How long `app` waits for actors after its action returned before cancelling them.
    pub shutdown_timeout: Option<Duration>,
}

impl SystemConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source. Missing keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_MAILBOX_CAPACITY) {
            config.mailbox_capacity = value.parse()?;
        }
        if let Some(value) = lookup(ENV_FAULT_POLICY) {
            config.fault_policy = value.parse()?;
        }
        if let Some(value) = lookup(ENV_SHUTDOWN_TIMEOUT_MS) {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: ENV_SHUTDOWN_TIMEOUT_MS,
                    value: value.clone(),
                    reason: e.to_string(),
                })?;
            config.shutdown_timeout = Some(Duration::from_millis(millis));
        }
        Ok(config)
    }

    pub fn with_mailbox_capacity(mut self, capacity: MailboxCapacity) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = Some(timeout);
        self
    }
}
