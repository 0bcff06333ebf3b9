//! # Actor System
//!
//! The entry point of an application. An [`ActorSystem`] is a plain value: build it
//! from a [`SystemConfig`], call [`ActorSystem::app`] as many times as you like, and
//! [`shutdown`](ActorSystem::shutdown) it to cancel whatever is still running.
//!
//! ## Structured Lifetimes
//!
//! Each `app` call opens a fresh root scope, spawns a guardian actor in it, and runs
//! your action with the guardian's ref. When the action returns, `app` waits for
//! **every** actor spawned inside that scope, transitively, to terminate. Nothing
//! outlives the call: the scope is cancelled on the way out, so even a leaked
//! [`ActorScope`] clone cannot start new actors afterwards.
//!
//! Actors terminate on their own once nobody can reach them (all refs dropped and
//! mailbox drained). Actors that keep each other alive never do; set
//! [`SystemConfig::shutdown_timeout`] to bound the wait.

use crate::actor::{Actor, Logger};
use crate::actor_ref::ActorRef;
use crate::config::SystemConfig;
use crate::error::SystemError;
use crate::scope::{ActorOptions, ActorScope};
use std::fmt::Debug;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, warn, Instrument};

/// Explicit runtime context for one or more `app` runs.
#[derive(Debug, Clone, Default)]
pub struct ActorSystem {
    config: SystemConfig,
    token: CancellationToken,
}

impl ActorSystem {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            config,
            token: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// Runs `action` against a [`Logger`] guardian named `name`.
    ///
    /// ```rust
    /// use aktor::{ActorSystem, SystemConfig};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let system = ActorSystem::new(SystemConfig::default());
    ///     system
    ///         .app("guardian", |guardian, _scope| async move {
    ///             guardian.tell("hello".to_string()).await.unwrap();
    ///         })
    ///         .await
    ///         .unwrap();
    /// }
    /// ```
    pub async fn app<M, F, Fut>(&self, name: &str, action: F) -> Result<(), SystemError>
    where
        M: Debug + Send + 'static,
        F: FnOnce(ActorRef<M>, ActorScope) -> Fut,
        Fut: Future<Output = ()>,
    {
        self.app_with(name, Logger::<M>::new(), action).await
    }

    /// Runs `action` against a custom guardian actor.
    ///
    /// `action` also receives the app's root scope, to spawn siblings of the guardian.
    pub async fn app_with<A, F, Fut>(
        &self,
        name: &str,
        guardian: A,
        action: F,
    ) -> Result<(), SystemError>
    where
        A: Actor,
        F: FnOnce(ActorRef<A::Message>, ActorScope) -> Fut,
        Fut: Future<Output = ()>,
    {
        let scope = ActorScope::root(
            name.to_string(),
            self.token.child_token(),
            ActorOptions::from_config(&self.config),
        );
        let span = info_span!("app", name);

        async {
            let guardian_ref = scope.spawn(name, guardian)?;
            info!(guardian = %guardian_ref, "App started");

            action(guardian_ref, scope.clone()).await;

            let result = self.wind_down(name, &scope).await;
            // Teardown: a scope clone that escaped the action can no longer spawn.
            scope.cancel();
            info!("App finished");
            result
        }
        .instrument(span)
        .await
    }

    async fn wind_down(&self, name: &str, scope: &ActorScope) -> Result<(), SystemError> {
        info!(active = scope.active_actors(), "Waiting for actors");
        let Some(after) = self.config.shutdown_timeout else {
            scope.join().await;
            return Ok(());
        };
        if tokio::time::timeout(after, scope.join()).await.is_ok() {
            return Ok(());
        }
        warn!(?after, active = scope.active_actors(), "Shutdown timeout, cancelling remaining actors");
        scope.cancel();
        scope.join().await;
        Err(SystemError::ShutdownTimeout {
            name: name.to_string(),
            after,
        })
    }

    /// Cancels every scope of every `app` running on this system. Running `app` calls
    /// return once their actors have unwound; later calls fail to spawn.
    pub fn shutdown(&self) {
        info!("Shutting down actor system");
        self.token.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.token.is_cancelled()
    }
}
