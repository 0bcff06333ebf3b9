//! # Actor Scopes
//!
//! An [`ActorScope`] is the spawn factory and the lifetime boundary of the actors it
//! creates. It pairs a [`CancellationToken`] (cancelling the scope cancels every actor
//! spawned in it, transitively) with a [`TaskTracker`] (joining the scope waits for all
//! of them).
//!
//! Every actor gets a scope of its own for its children, nested under the scope it was
//! spawned in, so the tree of scopes mirrors the tree of actors.

use crate::actor::{self, Actor, ActorContext};
use crate::actor_ref::{ActorId, ActorRef};
use crate::config::{FaultPolicy, MailboxCapacity, SystemConfig};
use crate::error::SpawnError;
use crate::mailbox;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info_span, Instrument};

/// Scheduling context for one actor.
#[derive(Debug, Clone, Default)]
pub struct ActorOptions {
    pub capacity: MailboxCapacity,
    pub fault_policy: FaultPolicy,
    /// Runtime the actor's loop is scheduled on. `None` uses the current runtime.
    pub runtime: Option<Handle>,
}

impl ActorOptions {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            capacity: config.mailbox_capacity,
            fault_policy: config.fault_policy,
            runtime: None,
        }
    }

    pub fn with_capacity(mut self, capacity: MailboxCapacity) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    pub fn on_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }
}

/// Spawn factory and lifetime boundary for actors. Clones share the same scope.
#[derive(Clone)]
pub struct ActorScope {
    path: Arc<str>,
    token: CancellationToken,
    tracker: TaskTracker,
    defaults: ActorOptions,
}

impl ActorScope {
    /// A standalone root scope with default options.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, ActorOptions::default())
    }

    pub fn with_options(name: impl Into<String>, defaults: ActorOptions) -> Self {
        Self::root(name.into(), CancellationToken::new(), defaults)
    }

    pub(crate) fn root(name: String, token: CancellationToken, defaults: ActorOptions) -> Self {
        Self {
            path: name.into(),
            token,
            tracker: TaskTracker::new(),
            defaults,
        }
    }

    /// A sub-scope: cancelled with this one, joined by this one, cancellable on its own.
    pub fn child(&self, name: &str) -> Self {
        Self {
            path: format!("{}/{}", self.path, name).into(),
            token: self.token.child_token(),
            tracker: self.tracker.clone(),
            defaults: self.defaults.clone(),
        }
    }

    /// Scope for the children of an actor living in this scope.
    fn nested(&self, name: &str) -> Self {
        Self {
            path: format!("{}/{}", self.path, name).into(),
            token: self.token.child_token(),
            tracker: TaskTracker::new(),
            defaults: self.defaults.clone(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn defaults(&self) -> &ActorOptions {
        &self.defaults
    }

    /// Spawns `actor` with this scope's default options.
    pub fn spawn<A: Actor>(
        &self,
        name: impl Into<String>,
        actor: A,
    ) -> Result<ActorRef<A::Message>, SpawnError> {
        self.spawn_with(name, actor, self.defaults.clone())
    }

    /// Creates the actor's mailbox, starts its loop and returns a ref to it.
    ///
    /// Fails with [`SpawnError::ScopeCancelled`] once the scope is cancelled: a
    /// cancelled scope never starts new work.
    pub fn spawn_with<A: Actor>(
        &self,
        name: impl Into<String>,
        actor: A,
        options: ActorOptions,
    ) -> Result<ActorRef<A::Message>, SpawnError> {
        let name: String = name.into();
        if self.token.is_cancelled() {
            return Err(SpawnError::ScopeCancelled {
                scope: self.path.to_string(),
                actor: name,
            });
        }
        let handle = match options.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| SpawnError::NoRuntime {
                actor: name.clone(),
            })?,
        };

        let id = ActorId::next();
        let (sender, mailbox) = mailbox::channel(options.capacity);
        let actor_ref = ActorRef::new(id, name.as_str().into(), sender);
        let children = self.nested(&name);
        let ctx = ActorContext::new(id, name.as_str().into(), actor_ref.downgrade(), children.clone());

        debug!(scope = %self.path, actor = %name, %id, capacity = %options.capacity, "Spawning actor");
        let span = info_span!("actor", name = %name, %id);
        let running = handle.spawn(actor::run(actor, mailbox, ctx, options.fault_policy).instrument(span.clone()));
        // The tracked task outlives the loop until the children are gone, even on a panic.
        self.tracker.spawn_on(
            async move {
                if let Err(e) = running.await {
                    if e.is_panic() {
                        error!("Actor panicked, cancelling its children");
                    }
                    children.cancel();
                    children.join().await;
                }
            }
            .instrument(span),
            &handle,
        );
        Ok(actor_ref)
    }

    /// Cancels every actor in this scope and its sub-scopes.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Number of actors in this scope whose loop has not finished yet.
    pub fn active_actors(&self) -> usize {
        self.tracker.len()
    }

    /// Waits until every actor spawned in this scope has terminated.
    pub async fn join(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl std::fmt::Debug for ActorScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorScope")
            .field("path", &self.path)
            .field("cancelled", &self.token.is_cancelled())
            .field("active_actors", &self.tracker.len())
            .finish()
    }
}
