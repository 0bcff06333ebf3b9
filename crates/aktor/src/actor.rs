//! # Actors and the Message Loop
//!
//! This module defines the [`Actor`] trait, the [`ActorContext`] handed to every hook,
//! and the run loop that drives an actor. The loop is written once and works for any
//! message type: the actor only supplies `handle`.
//!
//! ## The Loop
//!
//! ```text
//! on_start ─► receive ─► handle ─► receive ─► handle ─► ... ─► on_stop
//!                │                                │
//!                └──── cancelled / closed ◄───────┘
//! ```
//!
//! Messages are processed one at a time. `handle` runs to completion before the next
//! message is dequeued, so actor state needs no locks.
//!
//! ## Termination
//!
//! An actor stops when
//! - its scope is cancelled (checked at `receive` and at every await inside `handle`),
//! - every [`ActorRef`] to it is gone and the mailbox is drained,
//! - it calls [`ActorContext::stop`], or
//! - `handle` fails and the [`FaultPolicy`] is `Stop`.
//!
//! On a drained-mailbox exit the actor waits for its children before finishing.
//! On every other exit its children are cancelled.

use crate::actor_ref::{ActorId, ActorRef, WeakActorRef};
use crate::config::FaultPolicy;
use crate::error::{MailboxError, SpawnError};
use crate::mailbox::Mailbox;
use crate::scope::{ActorOptions, ActorScope};
use async_trait::async_trait;
use std::convert::Infallible;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// Behaviour of an actor.
///
/// # Provided Methods (Hooks)
/// - [`Actor::on_start`] runs before the first message.
/// - [`Actor::on_stop`] runs after the last one, whatever the exit reason.
///
/// Both default to doing nothing.
#[async_trait]
pub trait Actor: Send + 'static {
    /// The messages this actor accepts.
    type Message: Debug + Send + 'static;

    /// Error returned by a failing handler. Use [`Infallible`] if handling cannot fail.
    type Error: std::error::Error + Send + Sync + 'static;

    async fn on_start(&mut self, _ctx: &mut ActorContext<Self::Message>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Processes one message. Never runs concurrently with another `handle` of the same actor.
    async fn handle(
        &mut self,
        msg: Self::Message,
        ctx: &mut ActorContext<Self::Message>,
    ) -> Result<(), Self::Error>;

    fn on_stop(&mut self, _ctx: &mut ActorContext<Self::Message>, _exit: &ActorExit) {}
}

/// Why an actor's loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorExit {
    /// Every `ActorRef` was dropped and the mailbox drained.
    MailboxClosed,
    /// The actor called [`ActorContext::stop`].
    Stopped,
    /// The owning scope was cancelled.
    Cancelled,
    /// `on_start` failed, or `handle` failed under [`FaultPolicy::Stop`].
    Failed(String),
}

impl fmt::Display for ActorExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorExit::MailboxClosed => write!(f, "mailbox closed"),
            ActorExit::Stopped => write!(f, "stopped"),
            ActorExit::Cancelled => write!(f, "cancelled"),
            ActorExit::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-actor runtime handle passed to every hook.
pub struct ActorContext<M> {
    id: ActorId,
    name: Arc<str>,
    myself: WeakActorRef<M>,
    scope: ActorScope,
    stopping: bool,
}

impl<M: Send + 'static> ActorContext<M> {
    pub(crate) fn new(id: ActorId, name: Arc<str>, myself: WeakActorRef<M>, scope: ActorScope) -> Self {
        Self {
            id,
            name,
            myself,
            scope,
            stopping: false,
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A ref to this actor, e.g. to hand out as a reply address.
    ///
    /// `None` once every external ref is gone: the context itself never keeps the
    /// mailbox open.
    pub fn myself(&self) -> Option<ActorRef<M>> {
        self.myself.upgrade()
    }

    /// The scope children of this actor are spawned in.
    pub fn scope(&self) -> &ActorScope {
        &self.scope
    }

    /// Spawns a child actor with the scope's default options.
    pub fn spawn<A: Actor>(
        &self,
        name: impl Into<String>,
        actor: A,
    ) -> Result<ActorRef<A::Message>, SpawnError> {
        self.scope.spawn(name, actor)
    }

    pub fn spawn_with<A: Actor>(
        &self,
        name: impl Into<String>,
        actor: A,
        options: ActorOptions,
    ) -> Result<ActorRef<A::Message>, SpawnError> {
        self.scope.spawn_with(name, actor, options)
    }

    /// Stops the actor once the current message is handled. Children are cancelled.
    pub fn stop(&mut self) {
        self.stopping = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }
}

/// The stock actor: logs every message it receives as `[name] message`.
pub struct Logger<M> {
    _marker: PhantomData<fn(M)>,
}

impl<M> Logger<M> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<M> Default for Logger<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M: Debug + Send + 'static> Actor for Logger<M> {
    type Message = M;
    type Error = Infallible;

    async fn handle(&mut self, msg: M, ctx: &mut ActorContext<M>) -> Result<(), Infallible> {
        info!("[{}] {:?}", ctx.name(), msg);
        Ok(())
    }
}

/// Drives `actor` until one of the exit conditions holds, then winds down its children.
pub(crate) async fn run<A: Actor>(
    mut actor: A,
    mut mailbox: Mailbox<A::Message>,
    mut ctx: ActorContext<A::Message>,
    policy: FaultPolicy,
) -> ActorExit {
    let token = ctx.scope.token().clone();

    info!("Actor started");

    let started = tokio::select! {
        biased;
        _ = token.cancelled() => Err(ActorExit::Cancelled),
        result = actor.on_start(&mut ctx) => result.map_err(|e| {
            error!(error = %e, "on_start failed");
            ActorExit::Failed(e.to_string())
        }),
    };

    let exit = match started {
        Err(exit) => exit,
        Ok(()) => loop {
            let msg = match mailbox.receive(&token).await {
                Ok(msg) => msg,
                Err(MailboxError::Cancelled) => break ActorExit::Cancelled,
                Err(MailboxError::Closed) => break ActorExit::MailboxClosed,
            };
            trace!(?msg, "Processing");

            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                result = actor.handle(msg, &mut ctx) => Some(result),
            };
            match outcome {
                None => break ActorExit::Cancelled,
                Some(Ok(())) => {}
                Some(Err(e)) => match policy {
                    FaultPolicy::Stop => {
                        error!(error = %e, "Handler failed, stopping actor");
                        break ActorExit::Failed(e.to_string());
                    }
                    FaultPolicy::Resume => {
                        warn!(error = %e, "Handler failed, message dropped");
                    }
                },
            }

            if ctx.stopping {
                break ActorExit::Stopped;
            }
        },
    };

    mailbox.close();
    actor.on_stop(&mut ctx, &exit);

    if exit != ActorExit::MailboxClosed {
        token.cancel();
    }
    let children = ctx.scope.active_actors();
    if children > 0 {
        debug!(children, "Waiting for children");
    }
    ctx.scope.join().await;
    // Close the scope to late spawns, then pick up any that raced the first join.
    token.cancel();
    ctx.scope.join().await;

    match &exit {
        ActorExit::Failed(_) => warn!(%exit, "Actor terminated"),
        _ => info!(%exit, "Actor terminated"),
    }
    exit
}
