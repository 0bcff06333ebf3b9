//! # Actor References
//!
//! [`ActorRef`] is the only way to reach an actor from the outside. It wraps the send
//! side of the actor's mailbox and nothing else, so actor state stays private.

use crate::error::TellError;
use crate::mailbox::{MailboxSender, WeakMailboxSender};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-unique identity of a spawned actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        ActorId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A send-only handle to an actor.
///
/// Cheap to clone; every clone feeds the same mailbox. The mailbox stays open as long
/// as at least one `ActorRef` exists, so dropping the last one lets the actor wind down
/// once it has drained its queue.
///
/// Two refs are equal when they point at the same actor ([`ActorId`]).
pub struct ActorRef<M> {
    id: ActorId,
    name: Arc<str>,
    sender: MailboxSender<M>,
}

impl<M> ActorRef<M> {
    pub(crate) fn new(id: ActorId, name: Arc<str>, sender: MailboxSender<M>) -> Self {
        Self { id, name, sender }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fire-and-forget send.
    ///
    /// Returns as soon as the message is queued. With a bounded mailbox this waits for
    /// free space. Fails only when the actor has terminated, handing the message back.
    pub async fn tell(&self, msg: M) -> Result<(), TellError<M>> {
        self.sender.send(msg).await
    }

    /// Like [`tell`](Self::tell) but never waits; a full bounded mailbox is an error.
    pub fn try_tell(&self, msg: M) -> Result<(), TellError<M>> {
        self.sender.try_send(msg)
    }

    /// `true` once the actor stopped accepting messages.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Resolves once the actor has terminated.
    pub async fn closed(&self) {
        self.sender.closed().await
    }

    pub(crate) fn downgrade(&self) -> WeakActorRef<M> {
        WeakActorRef {
            id: self.id,
            name: self.name.clone(),
            sender: self.sender.downgrade(),
        }
    }
}

impl<M> Clone for ActorRef<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<M> PartialEq for ActorRef<M> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<M> Eq for ActorRef<M> {}

impl<M> Hash for ActorRef<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<M> fmt::Debug for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl<M> fmt::Display for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.id)
    }
}

/// Self-reference held by an actor's context; does not keep the mailbox open.
pub(crate) struct WeakActorRef<M> {
    id: ActorId,
    name: Arc<str>,
    sender: WeakMailboxSender<M>,
}

impl<M> WeakActorRef<M> {
    pub(crate) fn upgrade(&self) -> Option<ActorRef<M>> {
        self.sender
            .upgrade()
            .map(|sender| ActorRef::new(self.id, self.name.clone(), sender))
    }
}
