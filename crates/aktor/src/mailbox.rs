//! # Mailbox
//!
//! The ordered queue owned by one actor. Many [`MailboxSender`]s may feed it, exactly
//! one [`Mailbox`] drains it. Both halves are thin wrappers over Tokio's `mpsc`
//! channels, picking the bounded or unbounded flavour from [`MailboxCapacity`].

use crate::config::MailboxCapacity;
use crate::error::{MailboxError, TellError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Creates a mailbox and the first sender feeding it.
pub fn channel<M>(capacity: MailboxCapacity) -> (MailboxSender<M>, Mailbox<M>) {
    match capacity {
        MailboxCapacity::Unbounded => {
            let (sender, receiver) = mpsc::unbounded_channel();
            (
                MailboxSender::Unbounded(sender),
                Mailbox::Unbounded(receiver),
            )
        }
        MailboxCapacity::Bounded(size) => {
            let (sender, receiver) = mpsc::channel(size.get());
            (MailboxSender::Bounded(sender), Mailbox::Bounded(receiver))
        }
    }
}

/// The send side of a mailbox.
pub enum MailboxSender<M> {
    Unbounded(mpsc::UnboundedSender<M>),
    Bounded(mpsc::Sender<M>),
}

impl<M> Clone for MailboxSender<M> {
    fn clone(&self) -> Self {
        match self {
            MailboxSender::Unbounded(s) => MailboxSender::Unbounded(s.clone()),
            MailboxSender::Bounded(s) => MailboxSender::Bounded(s.clone()),
        }
    }
}

impl<M> MailboxSender<M> {
    /// Enqueues `msg`. Only a bounded, full mailbox makes this wait.
    pub async fn send(&self, msg: M) -> Result<(), TellError<M>> {
        match self {
            MailboxSender::Unbounded(s) => s.send(msg).map_err(|e| TellError::Closed(e.0)),
            MailboxSender::Bounded(s) => s.send(msg).await.map_err(|e| TellError::Closed(e.0)),
        }
    }

    /// Enqueues `msg` without waiting.
    pub fn try_send(&self, msg: M) -> Result<(), TellError<M>> {
        match self {
            MailboxSender::Unbounded(s) => s.send(msg).map_err(|e| TellError::Closed(e.0)),
            MailboxSender::Bounded(s) => s.try_send(msg).map_err(|e| match e {
                mpsc::error::TrySendError::Full(m) => TellError::Full(m),
                mpsc::error::TrySendError::Closed(m) => TellError::Closed(m),
            }),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            MailboxSender::Unbounded(s) => s.is_closed(),
            MailboxSender::Bounded(s) => s.is_closed(),
        }
    }

    /// Resolves once the receiving side has been closed or dropped.
    pub async fn closed(&self) {
        match self {
            MailboxSender::Unbounded(s) => s.closed().await,
            MailboxSender::Bounded(s) => s.closed().await,
        }
    }

    pub(crate) fn downgrade(&self) -> WeakMailboxSender<M> {
        match self {
            MailboxSender::Unbounded(s) => WeakMailboxSender::Unbounded(s.downgrade()),
            MailboxSender::Bounded(s) => WeakMailboxSender::Bounded(s.downgrade()),
        }
    }
}

/// A sender that does not keep the mailbox open.
pub(crate) enum WeakMailboxSender<M> {
    Unbounded(mpsc::WeakUnboundedSender<M>),
    Bounded(mpsc::WeakSender<M>),
}

impl<M> WeakMailboxSender<M> {
    pub(crate) fn upgrade(&self) -> Option<MailboxSender<M>> {
        match self {
            WeakMailboxSender::Unbounded(s) => s.upgrade().map(MailboxSender::Unbounded),
            WeakMailboxSender::Bounded(s) => s.upgrade().map(MailboxSender::Bounded),
        }
    }
}

/// The receive side of a mailbox, owned by exactly one actor.
pub enum Mailbox<M> {
    Unbounded(mpsc::UnboundedReceiver<M>),
    Bounded(mpsc::Receiver<M>),
}

impl<M> Mailbox<M> {
    /// Removes the oldest message, waiting while the mailbox is empty.
    ///
    /// Cancellation of `token` is checked before every dequeue, so once the token
    /// fires no further message is handed out even if some are queued.
    pub async fn receive(&mut self, token: &CancellationToken) -> Result<M, MailboxError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(MailboxError::Cancelled),
            msg = self.recv() => msg.ok_or(MailboxError::Closed),
        }
    }

    /// Removes the oldest message; `None` once every sender is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<M> {
        match self {
            Mailbox::Unbounded(r) => r.recv().await,
            Mailbox::Bounded(r) => r.recv().await,
        }
    }

    /// Non-waiting dequeue.
    pub fn try_recv(&mut self) -> Option<M> {
        match self {
            Mailbox::Unbounded(r) => r.try_recv().ok(),
            Mailbox::Bounded(r) => r.try_recv().ok(),
        }
    }

    /// Rejects further sends. Already queued messages stay receivable.
    pub fn close(&mut self) {
        match self {
            Mailbox::Unbounded(r) => r.close(),
            Mailbox::Bounded(r) => r.close(),
        }
    }
}
