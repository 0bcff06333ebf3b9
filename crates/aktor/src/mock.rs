//! # Test Probes
//!
//! Utilities for asserting what actors send, without spinning up a real receiver.
//!
//! A [`TestProbe`] is an [`ActorRef`] whose mailbox is read by the test instead of an
//! actor loop. Hand `probe.actor_ref()` to the actor under test as a reply address,
//! then assert on what arrives with [`TestProbe::expect_message`],
//! [`TestProbe::receive_n`] and [`TestProbe::expect_no_message`].
//!
//! [`Relay`] closes the loop in the other direction: it is a real actor that forwards
//! every message it processes to a target ref, which makes the processing order of
//! any mailbox observable.
//!
//! ```rust
//! use aktor::mock::{Relay, TestProbe};
//! use aktor::ActorScope;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scope = ActorScope::new("doc");
//!     let mut probe = TestProbe::<u32>::new("probe");
//!     let relay = scope.spawn("relay", Relay::new(probe.actor_ref())).unwrap();
//!
//!     relay.tell(1).await.unwrap();
//!     relay.tell(2).await.unwrap();
//!
//!     assert_eq!(probe.receive_n(2, Duration::from_secs(1)).await, vec![1, 2]);
//! }
//! ```

use crate::actor::{Actor, ActorContext};
use crate::actor_ref::{ActorId, ActorRef};
use crate::config::MailboxCapacity;
use crate::error::TellError;
use crate::mailbox::{self, Mailbox};
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// An inspectable mailbox with a ref that actors can send to.
///
/// The assertion helpers panic on failure, like the rest of a test.
pub struct TestProbe<M> {
    actor_ref: ActorRef<M>,
    mailbox: Mailbox<M>,
}

impl<M: Debug> TestProbe<M> {
    pub fn new(name: &str) -> Self {
        let (sender, mailbox) = mailbox::channel(MailboxCapacity::Unbounded);
        Self {
            actor_ref: ActorRef::new(ActorId::next(), name.into(), sender),
            mailbox,
        }
    }

    /// The address to hand to the actor under test.
    pub fn actor_ref(&self) -> ActorRef<M> {
        self.actor_ref.clone()
    }

    /// Waits for the next message.
    pub async fn expect_message(&mut self, timeout: Duration) -> M {
        match tokio::time::timeout(timeout, self.mailbox.recv()).await {
            Ok(Some(msg)) => msg,
            Ok(None) => panic!("probe {} closed while waiting for a message", self.actor_ref),
            Err(_) => panic!("probe {} received nothing within {:?}", self.actor_ref, timeout),
        }
    }

    /// Collects exactly `n` messages, each within `timeout`.
    pub async fn receive_n(&mut self, n: usize, timeout: Duration) -> Vec<M> {
        let mut received = Vec::with_capacity(n);
        for _ in 0..n {
            received.push(self.expect_message(timeout).await);
        }
        received
    }

    /// Asserts nothing arrives during `window`.
    pub async fn expect_no_message(&mut self, window: Duration) {
        if let Ok(Some(msg)) = tokio::time::timeout(window, self.mailbox.recv()).await {
            panic!("probe {} expected silence but got {:?}", self.actor_ref, msg);
        }
    }

    /// Non-waiting check for a queued message.
    pub fn try_receive(&mut self) -> Option<M> {
        self.mailbox.try_recv()
    }
}

/// An actor that forwards every message to `target`.
pub struct Relay<M> {
    target: ActorRef<M>,
}

impl<M> Relay<M> {
    pub fn new(target: ActorRef<M>) -> Self {
        Self { target }
    }
}

#[async_trait]
impl<M: Debug + Send + Sync + 'static> Actor for Relay<M> {
    type Message = M;
    type Error = TellError<M>;

    async fn handle(&mut self, msg: M, _ctx: &mut ActorContext<M>) -> Result<(), TellError<M>> {
        self.target.tell(msg).await
    }
}
