//! A stateful actor: keeps a running total and reports it on request.

use aktor::{Actor, ActorContext, ActorRef};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug)]
pub enum CounterMsg {
    Add(u64),
    /// Sends the current total to `reply_to`.
    Report { reply_to: ActorRef<u64> },
}

/// Errors that can occur while counting.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CounterError {
    #[error("adding {amount} to {total} overflows")]
    Overflow { total: u64, amount: u64 },
}

#[derive(Debug, Default)]
pub struct Counter {
    total: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(total: u64) -> Self {
        Self { total }
    }
}

#[async_trait]
impl Actor for Counter {
    type Message = CounterMsg;
    type Error = CounterError;

    async fn handle(
        &mut self,
        msg: CounterMsg,
        ctx: &mut ActorContext<CounterMsg>,
    ) -> Result<(), CounterError> {
        match msg {
            CounterMsg::Add(amount) => {
                self.total = self
                    .total
                    .checked_add(amount)
                    .ok_or(CounterError::Overflow {
                        total: self.total,
                        amount,
                    })?;
                debug!(counter = ctx.name(), amount, total = self.total, "Added");
            }
            CounterMsg::Report { reply_to } => {
                info!(counter = ctx.name(), total = self.total, to = %reply_to, "Reporting");
                // A reply address that went away is not this actor's fault.
                let _ = reply_to.tell(self.total).await;
            }
        }
        Ok(())
    }
}
