//! # Demo Orchestration
//!
//! Wires the demo actors together through [`ActorSystem::app`]. Each `app` call is a
//! self-contained run: it returns only once every actor it started has terminated.
//!
//! 1. **Guardian pings** - the stock [`Logger`] guardian logs three messages.
//! 2. **Counter** - a stateful guardian sums numbers and reports to a logger sibling.
//! 3. **Foreman** - a guardian dispatching jobs to worker children; the run lasts as
//!    long as the slowest job.

use crate::counter::{Counter, CounterMsg};
use crate::foreman::{Foreman, Job};
use aktor::{ActorSystem, Logger, SystemError};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// What one demo run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSummary {
    pub jobs_dispatched: u32,
    pub elapsed: Duration,
}

/// Runs all demo apps, one after the other, on `system`.
pub async fn run_demo(system: &ActorSystem, jobs: u32) -> Result<DemoSummary, SystemError> {
    let start = Instant::now();

    system
        .app::<String, _, _>("guardian", |guardian, _scope| async move {
            for n in 1..=3 {
                if let Err(e) = guardian.tell(format!("ping {n}")).await {
                    warn!(error = %e, "Guardian unreachable");
                }
            }
        })
        .await?;

    system
        .app_with("counter", Counter::new(), |counter, scope| async move {
            let report = match scope.spawn("report", Logger::<u64>::new()) {
                Ok(report) => report,
                Err(e) => {
                    warn!(error = %e, "Could not spawn report logger");
                    return;
                }
            };
            for n in 1..=10 {
                let _ = counter.tell(CounterMsg::Add(n)).await;
            }
            let _ = counter.tell(CounterMsg::Report { reply_to: report }).await;
        })
        .await?;

    system
        .app_with("foreman", Foreman::new(None), |foreman, _scope| async move {
            for id in 1..=jobs {
                let job = Job {
                    id,
                    duration: Duration::from_millis(50 * u64::from(id)),
                };
                if foreman.tell(job).await.is_err() {
                    warn!(job = id, "Foreman stopped accepting jobs");
                    break;
                }
            }
        })
        .await?;

    let summary = DemoSummary {
        jobs_dispatched: jobs,
        elapsed: start.elapsed(),
    };
    info!(?summary, "Demo complete");
    Ok(summary)
}
