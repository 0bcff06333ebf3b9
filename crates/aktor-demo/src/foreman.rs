//! A guardian that hands each job to a short-lived worker child.
//!
//! The foreman never waits for a job itself: it spawns a `Worker`, tells it the job
//! and drops the ref. The worker runs the job, its mailbox closes, and it exits. The
//! foreman in turn only finishes after all of its workers did, which is what lets
//! `ActorSystem::app` wait for every job without tracking them by hand.

use aktor::{Actor, ActorContext, ActorRef, SpawnError};
use async_trait::async_trait;
use std::convert::Infallible;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u32,
    pub duration: Duration,
}

/// Sent to the report address when a worker finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDone {
    pub id: u32,
    pub worker: String,
}

pub struct Foreman {
    report_to: Option<ActorRef<JobDone>>,
    dispatched: u32,
}

impl Foreman {
    pub fn new(report_to: Option<ActorRef<JobDone>>) -> Self {
        Self {
            report_to,
            dispatched: 0,
        }
    }
}

#[async_trait]
impl Actor for Foreman {
    type Message = Job;
    type Error = SpawnError;

    async fn handle(&mut self, job: Job, ctx: &mut ActorContext<Job>) -> Result<(), SpawnError> {
        self.dispatched += 1;
        let worker = ctx.spawn(
            format!("worker-{}", job.id),
            Worker {
                report_to: self.report_to.clone(),
            },
        )?;
        info!(job = job.id, %worker, dispatched = self.dispatched, "Dispatched");
        let _ = worker.tell(job).await;
        Ok(())
    }
}

pub struct Worker {
    report_to: Option<ActorRef<JobDone>>,
}

#[async_trait]
impl Actor for Worker {
    type Message = Job;
    type Error = Infallible;

    async fn handle(&mut self, job: Job, ctx: &mut ActorContext<Job>) -> Result<(), Infallible> {
        info!("[{}] working on job {} for {:?}", ctx.name(), job.id, job.duration);
        tokio::time::sleep(job.duration).await;
        if let Some(report_to) = &self.report_to {
            let _ = report_to
                .tell(JobDone {
                    id: job.id,
                    worker: ctx.name().to_string(),
                })
                .await;
        }
        Ok(())
    }
}
