// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler registry: the set of scheduled jobs and their trigger binding

use crate::executor::JobExecutor;
use crate::output::OutputSettings;
use crate::{RunError, SchedulerError, StopErrors, StopFailure};
use kron_adapters::{FireFn, FireFuture, ProcessAdapter, SubscriptionId, TriggerAdapter};
use kron_core::{Event, IdGen, JobId, SequentialIdGen, UuidIdGen};
use kron_jobfile::{load_jobs, JobSpec};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Capacity of the event channel. A full channel blocks the emitting run.
pub const EVENT_CHANNEL_CAPACITY: usize = 10;

/// Read side of the scheduler's event channel
pub type EventReader = mpsc::Receiver<Event>;

/// A job bound to its trigger subscription
struct ScheduledEntry<P> {
    subscription: SubscriptionId,
    job: Arc<JobExecutor<P>>,
}

struct Registry<T, P> {
    trigger: T,
    jobs: Vec<ScheduledEntry<P>>,
}

/// Registry of scheduled jobs.
///
/// All mutations of the job list and trigger binding happen under one
/// registry lock; each job's run state has its own lock.
pub struct Scheduler<T, P, I = UuidIdGen> {
    registry: Mutex<Registry<T, P>>,
    process: P,
    ids: I,
    names: SequentialIdGen,
    output: OutputSettings,
    events: mpsc::Sender<Event>,
}

impl<T, P, I> Scheduler<T, P, I>
where
    T: TriggerAdapter,
    P: ProcessAdapter,
    I: IdGen,
{
    /// Create a registry and the read side of its event channel.
    ///
    /// Fails only when the output directory cannot be created.
    pub fn new(
        trigger: T,
        process: P,
        ids: I,
        output: OutputSettings,
    ) -> Result<(Self, EventReader), SchedulerError> {
        std::fs::create_dir_all(&output.dir).map_err(|source| SchedulerError::Storage {
            path: output.dir.clone(),
            source,
        })?;

        let (events, reader) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let scheduler = Self {
            registry: Mutex::new(Registry {
                trigger,
                jobs: Vec::new(),
            }),
            process,
            ids,
            names: SequentialIdGen::new("task"),
            output,
            events,
        };
        Ok((scheduler, reader))
    }

    /// Validate, register with the trigger, and announce a job.
    pub async fn add(&self, spec: JobSpec) -> Result<JobId, SchedulerError> {
        spec.validate()?;

        let mut registry = self.registry.lock().await;
        let id = JobId::new(self.ids.next());
        let job = Arc::new(JobExecutor::new(
            id.clone(),
            spec,
            self.process.clone(),
            self.events.clone(),
            self.output.clone(),
            self.names.clone(),
        ));

        let subscription = registry
            .trigger
            .register(&job.spec().schedule, fire_fn(Arc::clone(&job)))?;

        let name = job.spec().name.clone();
        tracing::info!(job_id = %id, name, schedule = job.spec().schedule, "job registered");
        if self
            .events
            .send(Event::Loaded {
                job_id: id.clone(),
                name,
            })
            .await
            .is_err()
        {
            tracing::debug!("event receiver dropped");
        }

        registry.jobs.push(ScheduledEntry { subscription, job });
        Ok(id)
    }

    /// Add specs in order, stopping at the first failure. Jobs added
    /// before the failure stay registered.
    pub async fn add_all(
        &self,
        specs: impl IntoIterator<Item = JobSpec>,
    ) -> Result<Vec<JobId>, SchedulerError> {
        let mut ids = Vec::new();
        for spec in specs {
            ids.push(self.add(spec).await?);
        }
        Ok(ids)
    }

    /// Load a job file and add every job in it.
    pub async fn add_file(&self, path: &Path) -> Result<Vec<JobId>, SchedulerError> {
        let specs = load_jobs(path)?;
        tracing::info!(path = %path.display(), count = specs.len(), "loading job file");
        self.add_all(specs).await
    }

    /// Begin firing registered schedules. Idempotent.
    pub async fn start(&self) {
        let mut registry = self.registry.lock().await;
        registry.trigger.start();
        tracing::info!(jobs = registry.jobs.len(), "scheduler started");
    }

    pub async fn is_started(&self) -> bool {
        self.registry.lock().await.trigger.is_started()
    }

    /// Stop firing and terminate every in-flight run.
    pub async fn stop(&self) -> Result<(), StopErrors> {
        let mut registry = self.registry.lock().await;
        let errors = stop_all(&mut registry).await;
        tracing::info!(failures = errors.len(), "scheduler stopped");
        errors.into_result()
    }

    /// Stop, then discard every job and replace the trigger binding.
    ///
    /// The registry is emptied even when some runs failed to stop; the
    /// collected stop failures are returned afterwards.
    pub async fn clear(&self) -> Result<(), StopErrors> {
        let mut registry = self.registry.lock().await;
        for entry in &registry.jobs {
            entry.job.retire();
        }
        let errors = stop_all(&mut registry).await;

        let discarded = registry.jobs.len();
        registry.jobs.clear();
        registry.trigger = registry.trigger.fresh();
        tracing::info!(discarded, failures = errors.len(), "scheduler cleared");
        errors.into_result()
    }

    /// First job registered under `name`
    pub async fn get(&self, name: &str) -> Option<Arc<JobExecutor<P>>> {
        let registry = self.registry.lock().await;
        registry
            .jobs
            .iter()
            .find(|entry| entry.job.spec().name == name)
            .map(|entry| Arc::clone(&entry.job))
    }

    /// Snapshot of every registered job, in registration order
    pub async fn jobs(&self) -> Vec<Arc<JobExecutor<P>>> {
        let registry = self.registry.lock().await;
        registry
            .jobs
            .iter()
            .map(|entry| Arc::clone(&entry.job))
            .collect()
    }
}

async fn stop_all<T: TriggerAdapter, P: ProcessAdapter>(
    registry: &mut Registry<T, P>,
) -> StopErrors {
    registry.trigger.stop();

    let mut errors = StopErrors::default();
    for entry in &registry.jobs {
        for source in entry.job.stop().await {
            tracing::warn!(
                job_id = %entry.job.id(),
                subscription = entry.subscription.0,
                error = %source,
                "job did not stop"
            );
            errors.push(StopFailure {
                job_id: entry.job.id().clone(),
                name: entry.job.spec().label().to_string(),
                source,
            });
        }
    }
    errors
}

/// Trigger callback: run the job on the firing task.
fn fire_fn<P: ProcessAdapter>(job: Arc<JobExecutor<P>>) -> FireFn {
    Arc::new(move || -> FireFuture {
        let job = Arc::clone(&job);
        Box::pin(async move {
            match job.run().await {
                Ok(()) => {}
                Err(e @ RunError::AlreadyRunning(_)) => {
                    tracing::warn!(job_id = %job.id(), error = %e, "skipped scheduled run");
                }
                // Already reported on the event channel
                Err(e) => tracing::debug!(job_id = %job.id(), error = %e, "scheduled run failed"),
            }
        })
    })
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
