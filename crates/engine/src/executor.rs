// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job executor: one job's run state machine

use crate::output::{OutputSettings, RunOutput};
use crate::RunError;
use chrono::Utc;
use kron_adapters::{
    compose_env, process_context, resolve_user, ProcessAdapter, ProcessContext, ProcessError,
    ProcessHandle, ProcessSpec, Program, Sink,
};
use kron_core::{Event, IdGen, JobId, SequentialIdGen};
use kron_jobfile::{ExecPolicy, HookKind, JobSpec, SpecError};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Default)]
struct RunState {
    /// In-flight primary runs, keyed by run number
    runs: HashMap<u64, ProcessHandle>,
    /// In-flight hook runs; they do not count toward the parallel guard
    hooks: HashMap<u64, ProcessHandle>,
    next_run: u64,
    retired: bool,
}

/// Owns one job spec and executes its invocations.
///
/// The run state lock is private to this executor, so unrelated jobs
/// never contend with each other.
pub struct JobExecutor<P> {
    id: JobId,
    spec: JobSpec,
    process: P,
    events: mpsc::Sender<Event>,
    output: OutputSettings,
    names: SequentialIdGen,
    state: Mutex<RunState>,
}

/// Removes a run from the in-flight set when dropped
struct Slot<'a> {
    state: &'a Mutex<RunState>,
    run: u64,
    hook: bool,
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if self.hook {
            state.hooks.remove(&self.run);
        } else {
            state.runs.remove(&self.run);
        }
    }
}

impl<P: ProcessAdapter> JobExecutor<P> {
    pub(crate) fn new(
        id: JobId,
        spec: JobSpec,
        process: P,
        events: mpsc::Sender<Event>,
        output: OutputSettings,
        names: SequentialIdGen,
    ) -> Self {
        Self {
            id,
            spec,
            process,
            events,
            output,
            names,
            state: Mutex::new(RunState::default()),
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn spec(&self) -> &JobSpec {
        &self.spec
    }

    /// True while any primary run is in flight
    pub fn is_running(&self) -> bool {
        !self.state.lock().runs.is_empty()
    }

    /// Run one scheduled invocation: output capture, events, and hooks.
    ///
    /// Every outcome except `AlreadyRunning` and `Retired` is also reported
    /// on the event channel.
    pub async fn run(&self) -> Result<(), RunError> {
        let (slot, ctx) = self.reserve()?;
        let run = slot.run;
        let name = self.display_name();
        let output = RunOutput::for_run(&self.output.dir, &name, &self.id, run);

        let (stdout, stderr) = match output.open() {
            Ok(files) => files,
            Err(e) => {
                drop(slot);
                tracing::error!(job_id = %self.id, name, error = %e, "cannot capture output");
                self.emit(Event::Error {
                    job_id: self.id.clone(),
                    name,
                    error: e.to_string(),
                })
                .await;
                return Err(e);
            }
        };

        let started = Instant::now();
        self.emit(Event::Started {
            job_id: self.id.clone(),
            name: name.clone(),
            started_at: Utc::now(),
        })
        .await;

        let result = self
            .invoke(
                &self.spec.exec,
                ctx,
                Sink::File(stdout),
                Sink::File(stderr),
                Vec::new(),
            )
            .await;
        drop(slot);

        self.emit(Event::Finished {
            job_id: self.id.clone(),
            name: name.clone(),
            duration: started.elapsed(),
            error: result.as_ref().err().map(ToString::to_string),
        })
        .await;

        if let Some((kind, policy)) = self.spec.hook_for(result.is_err()) {
            self.run_hook(kind, policy, &name, &output).await;
        }

        output.apply(self.output.retention);
        result
    }

    /// Run the primary command once with the scheduler's own stdio. No
    /// events, no hooks, no deadline beyond the job's timeout.
    pub async fn run_attached(&self) -> Result<(), RunError> {
        let (slot, ctx) = self.reserve()?;
        let result = self
            .invoke(&self.spec.exec, ctx, Sink::Inherit, Sink::Inherit, Vec::new())
            .await;
        drop(slot);
        result
    }

    /// Terminate every in-flight run and hook.
    ///
    /// The runs are forgotten whether or not termination succeeds; each
    /// failed termination is returned.
    pub async fn stop(&self) -> Vec<ProcessError> {
        let handles: Vec<ProcessHandle> = {
            let mut state = self.state.lock();
            let mut handles: Vec<ProcessHandle> = state.runs.drain().map(|(_, h)| h).collect();
            handles.extend(state.hooks.drain().map(|(_, h)| h));
            handles
        };

        let mut errors = Vec::new();
        for handle in handles {
            if let Err(e) = handle.terminate().await {
                tracing::warn!(job_id = %self.id, error = %e, "failed to terminate run");
                errors.push(e);
            }
        }
        errors
    }

    /// Reject all future invocations. In-flight runs are unaffected.
    pub(crate) fn retire(&self) {
        self.state.lock().retired = true;
    }

    /// Atomically check the parallel guard and register a new run.
    fn reserve(&self) -> Result<(Slot<'_>, ProcessContext), RunError> {
        let mut state = self.state.lock();
        if state.retired {
            return Err(RunError::Retired(self.spec.label().to_string()));
        }
        if !self.spec.parallel && !state.runs.is_empty() {
            return Err(RunError::AlreadyRunning(self.spec.label().to_string()));
        }

        state.next_run += 1;
        let run = state.next_run;
        let (handle, ctx) = process_context(self.spec.exec.timeout);
        state.runs.insert(run, handle);
        Ok((
            Slot {
                state: &self.state,
                run,
                hook: false,
            },
            ctx,
        ))
    }

    fn reserve_hook(&self, policy: &ExecPolicy) -> (Slot<'_>, ProcessContext) {
        let mut state = self.state.lock();
        state.next_run += 1;
        let run = state.next_run;
        let (handle, ctx) = process_context(policy.timeout);
        state.hooks.insert(run, handle);
        (
            Slot {
                state: &self.state,
                run,
                hook: true,
            },
            ctx,
        )
    }

    fn display_name(&self) -> String {
        if self.spec.name.is_empty() {
            self.names.next()
        } else {
            self.spec.name.clone()
        }
    }

    /// Run a completion hook with the run's output paths as trailing args.
    /// Hook failures never touch the primary invocation's result.
    async fn run_hook(&self, kind: HookKind, policy: &ExecPolicy, name: &str, output: &RunOutput) {
        let hook_name = format!("{} {} hook", name, kind);
        let prepared = if policy.is_runnable() {
            self.process_spec(policy, Sink::Null, Sink::Null, output.hook_args())
        } else {
            Err(SpecError::MissingCommand(hook_name.clone()).into())
        };
        let spec = match prepared {
            Ok(spec) => spec,
            Err(e) => {
                tracing::error!(job_id = %self.id, hook = hook_name, error = %e, "hook abandoned");
                self.emit(Event::Error {
                    job_id: self.id.clone(),
                    name: hook_name,
                    error: e.to_string(),
                })
                .await;
                return;
            }
        };

        let (slot, ctx) = self.reserve_hook(policy);
        let started = Instant::now();
        self.emit(Event::Started {
            job_id: self.id.clone(),
            name: hook_name.clone(),
            started_at: Utc::now(),
        })
        .await;

        let result = self.process.run(spec, ctx).await;
        drop(slot);

        self.emit(Event::Finished {
            job_id: self.id.clone(),
            name: hook_name,
            duration: started.elapsed(),
            error: result.err().map(|e| e.to_string()),
        })
        .await;
    }

    async fn invoke(
        &self,
        policy: &ExecPolicy,
        ctx: ProcessContext,
        stdout: Sink,
        stderr: Sink,
        args: Vec<String>,
    ) -> Result<(), RunError> {
        let spec = self.process_spec(policy, stdout, stderr, args)?;
        self.process.run(spec, ctx).await?;
        Ok(())
    }

    /// Translate an execution policy into a complete process description.
    /// A `command` takes precedence over a `script`.
    fn process_spec(
        &self,
        policy: &ExecPolicy,
        stdout: Sink,
        stderr: Sink,
        args: Vec<String>,
    ) -> Result<ProcessSpec, RunError> {
        let user = policy
            .user
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(resolve_user)
            .transpose()?;

        let program = if policy.command.trim().is_empty() {
            Program::Script {
                interpreter: policy.interpreter.clone(),
                body: policy.script.clone(),
            }
        } else {
            Program::Argv(policy.command_argv())
        };

        Ok(ProcessSpec {
            program,
            args,
            workdir: policy.workdir.clone(),
            env: compose_env(&policy.env, policy.sysenv),
            user,
            stdout,
            stderr,
        })
    }

    async fn emit(&self, event: Event) {
        if self.events.send(event).await.is_err() {
            tracing::debug!(job_id = %self.id, "event receiver dropped");
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
