// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake trigger for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FireFn, Schedule, SubscriptionId, TriggerAdapter, TriggerError};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Recorded trigger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCall {
    Register { expr: String },
    Start,
    Stop,
    Fresh,
}

struct FakeSubscription {
    expr: String,
    on_fire: FireFn,
}

#[derive(Default)]
struct FakeTriggerState {
    subscriptions: Vec<FakeSubscription>,
    calls: Vec<TriggerCall>,
    started: bool,
    next_id: u64,
}

/// Fake trigger that fires only when told to.
///
/// Clones (and triggers produced by `fresh`) share state, so a test can
/// keep a handle after moving the trigger into a scheduler.
#[derive(Clone, Default)]
pub struct FakeTrigger {
    inner: Arc<Mutex<FakeTriggerState>>,
}

impl FakeTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TriggerCall> {
        self.inner.lock().calls.clone()
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.lock().subscriptions.len()
    }

    /// Registered expressions, in registration order
    pub fn expressions(&self) -> Vec<String> {
        self.inner
            .lock()
            .subscriptions
            .iter()
            .map(|s| s.expr.clone())
            .collect()
    }

    /// Fire every subscription, each on its own task. No-op while stopped.
    pub fn fire_all(&self) -> Vec<JoinHandle<()>> {
        self.fire_matching(|_| true)
    }

    /// Fire subscriptions registered with `expr`. No-op while stopped.
    pub fn fire(&self, expr: &str) -> Vec<JoinHandle<()>> {
        self.fire_matching(|e| e == expr)
    }

    fn fire_matching(&self, matches: impl Fn(&str) -> bool) -> Vec<JoinHandle<()>> {
        let callbacks: Vec<FireFn> = {
            let inner = self.inner.lock();
            if !inner.started {
                return Vec::new();
            }
            inner
                .subscriptions
                .iter()
                .filter(|s| matches(&s.expr))
                .map(|s| Arc::clone(&s.on_fire))
                .collect()
        };
        callbacks.into_iter().map(|f| tokio::spawn(f())).collect()
    }
}

impl TriggerAdapter for FakeTrigger {
    fn register(&mut self, expr: &str, on_fire: FireFn) -> Result<SubscriptionId, TriggerError> {
        Schedule::parse(expr)?;
        let mut inner = self.inner.lock();
        inner.calls.push(TriggerCall::Register {
            expr: expr.to_string(),
        });
        inner.next_id += 1;
        inner.subscriptions.push(FakeSubscription {
            expr: expr.to_string(),
            on_fire,
        });
        Ok(SubscriptionId(inner.next_id))
    }

    fn start(&mut self) {
        let mut inner = self.inner.lock();
        inner.calls.push(TriggerCall::Start);
        inner.started = true;
    }

    fn stop(&mut self) {
        let mut inner = self.inner.lock();
        inner.calls.push(TriggerCall::Stop);
        inner.started = false;
    }

    fn is_started(&self) -> bool {
        self.inner.lock().started
    }

    fn fresh(&self) -> Self {
        let mut inner = self.inner.lock();
        inner.calls.push(TriggerCall::Fresh);
        inner.subscriptions.clear();
        inner.started = false;
        self.clone()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
