// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-based trigger adapters
//!
//! A trigger holds subscriptions (schedule expression plus callback) and,
//! once started, invokes each callback on its own task whenever the
//! expression fires. Callbacks never block the trigger or each other.

mod cron;
mod schedule;

pub use self::cron::CronTrigger;
pub use schedule::Schedule;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTrigger, TriggerCall};

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Future produced by one fire of a subscription
pub type FireFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback invoked on every fire
pub type FireFn = Arc<dyn Fn() -> FireFuture + Send + Sync>;

/// Handle to a registered subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Errors from trigger operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("invalid schedule '{expr}': {reason}")]
    InvalidSchedule { expr: String, reason: String },
}

/// Adapter that fires callbacks on schedule expressions
pub trait TriggerAdapter: Send + 'static {
    /// Add a subscription. Fires only while the trigger is started.
    fn register(&mut self, expr: &str, on_fire: FireFn) -> Result<SubscriptionId, TriggerError>;

    /// Begin firing. Idempotent.
    fn start(&mut self);

    /// Stop firing. Callbacks already in flight keep running.
    fn stop(&mut self);

    fn is_started(&self) -> bool;

    /// A new, empty, stopped trigger of the same kind
    fn fresh(&self) -> Self
    where
        Self: Sized;
}
