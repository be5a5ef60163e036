// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock trigger driven by cron expressions

use super::{FireFn, Schedule, SubscriptionId, TriggerAdapter, TriggerError};
use chrono::Local;
use std::sync::Arc;
use tokio::task::JoinHandle;

struct Subscription {
    id: SubscriptionId,
    expr: String,
    schedule: Arc<Schedule>,
    on_fire: FireFn,
}

/// Trigger that sleeps until each subscription's next fire time.
///
/// Must be started inside a tokio runtime.
#[derive(Default)]
pub struct CronTrigger {
    subscriptions: Vec<Subscription>,
    tickers: Vec<JoinHandle<()>>,
    started: bool,
    next_id: u64,
}

impl CronTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_ticker(sub: &Subscription) -> JoinHandle<()> {
        let schedule = Arc::clone(&sub.schedule);
        let on_fire = Arc::clone(&sub.on_fire);
        let expr = sub.expr.clone();
        tokio::spawn(async move {
            loop {
                let Some(delay) = schedule.next_delay(Local::now()) else {
                    tracing::debug!(expr, "schedule has no further fire times");
                    return;
                };
                tokio::time::sleep(delay).await;
                tracing::trace!(expr, "fired");
                tokio::spawn(on_fire());
            }
        })
    }
}

impl TriggerAdapter for CronTrigger {
    fn register(&mut self, expr: &str, on_fire: FireFn) -> Result<SubscriptionId, TriggerError> {
        let schedule = Schedule::parse(expr)?;
        self.next_id += 1;
        let sub = Subscription {
            id: SubscriptionId(self.next_id),
            expr: expr.to_string(),
            schedule: Arc::new(schedule),
            on_fire,
        };
        if self.started {
            self.tickers.push(Self::spawn_ticker(&sub));
        }
        let id = sub.id;
        self.subscriptions.push(sub);
        Ok(id)
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.tickers = self.subscriptions.iter().map(Self::spawn_ticker).collect();
        tracing::debug!(subscriptions = self.subscriptions.len(), "trigger started");
    }

    fn stop(&mut self) {
        for ticker in self.tickers.drain(..) {
            ticker.abort();
        }
        if self.started {
            tracing::debug!("trigger stopped");
        }
        self.started = false;
    }

    fn is_started(&self) -> bool {
        self.started
    }

    fn fresh(&self) -> Self {
        Self::new()
    }
}

impl Drop for CronTrigger {
    fn drop(&mut self) {
        for ticker in &self.tickers {
            ticker.abort();
        }
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
