// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule expression parsing

use super::TriggerError;
use chrono::{DateTime, Local};
use kron_core::parse_duration;
use std::str::FromStr;
use std::time::Duration;

/// A parsed schedule expression
#[derive(Debug, Clone)]
pub enum Schedule {
    /// Calendar schedule (`sec min hour dom month dow [year]` or `@daily`)
    Cron(Box<cron::Schedule>),
    /// Fixed interval from `@every <duration>`
    Every(Duration),
}

impl Schedule {
    /// Parse an expression. Five-field expressions get a zero seconds field.
    pub fn parse(expr: &str) -> Result<Self, TriggerError> {
        let trimmed = expr.trim();
        let invalid = |reason: String| TriggerError::InvalidSchedule {
            expr: expr.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("empty expression".to_string()));
        }

        if let Some(interval) = trimmed.strip_prefix("@every") {
            let every = parse_duration(interval.trim()).map_err(|e| invalid(e.to_string()))?;
            if every.is_zero() {
                return Err(invalid("interval must be positive".to_string()));
            }
            return Ok(Schedule::Every(every));
        }

        let normalized = if !trimmed.starts_with('@') && trimmed.split_whitespace().count() == 5 {
            format!("0 {}", trimmed)
        } else {
            trimmed.to_string()
        };
        let schedule =
            cron::Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))?;
        Ok(Schedule::Cron(Box::new(schedule)))
    }

    /// Time from `now` until the next fire, or `None` when the schedule is exhausted.
    pub fn next_delay(&self, now: DateTime<Local>) -> Option<Duration> {
        match self {
            Schedule::Every(every) => Some(*every),
            Schedule::Cron(schedule) => {
                let next = schedule.after(&now).next()?;
                Some((next - now).to_std().unwrap_or(Duration::ZERO))
            }
        }
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
