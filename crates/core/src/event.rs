// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle events reported by the scheduler

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Job lifecycle events, in emission order on the scheduler's event channel.
///
/// Serializes with `{"type": "job:started", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A job was added to the scheduler. Emitted once per successful add.
    #[serde(rename = "job:loaded")]
    Loaded { job_id: JobId, name: String },

    /// An invocation began. Hook runs report their own `Started`.
    #[serde(rename = "job:started")]
    Started {
        job_id: JobId,
        name: String,
        started_at: DateTime<Utc>,
    },

    /// An invocation ended; `error` is `None` on success.
    #[serde(rename = "job:finished")]
    Finished {
        job_id: JobId,
        name: String,
        duration: Duration,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Infrastructure failure outside the job's own command, such as an
    /// output file that could not be created or a hook that could not be
    /// prepared.
    #[serde(rename = "job:error")]
    Error {
        job_id: JobId,
        name: String,
        error: String,
    },
}

impl Event {
    /// Serialized type tag of this event
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Loaded { .. } => "job:loaded",
            Event::Started { .. } => "job:started",
            Event::Finished { .. } => "job:finished",
            Event::Error { .. } => "job:error",
        }
    }

    pub fn job_id(&self) -> &JobId {
        match self {
            Event::Loaded { job_id, .. }
            | Event::Started { job_id, .. }
            | Event::Finished { job_id, .. }
            | Event::Error { job_id, .. } => job_id,
        }
    }

    /// Display name of the job (or hook) the event belongs to
    pub fn job_name(&self) -> &str {
        match self {
            Event::Loaded { name, .. }
            | Event::Started { name, .. }
            | Event::Finished { name, .. }
            | Event::Error { name, .. } => name,
        }
    }

    /// True for a failed invocation or an infrastructure error
    pub fn is_failure(&self) -> bool {
        match self {
            Event::Finished { error, .. } => error.is_some(),
            Event::Error { .. } => true,
            Event::Loaded { .. } | Event::Started { .. } => false,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
