// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job specification

use indexmap::IndexMap;
use kron_core::parse_duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from validating a job specification
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("invalid job config: {0} has neither command nor script")]
    MissingCommand(String),
}

/// What to run and how: shared by a job and its hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawExecPolicy")]
pub struct ExecPolicy {
    /// Working directory (inherits the scheduler's when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workdir: Option<PathBuf>,
    /// Command line, split on whitespace into argv
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,
    /// Script body, handed to the interpreter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub script: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    /// Merge the scheduler's own environment underneath `env`
    pub sysenv: bool,
    /// Interpreter argv for scripts (defaults to `sh`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interpreter: Vec<String>,
    /// Run as this user (name or numeric uid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Kill the process after this long. `None` is unbounded.
    #[serde(
        serialize_with = "serialize_timeout",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

/// File form of [`ExecPolicy`]. The legacy `duration` key counts bare
/// integers in nanoseconds where `timeout` counts seconds; `timeout` wins
/// when both are set.
#[derive(Deserialize)]
struct RawExecPolicy {
    #[serde(default)]
    workdir: Option<PathBuf>,
    #[serde(default)]
    command: String,
    #[serde(default)]
    script: String,
    #[serde(default, deserialize_with = "deserialize_env")]
    env: IndexMap<String, String>,
    #[serde(default)]
    sysenv: bool,
    #[serde(default)]
    interpreter: Vec<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timeout")]
    timeout: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_legacy_duration")]
    duration: Option<Duration>,
}

impl From<RawExecPolicy> for ExecPolicy {
    fn from(raw: RawExecPolicy) -> Self {
        Self {
            workdir: raw.workdir,
            command: raw.command,
            script: raw.script,
            env: raw.env,
            sysenv: raw.sysenv,
            interpreter: raw.interpreter,
            user: raw.user,
            timeout: raw.timeout.or(raw.duration),
        }
    }
}

impl ExecPolicy {
    /// True when there is something to execute
    pub fn is_runnable(&self) -> bool {
        !self.command.trim().is_empty() || !self.script.trim().is_empty()
    }

    /// Split `command` into argv
    pub fn command_argv(&self) -> Vec<String> {
        self.command.split_whitespace().map(String::from).collect()
    }
}

/// A scheduled job as loaded from a job file. Immutable once added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Display name; anonymous jobs get `task-<n>` at first run
    #[serde(default)]
    pub name: String,
    /// Trigger expression, opaque to the job itself
    #[serde(default, rename = "cron", alias = "schedule")]
    pub schedule: String,
    /// Allow a new invocation while a previous one is still running
    #[serde(default)]
    pub parallel: bool,
    #[serde(
        default,
        rename = "onerror",
        alias = "on_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub on_error: Option<ExecPolicy>,
    #[serde(
        default,
        rename = "oncomplete",
        alias = "on_complete",
        skip_serializing_if = "Option::is_none"
    )]
    pub on_complete: Option<ExecPolicy>,
    #[serde(flatten)]
    pub exec: ExecPolicy,
}

impl JobSpec {
    /// Reject specs that have nothing to run.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.exec.is_runnable() {
            Ok(())
        } else {
            Err(SpecError::MissingCommand(self.label().to_string()))
        }
    }

    /// Name for messages; anonymous jobs read as `<anonymous>`
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            "<anonymous>"
        } else {
            &self.name
        }
    }

    /// Hook policy to run after an invocation with the given outcome
    pub fn hook_for(&self, failed: bool) -> Option<(HookKind, &ExecPolicy)> {
        if failed {
            self.on_error.as_ref().map(|h| (HookKind::OnError, h))
        } else {
            self.on_complete.as_ref().map(|h| (HookKind::OnComplete, h))
        }
    }
}

/// Which completion hook is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    OnError,
    OnComplete,
}

impl HookKind {
    /// Label used in hook event names (`"<job> onerror hook"`)
    pub fn label(self) -> &'static str {
        match self {
            HookKind::OnError => "onerror",
            HookKind::OnComplete => "oncomplete",
        }
    }
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEnv {
    Map(IndexMap<String, serde_json::Value>),
    List(Vec<String>),
}

/// Accept `env` as a map (`{KEY: value}`) or a list of `KEY=VALUE` strings.
fn deserialize_env<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let env = match RawEnv::deserialize(deserializer)? {
        RawEnv::Map(map) => map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect(),
        RawEnv::List(entries) => entries
            .into_iter()
            .map(|entry| match entry.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (entry, String::new()),
            })
            .collect(),
    };
    Ok(env)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimeout {
    Count(u64),
    Text(String),
}

/// Accept a timeout as integer seconds or a duration string. Zero means none.
fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_timeout_with(deserializer, Duration::from_secs)
}

/// Like [`deserialize_timeout`], but integers are nanoseconds.
fn deserialize_legacy_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_timeout_with(deserializer, Duration::from_nanos)
}

fn deserialize_timeout_with<'de, D>(
    deserializer: D,
    from_count: fn(u64) -> Duration,
) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let timeout = match RawTimeout::deserialize(deserializer)? {
        RawTimeout::Count(n) => from_count(n),
        RawTimeout::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom)?,
    };
    Ok(Some(timeout).filter(|t| !t.is_zero()))
}

fn serialize_timeout<S>(timeout: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match timeout {
        Some(t) => serializer.serialize_str(&format!("{}ms", t.as_millis())),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
