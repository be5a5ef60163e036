// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child process environment composition

use indexmap::IndexMap;

/// PATH given to children that do not inherit the scheduler's environment
pub const DEFAULT_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// Build a child's full environment from a job's `env` map.
///
/// With `sysenv`, the scheduler's own environment sits underneath and
/// job entries override it. Without it, the child sees only the job's
/// entries plus a default `PATH` unless the job sets one.
pub fn compose_env(job_env: &IndexMap<String, String>, sysenv: bool) -> Vec<(String, String)> {
    let base = if sysenv {
        std::env::vars().collect()
    } else {
        Vec::new()
    };
    overlay(base, job_env)
}

fn overlay(base: Vec<(String, String)>, job_env: &IndexMap<String, String>) -> Vec<(String, String)> {
    let mut merged: IndexMap<String, String> = base.into_iter().collect();
    for (key, value) in job_env {
        merged.insert(key.clone(), value.clone());
    }
    if !merged.contains_key("PATH") {
        merged.insert("PATH".to_string(), DEFAULT_PATH.to_string());
    }
    merged.into_iter().collect()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
