// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job file parsing (JSON, YAML, and TOML)
//!
//! A file holds either a list of jobs or a single job object. A single
//! object is normalized to a one-element list, so hand-written one-job
//! files load exactly like their wrapped form.

use crate::JobSpec;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Job file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Pick the format from a file extension (`.json`, `.yml`/`.yaml`, `.toml`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Format::Json),
            "yml" | "yaml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Errors that can occur while parsing job file content
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors that can occur while loading a job file from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("not a valid job file: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

/// Read and parse a job file, dispatching on its extension.
pub fn load_jobs(path: &Path) -> Result<Vec<JobSpec>, LoadError> {
    let format =
        Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let jobs = parse_jobs(&content, format).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), count = jobs.len(), "parsed job file");
    Ok(jobs)
}

/// Parse job file content in the given format.
pub fn parse_jobs(content: &str, format: Format) -> Result<Vec<JobSpec>, ParseError> {
    match format {
        Format::Json => parse_json(content),
        Format::Yaml => parse_yaml(content),
        Format::Toml => parse_toml(content),
    }
}

fn parse_json(content: &str) -> Result<Vec<JobSpec>, ParseError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let jobs = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(jobs)
}

fn parse_yaml(content: &str) -> Result<Vec<JobSpec>, ParseError> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    let jobs = match value {
        // An empty document holds no jobs
        serde_yaml::Value::Null => Vec::new(),
        serde_yaml::Value::Sequence(_) => serde_yaml::from_value(value)?,
        other => vec![serde_yaml::from_value(other)?],
    };
    Ok(jobs)
}

/// TOML has no top-level arrays: a list is written as `[[job]]` tables,
/// anything else is a single job.
fn parse_toml(content: &str) -> Result<Vec<JobSpec>, ParseError> {
    let mut table: toml::Table = content.parse()?;
    let jobs = match table.remove("job") {
        Some(list @ toml::Value::Array(_)) => {
            if !table.is_empty() {
                let ignored: Vec<&String> = table.keys().collect();
                tracing::warn!(?ignored, "ignoring top-level keys next to [[job]] tables");
            }
            list.try_into()?
        }
        Some(single @ toml::Value::Table(_)) => vec![single.try_into()?],
        Some(other) => {
            table.insert("job".to_string(), other);
            vec![toml::Value::Table(table).try_into()?]
        }
        None => vec![toml::Value::Table(table).try_into()?],
    };
    Ok(jobs)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
