// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line flags

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "kron",
    version,
    disable_version_flag = true,
    about = "Run jobs on cron schedules"
)]
pub struct Cli {
    /// Job file to load (.json, .yml/.yaml, .toml); repeat for several
    #[arg(short = 'f', long = "file", value_name = "PATH", required = true)]
    pub files: Vec<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Run the named job once, attached to this terminal, and exit
    #[arg(short = 't', long = "test", value_name = "NAME")]
    pub test: Option<String>,

    /// Directory for per-run output files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// What to do with output files after hooks ran (keep or delete)
    #[arg(long, value_name = "POLICY")]
    pub retention: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
