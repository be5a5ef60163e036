// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process adapter backed by real child processes

use super::{Cancel, ProcessAdapter, ProcessContext, ProcessError, ProcessSpec, Program};
use async_trait::async_trait;
use std::io::Write;
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Runs processes on the host with `tokio::process`
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellProcessAdapter;

impl ShellProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for ShellProcessAdapter {
    async fn run(&self, spec: ProcessSpec, mut ctx: ProcessContext) -> Result<(), ProcessError> {
        // The script file must outlive the child
        let (mut cmd, program, _script) = build_command(spec)?;
        let mut child = cmd
            .spawn()
            .map_err(|source| ProcessError::Spawn { program, source })?;

        loop {
            tokio::select! {
                status = child.wait() => {
                    let status = status.map_err(ProcessError::Wait)?;
                    return if status.success() {
                        Ok(())
                    } else {
                        Err(ProcessError::Exited { code: status.code() })
                    };
                }
                cancel = ctx.cancelled() => match cancel {
                    Cancel::Deadline(timeout) => {
                        child.kill().await.map_err(ProcessError::Kill)?;
                        return Err(ProcessError::TimedOut(timeout));
                    }
                    Cancel::Terminate(req) => match child.kill().await {
                        Ok(()) => {
                            req.reply(Ok(()));
                            return Err(ProcessError::Terminated);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "kill failed, process keeps running");
                            req.reply(Err(ProcessError::Kill(e)));
                        }
                    },
                }
            }
        }
    }
}

fn build_command(
    spec: ProcessSpec,
) -> Result<(Command, String, Option<NamedTempFile>), ProcessError> {
    let (program, mut args, script) = match spec.program {
        Program::Argv(argv) => {
            let mut argv = argv.into_iter();
            let program = argv.next().ok_or(ProcessError::EmptyCommand)?;
            (program, argv.collect::<Vec<_>>(), None)
        }
        Program::Script { interpreter, body } => {
            let file = write_script(&body)?;
            let mut interpreter = interpreter.into_iter();
            let program = interpreter.next().unwrap_or_else(|| "sh".to_string());
            let mut args: Vec<String> = interpreter.collect();
            args.push(file.path().to_string_lossy().into_owned());
            (program, args, Some(file))
        }
    };
    args.extend(spec.args);

    let mut cmd = Command::new(&program);
    cmd.args(&args)
        .env_clear()
        .envs(spec.env)
        .stdin(Stdio::null())
        .stdout(spec.stdout.into_stdio())
        .stderr(spec.stderr.into_stdio())
        .kill_on_drop(true);
    if let Some(dir) = spec.workdir {
        cmd.current_dir(dir);
    }
    #[cfg(unix)]
    if let Some(user) = spec.user {
        cmd.uid(user.uid);
        cmd.gid(user.gid);
    }

    Ok((cmd, program, script))
}

fn write_script(body: &str) -> Result<NamedTempFile, ProcessError> {
    let mut file = tempfile::Builder::new()
        .prefix("kron-script-")
        .suffix(".sh")
        .tempfile()
        .map_err(ProcessError::Script)?;
    file.write_all(body.as_bytes())
        .and_then(|()| file.flush())
        .map_err(ProcessError::Script)?;

    // Readable by a job running under another uid
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(ProcessError::Script)?;
    }

    Ok(file)
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
