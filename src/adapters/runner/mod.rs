//! Bounded subprocess execution shared by the ffprobe and ffmpeg adapters

use std::ffi::OsStr;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished process
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code; `None` when killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Short diagnostic for a failed run
    pub fn failure_detail(&self) -> String {
        let status = match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        }
    }
}

/// Why a process produced no output at all
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs_f64())]
    TimedOut { program: String, timeout: Duration },

    #[error("{program} failed: {detail}")]
    Failed { program: String, detail: String },
}

/// Run `program` with `args`, killing it if it outlives `timeout`.
///
/// The child is killed on drop, so cancelling the calling future also stops the process.
pub async fn run_tool<S: AsRef<OsStr>>(program: &str, args: &[S], timeout: Duration) -> Result<ToolOutput, RunError> {
    debug!(
        "Running: {} {}",
        program,
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| RunError::TimedOut {
            program: program.to_string(),
            timeout,
        })?
        .map_err(|source| RunError::Spawn {
            program: program.to_string(),
            source,
        })?;

    Ok(ToolOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// First line of `program -version`, e.g. `ffmpeg version 6.1.1 Copyright ...`
pub async fn tool_version(program: &str, timeout: Duration) -> Result<String, RunError> {
    let output = run_tool(program, &["-version"], timeout).await?;
    if !output.success() {
        return Err(RunError::Failed {
            program: program.to_string(),
            detail: output.failure_detail(),
        });
    }

    let line = output.stdout.lines().map(str::trim).find(|l| !l.is_empty());
    line.map(str::to_string).ok_or_else(|| RunError::Failed {
        program: program.to_string(),
        detail: "printed no version".to_string(),
    })
}
