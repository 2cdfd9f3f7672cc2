//! Cancellable external-process execution
//!
//! Every setup step shells out to an external tool (git, yarn/npm, the
//! Medusa CLI). Commands run through [`run`] so a single interrupt can kill
//! whichever child is currently in flight.

use std::process::Stdio;

use camino::Utf8Path;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};

/// Captured output of a completed external command
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run an external command to completion, capturing its output
///
/// # Errors
/// Returns error if:
/// - The binary cannot be found (`CommandNotFound`)
/// - The command exits non-zero (`ProcessFailed` carrying trimmed stderr)
/// - The cancellation token fires first (`Cancelled`; the child is killed)
pub async fn run(
    program: &str,
    args: &[&str],
    cwd: Option<&Utf8Path>,
    cancel: &CancellationToken,
) -> Result<ProcessOutput> {
    debug!("Running: {} {}", program, args.join(" "));

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Dropping the in-flight future on the cancellation branch must not
        // orphan the child.
        .kill_on_drop(true);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::command_not_found(program)
        } else {
            Error::Io(e)
        }
    })?;

    let output = tokio::select! {
        output = child.wait_with_output() => output?,
        _ = cancel.cancelled() => {
            debug!("Cancelled: {}", program);
            return Err(Error::Cancelled);
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let summary = if stderr.trim().is_empty() {
            format!("exit code {:?}", output.status.code())
        } else {
            stderr.trim().to_string()
        };
        return Err(Error::process_failed(program, summary));
    }

    Ok(ProcessOutput { stdout, stderr })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let token = CancellationToken::new();
        let output = run("sh", &["-c", "echo hello"], None, &token)
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_nonzero_exit_is_process_failed() {
        let token = CancellationToken::new();
        let err = run("sh", &["-c", "echo broken >&2; exit 3"], None, &token)
            .await
            .unwrap_err();
        match err {
            Error::ProcessFailed { command, message } => {
                assert_eq!(command, "sh");
                assert!(message.contains("broken"));
            }
            other => panic!("expected ProcessFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_missing_binary_is_command_not_found() {
        let token = CancellationToken::new();
        let err = run("definitely-not-a-real-binary", &[], None, &token)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CommandNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_respects_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = Utf8Path::from_path(dir.path()).unwrap();
        let token = CancellationToken::new();
        let output = run("pwd", &[], Some(cwd), &token).await.unwrap();
        assert!(output.stdout.trim().ends_with(cwd.file_name().unwrap()));
    }

    #[tokio::test]
    async fn test_run_cancellation_kills_child() {
        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let start = std::time::Instant::now();
        let err = run("sleep", &["30"], None, &token).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }
}
