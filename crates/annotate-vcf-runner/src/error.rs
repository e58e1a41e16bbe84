//! Error types for the runner crate

use std::path::PathBuf;
use thiserror::Error;

/// Failures to start, redirect, or supervise a child process.
///
/// A child that runs and exits non-zero is *not* a `RunnerError`; that is
/// reported through [`ProcessOutput::exit_code`](crate::ProcessOutput) and
/// classified by the caller.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn process '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to open {stream} redirect target {}: {reason}", path.display())]
    RedirectFailed {
        stream: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to wait for process '{program}': {reason}")]
    WaitFailed { program: String, reason: String },

    #[error("Process '{program}' timed out after {timeout_seconds} seconds")]
    Timeout {
        program: String,
        timeout_seconds: u64,
    },
}
