use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;

// ============================================================================
// ProcessRunner Trait - the "run a command, report its exit" capability
// ============================================================================

/// Output from a process execution.
///
/// `stdout`/`stderr` hold bytes only for streams routed to
/// [`StreamTarget::Capture`](crate::StreamTarget::Capture); redirected streams
/// leave them empty.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string evaluation).
/// The interface is synchronous: the caller blocks until the child exits or
/// the timeout elapses.
///
/// A `timeout` of `None` waits indefinitely. When a timeout elapses the child
/// is killed and [`RunnerError::Timeout`] is returned.
pub trait ProcessRunner {
    fn run(
        &self,
        cmd: &CommandSpec,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, RunnerError>;
}

/// Read at most the last `max_bytes` of a capture file as lossy UTF-8.
///
/// Used to keep a diagnostic excerpt of engine stderr after the capture file
/// itself is removed with the workspace.
pub fn read_file_tail(path: &Path, max_bytes: u64) -> io::Result<String> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    if len > max_bytes {
        file.seek(SeekFrom::Start(len - max_bytes))?;
    }
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_process_output_success() {
        assert!(ProcessOutput::new(Vec::new(), Vec::new(), Some(0)).success());
        assert!(!ProcessOutput::new(Vec::new(), Vec::new(), Some(1)).success());
        // Killed by signal
        assert!(!ProcessOutput::new(Vec::new(), Vec::new(), None).success());
    }

    #[test]
    fn test_process_output_lossy_utf8() {
        let invalid_utf8 = vec![0xff, 0xfe, 0x00, 0x01];
        let output = ProcessOutput::new(invalid_utf8.clone(), invalid_utf8, Some(0));
        assert!(!output.stdout_string().is_empty());
        assert!(!output.stderr_string().is_empty());
    }

    /// A mock implementation of ProcessRunner for testing
    struct MockRunner {
        expected_output: ProcessOutput,
    }

    impl ProcessRunner for MockRunner {
        fn run(
            &self,
            _cmd: &CommandSpec,
            _timeout: Option<Duration>,
        ) -> Result<ProcessOutput, RunnerError> {
            Ok(self.expected_output.clone())
        }
    }

    #[test]
    fn test_process_runner_trait_object() {
        let mock = MockRunner {
            expected_output: ProcessOutput::new(b"out".to_vec(), b"err".to_vec(), Some(0)),
        };
        let runner: &dyn ProcessRunner = &mock;

        let output = runner.run(&CommandSpec::new("java"), None).unwrap();
        assert_eq!(output.stdout_string(), "out");
        assert_eq!(output.stderr_string(), "err");
        assert!(output.success());
    }

    #[test]
    fn test_read_file_tail_short_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ERROR: something broke").unwrap();

        let tail = read_file_tail(file.path(), 2048).unwrap();
        assert_eq!(tail, "ERROR: something broke");
    }

    #[test]
    fn test_read_file_tail_truncates_to_last_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}END", "x".repeat(5000)).unwrap();

        let tail = read_file_tail(file.path(), 10).unwrap();
        assert_eq!(tail.len(), 10);
        assert!(tail.ends_with("END"));
    }
}
