use std::io::Read;
use std::process::{Child, ExitStatus};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;
use crate::process::{ProcessOutput, ProcessRunner};

/// Interval between exit checks while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// NativeRunner - direct process execution
// ============================================================================

/// Native process runner using `std::process::Command`.
///
/// Captured streams are drained on helper threads so a chatty child cannot
/// block on a full pipe while we wait for it. With a timeout armed the child
/// is polled and killed once the deadline passes.
///
/// # Example
///
/// ```rust,no_run
/// use annotate_vcf_runner::{CommandSpec, NativeRunner, ProcessRunner};
///
/// let runner = NativeRunner::new();
/// let output = runner.run(&CommandSpec::new("java").arg("-version"), None).unwrap();
/// println!("{}", output.stderr_string());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for NativeRunner {
    fn run(
        &self,
        cmd: &CommandSpec,
        timeout: Option<Duration>,
    ) -> Result<ProcessOutput, RunnerError> {
        let program = cmd.program_display();
        let mut command = cmd.to_command()?;

        debug!(argv = %cmd.display_argv(), "Spawning process");
        let mut child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let status = match timeout {
            None => child.wait().map_err(|e| RunnerError::WaitFailed {
                program: program.clone(),
                reason: e.to_string(),
            })?,
            Some(limit) => wait_with_deadline(&mut child, &program, limit)?,
        };

        Ok(ProcessOutput::new(
            join_reader(stdout_reader),
            join_reader(stderr_reader),
            status.code(),
        ))
    }
}

fn drain<R: Read + Send + 'static>(mut stream: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        // A read error leaves whatever arrived before it
        let _ = stream.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn wait_with_deadline(
    child: &mut Child,
    program: &str,
    limit: Duration,
) -> Result<ExitStatus, RunnerError> {
    let Some(deadline) = Instant::now().checked_add(limit) else {
        debug!(program, timeout_seconds = limit.as_secs(), "Timeout out of clock range, waiting without one");
        return child.wait().map_err(|e| RunnerError::WaitFailed {
            program: program.to_string(),
            reason: e.to_string(),
        });
    };
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                warn!(program, timeout_seconds = limit.as_secs(), "Killing timed out process");
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunnerError::Timeout {
                    program: program.to_string(),
                    timeout_seconds: limit.as_secs(),
                });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                return Err(RunnerError::WaitFailed {
                    program: program.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
}
