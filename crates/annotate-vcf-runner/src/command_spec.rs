use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::RunnerError;

// ============================================================================
// StreamTarget - where a child's output stream goes
// ============================================================================

/// Destination for a child's stdout or stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StreamTarget {
    /// Pipe the stream back into [`ProcessOutput`](crate::ProcessOutput)
    #[default]
    Capture,
    /// Share the stream of the same name with the controlling process
    Inherit,
    /// Forward to the controlling process's stderr regardless of stream
    ParentStderr,
    /// Truncate and write to a file
    File(PathBuf),
}

impl StreamTarget {
    /// Build the `Stdio` for this target.
    ///
    /// `stream` names the redirected stream for error messages.
    pub(crate) fn to_stdio(&self, stream: &'static str) -> Result<Stdio, RunnerError> {
        match self {
            Self::Capture => Ok(Stdio::piped()),
            Self::Inherit => Ok(Stdio::inherit()),
            Self::ParentStderr => Ok(Stdio::from(std::io::stderr())),
            Self::File(path) => {
                let file = File::create(path).map_err(|e| RunnerError::RedirectFailed {
                    stream,
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Stdio::from(file))
            }
        }
    }

    /// The capture file, if this target writes to one.
    #[must_use]
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

// ============================================================================
// CommandSpec - argv-style command description
// ============================================================================

/// Specification for a command to execute.
///
/// All process execution goes through this type so that arguments stay
/// discrete `OsString` elements and are never interpreted by a shell.
///
/// # Example
///
/// ```rust
/// use annotate_vcf_runner::{CommandSpec, StreamTarget};
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("java")
///     .args(["-Xmx4g", "-jar", "/opt/snpEff/snpEff.jar", "build"])
///     .cwd("/tmp/snpeff_data_dir_abc")
///     .stdout(StreamTarget::File("/tmp/snpeff_data_dir_abc/build.o".into()));
///
/// assert_eq!(cmd.program, OsString::from("java"));
/// assert_eq!(cmd.args.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional working directory
    pub cwd: Option<PathBuf>,
    /// Where the child's stdout goes
    pub stdout: StreamTarget,
    /// Where the child's stderr goes
    pub stderr: StreamTarget,
}

impl CommandSpec {
    /// Create a new `CommandSpec` for `program` with both streams captured.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Add a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the command.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Route the child's stdout.
    #[must_use]
    pub fn stdout(mut self, target: StreamTarget) -> Self {
        self.stdout = target;
        self
    }

    /// Route the child's stderr.
    #[must_use]
    pub fn stderr(mut self, target: StreamTarget) -> Self {
        self.stderr = target;
        self
    }

    /// Program name for log lines and error messages.
    #[must_use]
    pub fn program_display(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// The full argv joined with spaces, for debug logging only.
    #[must_use]
    pub fn display_argv(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Convert into a `std::process::Command` with stdin closed and both
    /// output streams routed.
    pub fn to_command(&self) -> Result<Command, RunnerError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd.stdin(Stdio::null())
            .stdout(self.stdout.to_stdio("stdout")?)
            .stderr(self.stderr.to_stdio("stderr")?);

        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_command_spec_new_captures_both_streams() {
        let cmd = CommandSpec::new("java");
        assert_eq!(cmd.program, OsString::from("java"));
        assert!(cmd.args.is_empty());
        assert!(cmd.cwd.is_none());
        assert_eq!(cmd.stdout, StreamTarget::Capture);
        assert_eq!(cmd.stderr, StreamTarget::Capture);
    }

    #[test]
    fn test_command_spec_builder_chain() {
        let cmd = CommandSpec::new("java")
            .arg("-Xmx4g")
            .args(["-jar", "snpEff.jar"])
            .cwd("/workspace")
            .stdout(StreamTarget::Inherit)
            .stderr(StreamTarget::File(PathBuf::from("/workspace/err.e")));

        assert_eq!(cmd.args.len(), 3);
        assert_eq!(cmd.args[0], OsString::from("-Xmx4g"));
        assert_eq!(cmd.cwd, Some(PathBuf::from("/workspace")));
        assert_eq!(cmd.stdout, StreamTarget::Inherit);
        assert_eq!(
            cmd.stderr.file_path(),
            Some(&PathBuf::from("/workspace/err.e"))
        );
    }

    #[test]
    fn test_display_argv_joins_program_and_args() {
        let cmd = CommandSpec::new("java").args(["-jar", "snpEff.jar", "build"]);
        assert_eq!(cmd.display_argv(), "java -jar snpEff.jar build");
    }

    #[test]
    fn test_shell_metacharacters_preserved() {
        let cmd = CommandSpec::new("echo")
            .arg("$(whoami)")
            .arg("`id`")
            .arg("a;b|c&d");

        assert_eq!(cmd.args[0], OsString::from("$(whoami)"));
        assert_eq!(cmd.args[1], OsString::from("`id`"));
        assert_eq!(cmd.args[2], OsString::from("a;b|c&d"));
    }

    #[test]
    fn test_file_target_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stdout.o");
        let cmd = CommandSpec::new("echo").stdout(StreamTarget::File(path.clone()));

        assert!(cmd.to_command().is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_file_target_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("stderr.e");
        let cmd = CommandSpec::new("echo").stderr(StreamTarget::File(path));

        match cmd.to_command() {
            Err(RunnerError::RedirectFailed { stream, .. }) => assert_eq!(stream, "stderr"),
            other => panic!("Expected RedirectFailed, got {other:?}"),
        }
    }
}
