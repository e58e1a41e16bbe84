use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use annotate_vcf_runner::{CommandSpec, ProcessOutput, ProcessRunner, StreamTarget, read_file_tail};
use annotate_vcf_utils::error::{EngineError, WorkspaceError};
use annotate_vcf_utils::logging::log_stage_complete;
use annotate_vcf_workspace::{GENOME_ID, Workspace};

use crate::discovery::Toolchain;

/// Bytes of captured stderr kept for error reports.
const STDERR_TAIL_BYTES: u64 = 2048;

/// Where each snpEff phase writes its streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStreams {
    pub build_stdout: StreamTarget,
    pub build_stderr: StreamTarget,
    pub annotate_stderr: StreamTarget,
    /// Annotated VCF, always a file inside the workspace
    pub output_vcf: PathBuf,
}

impl EngineStreams {
    /// Reserve workspace files for the engine's output.
    ///
    /// Quiet runs capture both BUILD streams and ANNOTATE stderr to files.
    /// Verbose runs forward them to the terminal. BUILD stdout goes to our
    /// stderr because our stdout may carry the annotated VCF.
    pub fn allocate(workspace: &Workspace, verbose: bool) -> Result<Self, WorkspaceError> {
        let output_vcf = workspace.scratch_file("snpeff_output_", ".vcf")?;
        if verbose {
            return Ok(Self {
                build_stdout: StreamTarget::ParentStderr,
                build_stderr: StreamTarget::Inherit,
                annotate_stderr: StreamTarget::Inherit,
                output_vcf,
            });
        }
        Ok(Self {
            build_stdout: StreamTarget::File(workspace.scratch_file("snpeff_build_db_", ".o")?),
            build_stderr: StreamTarget::File(workspace.scratch_file("snpeff_build_db_", ".e")?),
            annotate_stderr: StreamTarget::File(workspace.scratch_file("snpeff_annotate_", ".e")?),
            output_vcf,
        })
    }
}

/// The two snpEff subcommands, run through a [`ProcessRunner`].
pub struct SnpEff<'a> {
    runner: &'a dyn ProcessRunner,
    toolchain: &'a Toolchain,
    java_heap: String,
    timeout: Option<Duration>,
}

impl<'a> SnpEff<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn ProcessRunner, toolchain: &'a Toolchain, java_heap: &str) -> Self {
        Self {
            runner,
            toolchain,
            java_heap: java_heap.to_string(),
            timeout: None,
        }
    }

    /// Kill either phase once it runs longer than `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn java_command(&self) -> CommandSpec {
        CommandSpec::new(&self.toolchain.java)
            .arg(format!("-Xmx{}", self.java_heap))
            .arg("-jar")
            .arg(&self.toolchain.snpeff)
    }

    /// `<java> -Xmx<heap> -jar <snpeff> build -gff3 -verbose data -c <config>`
    #[must_use]
    pub fn build_command(
        &self,
        workspace_dir: &Path,
        config: &Path,
        streams: &EngineStreams,
    ) -> CommandSpec {
        self.java_command()
            .args(["build", "-gff3", "-verbose", GENOME_ID, "-c"])
            .arg(config)
            .cwd(workspace_dir)
            .stdout(streams.build_stdout.clone())
            .stderr(streams.build_stderr.clone())
    }

    /// `<java> -Xmx<heap> -jar <snpeff> ann -nodownload -verbose -stats <stats> -c <config> data <vcf>`
    #[must_use]
    pub fn annotate_command(
        &self,
        workspace_dir: &Path,
        config: &Path,
        stats: &Path,
        vcf: &Path,
        streams: &EngineStreams,
    ) -> CommandSpec {
        self.java_command()
            .args(["ann", "-nodownload", "-verbose", "-stats"])
            .arg(stats)
            .arg("-c")
            .arg(config)
            .arg(GENOME_ID)
            .arg(vcf)
            .cwd(workspace_dir)
            .stdout(StreamTarget::File(streams.output_vcf.clone()))
            .stderr(streams.annotate_stderr.clone())
    }

    /// BUILD: build the snpEff database from the staged GFF.
    pub fn build_database(
        &self,
        workspace: &Workspace,
        config: &Path,
        streams: &EngineStreams,
    ) -> Result<(), EngineError> {
        info!("Building snpeff database");
        let cmd = self.build_command(workspace.path(), config, streams);
        let stderr_tail = || capture_tail(&streams.build_stderr);

        let started = Instant::now();
        let output = self.run(&cmd).map_err(|detail| EngineError::BuildDatabase {
            detail,
            stderr_tail: stderr_tail(),
        })?;
        if !output.success() {
            return Err(EngineError::BuildDatabase {
                detail: exit_detail(&output),
                stderr_tail: stderr_tail(),
            });
        }
        log_stage_complete("build", started.elapsed().as_millis());
        Ok(())
    }

    /// ANNOTATE: annotate `vcf` into `streams.output_vcf` and return that path.
    pub fn annotate(
        &self,
        workspace: &Workspace,
        config: &Path,
        vcf: &Path,
        streams: &EngineStreams,
    ) -> Result<PathBuf, EngineError> {
        info!(vcf = %vcf.display(), "Annotating");
        let cmd = self.annotate_command(
            workspace.path(),
            config,
            &workspace.stats_path(),
            vcf,
            streams,
        );
        debug!(output = %streams.output_vcf.display(), "Writing annotated VCF");
        let failed = |detail: String| EngineError::Annotation {
            vcf: vcf.display().to_string(),
            detail,
            stderr_tail: capture_tail(&streams.annotate_stderr),
        };

        let started = Instant::now();
        let output = self.run(&cmd).map_err(failed)?;
        if !output.success() {
            return Err(failed(exit_detail(&output)));
        }
        log_stage_complete("annotate", started.elapsed().as_millis());
        Ok(streams.output_vcf.clone())
    }

    fn run(&self, cmd: &CommandSpec) -> Result<ProcessOutput, String> {
        debug!(command = %cmd.display_argv(), "Running snpEff");
        self.runner.run(cmd, self.timeout).map_err(|e| e.to_string())
    }
}

fn exit_detail(output: &ProcessOutput) -> String {
    match output.exit_code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

fn capture_tail(target: &StreamTarget) -> Option<String> {
    target
        .file_path()
        .and_then(|path| read_file_tail(path, STDERR_TAIL_BYTES).ok())
        .filter(|tail| !tail.is_empty())
}
