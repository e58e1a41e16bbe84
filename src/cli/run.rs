//! CLI entry point
//!
//! `run()` parses arguments, initialises logging, checks the inputs, discovers
//! configuration and tools, then runs the pipeline. It handles ALL output
//! including errors.

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tracing::debug;

use annotate_vcf_config::Config;
use annotate_vcf_engine::{
    AnnotationRequest, AnnotationSummary, OutputDestination, Toolchain, annotate_vcf,
    discover_toolchain,
};
use annotate_vcf_runner::NativeRunner;
use annotate_vcf_utils::error::{AnnotateVcfError, ConfigError};
use annotate_vcf_utils::exit_codes::ExitCode;
use annotate_vcf_utils::logging::init_tracing;

use super::args::Cli;

/// Main CLI execution function.
///
/// On error the user-facing report is printed to stderr and the mapped exit
/// code returned; main.rs only calls `std::process::exit`.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("✗ Failed to initialise logging: {e}");
        return Err(ExitCode::INTERNAL);
    }

    match execute(&cli) {
        Ok(summary) => {
            if let Some(path) = &summary.retained_workspace {
                eprintln!("Workspace kept at {}", path.display());
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.display_for_user());
            Err(err.to_exit_code())
        }
    }
}

fn execute(cli: &Cli) -> Result<AnnotationSummary, AnnotateVcfError> {
    check_readable(&cli.gff_file)?;
    check_readable(&cli.vcf_file)?;

    let config = Config::discover(&cli.to_cli_args())?;
    if let Some(path) = &config.config_file {
        debug!(path = %path.display(), "Loaded config file");
    }
    for (key, (value, source)) in config.effective_config() {
        debug!(key = %key, value = %value, source = %source, "Effective configuration");
    }

    let runner = NativeRunner::new();
    let toolchain = discover_toolchain(&runner, &config.tools)?;
    let request = build_request(cli, &config, toolchain)?;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    annotate_vcf(&request, &runner, &mut stdout)
}

fn build_request(
    cli: &Cli,
    config: &Config,
    toolchain: Toolchain,
) -> Result<AnnotationRequest, AnnotateVcfError> {
    let workspace_parent = match &config.workspace.parent_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    Ok(AnnotationRequest {
        gff: cli.gff_file.clone(),
        vcf: cli.vcf_file.clone(),
        output: OutputDestination::from_arg(cli.output_vcf.as_deref()),
        coding_table: config.annotation.coding_table.clone(),
        toolchain,
        java_heap: config.tools.java_heap.clone(),
        workspace_parent,
        keep_workspace: config.workspace.keep,
        verbose: config.verbose,
        timeout: config.engine.timeout_secs.map(Duration::from_secs),
    })
}

/// Inputs must be readable regular files before any tool is probed.
fn check_readable(path: &Path) -> Result<(), ConfigError> {
    let unreadable = |reason: String| ConfigError::UnreadableInput {
        path: path.to_path_buf(),
        reason,
    };
    let metadata = path.metadata().map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }
    File::open(path).map_err(|e| unreadable(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn toolchain() -> Toolchain {
        Toolchain {
            snpeff: PathBuf::from("/opt/snpEff/snpEff.jar"),
            java: PathBuf::from("/usr/bin/java"),
            java_version: "java version \"1.7.0_21\"".to_string(),
        }
    }

    #[test]
    fn test_check_readable() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("calls.vcf");
        fs::write(&file, "#CHROM\n").unwrap();

        assert!(check_readable(&file).is_ok());
        assert!(matches!(
            check_readable(&dir.path().join("absent.vcf")),
            Err(ConfigError::UnreadableInput { .. })
        ));
        assert!(matches!(
            check_readable(dir.path()),
            Err(ConfigError::UnreadableInput { ref reason, .. }) if reason == "not a regular file"
        ));
    }

    #[test]
    fn test_build_request_from_config() {
        let cli = Cli::try_parse_from([
            "annotate-vcf",
            "-o",
            "-",
            "--timeout",
            "30",
            "--workspace-dir",
            "/scratch",
            "ref.gff",
            "calls.vcf",
        ])
        .unwrap();
        let mut config = Config::default();
        config.workspace.parent_dir = cli.workspace_dir.clone();
        config.engine.timeout_secs = cli.timeout;

        let request = build_request(&cli, &config, toolchain()).unwrap();

        assert_eq!(request.output, OutputDestination::Stdout);
        assert_eq!(request.workspace_parent, PathBuf::from("/scratch"));
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
        assert_eq!(request.java_heap, "4g");
        assert_eq!(request.coding_table, "default: Bacterial_and_Plant_Plastid");
    }

    #[test]
    fn test_workspace_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["annotate-vcf", "ref.gff", "calls.vcf"]).unwrap();

        let request = build_request(&cli, &Config::default(), toolchain()).unwrap();

        assert_eq!(request.workspace_parent, std::env::current_dir().unwrap());
        assert!(request.timeout.is_none());
    }
}
