//! One annotation run from inputs to delivered VCF.
//!
//! Validation happens before any workspace exists. Once the workspace is
//! created it is torn down on every path out of [`annotate_vcf`], unless the
//! request asks to keep it.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{field, info, warn};

use annotate_vcf_runner::ProcessRunner;
use annotate_vcf_utils::error::{AnnotateVcfError, WorkspaceError};
use annotate_vcf_utils::logging::{run_span, stage_span};
use annotate_vcf_validation::{CodingTable, ContigSet, check_contigs, extract_contigs_from_path};
use annotate_vcf_workspace::{Workspace, genome_name};

use crate::audit::audit_file;
use crate::delivery::{OutputDestination, deliver};
use crate::discovery::Toolchain;
use crate::snpeff::{EngineStreams, SnpEff};

/// Everything one run needs, already resolved.
#[derive(Debug, Clone)]
pub struct AnnotationRequest {
    pub gff: PathBuf,
    pub vcf: PathBuf,
    pub output: OutputDestination,
    /// Coding table as YAML text
    pub coding_table: String,
    pub toolchain: Toolchain,
    pub java_heap: String,
    /// Directory the workspace is created in
    pub workspace_parent: PathBuf,
    pub keep_workspace: bool,
    pub verbose: bool,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSummary {
    /// Data records in the annotated VCF
    pub records: usize,
    pub genome_name: String,
    pub vcf_contigs: usize,
    /// VCF contigs that also appear in the GFF
    pub annotatable_contigs: usize,
    pub retained_workspace: Option<PathBuf>,
}

/// Validate the inputs, run snpEff and deliver the annotated VCF.
///
/// `stdout` receives the VCF when the destination is
/// [`OutputDestination::Stdout`].
pub fn annotate_vcf(
    request: &AnnotationRequest,
    runner: &dyn ProcessRunner,
    stdout: &mut dyn Write,
) -> Result<AnnotationSummary, AnnotateVcfError> {
    let span = run_span(
        &request.gff.display().to_string(),
        &request.vcf.display().to_string(),
    );
    let _run = span.enter();

    let coding_table = CodingTable::parse(&request.coding_table)?;
    let (vcf_contigs, annotatable_contigs) = {
        let _stage = stage_span("validate").entered();
        let vcf_contigs = extract_contigs_from_path(&request.vcf)?;
        let gff_contigs = extract_contigs_from_path(&request.gff)?;
        let report = check_contigs(&vcf_contigs, &gff_contigs, &coding_table);
        report.log_warnings();
        report.verdict()?;
        (vcf_contigs, report.annotatable_count())
    };

    let genome = genome_name(&request.gff);
    span.record("genome", genome.as_str());

    let vcf = std::path::absolute(&request.vcf)?;
    let parent = std::path::absolute(&request.workspace_parent)?;
    let workspace = Workspace::create(&parent, &request.gff)?;
    span.record("workspace", field::display(workspace.path().display()));

    let outcome = run_in_workspace(
        request,
        runner,
        stdout,
        &workspace,
        RunInputs {
            genome: &genome,
            vcf: &vcf,
            vcf_contigs: &vcf_contigs,
            coding_table: &coding_table,
        },
    );

    match outcome {
        Ok(records) => {
            let retained_workspace = teardown(workspace, request.keep_workspace)?;
            info!(records, "Annotation complete");
            Ok(AnnotationSummary {
                records,
                genome_name: genome,
                vcf_contigs: vcf_contigs.len(),
                annotatable_contigs,
                retained_workspace,
            })
        }
        Err(err) => {
            if let Err(teardown_err) = teardown(workspace, request.keep_workspace) {
                warn!("{teardown_err}");
            }
            Err(err)
        }
    }
}

struct RunInputs<'a> {
    genome: &'a str,
    vcf: &'a Path,
    vcf_contigs: &'a ContigSet,
    coding_table: &'a CodingTable,
}

/// Render, build, annotate, audit and deliver. Returns the audited record count.
fn run_in_workspace(
    request: &AnnotationRequest,
    runner: &dyn ProcessRunner,
    stdout: &mut dyn Write,
    workspace: &Workspace,
    inputs: RunInputs<'_>,
) -> Result<usize, AnnotateVcfError> {
    let config = workspace.render_config(inputs.genome, inputs.vcf_contigs, inputs.coding_table)?;
    let streams = EngineStreams::allocate(workspace, request.verbose)?;
    let snpeff = SnpEff::new(runner, &request.toolchain, &request.java_heap)
        .with_timeout(request.timeout);

    {
        let _stage = stage_span("build").entered();
        snpeff.build_database(workspace, &config, &streams)?;
    }
    let annotated = {
        let _stage = stage_span("annotate").entered();
        snpeff.annotate(workspace, &config, inputs.vcf, &streams)?
    };

    let tally = {
        let _stage = stage_span("audit").entered();
        audit_file(&annotated)?
    };
    tally.log_warnings();
    tally.verdict()?;

    deliver(&annotated, &request.output, stdout)?;
    Ok(tally.records())
}

fn teardown(workspace: Workspace, keep: bool) -> Result<Option<PathBuf>, WorkspaceError> {
    if keep {
        return Ok(Some(workspace.keep()));
    }
    workspace.destroy()?;
    Ok(None)
}
