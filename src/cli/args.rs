//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use annotate_vcf_config::CliArgs;

/// annotate-vcf - annotate a VCF with snpEff using a GFF3 reference
#[derive(Parser, Debug)]
#[command(name = "annotate-vcf")]
#[command(about = "Annotate a VCF with snpEff using a GFF3 file as the reference")]
#[command(long_about = r#"
annotate-vcf builds a temporary snpEff database from a GFF3 file (annotation
plus reference sequence), annotates a VCF against it and checks the result for
problems snpEff reports inside the annotations.

EXAMPLES:
  # Annotate to stdout
  annotate-vcf reference.gff calls.vcf > annotated.vcf

  # Write to a file and set a coding table for one plasmid
  annotate-vcf reference.gff calls.vcf -o annotated.vcf \
      --coding-table '{default: Bacterial_and_Plant_Plastid, PLASMID1: Mycoplasma}'

  # Keep the snpEff database directory for inspection
  annotate-vcf reference.gff calls.vcf -o annotated.vcf --keep-workspace --verbose

CODING TABLES:
  A YAML mapping from contig name to snpEff codon table. A 'default' entry
  applies to every contig without its own entry. Without 'default', every
  contig in the VCF needs an entry.

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .annotate-vcf/config.toml
  Use --config to specify an explicit config file path
"#)]
#[command(version)]
pub struct Cli {
    /// GFF3 file with annotation and reference sequence
    #[arg(value_name = "GFF_FILE")]
    pub gff_file: PathBuf,

    /// VCF file to annotate
    #[arg(value_name = "VCF_FILE")]
    pub vcf_file: PathBuf,

    /// Where to write the annotated VCF (default or `-`: stdout)
    #[arg(short = 'o', long = "output-vcf", value_name = "PATH")]
    pub output_vcf: Option<PathBuf>,

    /// Path to snpEff.jar (default: `snpeff` on PATH)
    #[arg(long, value_name = "PATH")]
    pub snpeff_exec: Option<PathBuf>,

    /// Java executable to run snpEff with
    #[arg(long, value_name = "PATH")]
    pub java_exec: Option<PathBuf>,

    /// Coding table as YAML, e.g. '{default: Standard, PLASMID1: Mycoplasma}'
    #[arg(long, value_name = "YAML")]
    pub coding_table: Option<String>,

    /// Forward snpEff output to the terminal and log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Keep the snpEff workspace directory after the run
    #[arg(long)]
    pub keep_workspace: bool,

    /// Directory to create the snpEff workspace in (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub workspace_dir: Option<PathBuf>,

    /// Kill either snpEff phase after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file (overrides discovery)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The configuration-relevant flags.
    #[must_use]
    pub fn to_cli_args(&self) -> CliArgs {
        CliArgs {
            config_path: self.config.clone(),
            snpeff_exec: self.snpeff_exec.clone(),
            java_exec: self.java_exec.clone(),
            coding_table: self.coding_table.clone(),
            workspace_dir: self.workspace_dir.clone(),
            keep_workspace: self.keep_workspace,
            timeout_secs: self.timeout,
            verbose: self.verbose,
        }
    }
}
