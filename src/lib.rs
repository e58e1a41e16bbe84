//! annotate-vcf - annotate a VCF with snpEff against a GFF3 reference
//!
//! Each run checks that the VCF, the GFF and the coding table agree, builds
//! a throwaway snpEff database from the GFF, annotates the VCF with it and
//! audits the result for problem codes snpEff does not report through its
//! exit status.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Annotate to stdout
//! annotate-vcf reference.gff calls.vcf > annotated.vcf
//!
//! # Per-contig coding tables, output to a file
//! annotate-vcf reference.gff calls.vcf -o annotated.vcf \
//!     --coding-table '{default: Bacterial_and_Plant_Plastid, PLASMID1: Mycoplasma}'
//! ```
//!
//! # Library
//!
//! [`annotate_vcf`] runs the pipeline for an [`AnnotationRequest`] with any
//! [`ProcessRunner`]. Tool discovery is separate, see [`discover_toolchain`].

pub mod cli;

pub use annotate_vcf_config::{CliArgs, Config, ConfigSource};
pub use annotate_vcf_engine::{
    AnnotationRequest, AnnotationSummary, OutputDestination, ProblemCode, Toolchain,
    annotate_vcf, discover_toolchain,
};
pub use annotate_vcf_runner::{NativeRunner, ProcessRunner};
pub use annotate_vcf_utils::error::{AnnotateVcfError, UserFriendlyError};
pub use annotate_vcf_utils::exit_codes::ExitCode;
pub use annotate_vcf_validation::{CodingTable, ContigSet, check_contigs};
