//! Everything that touches snpEff.
//!
//! [`discovery`] finds snpEff and a matching Java, [`snpeff`] runs the
//! `build` and `ann` phases, [`audit`] scans the annotated VCF for problem
//! codes, [`delivery`] hands the result over, and [`pipeline`] runs the
//! whole sequence inside one workspace.

pub mod audit;
pub mod delivery;
pub mod discovery;
pub mod pipeline;
pub mod snpeff;

pub use audit::{ProblemCode, ProblemTally, audit_annotations, audit_file};
pub use delivery::{OutputDestination, deliver};
pub use discovery::{Toolchain, discover_toolchain, discover_toolchain_with, java_version_line};
pub use pipeline::{AnnotationRequest, AnnotationSummary, annotate_vcf};
pub use snpeff::{EngineStreams, SnpEff};
