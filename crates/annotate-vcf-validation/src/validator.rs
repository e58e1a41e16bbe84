use std::collections::BTreeSet;
use std::fmt;

use tracing::{info, warn};

use annotate_vcf_utils::error::ValidationError;

use crate::coding_table::{CodingTable, is_known_codon_table};
use crate::contigs::ContigSet;

/// A problem that is logged whether or not it turns out to be fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContigWarning {
    /// No `default` and no explicit coding table for a VCF contig
    NoCodingTable { contig: String },
    /// VCF contig absent from the GFF
    NoAnnotationData { contig: String },
    /// Coding table name snpEff does not know
    UnknownCodingTable { table: String },
}

impl fmt::Display for ContigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCodingTable { contig } => {
                write!(f, "Cannot annotate VCF, no coding table set for '{contig}'")
            }
            Self::NoAnnotationData { contig } => {
                write!(f, "Could not annotate contig '{contig}', no annotation data")
            }
            Self::UnknownCodingTable { table } => {
                write!(f, "Could not find coding table '{table}'")
            }
        }
    }
}

/// Outcome of [`check_contigs`]: every warning, plus the sets behind the
/// fatal decisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContigReport {
    warnings: Vec<ContigWarning>,
    missing_coding_tables: Vec<String>,
    uncovered_contigs: Vec<String>,
    unknown_tables: Vec<String>,
    vcf_contig_count: usize,
}

impl ContigReport {
    /// Warnings in check order: coverage, then GFF overlap, then table names.
    #[must_use]
    pub fn warnings(&self) -> &[ContigWarning] {
        &self.warnings
    }

    /// VCF contigs that will be annotated.
    #[must_use]
    pub fn annotatable_count(&self) -> usize {
        self.vcf_contig_count - self.uncovered_contigs.len()
    }

    #[must_use]
    pub fn uncovered_contigs(&self) -> &[String] {
        &self.uncovered_contigs
    }

    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{warning}");
        }
    }

    /// The first fatal condition in precedence order: missing coding tables,
    /// then no common contigs, then unknown table names.
    pub fn verdict(&self) -> Result<(), ValidationError> {
        if !self.missing_coding_tables.is_empty() {
            return Err(ValidationError::MissingCodonTable {
                contigs: self.missing_coding_tables.clone(),
            });
        }
        // An empty VCF has nothing in common with any GFF
        if self.uncovered_contigs.len() == self.vcf_contig_count {
            return Err(ValidationError::NoCommonContigs {
                contigs: self.uncovered_contigs.clone(),
            });
        }
        if !self.unknown_tables.is_empty() {
            return Err(ValidationError::UnknownCodingTable {
                tables: self.unknown_tables.clone(),
            });
        }
        Ok(())
    }
}

/// Decide whether the VCF, the GFF and the coding table are consistent.
///
/// All three checks run and record their warnings before any fatal decision;
/// call [`ContigReport::verdict`] for the decision itself.
#[must_use]
pub fn check_contigs(
    vcf_contigs: &ContigSet,
    gff_contigs: &ContigSet,
    coding_table: &CodingTable,
) -> ContigReport {
    info!(
        vcf_contigs = vcf_contigs.len(),
        gff_contigs = gff_contigs.len(),
        "Checking that the VCF and GFF contigs are consistent"
    );

    let mut warnings = Vec::new();

    let missing_coding_tables: Vec<String> = if coding_table.has_default() {
        Vec::new()
    } else {
        vcf_contigs
            .iter()
            .filter(|contig| coding_table.explicit(contig).is_none())
            .map(str::to_string)
            .collect()
    };
    warnings.extend(
        missing_coding_tables
            .iter()
            .map(|contig| ContigWarning::NoCodingTable {
                contig: contig.clone(),
            }),
    );

    let uncovered_contigs: Vec<String> = vcf_contigs
        .iter()
        .filter(|contig| !gff_contigs.contains(contig))
        .map(str::to_string)
        .collect();
    warnings.extend(
        uncovered_contigs
            .iter()
            .map(|contig| ContigWarning::NoAnnotationData {
                contig: contig.clone(),
            }),
    );

    let unknown_tables: Vec<String> = coding_table
        .tables()
        .filter(|table| !is_known_codon_table(table))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    warnings.extend(
        unknown_tables
            .iter()
            .map(|table| ContigWarning::UnknownCodingTable {
                table: table.clone(),
            }),
    );

    ContigReport {
        warnings,
        missing_coding_tables,
        uncovered_contigs,
        unknown_tables,
        vcf_contig_count: vcf_contigs.len(),
    }
}
