//! Audit of the annotated VCF for problem codes snpEff writes into `ANN`.
//!
//! snpEff exits zero even when whole contigs could not be annotated. The
//! only trace is a WARNING_/ERROR_ code inside the per-record `ANN` field,
//! so every record is scanned and any occurrence fails the run.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use annotate_vcf_utils::error::AuditError;

/// Minimum columns in a VCF data line, up to and including INFO.
const MIN_COLUMNS: usize = 8;
const INFO_COLUMN: usize = 7;
const ANN_PREFIX: &str = "ANN=";

/// Problem codes that make an annotated VCF unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProblemCode {
    RefDoesNotMatchGenome,
    SequenceNotAvailable,
    ChromosomeNotFound,
    OutOfChromosomeRange,
}

impl ProblemCode {
    pub const ALL: [Self; 4] = [
        Self::RefDoesNotMatchGenome,
        Self::SequenceNotAvailable,
        Self::ChromosomeNotFound,
        Self::OutOfChromosomeRange,
    ];

    /// The code as it appears in the `ANN` field.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RefDoesNotMatchGenome => "WARNING_REF_DOES_NOT_MATCH_GENOME",
            Self::SequenceNotAvailable => "WARNING_SEQUENCE_NOT_AVAILABLE",
            Self::ChromosomeNotFound => "ERROR_CHROMOSOME_NOT_FOUND",
            Self::OutOfChromosomeRange => "ERROR_OUT_OF_CHROMOSOME_RANGE",
        }
    }

    #[must_use]
    pub const fn explanation(self) -> &'static str {
        match self {
            Self::RefDoesNotMatchGenome => {
                "The reference base in your VCF didn't match the base in the GFF. Are you sure you have the right reference?"
            }
            Self::SequenceNotAvailable => {
                "A reference sequence was not available in your GFF. Please check that a reference sequence is available for every contig in your VCF"
            }
            Self::ChromosomeNotFound => {
                "A contig in your VCF could not be found in your GFF. Are you sure that contigs use consistent names between your input data and the reference?"
            }
            Self::OutOfChromosomeRange => {
                "One of your variants appears to be in a position beyond the end of the reference sequence. That's really weird, please check that you reference sequence matches your input data"
            }
        }
    }

    /// snpEff reports `ERROR_` codes for records it could not annotate at all.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::ChromosomeNotFound | Self::OutOfChromosomeRange)
    }

    /// Log line for `count` records carrying this code.
    #[must_use]
    pub fn describe(self, count: usize) -> String {
        let consequence = if self.is_error() {
            "records left unannotated"
        } else {
            "annotations unreliable"
        };
        format!("{count} instances of '{self}' ({consequence}): {}", self.explanation())
    }
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-code count of records carrying that code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemTally {
    counts: BTreeMap<ProblemCode, usize>,
    records: usize,
}

impl ProblemTally {
    /// Records containing `code`, counted once per record.
    #[must_use]
    pub fn count(&self, code: ProblemCode) -> usize {
        self.counts.get(&code).copied().unwrap_or(0)
    }

    /// Data records scanned.
    #[must_use]
    pub const fn records(&self) -> usize {
        self.records
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn log_warnings(&self) {
        for (code, count) in &self.counts {
            warn!("{}", code.describe(*count));
        }
    }

    /// Fail if any problem code was seen.
    pub fn verdict(&self) -> Result<(), AuditError> {
        if self.is_clean() {
            return Ok(());
        }
        Err(AuditError::ProblemsFound {
            problems: self
                .counts
                .iter()
                .map(|(code, count)| (code.code().to_string(), *count))
                .collect(),
        })
    }

    fn record(&mut self, ann: &str) {
        self.records += 1;
        for code in ProblemCode::ALL {
            if ann.contains(code.code()) {
                *self.counts.entry(code).or_insert(0) += 1;
            }
        }
    }
}

/// Tally problem codes across every data record read from `reader`.
pub fn audit_annotations<R: BufRead>(reader: R) -> Result<ProblemTally, AuditError> {
    let mut tally = ProblemTally::default();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| AuditError::MalformedRecord {
            line: line_no,
            reason: e.to_string(),
        })?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return Err(AuditError::MalformedRecord {
                line: line_no,
                reason: format!(
                    "expected at least {MIN_COLUMNS} tab-separated columns, found {}",
                    columns.len()
                ),
            });
        }
        let ann = columns[INFO_COLUMN]
            .split(';')
            .find_map(|entry| entry.strip_prefix(ANN_PREFIX))
            .unwrap_or("");
        tally.record(ann);
    }
    debug!(records = tally.records(), "Audited annotated VCF");
    Ok(tally)
}

pub fn audit_file(path: &Path) -> Result<ProblemTally, AuditError> {
    let file = File::open(path).map_err(|e| AuditError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    audit_annotations(BufReader::new(file))
}
