//! Input checks that run before any workspace or snpEff process exists.
//!
//! - [`contigs`]: first-column identifiers of GFF and VCF files
//! - [`coding_table`]: contig to codon table mapping parsed from YAML
//! - [`validator`]: the consistency decision over both

pub mod coding_table;
pub mod contigs;
pub mod validator;

pub use coding_table::{CodingTable, DEFAULT_KEY, KNOWN_CODON_TABLES, is_known_codon_table};
pub use contigs::{ContigSet, extract_contigs, extract_contigs_from_path};
pub use validator::{ContigReport, ContigWarning, check_contigs};
