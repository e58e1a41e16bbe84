use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use annotate_vcf_utils::error::ValidationError;

/// GFF3 directive after which only reference sequence follows.
const FASTA_DIRECTIVE: &str = "##FASTA";

/// Sorted, deduplicated contig names.
///
/// Ordering only makes reports deterministic; every decision is by membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContigSet(BTreeSet<String>);

impl ContigSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, contig: &str) -> bool {
        self.0.contains(contig)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn insert(&mut self, contig: impl Into<String>) -> bool {
        self.0.insert(contig.into())
    }
}

impl<S: Into<String>> FromIterator<S> for ContigSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ContigSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Collect the first tab-delimited column of every non-comment line.
///
/// The source is rewound before scanning, so the same handle can be read
/// again afterwards. Blank lines contribute nothing and scanning stops at a
/// `##FASTA` directive. A malformed line contributes whatever occupies its
/// first column.
pub fn extract_contigs<R: Read + Seek>(source: &mut R) -> io::Result<ContigSet> {
    source.seek(SeekFrom::Start(0))?;

    let mut contigs = ContigSet::new();
    let mut reader = BufReader::new(&mut *source);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);

        if line.starts_with(FASTA_DIRECTIVE) {
            break;
        }
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let contig = line.split('\t').next().unwrap_or(line).trim();
        if !contig.is_empty() {
            contigs.insert(contig);
        }
    }
    drop(reader);

    source.seek(SeekFrom::Start(0))?;
    Ok(contigs)
}

/// Open `path` and extract its contigs.
pub fn extract_contigs_from_path(path: &Path) -> Result<ContigSet, ValidationError> {
    let to_error = |e: io::Error| ValidationError::ContigExtraction {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let mut file = File::open(path).map_err(to_error)?;
    extract_contigs(&mut file).map_err(to_error)
}
