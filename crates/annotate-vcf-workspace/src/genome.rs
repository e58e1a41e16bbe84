use std::path::Path;

const FEATURE_SUFFIXES: [&str; 2] = [".gff.gz", ".gff"];

/// Genome identifier for snpEff, derived from the GFF file name.
///
/// Strips one trailing `.gff` or `.gff.gz` and nothing else. A name that
/// would become empty is kept whole.
#[must_use]
pub fn genome_name(gff_path: &Path) -> String {
    let file_name = gff_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| gff_path.to_string_lossy().into_owned());

    let stem = FEATURE_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(*suffix))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string);
    stem.unwrap_or(file_name)
}
