use std::fmt::Write as _;
use std::path::Path;

use annotate_vcf_validation::{CodingTable, ContigSet};

/// Genome id the snpEff commands refer to; its files live under `data/`.
pub const GENOME_ID: &str = "data";

/// Text of the snpEff config for one run.
///
/// One `codonTable` line is written per VCF contig that resolves to a table,
/// explicit entries first, then `default`.
#[must_use]
pub fn render_config_text(
    workspace_dir: &Path,
    genome_name: &str,
    vcf_contigs: &ContigSet,
    coding_table: &CodingTable,
) -> String {
    let mut text = String::from("# snpEff configuration generated by annotate-vcf\n");
    let _ = writeln!(text, "data.dir = {}/", workspace_dir.display());
    let _ = writeln!(text, "{GENOME_ID}.genome : {genome_name}");

    let chromosomes = vcf_contigs.iter().collect::<Vec<_>>().join(", ");
    let _ = writeln!(text, "{GENOME_ID}.chromosomes : {chromosomes}");

    for contig in vcf_contigs.iter() {
        if let Some(table) = coding_table.table_for(contig) {
            let _ = writeln!(text, "{GENOME_ID}.{contig}.codonTable : {table}");
        }
    }
    text
}
