//! End-to-end runs of annotate-vcf against the snpeff-stub binary
//!
//! The stub stands in for Java (`--java-exec`) and answers both snpEff
//! phases. Gated behind the `dev-tools` feature.
//!
//! Run with: `cargo test --features dev-tools --test snpeff_stub_e2e`

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const GFF: &str = "##gff-version 3\n\
CHROM1\tEMBL\tgene\t1\t90\t.\t+\t.\tID=gene1\n\
CHROM1\tEMBL\tCDS\t1\t90\t.\t+\t0\tParent=gene1\n\
##FASTA\n\
>CHROM1\n\
ATGAAACCCGGGTTTAAACCCGGGTTTAAACCCGGGTTTAAACCCGGGTTTAAACCCGGGTTTAAACCCGGGTTTAAACCCGGGTTTTAA\n";

const VCF: &str = "##fileformat=VCFv4.1\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
CHROM1\t1\t.\tA\tG\t50\tPASS\tDP=10\n\
CHROM1\t30\t.\tT\tC\t50\tPASS\tDP=14\n";

struct Run {
    dir: TempDir,
}

impl Run {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("reference.gff"), GFF).unwrap();
        fs::write(dir.path().join("calls.vcf"), VCF).unwrap();
        fs::write(dir.path().join("snpEff.jar"), "stub jar").unwrap();
        fs::create_dir(dir.path().join("work")).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self, scenario: &str) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("annotate-vcf"));
        cmd.current_dir(self.dir.path())
            .env("SNPEFF_STUB_SCENARIO", scenario)
            .env_remove("RUST_LOG")
            .arg("--java-exec")
            .arg(assert_cmd::cargo::cargo_bin!("snpeff-stub"))
            .arg("--snpeff-exec")
            .arg(self.path("snpEff.jar"))
            .arg("--workspace-dir")
            .arg(self.path("work"))
            .args(["reference.gff", "calls.vcf"]);
        cmd
    }

    fn workspaces_left(&self) -> usize {
        fs::read_dir(self.path("work")).unwrap().count()
    }
}

fn data_lines(vcf: &str) -> Vec<&str> {
    vcf.lines().filter(|l| !l.starts_with('#')).collect()
}

#[test]
fn annotates_to_output_file() {
    let run = Run::new();

    run.command("success")
        .args(["-o", "annotated.vcf"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let annotated = fs::read_to_string(run.path("annotated.vcf")).unwrap();
    assert!(annotated.contains("##SnpEffVersion"));
    let records = data_lines(&annotated);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.contains(";ANN=G|missense_variant")));
    assert_eq!(run.workspaces_left(), 0);
}

#[test]
fn annotates_to_stdout() {
    let run = Run::new();

    let output = run.command("success").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("##fileformat=VCFv4.1\n"));
    assert_eq!(data_lines(&stdout).len(), 2);
    assert_eq!(run.workspaces_left(), 0);
}

#[test]
fn verbose_keeps_stdout_clean() {
    let run = Run::new();

    let output = run.command("success").arg("--verbose").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("Reading GFF3 data file"));
    assert_eq!(data_lines(&stdout).len(), 2);
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Reading GFF3 data file"));
}

#[test]
fn wrong_java_is_toolchain_error() {
    let run = Run::new();

    run.command("wrong-java")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No Java runtime of the required version"));
    assert_eq!(run.workspaces_left(), 0);
}

#[test]
fn build_failure_reports_snpeff_output() {
    let run = Run::new();

    run.command("build-fail")
        .args(["-o", "annotated.vcf"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Problem building the database from your GFF"))
        .stderr(predicate::str::contains("Cannot read sequence for chromosome"));
    assert!(!run.path("annotated.vcf").exists());
    assert_eq!(run.workspaces_left(), 0);
}

#[test]
fn annotate_failure_is_engine_error() {
    let run = Run::new();

    run.command("annotate-fail")
        .args(["-o", "annotated.vcf"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Problem annotating"));
    assert!(!run.path("annotated.vcf").exists());
    assert_eq!(run.workspaces_left(), 0);
}

#[test]
fn problem_codes_fail_the_run() {
    let run = Run::new();

    run.command("chromosome-not-found")
        .args(["-o", "annotated.vcf"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("2 instances of 'ERROR_CHROMOSOME_NOT_FOUND'"))
        .stderr(predicate::str::contains("ERROR_CHROMOSOME_NOT_FOUND x2"));
    assert!(!run.path("annotated.vcf").exists());
    assert_eq!(run.workspaces_left(), 0);
}

#[test]
fn disjoint_contigs_never_start_snpeff() {
    let run = Run::new();
    fs::write(
        run.path("calls.vcf"),
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\nPLASMID9\t1\t.\tA\tG\t50\tPASS\tDP=1\n",
    )
    .unwrap();

    run.command("success")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Could not annotate contig 'PLASMID9', no annotation data"))
        .stdout(predicate::str::is_empty());
    assert_eq!(run.workspaces_left(), 0);
}

#[test]
fn unknown_coding_table_is_rejected() {
    let run = Run::new();

    run.command("success")
        .args(["--coding-table", "{default: Klingon}"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Could not find coding table 'Klingon'"));
}

#[test]
fn keep_workspace_leaves_database() {
    let run = Run::new();

    run.command("success")
        .args(["-o", "annotated.vcf", "--keep-workspace"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Workspace kept at"));

    let kept: Vec<PathBuf> = fs::read_dir(run.path("work"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(kept.len(), 1);
    assert!(kept[0].join("config").is_file());
    assert!(kept[0].join("snpEff_summary.html").is_file());
    assert!(is_workspace(&kept[0]));
}

fn is_workspace(path: &Path) -> bool {
    path.file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("snpeff_data_dir_")
}
