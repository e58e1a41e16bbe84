//! Stub Java + snpEff for development testing
//!
//! Pass this binary as `--java-exec`. It answers `-version` like a Java 7
//! runtime and handles `-jar <snpEff.jar> build ...` and `-jar <snpEff.jar>
//! ann ...` the way snpEff does, without a JVM.
//!
//! The scenario comes from `SNPEFF_STUB_SCENARIO`:
//!
//! - `success` (default): build succeeds, every record gets a clean `ANN`
//! - `wrong-java`: `-version` reports a Java 17 runtime
//! - `build-fail`: `build` exits 1 with an error on stderr
//! - `annotate-fail`: `ann` exits 1 with an error on stderr
//! - `chromosome-not-found`: `ann` tags every record `ERROR_CHROMOSOME_NOT_FOUND`

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgAction, Command};

const SCENARIO_ENV: &str = "SNPEFF_STUB_SCENARIO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    Success,
    WrongJava,
    BuildFail,
    AnnotateFail,
    ChromosomeNotFound,
}

impl Scenario {
    fn from_env() -> Result<Self> {
        let value = std::env::var(SCENARIO_ENV).unwrap_or_else(|_| "success".to_string());
        Ok(match value.as_str() {
            "success" => Self::Success,
            "wrong-java" => Self::WrongJava,
            "build-fail" => Self::BuildFail,
            "annotate-fail" => Self::AnnotateFail,
            "chromosome-not-found" => Self::ChromosomeNotFound,
            other => bail!("unknown {SCENARIO_ENV} '{other}'"),
        })
    }
}

fn main() -> Result<()> {
    // Java-style single-dash flags, so everything is taken verbatim
    let matches = Command::new("snpeff-stub")
        .about("Stub Java runtime and snpEff for testing")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("argv")
                .num_args(0..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true)
                .action(ArgAction::Append),
        )
        .get_matches();
    let argv: Vec<String> = matches
        .get_many::<String>("argv")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let scenario = Scenario::from_env()?;

    if argv.iter().any(|a| a == "-version") {
        let version = match scenario {
            Scenario::WrongJava => "openjdk version \"17.0.2\" 2022-01-18",
            _ => "java version \"1.7.0_21\"",
        };
        eprintln!("{version}");
        eprintln!("Java(TM) SE Runtime Environment (build 1.7.0_21-b11)");
        return Ok(());
    }

    let jar_at = argv
        .iter()
        .position(|a| a == "-jar")
        .context("expected -jar <snpEff.jar>")?;
    let subcommand = argv.get(jar_at + 2).context("expected a snpEff subcommand")?;
    let rest = &argv[jar_at + 3..];

    let code = match subcommand.as_str() {
        "build" => build(scenario, rest)?,
        "ann" => annotate(scenario, rest)?,
        other => bail!("unsupported snpEff subcommand '{other}'"),
    };
    std::process::exit(code);
}

/// Value following `flag` in `args`.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<&'a str> {
    let at = args
        .iter()
        .position(|a| a == flag)
        .with_context(|| format!("missing {flag}"))?;
    args.get(at + 1)
        .map(String::as_str)
        .with_context(|| format!("missing value for {flag}"))
}

fn build(scenario: Scenario, args: &[String]) -> Result<i32> {
    let config = PathBuf::from(flag_value(args, "-c")?);
    let text = fs::read_to_string(&config)
        .with_context(|| format!("cannot read config {}", config.display()))?;
    let data_dir = text
        .lines()
        .find_map(|line| line.strip_prefix("data.dir = "))
        .context("config has no data.dir")?;
    let gff = Path::new(data_dir).join("data").join("genes.gff");

    println!("Reading GFF3 data file  : '{}'", gff.display());
    if scenario == Scenario::BuildFail {
        eprintln!("ERROR: Cannot read sequence for chromosome; check the ##FASTA section");
        return Ok(1);
    }
    if !gff.is_file() {
        eprintln!("ERROR: Cannot read file '{}'", gff.display());
        return Ok(1);
    }
    println!("Saving database");
    Ok(0)
}

fn annotate(scenario: Scenario, args: &[String]) -> Result<i32> {
    let stats = PathBuf::from(flag_value(args, "-stats")?);
    let vcf = args.last().context("missing input VCF")?;
    eprintln!("Reading database for genome 'data'");
    if scenario == Scenario::AnnotateFail {
        eprintln!("ERROR: Cannot read input file '{vcf}'");
        return Ok(1);
    }

    let input = fs::read_to_string(vcf).with_context(|| format!("cannot read {vcf}"))?;
    let effect = match scenario {
        Scenario::ChromosomeNotFound => {
            "G|chromosome_number_variation|MODIFIER|||||||||||ERROR_CHROMOSOME_NOT_FOUND"
        }
        _ => "G|missense_variant|MODERATE|gene1|gene1|transcript|mRNA1|protein_coding|1/1|c.1A>G|p.Met1Val|1/900|1/900|1/300||",
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in input.lines() {
        if line.starts_with("#CHROM") {
            writeln!(out, "##SnpEffVersion=\"4.1 (stub)\"")?;
            writeln!(out, "{line}")?;
        } else if line.starts_with('#') || line.is_empty() {
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{line};ANN={effect}")?;
        }
    }
    out.flush()?;

    fs::write(&stats, "<html><body>snpEff stub summary</body></html>\n")
        .with_context(|| format!("cannot write {}", stats.display()))?;
    Ok(0)
}
