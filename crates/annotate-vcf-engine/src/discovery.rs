use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info};

use annotate_vcf_config::ToolsConfig;
use annotate_vcf_runner::{CommandSpec, ProcessRunner};
use annotate_vcf_utils::error::DiscoveryError;

/// `java -version` should answer almost immediately.
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved external tools for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub snpeff: PathBuf,
    pub java: PathBuf,
    /// First line of `java -version`
    pub java_version: String,
}

/// Discover snpEff and Java, searching `PATH` where no explicit path is set.
pub fn discover_toolchain(
    runner: &dyn ProcessRunner,
    tools: &ToolsConfig,
) -> Result<Toolchain, DiscoveryError> {
    discover_toolchain_with(runner, tools, |name| which::which(name).ok())
}

/// [`discover_toolchain`] with an injectable `PATH` lookup.
pub fn discover_toolchain_with(
    runner: &dyn ProcessRunner,
    tools: &ToolsConfig,
    lookup: impl Fn(&str) -> Option<PathBuf>,
) -> Result<Toolchain, DiscoveryError> {
    let snpeff = locate_snpeff(tools.snpeff.as_deref(), &lookup)?;
    let pattern =
        Regex::new(&tools.java_version_pattern).map_err(|e| DiscoveryError::WrongJava {
            reason: format!("invalid version pattern: {e}"),
            pattern: tools.java_version_pattern.clone(),
        })?;
    let (java, java_version) = choose_java(runner, tools, &pattern, &lookup)?;

    info!(
        snpeff = %snpeff.display(),
        java = %java.display(),
        java_version = %java_version,
        "Resolved toolchain"
    );
    Ok(Toolchain {
        snpeff,
        java,
        java_version,
    })
}

fn locate_snpeff(
    explicit: Option<&Path>,
    lookup: &impl Fn(&str) -> Option<PathBuf>,
) -> Result<PathBuf, DiscoveryError> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(DiscoveryError::MissingSnpEff {
                    reason: format!("{} does not exist", path.display()),
                });
            }
            absolute(path).map_err(|reason| DiscoveryError::MissingSnpEff { reason })
        }
        None => lookup("snpeff").ok_or_else(|| DiscoveryError::MissingSnpEff {
            reason: "snpeff is not in PATH".to_string(),
        }),
    }
}

fn choose_java(
    runner: &dyn ProcessRunner,
    tools: &ToolsConfig,
    pattern: &Regex,
    lookup: &impl Fn(&str) -> Option<PathBuf>,
) -> Result<(PathBuf, String), DiscoveryError> {
    if let Some(explicit) = &tools.java {
        return match java_version_line(runner, explicit, pattern) {
            Some(version) => {
                let java = absolute(explicit).map_err(|reason| DiscoveryError::WrongJava {
                    reason,
                    pattern: pattern.as_str().to_string(),
                })?;
                Ok((java, version))
            }
            None => Err(DiscoveryError::WrongJava {
                reason: format!(
                    "{} is not the required version or could not be run",
                    explicit.display()
                ),
                pattern: pattern.as_str().to_string(),
            }),
        };
    }

    let candidates = lookup("java")
        .into_iter()
        .chain(tools.java_fallbacks.iter().cloned());
    let mut tried = Vec::new();
    for candidate in candidates {
        if let Some(version) = java_version_line(runner, &candidate, pattern) {
            debug!(java = %candidate.display(), "Using Java");
            return Ok((candidate, version));
        }
        tried.push(candidate.display().to_string());
    }

    let reason = if tried.is_empty() {
        "java is not in PATH and no fallbacks are configured".to_string()
    } else {
        format!("tried {}", tried.join(", "))
    };
    Err(DiscoveryError::WrongJava {
        reason,
        pattern: pattern.as_str().to_string(),
    })
}

/// Run `<java> -version` and return its first line if it matches `pattern`.
///
/// Java prints its version on stderr; stdout is used when stderr is empty.
/// A runtime that cannot be run or exits non-zero never matches.
pub fn java_version_line(
    runner: &dyn ProcessRunner,
    java: &Path,
    pattern: &Regex,
) -> Option<String> {
    let output = match runner.run(&CommandSpec::new(java).arg("-version"), Some(PROBE_TIMEOUT)) {
        Ok(output) => output,
        Err(e) => {
            debug!(java = %java.display(), error = %e, "Java probe failed");
            return None;
        }
    };
    if !output.success() {
        debug!(java = %java.display(), exit_code = ?output.exit_code, "Java probe exited non-zero");
        return None;
    }

    let stderr = output.stderr_string();
    let text = if stderr.trim().is_empty() {
        output.stdout_string()
    } else {
        stderr
    };
    let first_line = text.lines().next()?.trim_end().to_string();
    if pattern.is_match(&first_line) {
        Some(first_line)
    } else {
        debug!(java = %java.display(), version = %first_line, "Java version does not match");
        None
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    std::path::absolute(path).map_err(|e| format!("cannot resolve {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotate_vcf_config::DEFAULT_JAVA_VERSION_PATTERN;
    use annotate_vcf_runner::{ProcessOutput, RunnerError};
    use std::collections::HashMap;

    /// Answers `-version` per program path; unknown programs fail to spawn.
    struct VersionRunner {
        versions: HashMap<PathBuf, (&'static str, &'static str, i32)>,
    }

    impl VersionRunner {
        fn new(entries: &[(&str, &'static str, &'static str, i32)]) -> Self {
            Self {
                versions: entries
                    .iter()
                    .map(|(path, out, err, code)| (PathBuf::from(path), (*out, *err, *code)))
                    .collect(),
            }
        }
    }

    impl ProcessRunner for VersionRunner {
        fn run(
            &self,
            cmd: &CommandSpec,
            _timeout: Option<Duration>,
        ) -> Result<ProcessOutput, RunnerError> {
            match self.versions.get(Path::new(&cmd.program)) {
                Some((out, err, code)) => Ok(ProcessOutput::new(
                    out.as_bytes().to_vec(),
                    err.as_bytes().to_vec(),
                    Some(*code),
                )),
                None => Err(RunnerError::SpawnFailed {
                    program: cmd.program_display(),
                    reason: "No such file or directory".to_string(),
                }),
            }
        }
    }

    const JAVA7: &str = "java version \"1.7.0_21\"\nJava(TM) SE Runtime Environment\n";
    const JAVA8: &str = "java version \"1.8.0_151\"\nJava(TM) SE Runtime Environment\n";

    fn pattern() -> Regex {
        Regex::new(DEFAULT_JAVA_VERSION_PATTERN).unwrap()
    }

    fn snpeff_file() -> tempfile::NamedTempFile {
        tempfile::NamedTempFile::new().unwrap()
    }

    #[test]
    fn test_version_line_from_stderr() {
        let runner = VersionRunner::new(&[("/usr/bin/java", "", JAVA7, 0)]);
        assert_eq!(
            java_version_line(&runner, Path::new("/usr/bin/java"), &pattern()).as_deref(),
            Some("java version \"1.7.0_21\"")
        );
    }

    #[test]
    fn test_version_line_falls_back_to_stdout() {
        let runner = VersionRunner::new(&[("/usr/bin/java", JAVA7, "", 0)]);
        assert!(java_version_line(&runner, Path::new("/usr/bin/java"), &pattern()).is_some());
    }

    #[test]
    fn test_version_mismatch_nonzero_and_silent_rejected() {
        let runner = VersionRunner::new(&[
            ("/j8", "", JAVA8, 0),
            ("/broken", "", JAVA7, 1),
            ("/silent", "", "", 0),
        ]);
        for java in ["/j8", "/broken", "/silent", "/missing"] {
            assert!(
                java_version_line(&runner, Path::new(java), &pattern()).is_none(),
                "{java}"
            );
        }
    }

    #[test]
    fn test_missing_snpeff_on_path() {
        let runner = VersionRunner::new(&[("/usr/bin/java", "", JAVA7, 0)]);
        let err = discover_toolchain_with(&runner, &ToolsConfig::default(), |_| None).unwrap_err();
        assert!(matches!(err, DiscoveryError::MissingSnpEff { .. }));
    }

    #[test]
    fn test_explicit_snpeff_must_exist() {
        let runner = VersionRunner::new(&[]);
        let tools = ToolsConfig {
            snpeff: Some(PathBuf::from("/definitely/missing/snpEff.jar")),
            ..ToolsConfig::default()
        };
        let err = discover_toolchain_with(&runner, &tools, |_| None).unwrap_err();
        assert!(matches!(err, DiscoveryError::MissingSnpEff { .. }));
    }

    #[test]
    fn test_path_java_preferred() {
        let jar = snpeff_file();
        let runner = VersionRunner::new(&[("/usr/bin/java", "", JAVA7, 0)]);
        let tools = ToolsConfig {
            snpeff: Some(jar.path().to_path_buf()),
            ..ToolsConfig::default()
        };

        let toolchain = discover_toolchain_with(&runner, &tools, |name| {
            (name == "java").then(|| PathBuf::from("/usr/bin/java"))
        })
        .unwrap();

        assert_eq!(toolchain.java, PathBuf::from("/usr/bin/java"));
        assert_eq!(toolchain.snpeff, jar.path());
        assert_eq!(toolchain.java_version, "java version \"1.7.0_21\"");
    }

    #[test]
    fn test_fallback_used_when_path_java_is_wrong_version() {
        let runner = VersionRunner::new(&[("/usr/bin/java", "", JAVA8, 0), ("/opt/jdk7/java", "", JAVA7, 0)]);
        let tools = ToolsConfig {
            java_fallbacks: vec![PathBuf::from("/opt/jdk7/java")],
            ..ToolsConfig::default()
        };

        let toolchain = discover_toolchain_with(&runner, &tools, |name| match name {
            "java" => Some(PathBuf::from("/usr/bin/java")),
            "snpeff" => Some(PathBuf::from("/usr/bin/snpeff")),
            _ => None,
        })
        .unwrap();

        assert_eq!(toolchain.java, PathBuf::from("/opt/jdk7/java"));
        assert_eq!(toolchain.snpeff, PathBuf::from("/usr/bin/snpeff"));
    }

    #[test]
    fn test_fallback_used_without_path_java() {
        let runner = VersionRunner::new(&[("/opt/jdk7/java", "", JAVA7, 0)]);
        let tools = ToolsConfig {
            java_fallbacks: vec![PathBuf::from("/opt/jdk7/java")],
            ..ToolsConfig::default()
        };
        let toolchain = discover_toolchain_with(&runner, &tools, |name| {
            (name == "snpeff").then(|| PathBuf::from("/usr/bin/snpeff"))
        })
        .unwrap();
        assert_eq!(toolchain.java, PathBuf::from("/opt/jdk7/java"));
    }

    #[test]
    fn test_explicit_wrong_java_is_fatal_without_fallback() {
        let jar = snpeff_file();
        let runner = VersionRunner::new(&[("/opt/jdk8/java", "", JAVA8, 0), ("/usr/bin/java", "", JAVA7, 0)]);
        let tools = ToolsConfig {
            snpeff: Some(jar.path().to_path_buf()),
            java: Some(PathBuf::from("/opt/jdk8/java")),
            ..ToolsConfig::default()
        };

        let err = discover_toolchain_with(&runner, &tools, |_| Some(PathBuf::from("/usr/bin/java")))
            .unwrap_err();

        match err {
            DiscoveryError::WrongJava { reason, pattern } => {
                assert!(reason.contains("/opt/jdk8/java"));
                assert_eq!(pattern, DEFAULT_JAVA_VERSION_PATTERN);
            }
            other => panic!("Expected WrongJava, got {other:?}"),
        }
    }

    #[test]
    fn test_no_java_anywhere() {
        let runner = VersionRunner::new(&[]);
        let tools = ToolsConfig {
            java_fallbacks: Vec::new(),
            ..ToolsConfig::default()
        };
        let err = discover_toolchain_with(&runner, &tools, |name| {
            (name == "snpeff").then(|| PathBuf::from("/usr/bin/snpeff"))
        })
        .unwrap_err();
        assert!(matches!(err, DiscoveryError::WrongJava { .. }));
    }
}
