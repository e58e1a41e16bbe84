use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Library-level error type with rich context and user-friendly reporting.
///
/// Every stage of the annotation pipeline reports through one of the domain
/// enums below; `AnnotateVcfError` unifies them for the CLI.
///
/// # Error Categories
///
/// | Category | Raised by |
/// |----------|-----------|
/// | `Config` | configuration files, CLI values, unreadable inputs |
/// | `Discovery` | snpEff / Java lookup and version probing |
/// | `Validation` | coding table parsing, contig consistency checks |
/// | `Workspace` | ephemeral database directory management |
/// | `Engine` | non-zero exit from `snpEff build` / `snpEff ann` |
/// | `Audit` | problem codes found in the annotated VCF |
/// | `Delivery` | moving or streaming the result |
///
/// # Exit Code Mapping
///
/// Use [`to_exit_code()`](Self::to_exit_code) to map errors to CLI exit codes;
/// see [`crate::exit_codes`] for the table.
///
/// Library code returns `AnnotateVcfError` and does NOT call `std::process::exit()`.
#[derive(Error, Debug)]
pub enum AnnotateVcfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Input validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("snpEff error: {0}")]
    Engine(#[from] EngineError),

    #[error("Annotation audit error: {0}")]
    Audit(#[from] AuditError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Toolchain,
    InputConsistency,
    FileSystem,
    EngineProcess,
    OutputQuality,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Toolchain => write!(f, "Toolchain"),
            Self::InputConsistency => write!(f, "Input Consistency"),
            Self::FileSystem => write!(f, "File System"),
            Self::EngineProcess => write!(f, "Engine Process"),
            Self::OutputQuality => write!(f, "Output Quality"),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file {}: {reason}", path.display())]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },

    #[error("Cannot read input file {}: {reason}", path.display())]
    UnreadableInput { path: PathBuf, reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile { path, reason } => {
                format!("Configuration file '{}' is invalid: {reason}", path.display())
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {}", path.display())
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
            Self::UnreadableInput { path, reason } => {
                format!("Input file '{}' cannot be read: {reason}", path.display())
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile { .. } => Some(
                "Configuration files are TOML with optional [tools], [annotation], [workspace] and [engine] sections."
                    .to_string(),
            ),
            Self::NotFound { .. } | Self::DiscoveryFailed { .. } => Some(
                "annotate-vcf searches for .annotate-vcf/config.toml from the current directory upward."
                    .to_string(),
            ),
            Self::InvalidValue { .. } => None,
            Self::UnreadableInput { .. } => Some(
                "Both the GFF and the VCF are read before any work starts.".to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile { .. } => vec![
                "Check the TOML syntax of the configuration file".to_string(),
                "Remove keys that are not documented; unknown keys are rejected".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "java_heap" => vec!["Use a JVM heap size such as '4g' or '512m'".to_string()],
                "timeout_secs" => vec![
                    "Use a positive number of seconds, or remove the key to wait indefinitely"
                        .to_string(),
                ],
                "java_version_pattern" => {
                    vec!["Use a valid regular expression, e.g. '^java version \"1\\.7\\.'".to_string()]
                }
                _ => vec!["Remove the option to use the default value".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Check the path given to --config".to_string(),
                "Omit --config to use discovery and built-in defaults".to_string(),
            ],
            Self::DiscoveryFailed { .. } => vec![
                "Check read permissions on the current directory and its parents".to_string(),
                "Use --config <path> to specify the configuration file explicitly".to_string(),
            ],
            Self::UnreadableInput { .. } => vec![
                "Check the path and file permissions".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

// ============================================================================
// Toolchain discovery
// ============================================================================

/// snpEff and Java discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// No usable snpEff executable
    #[error("Could not find snpeff: {reason}")]
    MissingSnpEff { reason: String },

    /// No Java runtime of the required version
    #[error("Could not find a suitable version of Java: {reason}")]
    WrongJava { reason: String, pattern: String },
}

impl UserFriendlyError for DiscoveryError {
    fn user_message(&self) -> String {
        match self {
            Self::MissingSnpEff { reason } => format!("snpEff could not be located: {reason}"),
            Self::WrongJava { reason, .. } => {
                format!("No Java runtime of the required version was found: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::MissingSnpEff { .. } => Some(
                "annotate-vcf drives snpEff to build a database and annotate; it cannot annotate on its own."
                    .to_string(),
            ),
            Self::WrongJava { pattern, .. } => Some(format!(
                "The first line of `java -version` must match the pattern {pattern}."
            )),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingSnpEff { .. } => vec![
                "Put snpeff on your PATH".to_string(),
                "Or pass --snpeff-exec /path/to/snpEff.jar".to_string(),
            ],
            Self::WrongJava { .. } => vec![
                "Pass --java-exec pointing at a matching runtime".to_string(),
                "Or set [tools] java / java_fallbacks in the configuration file".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Toolchain
    }
}

// ============================================================================
// Input consistency
// ============================================================================

/// Coding table parsing and contig consistency errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Could not parse coding table: {reason}")]
    MalformedCodingTable { reason: String },

    #[error("Could not find coding tables for all contigs, see warnings for details")]
    MissingCodonTable { contigs: Vec<String> },

    #[error("Could not find annotation data for any contigs, see warnings for details")]
    NoCommonContigs { contigs: Vec<String> },

    #[error("Could not find coding table, see warnings for details")]
    UnknownCodingTable { tables: Vec<String> },

    #[error("Failed to read contigs from {}: {reason}", path.display())]
    ContigExtraction { path: PathBuf, reason: String },
}

impl UserFriendlyError for ValidationError {
    fn user_message(&self) -> String {
        match self {
            Self::MalformedCodingTable { reason } => {
                format!("The coding table is not a valid YAML mapping: {reason}")
            }
            Self::MissingCodonTable { contigs } => format!(
                "No coding table set for {} contig(s): {}",
                contigs.len(),
                contigs.join(", ")
            ),
            Self::NoCommonContigs { contigs } => format!(
                "None of the VCF contigs have annotation data in the GFF: {}",
                contigs.join(", ")
            ),
            Self::UnknownCodingTable { tables } => {
                format!("Unknown coding table(s): {}", tables.join(", "))
            }
            Self::ContigExtraction { path, reason } => {
                format!("Could not read contigs from '{}': {reason}", path.display())
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::MalformedCodingTable { .. } => Some(
                "The coding table maps contig names (or 'default') to snpEff codon table names."
                    .to_string(),
            ),
            Self::MissingCodonTable { .. } => Some(
                "Without a 'default' entry every VCF contig needs its own coding table.".to_string(),
            ),
            Self::NoCommonContigs { .. } => Some(
                "Contigs are matched by the first column of the VCF and GFF records.".to_string(),
            ),
            Self::UnknownCodingTable { .. } => Some(
                "Coding tables must be one of the 25 genetic codes snpEff knows.".to_string(),
            ),
            Self::ContigExtraction { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MalformedCodingTable { .. } => vec![
                "Use 'contig: Table' pairs, e.g. --coding-table 'default: Standard'".to_string(),
                "Use flow style for several entries: '{CHROM1: Standard, default: Mycoplasma}'"
                    .to_string(),
            ],
            Self::MissingCodonTable { .. } => vec![
                "Add a 'default' entry to the coding table".to_string(),
                "Or list every contig reported in the warnings".to_string(),
            ],
            Self::NoCommonContigs { .. } => vec![
                "Check that the VCF was called against the reference in the GFF".to_string(),
                "Check that contig names are spelled the same in both files".to_string(),
            ],
            Self::UnknownCodingTable { .. } => vec![
                "Check spelling; names are case sensitive, e.g. 'Bacterial_and_Plant_Plastid'"
                    .to_string(),
            ],
            Self::ContigExtraction { .. } => {
                vec!["Check that the file is readable plain text".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::InputConsistency
    }
}

// ============================================================================
// Workspace
// ============================================================================

/// Ephemeral database workspace errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to create workspace in {}: {reason}", parent.display())]
    Creation { parent: PathBuf, reason: String },

    #[error("Failed to stage {} into the workspace: {reason}", source_path.display())]
    Staging { source_path: PathBuf, reason: String },

    #[error("Failed to write snpEff config {}: {reason}", path.display())]
    ConfigRender { path: PathBuf, reason: String },

    #[error("Failed to delete workspace {}: {reason}", path.display())]
    Teardown { path: PathBuf, reason: String },
}

impl UserFriendlyError for WorkspaceError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        Some(
            "Each run builds its snpEff database in a fresh snpeff_data_dir_* directory."
                .to_string(),
        )
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Creation { .. } | Self::Staging { .. } | Self::ConfigRender { .. } => vec![
                "Check free disk space and write permissions".to_string(),
                "Use --workspace-dir to build the database elsewhere".to_string(),
            ],
            Self::Teardown { path, .. } => {
                vec![format!("Remove {} manually", path.display())]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::FileSystem
    }
}

// ============================================================================
// Engine process
// ============================================================================

/// Failures of the two snpEff subcommands
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Problem building the database from your GFF ({detail})")]
    BuildDatabase {
        detail: String,
        stderr_tail: Option<String>,
    },

    #[error("Problem annotating {vcf} ({detail})")]
    Annotation {
        vcf: String,
        detail: String,
        stderr_tail: Option<String>,
    },
}

impl EngineError {
    /// Tail of the captured stderr, when output was captured to a file.
    #[must_use]
    pub fn stderr_tail(&self) -> Option<&str> {
        match self {
            Self::BuildDatabase { stderr_tail, .. } | Self::Annotation { stderr_tail, .. } => {
                stderr_tail.as_deref()
            }
        }
    }
}

impl UserFriendlyError for EngineError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        self.stderr_tail()
            .filter(|tail| !tail.is_empty())
            .map(|tail| format!("Last snpEff output:\n{tail}"))
    }

    fn suggestions(&self) -> Vec<String> {
        let mut suggestions = vec![
            "Re-run with --verbose to see snpEff output live".to_string(),
            "Use --keep-workspace to inspect the database directory afterwards".to_string(),
        ];
        if matches!(self, Self::BuildDatabase { .. }) {
            suggestions.push("Check that the GFF embeds the reference sequence (##FASTA)".to_string());
        }
        suggestions
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::EngineProcess
    }
}

// ============================================================================
// Audit
// ============================================================================

/// Problems found while auditing the annotated VCF
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("There were problems during the annotation, please review the warnings for details")]
    ProblemsFound { problems: Vec<(String, usize)> },

    #[error("Malformed VCF record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Failed to read annotated VCF {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },
}

impl UserFriendlyError for AuditError {
    fn user_message(&self) -> String {
        match self {
            Self::ProblemsFound { problems } => {
                let listed = problems
                    .iter()
                    .map(|(code, count)| format!("{code} x{count}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("snpEff reported problems in the annotated VCF: {listed}")
            }
            _ => self.to_string(),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ProblemsFound { .. } => Some(
                "snpEff completed but flagged records; the data, not the pipeline, needs attention."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProblemsFound { .. } => vec![
                "Review the warnings above for an explanation of each code".to_string(),
                "Check that the VCF was called against the same reference as the GFF".to_string(),
            ],
            _ => vec!["Re-run with --keep-workspace and inspect the snpEff output".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::OutputQuality
    }
}

// ============================================================================
// Delivery
// ============================================================================

/// Failures delivering the annotated VCF to its destination
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Failed to move {} to {}: {reason}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    #[error("Failed to write annotated VCF to stdout: {reason}")]
    Stream { reason: String },
}

impl UserFriendlyError for DeliveryError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Relocate { .. } => vec![
                "Check that the output directory exists and is writable".to_string(),
                "Use --keep-workspace to keep the annotated VCF if delivery fails".to_string(),
            ],
            Self::Stream { .. } => vec!["Write to a file with -o instead".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::FileSystem
    }
}

// ============================================================================
// AnnotateVcfError
// ============================================================================

impl UserFriendlyError for AnnotateVcfError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Discovery(e) => e.user_message(),
            Self::Validation(e) => e.user_message(),
            Self::Workspace(e) => e.user_message(),
            Self::Engine(e) => e.user_message(),
            Self::Audit(e) => e.user_message(),
            Self::Delivery(e) => e.user_message(),
            Self::Io(e) => format!("File system operation failed: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Discovery(e) => e.context(),
            Self::Validation(e) => e.context(),
            Self::Workspace(e) => e.context(),
            Self::Engine(e) => e.context(),
            Self::Audit(e) => e.context(),
            Self::Delivery(e) => e.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Discovery(e) => e.suggestions(),
            Self::Validation(e) => e.suggestions(),
            Self::Workspace(e) => e.suggestions(),
            Self::Engine(e) => e.suggestions(),
            Self::Audit(e) => e.suggestions(),
            Self::Delivery(e) => e.suggestions(),
            Self::Io(_) => vec!["Check file permissions and free disk space".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Discovery(e) => e.category(),
            Self::Validation(e) => e.category(),
            Self::Workspace(e) => e.category(),
            Self::Engine(e) => e.category(),
            Self::Audit(e) => e.category(),
            Self::Delivery(e) => e.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl AnnotateVcfError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    /// ```
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Map this error to the CLI exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) => ExitCode::CLI_ARGS,
            Self::Discovery(_) => ExitCode::TOOLCHAIN,
            Self::Validation(_) => ExitCode::INPUT_CONSISTENCY,
            Self::Engine(_) => ExitCode::ENGINE_FAILURE,
            Self::Audit(AuditError::ProblemsFound { .. }) => ExitCode::AUDIT_FAILURE,
            _ => ExitCode::INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;

    #[test]
    fn test_validation_messages_match_warning_hint() {
        let err = ValidationError::MissingCodonTable {
            contigs: vec!["CHROM1".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Could not find coding tables for all contigs, see warnings for details"
        );
        assert_eq!(err.category(), ErrorCategory::InputConsistency);
    }

    #[test]
    fn test_display_for_user_has_sections() {
        let err = AnnotateVcfError::from(ValidationError::NoCommonContigs {
            contigs: vec!["PLASMID1".to_string(), "PLASMID2".to_string()],
        });
        let message = err.display_for_user();

        assert!(message.starts_with("Error: None of the VCF contigs"));
        assert!(message.contains("PLASMID1, PLASMID2"));
        assert!(message.contains("Context:"));
        assert!(message.contains("Suggestions:"));
    }

    #[test]
    fn test_engine_context_carries_stderr_tail() {
        let err = EngineError::BuildDatabase {
            detail: "exit code 1".to_string(),
            stderr_tail: Some("java.lang.RuntimeException: no sequence".to_string()),
        };
        let ctx = err.context().unwrap();
        assert!(ctx.contains("no sequence"));

        let quiet = EngineError::BuildDatabase {
            detail: "exit code 1".to_string(),
            stderr_tail: None,
        };
        assert!(quiet.context().is_none());
    }

    #[test]
    fn test_audit_user_message_lists_codes() {
        let err = AuditError::ProblemsFound {
            problems: vec![("ERROR_CHROMOSOME_NOT_FOUND".to_string(), 1)],
        };
        assert!(err.user_message().contains("ERROR_CHROMOSOME_NOT_FOUND x1"));
    }

    #[test]
    fn test_exit_code_mapping() {
        let cases: Vec<(AnnotateVcfError, ExitCode)> = vec![
            (
                ConfigError::InvalidValue {
                    key: "java_heap".to_string(),
                    value: String::new(),
                }
                .into(),
                ExitCode::CLI_ARGS,
            ),
            (
                DiscoveryError::MissingSnpEff {
                    reason: "not on PATH".to_string(),
                }
                .into(),
                ExitCode::TOOLCHAIN,
            ),
            (
                ValidationError::UnknownCodingTable {
                    tables: vec!["Nope".to_string()],
                }
                .into(),
                ExitCode::INPUT_CONSISTENCY,
            ),
            (
                EngineError::Annotation {
                    vcf: "in.vcf".to_string(),
                    detail: "exit code 1".to_string(),
                    stderr_tail: None,
                }
                .into(),
                ExitCode::ENGINE_FAILURE,
            ),
            (
                AuditError::ProblemsFound { problems: vec![] }.into(),
                ExitCode::AUDIT_FAILURE,
            ),
            (
                DeliveryError::Stream {
                    reason: "broken pipe".to_string(),
                }
                .into(),
                ExitCode::INTERNAL,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_exit_code(), expected, "{err}");
        }
    }
}
