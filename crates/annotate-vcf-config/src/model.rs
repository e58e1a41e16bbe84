use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Coding table used when neither the CLI nor the config file sets one.
pub const DEFAULT_CODING_TABLE: &str = "default: Bacterial_and_Plant_Plastid";

/// snpEff 4.x runs on Java 7.
pub const DEFAULT_JAVA_VERSION_PATTERN: &str = r#"^java version "1\.7\.[^"]+"$"#;

/// Site install tried after the `java` on PATH.
pub const DEFAULT_JAVA_FALLBACK: &str = "/software/pathogen/external/apps/usr/local/jdk1.7.0_21/bin/java";

pub const DEFAULT_JAVA_HEAP: &str = "4g";

/// Where a configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::ConfigFile(path) => write!(f, "config ({})", path.display()),
            Self::Defaults => write!(f, "default"),
        }
    }
}

/// Command-line values that participate in configuration precedence.
///
/// `None` (or `false`) means "not given on the command line".
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub snpeff_exec: Option<PathBuf>,
    pub java_exec: Option<PathBuf>,
    pub coding_table: Option<String>,
    pub workspace_dir: Option<PathBuf>,
    pub keep_workspace: bool,
    pub timeout_secs: Option<u64>,
    pub verbose: bool,
}

/// External tool locations and JVM settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    /// Explicit snpEff executable; `None` searches PATH
    pub snpeff: Option<PathBuf>,
    /// Explicit Java runtime; `None` tries PATH then `java_fallbacks`
    pub java: Option<PathBuf>,
    pub java_fallbacks: Vec<PathBuf>,
    pub java_version_pattern: String,
    pub java_heap: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            snpeff: None,
            java: None,
            java_fallbacks: vec![PathBuf::from(DEFAULT_JAVA_FALLBACK)],
            java_version_pattern: DEFAULT_JAVA_VERSION_PATTERN.to_string(),
            java_heap: DEFAULT_JAVA_HEAP.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationConfig {
    /// YAML mapping text, e.g. `{CHROM1: Standard, default: Mycoplasma}`
    pub coding_table: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            coding_table: DEFAULT_CODING_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Directory the workspace is created in; `None` is the current directory
    pub parent_dir: Option<PathBuf>,
    pub keep: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// `None` waits for snpEff indefinitely
    pub timeout_secs: Option<u64>,
}

/// Effective configuration after applying CLI > file > defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub annotation: AnnotationConfig,
    pub workspace: WorkspaceConfig,
    pub engine: EngineConfig,
    pub verbose: bool,
    /// Config file that was loaded, if any
    pub config_file: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    /// Source of a configuration key, `Defaults` when never overridden.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .cloned()
            .unwrap_or(ConfigSource::Defaults)
    }
}
