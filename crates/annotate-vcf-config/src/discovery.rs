use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use annotate_vcf_utils::error::ConfigError;

use crate::model::{CliArgs, Config, ConfigSource};

/// Directory holding the discovered config file
const CONFIG_DIR: &str = ".annotate-vcf";
const CONFIG_FILE: &str = "config.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    tools: Option<ToolsSection>,
    annotation: Option<AnnotationSection>,
    workspace: Option<WorkspaceSection>,
    engine: Option<EngineSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolsSection {
    snpeff: Option<PathBuf>,
    java: Option<PathBuf>,
    java_fallbacks: Option<Vec<PathBuf>>,
    java_version_pattern: Option<String>,
    java_heap: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnnotationSection {
    coding_table: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WorkspaceSection {
    parent_dir: Option<PathBuf>,
    keep: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EngineSection {
    timeout_secs: Option<u64>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::DiscoveryFailed {
            reason: format!("Failed to get current directory: {e}"),
        })?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        let mut source_attribution = HashMap::new();

        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(ConfigError::NotFound {
                        path: explicit.clone(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file_from(start_dir),
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)?;
            let source = ConfigSource::ConfigFile(path.clone());
            let mut from_file = |key: &str| {
                source_attribution.insert(key.to_string(), source.clone());
            };

            if let Some(tools) = file_config.tools {
                if let Some(snpeff) = tools.snpeff {
                    config.tools.snpeff = Some(snpeff);
                    from_file("snpeff");
                }
                if let Some(java) = tools.java {
                    config.tools.java = Some(java);
                    from_file("java");
                }
                if let Some(fallbacks) = tools.java_fallbacks {
                    config.tools.java_fallbacks = fallbacks;
                    from_file("java_fallbacks");
                }
                if let Some(pattern) = tools.java_version_pattern {
                    config.tools.java_version_pattern = pattern;
                    from_file("java_version_pattern");
                }
                if let Some(heap) = tools.java_heap {
                    config.tools.java_heap = heap;
                    from_file("java_heap");
                }
            }

            if let Some(coding_table) = file_config.annotation.and_then(|a| a.coding_table) {
                config.annotation.coding_table = coding_table;
                from_file("coding_table");
            }

            if let Some(workspace) = file_config.workspace {
                if let Some(parent_dir) = workspace.parent_dir {
                    config.workspace.parent_dir = Some(parent_dir);
                    from_file("workspace_dir");
                }
                if let Some(keep) = workspace.keep {
                    config.workspace.keep = keep;
                    from_file("keep_workspace");
                }
            }

            if let Some(timeout) = file_config.engine.and_then(|e| e.timeout_secs) {
                config.engine.timeout_secs = Some(timeout);
                from_file("timeout_secs");
            }
        }

        // CLI overrides
        let mut from_cli = |key: &str| {
            source_attribution.insert(key.to_string(), ConfigSource::Cli);
        };

        if let Some(snpeff) = &cli_args.snpeff_exec {
            config.tools.snpeff = Some(snpeff.clone());
            from_cli("snpeff");
        }
        if let Some(java) = &cli_args.java_exec {
            config.tools.java = Some(java.clone());
            from_cli("java");
        }
        if let Some(coding_table) = &cli_args.coding_table {
            config.annotation.coding_table = coding_table.clone();
            from_cli("coding_table");
        }
        if let Some(dir) = &cli_args.workspace_dir {
            config.workspace.parent_dir = Some(dir.clone());
            from_cli("workspace_dir");
        }
        if cli_args.keep_workspace {
            config.workspace.keep = true;
            from_cli("keep_workspace");
        }
        if let Some(timeout) = cli_args.timeout_secs {
            config.engine.timeout_secs = Some(timeout);
            from_cli("timeout_secs");
        }
        if cli_args.verbose {
            config.verbose = true;
            from_cli("verbose");
        }

        config.config_file = config_path;
        config.source_attribution = source_attribution;
        config.validate()?;

        Ok(config)
    }

    /// Search upward from `start_dir` for `.annotate-vcf/config.toml`.
    ///
    /// Stops at repository root markers (.git, .hg, .svn) or the filesystem root.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        for dir in start_dir.ancestors() {
            let config_path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }
            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }
        }
        None
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
