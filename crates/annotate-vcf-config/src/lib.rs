//! Configuration management for annotate-vcf
//!
//! Hierarchical configuration with discovery and precedence CLI > file > defaults.
//! The TOML file has optional `[tools]`, `[annotation]`, `[workspace]` and
//! `[engine]` sections.

mod discovery;
mod model;
mod sources;
mod validation;

pub use model::{
    AnnotationConfig, CliArgs, Config, ConfigSource, DEFAULT_CODING_TABLE, DEFAULT_JAVA_FALLBACK,
    DEFAULT_JAVA_HEAP, DEFAULT_JAVA_VERSION_PATTERN, EngineConfig, ToolsConfig, WorkspaceConfig,
};
