//! Command-line interface for annotate-vcf
//!
//! - `args`: clap argument definitions
//! - `run`: entry point, input checks and error output

pub mod args;
mod run;

pub use args::Cli;
pub use run::run;
