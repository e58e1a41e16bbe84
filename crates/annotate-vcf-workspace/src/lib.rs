//! Per-run snpEff database directory: staging, configuration, teardown.

mod genome;
mod render;
mod workspace;

pub use genome::genome_name;
pub use render::{GENOME_ID, render_config_text};
pub use workspace::{
    CONFIG_FILE_NAME, DATA_DIR_NAME, STAGED_GFF_NAME, STATS_FILE_NAME, WORKSPACE_PREFIX, Workspace,
};
