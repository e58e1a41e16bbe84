use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use annotate_vcf_utils::atomic_write::write_file_atomic;
use annotate_vcf_utils::error::WorkspaceError;
use annotate_vcf_validation::{CodingTable, ContigSet};

use crate::render::{GENOME_ID, render_config_text};

pub const WORKSPACE_PREFIX: &str = "snpeff_data_dir_";
pub const DATA_DIR_NAME: &str = GENOME_ID;
pub const STAGED_GFF_NAME: &str = "genes.gff";
pub const CONFIG_FILE_NAME: &str = "config";
pub const STATS_FILE_NAME: &str = "snpEff_summary.html";

/// Uniquely named directory holding one run's snpEff database.
///
/// Dropping a `Workspace` deletes the directory tree, so every exit path
/// tears it down. Use [`destroy`](Self::destroy) to observe deletion errors
/// and [`keep`](Self::keep) to retain it.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create `<parent>/snpeff_data_dir_*` and stage the GFF as `data/genes.gff`.
    pub fn create(parent: &Path, gff_path: &Path) -> Result<Self, WorkspaceError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| WorkspaceError::Creation {
                parent: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        let workspace = Self { dir };
        debug!(path = %workspace.path().display(), "Created workspace for temporary database");

        let data_dir = workspace.data_dir();
        fs::create_dir(&data_dir).map_err(|e| WorkspaceError::Creation {
            parent: parent.to_path_buf(),
            reason: format!("cannot create {}: {e}", data_dir.display()),
        })?;

        fs::copy(gff_path, workspace.staged_gff()).map_err(|e| WorkspaceError::Staging {
            source_path: gff_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(workspace)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.path().join(DATA_DIR_NAME)
    }

    #[must_use]
    pub fn staged_gff(&self) -> PathBuf {
        self.data_dir().join(STAGED_GFF_NAME)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.path().join(CONFIG_FILE_NAME)
    }

    #[must_use]
    pub fn stats_path(&self) -> PathBuf {
        self.path().join(STATS_FILE_NAME)
    }

    /// Write the snpEff config for this workspace and return its path.
    pub fn render_config(
        &self,
        genome_name: &str,
        vcf_contigs: &ContigSet,
        coding_table: &CodingTable,
    ) -> Result<PathBuf, WorkspaceError> {
        let path = self.config_path();
        let text = render_config_text(self.path(), genome_name, vcf_contigs, coding_table);
        debug!(path = %path.display(), "Writing snpEff config");
        write_file_atomic(&path, &text).map_err(|e| WorkspaceError::ConfigRender {
            path: path.clone(),
            reason: format!("{e:#}"),
        })?;
        Ok(path)
    }

    /// Reserve a uniquely named empty file inside the workspace.
    pub fn scratch_file(&self, prefix: &str, suffix: &str) -> Result<PathBuf, WorkspaceError> {
        let to_error = |reason: String| WorkspaceError::Creation {
            parent: self.path().to_path_buf(),
            reason,
        };
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(self.path())
            .map_err(|e| to_error(e.to_string()))?;
        file.into_temp_path()
            .keep()
            .map_err(|e| to_error(e.to_string()))
    }

    /// Delete the workspace tree, reporting failures.
    pub fn destroy(self) -> Result<(), WorkspaceError> {
        let path = self.path().to_path_buf();
        info!(path = %path.display(), "Deleting temporary files");
        self.dir.close().map_err(|e| WorkspaceError::Teardown {
            path,
            reason: e.to_string(),
        })
    }

    /// Retain the workspace on disk and return its path.
    #[must_use]
    pub fn keep(self) -> PathBuf {
        let path = self.dir.keep();
        info!(path = %path.display(), "Keeping workspace");
        path
    }
}
