use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use annotate_vcf_utils::atomic_write::relocate_file;
use annotate_vcf_utils::error::DeliveryError;

/// Where the annotated VCF ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    /// `None` and `-` mean stdout.
    #[must_use]
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => Self::Stdout,
            Some(path) if path.as_os_str() == "-" => Self::Stdout,
            Some(path) => Self::File(path.to_path_buf()),
        }
    }
}

/// Move the annotated VCF to `destination`, or stream it to `stdout`.
pub fn deliver(
    annotated: &Path,
    destination: &OutputDestination,
    stdout: &mut dyn Write,
) -> Result<(), DeliveryError> {
    match destination {
        OutputDestination::File(target) => {
            info!(to = %target.display(), "Moving annotated VCF");
            let result = relocate_file(annotated, target).map_err(|e| DeliveryError::Relocate {
                from: annotated.to_path_buf(),
                to: target.clone(),
                reason: format!("{e:#}"),
            })?;
            for warning in &result.warnings {
                warn!("{warning}");
            }
            Ok(())
        }
        OutputDestination::Stdout => {
            stream(annotated, stdout).map_err(|e| DeliveryError::Stream { reason: e.to_string() })
        }
    }
}

fn stream(annotated: &Path, stdout: &mut dyn Write) -> io::Result<()> {
    let mut source = BufReader::new(File::open(annotated)?);
    let mut sink = BufWriter::new(stdout);
    io::copy(&mut source, &mut sink)?;
    sink.flush()
}
