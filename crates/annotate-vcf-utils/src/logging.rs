//! Logging infrastructure for annotate-vcf
//!
//! All diagnostics go to stderr: stdout may carry the annotated VCF.

use std::io::IsTerminal;

use tracing::{Level, info, span};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Colour only when stderr is a terminal and NO_COLOR is unset.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise verbose mode logs the annotate-vcf
/// crates at debug level and closes spans with their timing; the default
/// keeps to info.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("annotate_vcf=debug,info")
            } else {
                EnvFilter::try_new("info")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_color())
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false);

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                layer
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_target(false).compact())
            .try_init()?;
    }

    Ok(())
}

/// Span covering one annotation run.
///
/// `workspace` and `genome` start empty and are recorded once known.
pub fn run_span(gff: &str, vcf: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "annotate_run",
        gff = %gff,
        vcf = %vcf,
        workspace = tracing::field::Empty,
        genome = tracing::field::Empty,
    )
}

/// Span covering one pipeline stage inside a run.
pub fn stage_span(stage: &'static str) -> tracing::Span {
    span!(Level::INFO, "stage", stage = stage)
}

pub fn log_stage_complete(stage: &'static str, duration_ms: u128) {
    info!(stage, duration_ms = %duration_ms, "Stage completed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_construct_without_subscriber() {
        let run = run_span("genes.gff", "calls.vcf");
        let _guard = run.enter();
        run.record("genome", "genes");
        let stage = stage_span("validate");
        let _stage_guard = stage.enter();
        log_stage_complete("validate", 3);
    }
}
