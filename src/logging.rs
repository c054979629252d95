//! Logging initialization

use std::fs::File;
use std::path::Path;

/// Initialize tracing to stderr with standard configuration
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();
}

/// Initialize tracing to a file.
///
/// Used by the TUI binary: writing log lines to stdout would corrupt the
/// alternate screen, so logs go to a file when requested and are otherwise
/// discarded.
pub fn init_tracing_to_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_writer(file)
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}
