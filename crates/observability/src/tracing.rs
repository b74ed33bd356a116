//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for the process.
///
/// Emits JSON lines; the filter comes from `RUST_LOG` and falls back to
/// `info`. Calling this more than once is harmless — later calls are
/// no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .json()
        .try_init();
}
