//! Logging setup for the `bhook` binary
//!
//! The library only emits `tracing` events. Installing a subscriber is left
//! to the embedding application, which for the bundled binary is this module.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "debug";

/// Installs a stderr subscriber filtered by `RUST_LOG`
///
/// Falls back to `warn`, or `debug` when `verbose` is set.
pub fn init(verbose: bool) -> Result<()> {
    let fallback = if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
