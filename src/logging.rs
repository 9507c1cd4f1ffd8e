//! Diagnostic logging setup.
//!
//! Library code only emits `tracing` events; the binary installs a
//! stderr subscriber here.  The filter comes from `SHARDVAULT_LOG`
//! (standard `EnvFilter` syntax) and falls back to `warn`, or `debug`
//! when `--verbose` is passed.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "SHARDVAULT_LOG";

/// Install the global subscriber.  Calling it twice is harmless.
pub fn init(verbose: bool) {
    let fallback = if verbose { "shardvault=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
