#![forbid(unsafe_code)]

//! Optional fmt subscriber for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives, e.g.
/// `YAWE_LOG=yawe_text=trace,info`.
pub const LOG_ENV: &str = "YAWE_LOG";

/// Install a global fmt subscriber filtered by [`LOG_ENV`] (default
/// `warn`). Returns `false` when a global subscriber already exists.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
