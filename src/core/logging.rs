//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted by `init_tracing`.
pub const LOG_ENV: &str = "CCG_TABLE_LOG";

/// Install a fmt subscriber filtered by `CCG_TABLE_LOG`, defaulting to `info`.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Install a fmt subscriber with an explicit filter (for tests or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init();
}
