//! # Structured Logging
//!
//! `tracing` subscriber setup for the binary. `RUST_LOG` wins over the
//! configured level. JSON output is meant for log shippers.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LoggingSettings, Settings};

/// Install the global subscriber.
///
/// `verbose` forces the default level to `debug`. Returns `false` when a
/// subscriber was already installed (e.g. by a test harness); that is not an
/// error.
pub fn init_logging(settings: &LoggingSettings, verbose: bool) -> bool {
    let default_level = if verbose { "debug" } else { settings.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if settings.json {
        builder.json().try_init().is_ok()
    } else {
        builder.with_target(false).try_init().is_ok()
    };

    if !installed {
        tracing::debug!("Global subscriber already set, keeping it");
    }
    installed
}

/// Log the effective settings. Secrets are never part of the output.
pub fn log_config_info(settings: &Settings) {
    tracing::info!(
        platform = %settings.platform,
        data_bag_path = %settings.data_bag.path,
        vault_enabled = settings.vault.is_some(),
        vault_address = settings.vault.as_ref().map(|v| v.address.as_str()).unwrap_or("-"),
        json_logs = settings.logging.json,
        "certchain configuration"
    );
}
