//! Structured logging for Farshore binaries.
//!
//! Thin initialization layer over the `tracing` ecosystem: console
//! output with uptime timestamps and module paths, filterable per
//! module via `RUST_LOG` or a configured level string.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for a Farshore binary.
///
/// Filter precedence: the `RUST_LOG` environment variable wins, then
/// `level_override` (typically the config file's `log_level`), then
/// [`default_env_filter`].
///
/// Call once at startup; a second call panics inside `tracing` because
/// the global subscriber is already set.
pub fn init_logging(level_override: Option<&str>) {
    let fallback = match level_override {
        Some(level) if !level.is_empty() => EnvFilter::new(level),
        _ => default_env_filter(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(fallback);

    let console_layer = fmt::layer()
        .with_target(true) // Show module path
        .with_level(true)
        .with_timer(fmt::time::uptime()); // Time since scenario start

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

/// The filter used when neither `RUST_LOG` nor a config level is set:
/// `info` for all targets.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info")
}
