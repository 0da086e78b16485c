//! Logging bootstrap.
//!
//! The crate emits `tracing` events at mutation, persistence and drag-session
//! boundaries. Embedders with their own subscriber can ignore this module;
//! everyone else calls [`init_logging`] once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted before the fallback filter
pub const LOG_ENV_VAR: &str = "TABDECK_LOG";

/// Installs a global fmt subscriber.
///
/// The filter comes from `TABDECK_LOG` when set, otherwise from `default_filter`
/// (e.g. `"info"` or `"tabdeck_core=debug"`). Returns `false` when a global
/// subscriber was already installed; that is not treated as an error so the
/// call is safe to repeat.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}
