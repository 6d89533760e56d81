//! Logging setup.
//!
//! Structured logging via `tracing`, filtered with the conventional `RUST_LOG`
//! environment variable.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Defaults to `info` for this crate and `warn` elsewhere when `RUST_LOG` is
/// unset. Safe to call once at startup; panics if a global subscriber is
/// already installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,staffctl=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
