//! Log output for the console front ends.
//!
//! Records go to stderr; stdout carries command output only.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Install the global subscriber for `env`.
///
/// Development prints multi-line records with source locations; production
/// prints one JSON object per record. `RUST_LOG` replaces the default filter
/// in both.
pub fn init_tracing(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    if env.is_development() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_file(true)
                    .with_line_number(true)
                    .pretty()
                    .with_filter(filter),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_filter(filter),
            )
            .init();
    }

    tracing::debug!(environment = ?env, "logging ready");
}

/// Our crates log one level above the HTTP stack, which stays at `warn`.
const fn default_filter(env: &Environment) -> &'static str {
    if env.is_development() {
        "warn,pv_core=debug,pv_client=debug,pvctl=debug"
    } else {
        "warn,pv_core=info,pv_client=info,pvctl=info"
    }
}
