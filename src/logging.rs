//! Tracing setup: compact stdout output with environment-based filtering.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` controls filtering (default: "info"), e.g.
/// `RUST_LOG=swarmcrawl=debug,reqwest=warn`.
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("Failed to create EnvFilter");

    let stdout_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();
}
