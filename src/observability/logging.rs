//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins; otherwise the configured level applies to this crate
//! - Session correlation id is attached as a field, not a span

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a configured level.
pub fn default_filter(log_level: &str) -> String {
    format!("crime_alert={log_level},alloy=warn")
}

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
