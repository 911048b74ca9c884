//! Diagnostic logging to stderr, filtered by `GLOSS_LOG`.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV: &str = "GLOSS_LOG";

/// Quiet by default so the interactive browser owns stderr.
pub fn init() {
    init_with_filter("warn");
}

pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
