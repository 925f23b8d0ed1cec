//! Structured logging setup.
//!
//! Verbosity is controlled by `RUST_LOG`; the default shows warnings and
//! errors only. Logging happens at effect boundaries (walker, engine,
//! CLI), never inside the pure detection and clustering functions.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. Call once at startup.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
