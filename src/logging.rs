//! Tracing setup for the binary and tests

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (normally the
/// `log_level` setting) is used. An unparsable level falls back to `warn`.
/// Later calls are no-ops.
pub fn init_tracing(default_level: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        // try_init: a host process may already have installed a subscriber
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
