//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Default filter when `REDLINE_LOG` is absent or invalid.
pub const DEFAULT_FILTER: &str = "redline=info";

/// Initialize the redline tracing/logging system.
///
/// Reads the `REDLINE_LOG` environment variable for per-stage log levels.
/// Format: `REDLINE_LOG=redline_analysis::scanner=debug,redline_analysis::mutation=info`
///
/// Idempotent: later calls are no-ops.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("REDLINE_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Initialize tracing with an explicit filter directive, ignoring `REDLINE_LOG`.
pub fn init_tracing_with_filter(filter: &str) {
    install(EnvFilter::new(filter));
}

fn install(filter: EnvFilter) {
    INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    });
}
