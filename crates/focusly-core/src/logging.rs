//! Logging infrastructure for Focusly.
//!
//! Centralized tracing setup shared by every binary built on the core.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Output goes to
/// stderr in compact form, keeping stdout free for command output.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}
