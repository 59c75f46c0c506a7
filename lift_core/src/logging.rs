//! Tracing setup shared by the `lift` binary and the unit tests.
//!
//! Events go to stderr in the compact format; `RUST_LOG` takes precedence
//! over whatever level the caller asks for.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber, filtering at `default_level` unless
/// `RUST_LOG` says otherwise
///
/// Stdout is left to command output. Calling this twice is a no-op.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();

    if installed.is_err() {
        tracing::debug!("Subscriber already installed, keeping it");
    }
}

/// Debug-level output routed through the test harness's capture
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
