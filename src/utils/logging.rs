//! Tracing subscriber setup
//!
//! The host application may install its own subscriber instead; `init` is a
//! convenience for services that embed the governance layer standalone.

use tracing_subscriber::EnvFilter;

/// Install a global tracing subscriber with env-filter support.
///
/// Reads `RUST_LOG` (defaulting to `info`). Safe to call more than once; later
/// calls are no-ops.
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
