//! Tracing subscriber setup for the binary.
//!
//! Events go to stderr so the menu and listings on stdout stay clean. A set
//! `RUST_LOG` overrides the configured filter.

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Resolve the filter: `RUST_LOG` first, then `fallback`.
pub fn env_filter(fallback: &str) -> Result<EnvFilter> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_filter(rust_log.as_deref(), fallback)
}

/// An empty or unset `rust_log` defers to `fallback`; an invalid one is an
/// error rather than a silent fallback.
fn resolve_filter(rust_log: Option<&str>, fallback: &str) -> Result<EnvFilter> {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|err| anyhow!("invalid RUST_LOG filter '{directives}': {err}")),
        None => EnvFilter::try_new(fallback)
            .map_err(|err| anyhow!("invalid log filter '{fallback}': {err}")),
    }
}

/// Install the global subscriber.
pub fn init_tracing(fallback: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter(fallback)?)
        .try_init()
        .map_err(|err| anyhow!("installing tracing subscriber: {err}"))
}
