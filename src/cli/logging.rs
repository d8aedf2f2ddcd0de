//! Diagnostic logging setup
//!
//! Events go to stderr so command output on stdout stays clean. The filter
//! comes from `WEALTHFLOW_LOG`, then `RUST_LOG`, and defaults to `warn`.

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

/// Application-specific filter variable
pub const LOG_ENV: &str = "WEALTHFLOW_LOG";

const DEFAULT_FILTER: &str = "warn";

static INIT: OnceLock<()> = OnceLock::new();

fn resolve_env_filter() -> EnvFilter {
    if let Ok(filter) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(filter) {
            return filter;
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber; later calls are no-ops
pub fn init_logging(verbose: bool) {
    INIT.get_or_init(|| {
        let filter = if verbose {
            EnvFilter::new("wealthflow=debug")
        } else {
            resolve_env_filter()
        };
        let layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}
