//! Logging setup
//!
//! The library only emits `tracing` events. Binaries and the C ABI call
//! [`init`] to install a stderr subscriber.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `html_scrape_loader=debug`
pub const LOG_ENV: &str = "SCRAPE_LOADER_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init();
        init();
        tracing::info!("still running");
    }
}
