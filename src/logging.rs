//! Tracing setup for the `chatmod` binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Build the filter: `RUST_LOG` if set and valid, else `configured`, else
/// the default.
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber, logging to stderr.
///
/// Returns `false` if a subscriber was already installed. Panics are routed
/// through `tracing::error!` once this succeeds.
pub fn init(configured: &str) -> bool {
    let subscriber = tracing_subscriber::registry()
        .with(build_filter(configured))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        );

    if subscriber.try_init().is_err() {
        return false;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::debug!(filter = configured, "tracing initialized");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_invalid_filter_falls_back() {
        std::env::remove_var("RUST_LOG");
        let filter = build_filter("chatmod=[bogus");
        assert_eq!(filter.to_string().to_lowercase(), DEFAULT_LOG_FILTER);
    }

    #[test]
    #[serial_test::serial]
    fn test_rust_log_wins() {
        std::env::set_var("RUST_LOG", "chatmod=trace");
        let filter = build_filter("chatmod=warn");
        std::env::remove_var("RUST_LOG");
        assert_eq!(filter.to_string().to_lowercase(), "chatmod=trace");
    }
}
