//! Subscriber initialization.
//!
//! `RUST_LOG` wins over the default filter, e.g.
//! `RUST_LOG=flowbus_infra=debug` shows every published event.

use tracing_subscriber::EnvFilter;

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// JSON logs with timestamps, filtered by `RUST_LOG` or `default`.
pub fn init_with_default(default: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Human-readable logs routed through the test harness's captured output.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("debug"))
        .with_test_writer()
        .try_init();
}
