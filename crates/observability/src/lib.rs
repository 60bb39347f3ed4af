//! Tracing subscriber setup shared by hosts and tests.

/// Initialize process-wide JSON logging with an `info` default filter.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init_with_default("info");
}

pub mod tracing;

pub use self::tracing::{init_for_tests, init_with_default};
