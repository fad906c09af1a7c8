//! Shared fixtures and tracing setup for Tessera test binaries.

pub mod fixtures;

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a tracing subscriber for test binaries. Honors `RUST_LOG` and
/// is safe to call from every test.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .init();
    });
}
