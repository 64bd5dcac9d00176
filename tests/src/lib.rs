//! Modelmux Testing Framework
//!
//! Provides deterministic provider adapters and helpers for exercising the
//! router without live API calls.

use std::sync::Once;

pub mod adapter;

pub use adapter::MockAdapter;

static INIT: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process. Honors
/// `RUST_LOG`, defaults to `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_test_writer()
            .try_init();
    });
}
