// tests/common.rs
//! Shared test utilities: logging setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize test-friendly logging. Safe to call from every test.
#[allow(dead_code)]
pub fn setup() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer()) // captured by `cargo test`
        .with(EnvFilter::from_default_env()) // respects RUST_LOG=
        .try_init()
        .ok();
}
