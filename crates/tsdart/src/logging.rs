//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured filter; without either only warnings
//! and errors are shown. Output always goes to stderr so it never mixes with
//! translated code on stdout.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

fn build_filter(configured: Option<&str>) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::builder().parse_lossy(configured.unwrap_or(DEFAULT_FILTER)),
    }
}

pub fn init(configured: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
