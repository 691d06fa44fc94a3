//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from the environment
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a fallback filter
///
/// Behaves like [`init`] when `RUST_LOG` is set; otherwise `filter` is used,
/// so headless binaries produce output without extra environment setup.
pub fn init_with_default(filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}
