//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Honors `RUST_LOG`; defaults to `info` when it is unset.
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system with a fallback filter
///
/// `default_filter` uses `env_logger` filter syntax (`"debug"`,
/// `"text_engine=trace"`) and only applies when `RUST_LOG` is unset.
/// Calling this more than once is harmless.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::trace!("Logger already initialized");
    }
}
