//! Tracing setup for the CLI. Logs go to stderr so stdout stays parseable.

use tracing_subscriber::EnvFilter;

/// Filter precedence: $RUST_LOG, then --log-level, then the config level
pub fn init(flag_level: Option<&str>, config_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(flag_level.unwrap_or(config_level)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
