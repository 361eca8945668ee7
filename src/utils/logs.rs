use tracing_subscriber::EnvFilter;
use crate::core::domain::LoggingConfig;

// RUST_LOG wins over the configured level. Returns false when a subscriber was already set.
pub fn setup_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        // disable printing the name of the module in every log line.
        .with_target(false);
    let res = if config.format.eq_ignore_ascii_case("json") {
        builder.with_ansi(false).json().try_init()
    } else {
        builder.compact().try_init()
    };
    res.is_ok()
}
