//! Logging setup
//!
//! Logs go to stderr so rendered output on stdout stays clean. `RUST_LOG`
//! wins over the configured level when set.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` if present, else the configured level for the
/// crate, the dataset server and `tower_http`
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pulseboard={level},pulseboard_data={level},tower_http={level}",
            level = config.level
        ))
    })
}

/// Install the global subscriber; `format = "json"` selects JSON lines
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));

    match config.format.as_str() {
        "json" => registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init()?,
        "pretty" | "" => registry.with(fmt::layer().with_writer(std::io::stderr)).try_init()?,
        other => {
            registry.with(fmt::layer().with_writer(std::io::stderr)).try_init()?;
            tracing::warn!(format = other, "Unknown log format, using pretty");
        }
    }

    Ok(())
}
