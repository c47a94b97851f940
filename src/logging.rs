//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for
//! command output. The filter comes from `RUST_LOG` when set, otherwise
//! from the first level found in: the `--loglevel` flag, the config file,
//! `warn`.

use anyhow::{bail, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Canonical filter directive for a user-supplied level name.
pub fn parse_level(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

/// Builds the filter without consulting the environment.
pub fn filter_for(flag: Option<&str>, configured: &str) -> Result<EnvFilter> {
    let requested = flag.unwrap_or(configured);
    let Some(level) = parse_level(requested) else {
        bail!(
            "Unknown log level: '{}'. Must be one of trace, debug, info, warn, error, or off.",
            requested
        );
    };
    Ok(EnvFilter::new(level))
}

/// Installs the global stderr subscriber.
pub fn init(flag: Option<&str>, configured: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_for(flag, configured)?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;
    Ok(())
}
