//! Diagnostic logging for `kbc`.
//!
//! Events are written to stderr so command output on stdout stays
//! machine-readable. `RUST_LOG` takes precedence over `[logging].level`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` if set and valid, otherwise `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{}': {}", level, e))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = build_filter(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_levels() {
        for level in ["trace", "debug", "info", "warn", "error", "off"] {
            assert!(build_filter(level).is_ok(), "level {} should parse", level);
        }
    }
}
