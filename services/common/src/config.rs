//! Platform configuration

use crate::constants::{CONFIG_ENV_PREFIX, DEFAULT_LOG_LEVEL, STOCKS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Trading platform configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Instrument names that get their own trade index
    pub instruments: Vec<String>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,
    /// Emit ANSI colors
    pub ansi: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            instruments: STOCKS.iter().map(|s| (*s).to_string()).collect(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            ansi: true,
        }
    }
}

impl PlatformConfig {
    /// Load configuration from file, with `TRADE_INDEX__*` environment
    /// overrides layered on top
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("instruments"),
            )
            .build()
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid config in {}", path.display()))
    }

    /// Whether `name` is one of the configured instruments
    #[must_use]
    pub fn is_recognised(&self, name: &str) -> bool {
        self.instruments.iter().any(|i| i == name)
    }
}
