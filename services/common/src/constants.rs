//! Common constants used across the platform
//!
//! Single source of truth for the recognised instrument catalog

/// Instruments the platform keeps a trade index for by default
pub const STOCKS: [&str; 12] = [
    "Barclays",
    "HSBA",
    "Lloyds Banking Group",
    "NatWest Group",
    "Standard Chartered",
    "3i",
    "Abrdn",
    "Hargreaves Lansdown",
    "London Stock Exchange Group",
    "Pershing Square Holdings",
    "Schroders",
    "St. James's Place plc.",
];

/// Prefix for environment variable overrides of [`crate::PlatformConfig`]
pub const CONFIG_ENV_PREFIX: &str = "TRADE_INDEX";

/// Log level used when neither `RUST_LOG` nor the config file sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";
