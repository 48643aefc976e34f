//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Command-line flags are applied on top by `main`.
//!
//! | Variable               | Default    | Meaning                         |
//! |------------------------|------------|---------------------------------|
//! | `TESTMART_STORE_NAME`  | `TESTMART` | Receipt header                  |
//! | `TESTMART_OUTPUT`      | `text`     | Purchase output: text or json   |
//! | `TESTMART_PRETTY_JSON` | `true`     | Indent JSON output              |

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use testmart_core::purchase::DEFAULT_RECEIPT_HEADER;

// =============================================================================
// Output Format
// =============================================================================

/// How a purchase is printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Boxed plain-text receipt
    #[default]
    Text,

    /// Purchase summary as JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidValue("TESTMART_OUTPUT".to_string())),
        }
    }
}

// =============================================================================
// CLI Config
// =============================================================================

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Header printed at the top of every receipt
    pub store_name: String,

    /// Default purchase output format
    pub output: OutputFormat,

    /// Indent JSON output
    pub pretty_json: bool,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn load_from<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = CliConfig {
            store_name: lookup("TESTMART_STORE_NAME")
                .unwrap_or_else(|| DEFAULT_RECEIPT_HEADER.to_string()),

            output: lookup("TESTMART_OUTPUT")
                .unwrap_or_else(|| "text".to_string())
                .parse()?,

            pretty_json: lookup("TESTMART_PRETTY_JSON")
                .unwrap_or_else(|| "true".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TESTMART_PRETTY_JSON".to_string()))?,
        };

        if config.store_name.trim().is_empty() {
            return Err(ConfigError::MissingRequired("TESTMART_STORE_NAME".to_string()));
        }

        Ok(config)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            store_name: DEFAULT_RECEIPT_HEADER.to_string(),
            output: OutputFormat::Text,
            pretty_json: true,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
