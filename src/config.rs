//! Environment-driven configuration.
//!
//! Required variables fail startup with the variable named, so a
//! misconfigured deployment dies early instead of failing on the first
//! request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Anthropic API key for quote generation.
    pub anthropic_api_key: String,
    /// Model used for quote generation.
    pub quote_model: String,
    /// Service account email for the task sheet.
    pub google_service_account_email: String,
    /// Service account private key (PEM).
    pub google_private_key: String,
    /// Spreadsheet id of the task board.
    pub google_sheet_id: String,
    pub host: String,
    pub port: u16,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// `GOOGLE_PRIVATE_KEY` may carry literal `\n` sequences (the usual
    /// form when the PEM is stored in a single-line env var); these are
    /// unescaped to real newlines.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            anthropic_api_key: required("ANTHROPIC_API_KEY")?,
            quote_model: std::env::var("QUOTE_MODEL")
                .unwrap_or_else(|_| "claude-3-5-sonnet-latest".to_string()),
            google_service_account_email: required("GOOGLE_SERVICE_ACCOUNT_EMAIL")?,
            google_private_key: required("GOOGLE_PRIVATE_KEY")?.replace("\\n", "\n"),
            google_sheet_id: required("GOOGLE_SHEET_ID")?,
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        })
    }
}
