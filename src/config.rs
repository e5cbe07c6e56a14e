use std::env::var;

use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env param {0}")]
    Missing(&'static str),
    #[error("invalid value for env param {0}")]
    Invalid(&'static str),
}

pub struct Config {
    pub port: u16,
    pub host: String,
    pub log_level: String,
    pub channel_secret: String,
    pub channel_access_token: String,
    pub line_api_base: String,
    pub line_data_api_base: String,
    /// `UseDevelopmentStorage=true` targets a local storage emulator.
    pub storage_connection_string: String,
    pub container_name: String,
    pub blob_endpoint: String,
    pub ocr_api: String,
    pub ocr_api_key: String,
}

impl Config {
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let optional = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));
        let or_default =
            |name: &'static str, default: &str| optional(name).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: or_default("PORT", "7071")
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            host: or_default("HOST", "0.0.0.0"),
            log_level: or_default("LOG_LEVEL", "info"),
            channel_secret: required("LINE_CHANNEL_SECRET")?,
            channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
            line_api_base: or_default("LINE_API_BASE", "https://api.line.me"),
            line_data_api_base: or_default("LINE_DATA_API_BASE", "https://api-data.line.me"),
            storage_connection_string: required("STORAGE_CONNECTION_STRING")?,
            container_name: required("BLOB_CONTAINER_NAME")?,
            blob_endpoint: required("BLOB_ENDPOINT")?,
            ocr_api: required("OCR_API")?,
            ocr_api_key: required("OCR_API_KEY")?,
        })
    }
}
