//! Error types for recx

use thiserror::Error;

/// Main error type for recx operations
#[derive(Debug, Error)]
pub enum RecxError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid url: {0}")]
    InvalidTarget(String),

    #[error("no input provided")]
    NoInput,

    #[error("no valid urls provided")]
    NoValidUrls,

    #[error("request cancelled")]
    Cancelled,
}

/// Result type alias for recx operations
pub type Result<T> = std::result::Result<T, RecxError>;
