//! Error types for Undertekst.

use thiserror::Error;

/// Library-level error type for Undertekst operations.
#[derive(Error, Debug)]
pub enum UndertekstError {
    #[error("Invalid timestamp: {0} (non-negative seconds expected)")]
    InvalidTimestamp(f64),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Unknown output format: {0}. Use txt, vtt, srt, tsv, json, aud or all.")]
    UnknownFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Anonymization failed: {0}")]
    Anonymization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Undertekst operations.
pub type Result<T> = std::result::Result<T, UndertekstError>;
