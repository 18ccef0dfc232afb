//! Error types for studybase

use thiserror::Error;

/// Result type alias using studybase's Error
pub type Result<T> = std::result::Result<T, Error>;

/// studybase error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Valid prompt is required")]
    InvalidPrompt,

    #[error("Document store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Completion error: {message}")]
    CompletionError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True when the failure means the store could not be reached at all,
    /// as opposed to a scan returning nothing.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::StoreUnavailable { .. })
    }
}
