//! Framework error type.
//!
//! Sub-crates define their own error enums where they can fail for reasons
//! of their own (`WorldError`, `SessionError`) and wrap `HaError` as one
//! variant.

use thiserror::Error;

/// The top-level error type for `ha-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for HaError {
    fn from(e: toml::de::Error) -> Self {
        HaError::Parse(e.to_string())
    }
}

/// Shorthand result type for all `ha-*` crates.
pub type HaResult<T> = Result<T, HaError>;
