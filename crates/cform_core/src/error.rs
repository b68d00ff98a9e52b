//! Form error types

use std::io;
use thiserror::Error;

/// Errors raised while configuring or constructing form widgets
#[derive(Error, Debug)]
pub enum FormError {
    /// Required option missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// IO error when reading a config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FormError {
    /// Shorthand for a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
