//! Error types for the denoising pipeline

use std::fmt;

/// Errors that can occur while corrupting, filtering or encoding audio
#[derive(Debug, Clone, PartialEq)]
pub enum DenoiseError {
    /// Invalid input buffer (zero sample rate, ragged channels, oversized data)
    InvalidInput(String),

    /// Invalid filter or noise configuration
    InvalidConfig {
        /// Name of the offending configuration field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A stage produced NaN or infinite samples
    ComputationError(String),

    /// Audio decoding error
    DecodingError(String),
}

impl DenoiseError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        DenoiseError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DenoiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenoiseError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DenoiseError::InvalidConfig { field, reason } => {
                write!(f, "Invalid configuration for `{}`: {}", field, reason)
            }
            DenoiseError::ComputationError(msg) => write!(f, "Computation error: {}", msg),
            DenoiseError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
        }
    }
}

impl std::error::Error for DenoiseError {}
