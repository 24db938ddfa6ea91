//! Derivation Error Types

use thiserror::Error;

/// Errors while deriving engineered features from raw records
#[derive(Debug, Clone, Error)]
pub enum DerivationError {
    /// Timestamp does not match the fixed dataset format
    #[error("Malformed timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
