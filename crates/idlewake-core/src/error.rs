//! Error types for idlewake configuration.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL (missing http/https scheme): {0}")]
    InvalidUrl(String),

    #[error("no random ping URLs configured")]
    EmptyRandomSet,

    #[error("invalid port value: {0}")]
    InvalidPort(String),
}
