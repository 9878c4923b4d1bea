//! Configuration error types.

/// Errors raised while loading or validating process configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The underlying configuration source failed to load or deserialize.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A loaded value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}
