use std::fmt::Display;

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a judgekit-related operation.
pub type JudgekitResult<T> = Result<T, JudgekitError>;

/// An error that occurred while talking to a judge or managing its configuration.
#[derive(Debug, Error)]
pub enum JudgekitError {
    /// The provider configuration is unknown, incomplete or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A call to a judge failed. The message names the operation; the cause is logged.
    #[error("{0}")]
    Provider(String),

    /// The judge did not report a finished status within the polling budget.
    #[error("{0}")]
    Timeout(String),

    /// The caller cancelled the submission before it finished.
    #[error("Submission cancelled")]
    Cancelled,

    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl JudgekitError {
    /// Creates a provider error for a failed operation, logging the underlying cause.
    pub(crate) fn provider(action: &str, cause: impl Display) -> JudgekitError {
        tracing::error!("failed to {}: {}", action, cause);
        JudgekitError::Provider(format!("Failed to {}", action))
    }

    /// Returns true when the error was raised because the polling budget ran out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, JudgekitError::Timeout(_))
    }

    /// Returns true when the error was raised because the caller cancelled the run.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, JudgekitError::Cancelled)
    }
}
