use judgekit_core::JudgekitError;
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a `jk` operation.
pub type JudgekitCliResult<T> = Result<T, JudgekitCliError>;

/// An error that ends a `jk` invocation.
#[derive(pretty_error_debug::Debug, Error)]
pub enum JudgekitCliError {
    /// An error from the judgekit core library
    #[error(transparent)]
    Core(#[from] JudgekitError),

    /// An I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No judge is configured in the environment or the configuration file
    #[error("no judge configured, run `jk config set` or set JUDGEKIT_PROVIDER")]
    NotConfigured,

    /// The language of a source file could not be determined
    #[error("cannot tell the language of {0}, pass --lang")]
    UnknownLanguage(String),

    /// The run did not succeed
    #[error("{0}")]
    RunFailed(String),
}
