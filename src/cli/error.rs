//! CLI-level errors (wrap scene errors)

use thiserror::Error;

use crate::errors::SceneError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Scene(#[from] SceneError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Scene(e) => match e {
                SceneError::Io(_) => crate::exitcode::IOERR,
                SceneError::Config(_) => crate::exitcode::CONFIG,
                SceneError::UnsupportedOperation { .. } | SceneError::StaleHandle(_) => {
                    crate::exitcode::SOFTWARE
                }
                SceneError::UnknownKind { .. }
                | SceneError::InvalidDeclaration { .. }
                | SceneError::DuplicateName { .. }
                | SceneError::UnknownParent { .. }
                | SceneError::CycleDetected(_) => crate::exitcode::DATAERR,
            },
        }
    }
}
