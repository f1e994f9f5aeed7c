use thiserror::Error;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Everything that can go wrong while turning a command into a build tool run.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The property bag is not valid JSON or has the wrong shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A key the selected operation requires is absent.
    #[error("missing required property: {0}")]
    MissingProperty(&'static str),

    /// The launcher program could not be found or is not executable.
    #[error("build tool not found: {0}")]
    ToolNotFound(String),

    /// The build tool ran and exited unsuccessfully.
    #[error("build tool exited with status {code}")]
    PropagatedExit { code: ExitCode },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Status the driver process should exit with for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            DriverError::PropagatedExit { code } => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;
