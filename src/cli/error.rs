//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Parse { .. } | ApplicationError::Structural(_) => {
                        exitcode::DATAERR
                    }
                    ApplicationError::FileNotFound(_) => exitcode::NOINPUT,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                    ApplicationError::Serialize { .. } => exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn given_usage_error_when_exit_code_then_usage() {
        let err = CliError::Usage("cannot use both -i and -o".into());
        assert_eq!(err.exit_code(), exitcode::USAGE);
        assert_eq!(err.to_string(), "cannot use both -i and -o");
    }

    #[test]
    fn given_parse_error_when_exit_code_then_dataerr() {
        let err = CliError::from(ApplicationError::Parse {
            message: "bad".into(),
        });
        assert_eq!(err.exit_code(), exitcode::DATAERR);
        assert_eq!(err.to_string(), "failed to parse YAML: bad");
    }

    #[test]
    fn given_structural_error_when_exit_code_then_dataerr() {
        let err = CliError::from(ApplicationError::from(DomainError::EmptyDocument));
        assert_eq!(err.exit_code(), exitcode::DATAERR);
    }

    #[test]
    fn given_missing_input_when_exit_code_then_noinput() {
        let err = CliError::from(ApplicationError::FileNotFound(PathBuf::from("x.yaml")));
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_config_error_when_exit_code_then_config() {
        let err = CliError::from(ApplicationError::Config {
            message: "parse".into(),
        });
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }

    #[test]
    fn given_io_error_when_exit_code_then_ioerr() {
        let err = CliError::from(InfraError::io(
            "write stdout",
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
        ));
        assert_eq!(err.exit_code(), exitcode::IOERR);
    }
}
