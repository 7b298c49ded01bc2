use crate::Error;
use thiserror::Error as ThisError;

/// Failure categories raised by the access layer.
///
/// Every fallible operation returns [`crate::Result`], an `anyhow` result. The category
/// travels inside it and can be recovered with `error.downcast_ref::<KeelError>()`,
/// including when it was attached as context to a driver error.
#[derive(Debug, ThisError)]
pub enum KeelError {
    /// Record metadata is malformed: missing or duplicated primary key, no table name, unknown field.
    #[error("Malformed record metadata: {0}")]
    Schema(String),
    /// The operation is not available for the dialect or shape of the statement.
    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),
    /// The execution primitive rejected or failed the statement.
    #[error("Error while executing the statement:\n{statement}")]
    Execution { statement: String },
    /// An argument supplied by the caller is invalid.
    #[error("Invalid argument: {0}")]
    Validation(String),
}

impl KeelError {
    pub fn schema(message: impl Into<String>) -> Error {
        Error::new(Self::Schema(message.into()))
    }
    pub fn unsupported(message: impl Into<String>) -> Error {
        Error::new(Self::UnsupportedQuery(message.into()))
    }
    pub fn validation(message: impl Into<String>) -> Error {
        Error::new(Self::Validation(message.into()))
    }
    /// Context attached to driver errors, keeps the offending statement text.
    pub fn execution(statement: &str) -> Self {
        Self::Execution {
            statement: format!("{}", crate::truncate_long!(statement)),
        }
    }
}

/// Returns the [`KeelError`] carried by `error`, if any.
pub fn error_kind(error: &Error) -> Option<&KeelError> {
    error.downcast_ref::<KeelError>()
}
