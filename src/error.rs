//! Error types for workflow execution.

use thiserror::Error;

/// The main error type for workflow operations.
///
/// Functions and agents plugged into a workflow return this type as well, so
/// their failures reach the caller of [`Workflow::invoke`](crate::Workflow::invoke)
/// exactly as they were raised.
#[derive(Error, Debug)]
pub enum Error {
    /// The run inputs do not satisfy the workflow's input schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A step read a state entry that does not exist.
    #[error("Step '{step}' requires missing field '{field}'")]
    MissingField {
        /// The name of the step that performed the lookup.
        step: String,
        /// The state entry that was not found.
        field: String,
    },

    /// A map/filter/reduce could not be applied to the collection it was given.
    #[error("Transformation error: {0}")]
    Transformation(String),

    /// A prompt template could not be parsed or rendered.
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// An error occurred during execution.
    #[error("Execution error: {0}")]
    Execution(String),

    /// A JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generic error with a message.
    #[error("{0}")]
    Message(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Message(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Message(msg.to_string())
    }
}

/// A specialized `Result` type for workflow operations.
pub type Result<T> = std::result::Result<T, Error>;
