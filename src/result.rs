use thiserror::Error;

/// Main error type for the SQL script library
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Statement {index} failed: {message} (statement: {statement})")]
    StatementFailed {
        index: usize,
        statement: String,
        message: String,
    },
    #[error("Database error: {0}")]
    Database(String),
}

impl ScriptError {
    pub fn new_invalid_input(message: impl Into<String>) -> Self {
        ScriptError::InvalidInput(message.into())
    }

    pub fn new_statement_failed(
        index: usize,
        statement: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        ScriptError::StatementFailed {
            index,
            statement: statement.into(),
            message: message.to_string(),
        }
    }
}

/// Type alias for Results using ScriptError
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Result of running a script or SQL string
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScriptResult {
    /// The statements as they were submitted to the database, in execution order
    pub sql_statements: Vec<String>,
}
