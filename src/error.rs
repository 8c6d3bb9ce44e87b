use crate::models::Phase;
use thiserror::Error;

/// Errors raised by a [`Session`](crate::services::Session) operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(String),

    /// A previous operation failed and the session has not been recovered
    #[error("Session is in a failed state and must be recovered before reuse")]
    Failed,
}

/// Load error types
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("{phase} statement #{index} ({name}) failed after {committed} committed statement(s): {source}")]
    Statement {
        phase: Phase,
        index: usize,
        name: String,
        sql: String,
        committed: usize,
        #[source]
        source: SessionError,
    },

    #[error("Commit of {phase} statement #{index} ({name}) failed after {committed} committed statement(s): {source}")]
    Commit {
        phase: Phase,
        index: usize,
        name: String,
        sql: String,
        committed: usize,
        #[source]
        source: SessionError,
    },
}

impl LoadError {
    /// SQL text of the statement that aborted the run, if any
    pub fn failed_statement(&self) -> Option<&str> {
        match self {
            LoadError::Statement { sql, .. } | LoadError::Commit { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// Number of statements committed before the failure
    pub fn committed(&self) -> usize {
        match self {
            LoadError::Statement { committed, .. } | LoadError::Commit { committed, .. } => {
                *committed
            }
            _ => 0,
        }
    }
}

/// Convert tokio_postgres::Error to SessionError
impl From<tokio_postgres::Error> for SessionError {
    fn from(err: tokio_postgres::Error) -> Self {
        let details = if let Some(db_error) = err.as_db_error() {
            format!(
                "Code: {}, Message: {}",
                db_error.code().code(),
                db_error.message()
            )
        } else {
            format!("{}", err)
        };
        SessionError::Database(details)
    }
}
