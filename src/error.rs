use serde_json::Value;
use thiserror::Error;

/// Reasons a raw course record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("course record is missing or not an object")]
    MalformedCourse,

    #[error("{field} prop missing from course{}", context_suffix(.context))]
    MissingRequiredField {
        field: &'static str,
        context: Option<String>,
    },
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(id) => format!(" {}", id),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Remote request failed with status {status}: {body}")]
    RemoteRequestFailed { status: u16, body: Value },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task failed: {0}")]
    Task(String),
}

impl From<sqlx::migrate::MigrateError> for SyncError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SyncError::Database(sqlx::Error::Migrate(Box::new(err)))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
