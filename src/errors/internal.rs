use thiserror::Error;

/// Internal error type for store and infrastructure failures
///
/// Not shown to the user directly - the command boundary converts these to a
/// single per-command failure line and logs the source via tracing.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error("Database error during {operation}: {source}")]
    Database {
        operation: String,
        source: sea_orm::DbErr,
    },

    #[error("Failed to begin transaction: {source}")]
    TransactionBegin { source: sea_orm::DbErr },

    #[error("Failed to commit transaction: {source}")]
    TransactionCommit { source: sea_orm::DbErr },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error("Missing singleton row in {table}")]
    MissingSingleton { table: &'static str },
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
