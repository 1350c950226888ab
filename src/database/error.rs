use thiserror::Error;

/// Errors raised by the user and session stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username '{0}' is already registered")]
    DuplicateUser(String),

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("session cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("malformed session record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// True for errors caused by the caller rather than the backend
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::DuplicateUser(_) | Self::InvalidInput(_))
    }
}
