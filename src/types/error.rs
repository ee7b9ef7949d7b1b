use thiserror::Error;

/// Low-level store errors that bubble up through the system.
///
/// Domain errors (`OrderError`, `ApiError`) wrap these and decide how they
/// surface to callers. Every variant maps to a server-side failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database not connected")]
    NotConnected,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("invalid stored document: {0}")]
    InvalidDocument(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}
