use thiserror::Error;

/// Errors surfaced to the hosting UI. Every flow catches these at its
/// boundary and renders the message; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened as a SQLite database.
    #[error("database connection error: {0}")]
    Connection(String),

    /// A referenced book id does not exist.
    #[error("book with id {0} not found")]
    NotFound(i64),

    /// Caller-supplied input failed validation before touching the database.
    #[error("{0}")]
    Validation(String),

    /// Any other driver-level failure during a read or write.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}
