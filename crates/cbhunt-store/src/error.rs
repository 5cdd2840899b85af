use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection not found: {0}")]
    NotFound(String),

    #[error("the last collection cannot be deleted")]
    LastCollection,

    #[error("collection {id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: String,
        expected: cbhunt_core::CollectionKind,
        actual: cbhunt_core::CollectionKind,
    },

    #[error("index {index} is out of range for {len} item(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("collection name must be non-empty")]
    EmptyName,

    #[error("stored collections are unreadable: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
