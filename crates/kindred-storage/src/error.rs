//! Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Person not found: {0}")]
    PersonNotFound(String),

    #[error("Family not found: {0}")]
    FamilyNotFound(String),

    #[error("Invalid record: {0}")]
    Validation(String),

    #[error("Unsupported dataset version: {0}")]
    UnsupportedVersion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] kindred_core::Error),

    #[cfg(feature = "redb")]
    #[error("ReDB error: {0}")]
    Redb(#[from] ::redb::Error),

    #[cfg(feature = "redb")]
    #[error("ReDB database error: {0}")]
    RedbDatabase(#[from] ::redb::DatabaseError),

    #[cfg(feature = "redb")]
    #[error("ReDB table error: {0}")]
    RedbTable(#[from] ::redb::TableError),

    #[cfg(feature = "redb")]
    #[error("ReDB storage error: {0}")]
    RedbStorage(#[from] ::redb::StorageError),

    #[cfg(feature = "redb")]
    #[error("ReDB commit error: {0}")]
    RedbCommit(#[from] ::redb::CommitError),

    #[cfg(feature = "redb")]
    #[error("ReDB transaction error: {0}")]
    RedbTransaction(#[from] ::redb::TransactionError),
}

impl From<kindred_core::limits::ValidationError> for StorageError {
    fn from(err: kindred_core::limits::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Backend failures reach the engine as `Error::Storage`; lookups keep their kind
impl From<StorageError> for kindred_core::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Core(inner) => inner,
            StorageError::PersonNotFound(id) => Self::PersonNotFound(id),
            StorageError::FamilyNotFound(id) => Self::FamilyNotFound(id),
            StorageError::Validation(msg) => Self::Validation(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}
