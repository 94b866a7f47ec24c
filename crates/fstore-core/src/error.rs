use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FstoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Backend failure that is not an `io::Error`; for `RecordStore` implementors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date format: {0}")]
    InvalidFormat(String),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Invalid row id: {0:?}")]
    InvalidId(String),

    #[error("Row {id} not found on table '{table}'")]
    NotFound { table: String, id: String },

    #[error("System clock unavailable: {0}")]
    Clock(String),

    /// Any other error, e.g. from a custom `RecordStore` built on `anyhow`
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl FstoreError {
    /// Build a `NotFound` error for a row
    pub fn not_found(table: impl Into<String>, id: impl ToString) -> Self {
        FstoreError::NotFound {
            table: table.into(),
            id: id.to_string(),
        }
    }

    /// True if the error reports a missing row
    pub fn is_not_found(&self) -> bool {
        matches!(self, FstoreError::NotFound { .. })
    }

    /// True if the error came from rejecting caller input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FstoreError::InvalidLimit(_)
                | FstoreError::InvalidDate(_)
                | FstoreError::InvalidFormat(_)
                | FstoreError::InvalidTableName(_)
                | FstoreError::InvalidId(_)
        )
    }
}

impl From<serde_json::Error> for FstoreError {
    fn from(err: serde_json::Error) -> Self {
        FstoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FstoreError>;
