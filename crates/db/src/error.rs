//! Store error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// No connection string is configured.
    #[error("document store is not configured")]
    Unavailable,

    /// A write would violate a unique index.
    #[error("duplicate value for unique field '{field}'")]
    Duplicate { field: String },

    #[error("database: {0}")]
    Database(String),

    #[error("document encoding: {0}")]
    Encoding(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
