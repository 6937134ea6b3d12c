//! Data access error types
//!
//! Defines all errors that can occur while loading datasets.

use thiserror::Error;

/// Errors that can occur while fetching or decoding a dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Retrieval failed (missing file, non-success status, transport failure)
    #[error("Failed to load {name}: {reason}")]
    Unavailable { name: String, reason: String },

    /// The dataset was retrieved but its content is not what the reader expected
    #[error("Malformed dataset {name}: {reason}")]
    Malformed { name: String, reason: String },

    /// Dataset names are plain file names, never paths
    #[error("Invalid dataset name: {0:?}")]
    InvalidName(String),

    /// The navigation that requested the dataset was superseded
    #[error("Fetch of {0} abandoned by navigation")]
    Cancelled(String),

    /// The source could not be constructed
    #[error("Source configuration error: {0}")]
    Source(String),
}

impl DataError {
    pub fn unavailable(name: &str, reason: impl ToString) -> Self {
        DataError::Unavailable {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(name: &str, reason: impl ToString) -> Self {
        DataError::Malformed {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

/// Check that a dataset name is a bare file name.
pub fn validate_name(name: &str) -> DataResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(DataError::InvalidName(name.to_string()));
    }
    Ok(())
}
