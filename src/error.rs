//! Error taxonomy for the rater.
//!
//! Malformed result rows are not errors: the extractor drops them and moves
//! on. Everything here is recoverable by the caller, either by retrying with
//! corrected input or by falling back to the last stored snapshot.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CgpaError {
    /// Projection parameters (or other user-entered numbers) were rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Snapshot store read/write failed, or a stored value could not be decoded.
    #[error("Persistence failure: {0}")]
    Persistence(String),
    /// The results source could not be read.
    #[error("Results source error: {0}")]
    Source(String),
    #[error("No results loaded; reload from the results page first")]
    NoData,
    #[error("A reload is already in progress")]
    ReloadInProgress,
}

impl From<serde_json::Error> for CgpaError {
    fn from(err: serde_json::Error) -> Self {
        CgpaError::Persistence(err.to_string())
    }
}

impl From<csv::Error> for CgpaError {
    fn from(err: csv::Error) -> Self {
        CgpaError::Source(err.to_string())
    }
}

impl From<reqwest::Error> for CgpaError {
    fn from(err: reqwest::Error) -> Self {
        CgpaError::Source(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CgpaError>;
