// src/error/comicvine.rs
//
// Network-boundary error taxonomy.
//
// These are returned as values from repositories, never panicked or
// hidden. The UI decides how to render and when to retry.

use thiserror::Error;

use crate::error::AppError;

/// Why an API key could not be supplied to a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiKeyError {
    #[error("No API key configured")]
    NoApiKey,

    #[error("API key store failure: {0}")]
    Io(String),
}

/// Outcome classification for a single Comic Vine request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComicVineError {
    #[error("No network connection")]
    NoNetworkConnection,

    #[error("Request timed out")]
    RequestTimeout,

    #[error("HTTP error {code}: {message}")]
    HttpError { code: u16, message: String },

    #[error("API key error: {0}")]
    ApiKey(#[from] ApiKeyError),

    #[error("Unexpected error: {0}")]
    Exception(String),
}

pub type ComicVineResult<T> = Result<T, ComicVineError>;

/// Failure of a paging load, as reported to the pager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediatorError {
    /// The API answered but with a non-OK `status_code`.
    #[error("Service error {status_code}: {message}")]
    Service { status_code: i32, message: String },

    /// Local cache failure while persisting or reading a page.
    #[error("IO error: {0}")]
    Io(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] ComicVineError),
}

impl From<AppError> for MediatorError {
    fn from(err: AppError) -> Self {
        MediatorError::Io(err.to_string())
    }
}
