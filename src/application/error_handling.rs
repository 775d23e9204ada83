// src/application/error_handling.rs
//
// Error handling for commands
//
// ARCHITECTURE:
// - Maps every layer's error onto one front-end friendly response
// - Categorises failures so a front end can offer the right affordance
//   (enter a key, check the connection, retry)
// - Logs internal failures for debugging

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ApiKeyError, AppError, ComicVineError, MediatorError};

/// Error categories for front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    NotFound,
    Validation,
    /// No API key configured, or the key store could not be read.
    ApiKey,
    /// No connection or timeout; retrying may help.
    Network,
    /// The API answered with an HTTP or service-level error.
    Service,
    Database,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            details,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }

    /// Whether retrying the same action could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.error_type, ErrorType::Network | ErrorType::Service)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        match error {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),
            AppError::Domain(e) => {
                Self::new(ErrorType::Validation, "Invalid input", Some(e.to_string()))
            }
            AppError::Config(message) => {
                Self::new(ErrorType::Validation, "Invalid configuration", Some(message))
            }
            AppError::Database(e) => {
                log::error!("Database error: {:?}", e);
                Self::new(ErrorType::Database, "Database operation failed", None)
            }
            AppError::Pool(e) => {
                log::error!("Connection pool error: {}", e);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }
            AppError::Io(e) => Self::new(
                ErrorType::Internal,
                "File system operation failed",
                Some(e.to_string()),
            ),
            AppError::Serialization(e) => {
                log::error!("Serialization error: {:?}", e);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }
            AppError::Other(message) => Self::new(ErrorType::Internal, message, None),
        }
    }
}

impl From<ComicVineError> for ErrorResponse {
    fn from(error: ComicVineError) -> Self {
        match error {
            ComicVineError::NoNetworkConnection => {
                Self::new(ErrorType::Network, "No network connection", None)
            }
            ComicVineError::RequestTimeout => {
                Self::new(ErrorType::Network, "Request timed out", None)
            }
            ComicVineError::HttpError { code, message } => Self::new(
                ErrorType::Service,
                format!("Comic Vine returned HTTP {}", code),
                Some(message),
            ),
            ComicVineError::ApiKey(ApiKeyError::NoApiKey) => Self::new(
                ErrorType::ApiKey,
                "No API key configured",
                Some("Run `comicvine api-key set <KEY>`".to_string()),
            ),
            ComicVineError::ApiKey(ApiKeyError::Io(message)) => {
                Self::new(ErrorType::ApiKey, "Could not read the API key", Some(message))
            }
            ComicVineError::Exception(message) => {
                log::error!("Unexpected Comic Vine failure: {}", message);
                Self::new(ErrorType::Internal, "Unexpected error", Some(message))
            }
        }
    }
}

impl From<MediatorError> for ErrorResponse {
    fn from(error: MediatorError) -> Self {
        match error {
            MediatorError::Fetch(e) => e.into(),
            MediatorError::Service {
                status_code,
                message,
            } => {
                let error_type = if status_code == 101 {
                    ErrorType::NotFound
                } else {
                    ErrorType::Service
                };
                Self::new(
                    error_type,
                    message,
                    Some(format!("status_code {}", status_code)),
                )
            }
            MediatorError::Io(message) => {
                log::error!("Cache failure: {}", message);
                Self::new(ErrorType::Database, "Local cache failure", Some(message))
            }
        }
    }
}

pub type CommandResult<T> = Result<T, ErrorResponse>;
