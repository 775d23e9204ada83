// src/error/mod.rs

pub mod comicvine;
pub mod types;

pub use comicvine::{ApiKeyError, ComicVineError, ComicVineResult, MediatorError};
pub use types::{AppError, AppResult};
