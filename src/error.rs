//! Error types for Elidune Desk

use std::path::PathBuf;

use thiserror::Error;

/// Stable numeric codes shown next to error messages in the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    BadLogin = 1,
    BadPassword = 2,
    Duplicate = 3,
    NoSuchData = 4,
    ItemNotAvailable = 5,
    AlreadyReturned = 6,
    NoHistory = 7,
    StorageFailure = 8,
}

/// Failure of a durable storage backend
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid login: {0}")]
    InvalidLogin(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Already returned: {0}")]
    AlreadyReturned(String),

    #[error("No history: {0}")]
    NoHistory(String),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidLogin(_) => ErrorCode::BadLogin,
            AppError::InvalidPassword(_) => ErrorCode::BadPassword,
            AppError::DuplicateKey(_) => ErrorCode::Duplicate,
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::Unavailable(_) => ErrorCode::ItemNotAvailable,
            AppError::AlreadyReturned(_) => ErrorCode::AlreadyReturned,
            AppError::NoHistory(_) => ErrorCode::NoHistory,
            AppError::Persistence(_) => ErrorCode::StorageFailure,
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
