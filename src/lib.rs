//! Elidune Desk
//!
//! Console library management: users, books and loans, with one-level undo of
//! updates and a choice of volatile or file-backed storage.

pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Library;
