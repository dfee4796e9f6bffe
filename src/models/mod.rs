//! Data models for Elidune Desk

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, CreateBook, UpdateBook};
pub use loan::{Loan, LoanStatus, LOAN_DURATION_DAYS};
pub use user::User;
