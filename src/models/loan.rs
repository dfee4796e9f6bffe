//! Loan (borrow) model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{book::Book, user::User};
use crate::repository::Entity;

/// Days between the loan date and the expected return
pub const LOAN_DURATION_DAYS: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
    Returned,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "Active"),
            LoanStatus::Returned => write!(f, "Returned"),
        }
    }
}

/// Loan of one book to one user
///
/// The user and the book are held by key; readers resolve them against the
/// managers so they always see the current records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub code: String,
    pub user_login: String,
    pub book_code: String,
    pub loan_date: DateTime<Utc>,
    pub expected_return: DateTime<Utc>,
    pub returned_date: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

impl Loan {
    pub fn new(code: impl Into<String>, user: &User, book: &Book, loan_date: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            user_login: user.login.clone(),
            book_code: book.code.clone(),
            loan_date,
            expected_return: loan_date + Duration::days(LOAN_DURATION_DAYS),
            returned_date: None,
            status: LoanStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.expected_return < now
    }

    /// One-way transition to `Returned`
    pub fn mark_returned(&mut self, at: DateTime<Utc>) {
        self.returned_date = Some(at);
        self.status = LoanStatus::Returned;
    }
}

impl Entity for Loan {
    fn key(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for Loan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Loan: {} | User: {} | Book: {} | Due: {} | Status: {}",
            self.code,
            self.user_login,
            self.book_code,
            self.expected_return.format("%d/%m/%Y"),
            self.status
        )
    }
}
