//! Loan management service

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{Book, Loan, User},
    repository::Repository,
    services::{books::BookManager, reports::LoanReport},
};

#[derive(Debug)]
pub struct LoanManager {
    repository: Box<dyn Repository<Loan>>,
}

impl LoanManager {
    pub fn new(repository: Box<dyn Repository<Loan>>) -> Self {
        Self { repository }
    }

    /// Record a new active loan dated now.
    ///
    /// Book availability is the caller's concern.
    pub fn issue(&mut self, code: &str, user: &User, book: &Book) -> AppResult<Loan> {
        self.issue_at(code, user, book, Utc::now())
    }

    pub(crate) fn issue_at(
        &mut self,
        code: &str,
        user: &User,
        book: &Book,
        loan_date: DateTime<Utc>,
    ) -> AppResult<Loan> {
        if self.repository.exists(code)? {
            return Err(AppError::DuplicateKey(format!(
                "Loan with code '{}' already exists",
                code
            )));
        }
        let loan = self
            .repository
            .save(Loan::new(code, user, book, loan_date))?;
        tracing::debug!(
            "Issued loan '{}' of '{}' to '{}'",
            code,
            loan.book_code,
            loan.user_login
        );
        Ok(loan)
    }

    /// Mark the loan returned now
    pub fn return_loan(&mut self, code: &str) -> AppResult<Loan> {
        let mut loan = self
            .repository
            .find(code)?
            .ok_or_else(|| Self::not_found(code))?;
        loan.mark_returned(Utc::now());
        self.repository
            .update(loan)?
            .ok_or_else(|| Self::not_found(code))
    }

    pub fn find(&self, code: &str) -> AppResult<Option<Loan>> {
        self.repository.find(code)
    }

    pub fn find_all(&self) -> AppResult<Vec<Loan>> {
        self.repository.find_all()
    }

    pub fn find_by_user(&self, login: &str) -> AppResult<Vec<Loan>> {
        Ok(self
            .repository
            .find_all()?
            .into_iter()
            .filter(|loan| loan.user_login == login)
            .collect())
    }

    /// Loan statistics; books are grouped by their current title, falling back
    /// to the code for books no longer in the catalog
    pub fn loan_report(&self, books: &BookManager) -> AppResult<LoanReport> {
        let loans = self.repository.find_all()?;
        let mut titles = Vec::with_capacity(loans.len());
        for loan in &loans {
            let title = books
                .find(&loan.book_code)?
                .map(|book| book.title)
                .unwrap_or_else(|| loan.book_code.clone());
            titles.push(title);
        }
        Ok(LoanReport::from_loans(&loans, &titles))
    }

    fn not_found(code: &str) -> AppError {
        AppError::NotFound(format!("Loan with code '{}' not found", code))
    }
}
