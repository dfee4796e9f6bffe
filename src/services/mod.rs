//! Business logic services
//!
//! [`Library`] is the single entry point used by the console: it owns one
//! manager per entity type, enforces the rules spanning several entities
//! (loans change book availability) and logs every successful mutation.

pub mod books;
pub mod history;
pub mod loans;
pub mod policy;
pub mod reports;
pub mod undo;
pub mod users;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, Loan, UpdateBook, User},
    repository::{Repositories, StorageBackend},
};

use self::{
    books::BookManager,
    history::{ExecutionRecord, History, Operation},
    loans::LoanManager,
    reports::{AccessReport, LoanReport},
    users::UserManager,
};

/// Library context created once at startup and handed to the UI
#[derive(Debug)]
pub struct Library {
    users: UserManager,
    books: BookManager,
    loans: LoanManager,
    history: History,
}

impl Library {
    pub fn new(repositories: Repositories) -> Self {
        Self {
            users: UserManager::new(repositories.users),
            books: BookManager::new(repositories.books),
            loans: LoanManager::new(repositories.loans),
            history: History::new(),
        }
    }

    pub fn open(backend: &StorageBackend) -> AppResult<Self> {
        Ok(Self::new(Repositories::open(backend)?))
    }

    /// Register the administrator account unless the login already exists.
    /// Returns whether an account was created.
    pub fn ensure_admin(&mut self, login: &str, password: &str) -> AppResult<bool> {
        if self.users.find(login)?.is_some() {
            return Ok(false);
        }
        self.register_user(login, password, true)?;
        tracing::info!("Created administrator account '{}'", login);
        Ok(true)
    }

    // Users

    pub fn register_user(&mut self, login: &str, password: &str, is_admin: bool) -> AppResult<User> {
        let user = self.users.register(login, password, is_admin)?;
        self.history.record(Operation::RegisterUser {
            login: user.login.clone(),
        });
        Ok(user)
    }

    pub fn update_user(&mut self, login: &str, password: &str, is_admin: bool) -> AppResult<User> {
        let user = self.users.update(login, password, is_admin)?;
        self.history.record(Operation::UpdateUser {
            login: user.login.clone(),
        });
        Ok(user)
    }

    pub fn delete_user(&mut self, login: &str) -> AppResult<()> {
        self.users.delete(login)?;
        self.history.record(Operation::DeleteUser {
            login: login.to_string(),
        });
        Ok(())
    }

    pub fn undo_user_update(&mut self, login: Option<&str>) -> AppResult<User> {
        let user = self.users.undo_last_update(login)?;
        self.history.record(Operation::UndoUserUpdate {
            login: user.login.clone(),
        });
        Ok(user)
    }

    pub fn authenticate(&mut self, login: &str, password: &str) -> AppResult<Option<User>> {
        self.users.authenticate(login, password)
    }

    pub fn find_user(&self, login: &str) -> AppResult<Option<User>> {
        self.users.find(login)
    }

    pub fn find_all_users(&self) -> AppResult<Vec<User>> {
        self.users.find_all()
    }

    // Books

    pub fn register_book(&mut self, book: CreateBook) -> AppResult<Book> {
        let book = self.books.register(book)?;
        self.history.record(Operation::RegisterBook {
            code: book.code.clone(),
        });
        Ok(book)
    }

    pub fn update_book(&mut self, code: &str, changes: UpdateBook) -> AppResult<Book> {
        let book = self.books.update(code, changes)?;
        self.history.record(Operation::UpdateBook {
            code: book.code.clone(),
        });
        Ok(book)
    }

    pub fn delete_book(&mut self, code: &str) -> AppResult<()> {
        self.books.delete(code)?;
        self.history.record(Operation::DeleteBook {
            code: code.to_string(),
        });
        Ok(())
    }

    pub fn undo_book_update(&mut self, code: Option<&str>) -> AppResult<Book> {
        let book = self.books.undo_last_update(code)?;
        self.history.record(Operation::UndoBookUpdate {
            code: book.code.clone(),
        });
        Ok(book)
    }

    pub fn find_book(&self, code: &str) -> AppResult<Option<Book>> {
        self.books.find(code)
    }

    pub fn find_all_books(&self) -> AppResult<Vec<Book>> {
        self.books.find_all()
    }

    // Loans

    /// Lend one copy of `book_code` to `user_login`.
    ///
    /// The loan and the decremented book are two separate writes; if the
    /// second one fails the loan stays recorded while the book keeps its
    /// previous availability.
    pub fn issue_loan(&mut self, code: &str, user_login: &str, book_code: &str) -> AppResult<Loan> {
        let user = self
            .users
            .find(user_login)?
            .ok_or_else(|| AppError::NotFound(format!("User with login '{}' not found", user_login)))?;
        let mut book = self
            .books
            .find(book_code)?
            .ok_or_else(|| AppError::NotFound(format!("Book with code '{}' not found", book_code)))?;
        if !book.is_available() {
            return Err(AppError::Unavailable(format!(
                "Book '{}' has no copies available",
                book.title
            )));
        }

        let loan = self.loans.issue(code, &user, &book)?;
        book.lend_copy();
        self.books.adjust_availability(book)?;

        self.history.record(Operation::IssueLoan {
            code: loan.code.clone(),
            user_login: loan.user_login.clone(),
            book_code: loan.book_code.clone(),
        });
        Ok(loan)
    }

    /// Give the copy back and close the loan
    pub fn return_loan(&mut self, code: &str) -> AppResult<Loan> {
        let loan = self
            .loans
            .find(code)?
            .ok_or_else(|| AppError::NotFound(format!("Loan with code '{}' not found", code)))?;
        if !loan.is_active() {
            return Err(AppError::AlreadyReturned(format!(
                "Loan '{}' was already returned",
                code
            )));
        }

        match self.books.find(&loan.book_code)? {
            Some(mut book) => {
                book.receive_copy();
                self.books.adjust_availability(book)?;
            }
            None => tracing::warn!(
                "Book '{}' of loan '{}' is no longer in the catalog",
                loan.book_code,
                code
            ),
        }

        let loan = self.loans.return_loan(code)?;
        self.history.record(Operation::ReturnLoan {
            code: loan.code.clone(),
        });
        Ok(loan)
    }

    pub fn find_loan(&self, code: &str) -> AppResult<Option<Loan>> {
        self.loans.find(code)
    }

    pub fn find_all_loans(&self) -> AppResult<Vec<Loan>> {
        self.loans.find_all()
    }

    pub fn find_loans_by_user(&self, login: &str) -> AppResult<Vec<Loan>> {
        self.loans.find_by_user(login)
    }

    // Reports

    pub fn access_report(&self) -> AppResult<AccessReport> {
        self.users.access_report()
    }

    pub fn loan_report(&self) -> AppResult<LoanReport> {
        self.loans.loan_report(&self.books)
    }

    pub fn history(&self) -> &[ExecutionRecord] {
        self.history.records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoanStatus;

    fn library() -> Library {
        let mut library = Library::new(Repositories::in_memory());
        library.register_user("alice", "Abc123!5", false).unwrap();
        library
            .register_book(CreateBook {
                code: "B1".into(),
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                year: 1965,
                quantity: 1,
            })
            .unwrap();
        library
    }

    fn available(library: &Library, code: &str) -> u32 {
        library.find_book(code).unwrap().unwrap().available
    }

    #[test]
    fn test_issue_and_return_move_one_copy() {
        let mut library = library();

        let loan = library.issue_loan("L1", "alice", "B1").unwrap();
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(available(&library, "B1"), 0);

        library.return_loan("L1").unwrap();
        assert_eq!(available(&library, "B1"), 1);

        assert!(matches!(
            library.return_loan("L1"),
            Err(AppError::AlreadyReturned(_))
        ));
        assert_eq!(available(&library, "B1"), 1);
    }

    #[test]
    fn test_issue_without_copies_changes_nothing() {
        let mut library = library();
        library.issue_loan("L1", "alice", "B1").unwrap();
        let loans_before = library.find_all_loans().unwrap();

        assert!(matches!(
            library.issue_loan("L2", "alice", "B1"),
            Err(AppError::Unavailable(_))
        ));
        assert_eq!(library.find_all_loans().unwrap(), loans_before);
        assert_eq!(available(&library, "B1"), 0);
    }

    #[test]
    fn test_issue_with_unknown_references() {
        let mut library = library();
        assert!(matches!(
            library.issue_loan("L1", "ghost", "B1"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            library.issue_loan("L1", "alice", "B9"),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(library.return_loan("L9"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_loan_code_keeps_availability() {
        let mut library = library();
        library
            .update_book(
                "B1",
                UpdateBook {
                    title: "Dune".into(),
                    author: "Frank Herbert".into(),
                    year: 1965,
                    quantity: 2,
                },
            )
            .unwrap();
        library.issue_loan("L1", "alice", "B1").unwrap();

        assert!(matches!(
            library.issue_loan("L1", "alice", "B1"),
            Err(AppError::DuplicateKey(_))
        ));
        assert_eq!(available(&library, "B1"), 1);
    }

    #[test]
    fn test_history_records_successful_mutations_only() {
        let mut library = library();
        let _ = library.issue_loan("L1", "ghost", "B1");
        library.issue_loan("L1", "alice", "B1").unwrap();
        library.authenticate("alice", "Abc123!5").unwrap();

        let operations: Vec<_> = library.history().iter().map(|r| r.operation.clone()).collect();
        assert_eq!(
            operations,
            [
                Operation::RegisterUser { login: "alice".into() },
                Operation::RegisterBook { code: "B1".into() },
                Operation::IssueLoan {
                    code: "L1".into(),
                    user_login: "alice".into(),
                    book_code: "B1".into(),
                },
            ]
        );
    }

    #[test]
    fn test_ensure_admin_is_idempotent() {
        let mut library = Library::new(Repositories::in_memory());
        assert!(library.ensure_admin("admin", "Admin123!").unwrap());
        assert!(!library.ensure_admin("admin", "Admin123!").unwrap());
        assert!(library.find_user("admin").unwrap().unwrap().is_admin);
    }

    #[test]
    fn test_return_after_book_deleted_still_closes_loan() {
        let mut library = library();
        library.issue_loan("L1", "alice", "B1").unwrap();
        library.delete_book("B1").unwrap();

        let loan = library.return_loan("L1").unwrap();
        assert_eq!(loan.status, LoanStatus::Returned);
    }

    #[test]
    fn test_loan_report_uses_current_titles() {
        let mut library = library();
        library.issue_loan("L1", "alice", "B1").unwrap();
        library
            .update_book(
                "B1",
                UpdateBook {
                    title: "Dune (revised)".into(),
                    author: "Frank Herbert".into(),
                    year: 1965,
                    quantity: 1,
                },
            )
            .unwrap();

        let report = library.loan_report().unwrap();
        assert_eq!(report.top_books[0].label, "Dune (revised)");
        assert_eq!(report.top_users[0].label, "alice");
    }
}
