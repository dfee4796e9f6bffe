//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook, UpdateBook},
    repository::Repository,
    services::undo::UndoBuffer,
};

#[derive(Debug)]
pub struct BookManager {
    repository: Box<dyn Repository<Book>>,
    undo: UndoBuffer<Book>,
}

impl BookManager {
    pub fn new(repository: Box<dyn Repository<Book>>) -> Self {
        Self {
            repository,
            undo: UndoBuffer::new("book"),
        }
    }

    /// Register a book with every copy available
    pub fn register(&mut self, book: CreateBook) -> AppResult<Book> {
        if self.repository.exists(&book.code)? {
            return Err(AppError::DuplicateKey(format!(
                "Book with code '{}' already exists",
                book.code
            )));
        }
        let book = self.repository.save(Book::from(book))?;
        tracing::debug!("Registered book '{}' ({} copies)", book.code, book.quantity);
        Ok(book)
    }

    pub fn find(&self, code: &str) -> AppResult<Option<Book>> {
        self.repository.find(code)
    }

    pub fn find_all(&self) -> AppResult<Vec<Book>> {
        self.repository.find_all()
    }

    /// Replace the catalog details. Availability is rescaled so the share of
    /// copies on the shelf survives a change of quantity.
    pub fn update(&mut self, code: &str, changes: UpdateBook) -> AppResult<Book> {
        let current = self.require(code)?;
        let available = current.rescaled_available(changes.quantity);
        let replaced = self.undo.remember(current);

        let book = Book {
            code: code.to_string(),
            title: changes.title,
            author: changes.author,
            year: changes.year,
            quantity: changes.quantity,
            available,
        };

        match self.repository.update(book) {
            Ok(Some(book)) => {
                tracing::debug!(
                    "Updated book '{}' ({}/{} available)",
                    code,
                    book.available,
                    book.quantity
                );
                Ok(book)
            }
            Ok(None) => {
                self.undo.revert(code, replaced);
                Err(Self::not_found(code))
            }
            Err(e) => {
                self.undo.revert(code, replaced);
                Err(e)
            }
        }
    }

    /// Commit a book whose availability the loan workflow already changed.
    /// No validation and no undo snapshot.
    pub(crate) fn adjust_availability(&mut self, book: Book) -> AppResult<Book> {
        let code = book.code.clone();
        self.repository
            .update(book)?
            .ok_or_else(|| Self::not_found(&code))
    }

    pub fn delete(&mut self, code: &str) -> AppResult<()> {
        self.require(code)?;
        self.repository.delete(code)?;
        self.undo.discard(code);
        tracing::debug!("Deleted book '{}'", code);
        Ok(())
    }

    pub fn undo_last_update(&mut self, code: Option<&str>) -> AppResult<Book> {
        self.undo.restore(self.repository.as_mut(), code)
    }

    pub fn pending_undo(&self) -> usize {
        self.undo.len()
    }

    fn require(&self, code: &str) -> AppResult<Book> {
        self.repository
            .find(code)?
            .ok_or_else(|| Self::not_found(code))
    }

    fn not_found(code: &str) -> AppError {
        AppError::NotFound(format!("Book with code '{}' not found", code))
    }
}
