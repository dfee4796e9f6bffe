//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// Catalog entry with copy accounting
///
/// `available` counts the copies not currently on loan and always stays in
/// `0..=quantity` through the loan workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub code: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub quantity: u32,
    pub available: u32,
}

/// Create book request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    pub code: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub quantity: u32,
}

/// Update book request; the code is immutable
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub quantity: u32,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available > 0
    }

    /// Availability after resizing the stock to `new_quantity`, keeping the
    /// share of copies on the shelf: `floor(new_quantity * available / quantity)`.
    /// An empty stock counts as fully available.
    pub fn rescaled_available(&self, new_quantity: u32) -> u32 {
        if self.quantity == 0 {
            return new_quantity;
        }
        let scaled = u64::from(new_quantity) * u64::from(self.available) / u64::from(self.quantity);
        // available <= quantity, so scaled <= new_quantity
        u32::try_from(scaled).unwrap_or(new_quantity)
    }

    pub fn lend_copy(&mut self) {
        self.available = self.available.saturating_sub(1);
    }

    pub fn receive_copy(&mut self) {
        if self.available < self.quantity {
            self.available += 1;
        }
    }
}

impl From<CreateBook> for Book {
    fn from(request: CreateBook) -> Self {
        Self {
            code: request.code,
            title: request.title,
            author: request.author,
            year: request.year,
            available: request.quantity,
            quantity: request.quantity,
        }
    }
}

impl Entity for Book {
    fn key(&self) -> &str {
        &self.code
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Book: {} | {} | {} ({}) | Available: {}/{}",
            self.code, self.title, self.author, self.year, self.available, self.quantity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn book(quantity: u32, available: u32) -> Book {
        Book {
            code: "B1".into(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            year: 1965,
            quantity,
            available,
        }
    }

    #[rstest]
    #[case::shrink(10, 4, 5, 2)]
    #[case::grow(4, 2, 10, 5)]
    #[case::floor(3, 1, 10, 3)]
    #[case::all_lent(5, 0, 8, 0)]
    #[case::empty_stock(0, 0, 7, 7)]
    #[case::float_trap(10, 7, 10, 7)]
    fn test_rescaled_available(
        #[case] quantity: u32,
        #[case] available: u32,
        #[case] new_quantity: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(book(quantity, available).rescaled_available(new_quantity), expected);
    }

    #[test]
    fn test_copy_accounting_stays_in_bounds() {
        let mut b = book(1, 1);
        b.lend_copy();
        b.lend_copy();
        assert_eq!(b.available, 0);
        b.receive_copy();
        b.receive_copy();
        assert_eq!(b.available, 1);
    }

    #[test]
    fn test_create_book_starts_fully_available() {
        let b = Book::from(CreateBook {
            code: "B2".into(),
            title: "Solaris".into(),
            author: "Stanislaw Lem".into(),
            year: 1961,
            quantity: 3,
        });
        assert_eq!(b.available, 3);
        assert!(b.is_available());
    }
}
