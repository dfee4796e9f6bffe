//! Library integration tests over both storage backends

use elidune_desk::{
    models::{CreateBook, LoanStatus, UpdateBook},
    repository::StorageBackend,
    services::{history::Operation, reports::ReportTemplate},
    AppError, Library,
};

fn book(code: &str, title: &str, quantity: u32) -> CreateBook {
    CreateBook {
        code: code.to_string(),
        title: title.to_string(),
        author: "Ursula K. Le Guin".to_string(),
        year: 1969,
        quantity,
    }
}

fn seeded(backend: &StorageBackend) -> Library {
    let mut library = Library::open(backend).expect("Failed to open library");
    library.register_user("alice", "Abc123!5", false).unwrap();
    library.register_user("bob", "Xyz789?q", false).unwrap();
    library
        .register_book(book("B1", "The Left Hand of Darkness", 2))
        .unwrap();
    library.register_book(book("B2", "The Dispossessed", 1)).unwrap();
    library
}

fn loan_lifecycle(backend: StorageBackend) {
    let mut library = seeded(&backend);

    library.issue_loan("L1", "alice", "B1").unwrap();
    library.issue_loan("L2", "bob", "B1").unwrap();
    assert_eq!(library.find_book("B1").unwrap().unwrap().available, 0);

    let before = library.find_all_loans().unwrap();
    assert!(matches!(
        library.issue_loan("L3", "alice", "B1"),
        Err(AppError::Unavailable(_))
    ));
    assert_eq!(library.find_all_loans().unwrap(), before);

    let returned = library.return_loan("L1").unwrap();
    assert_eq!(returned.status, LoanStatus::Returned);
    assert_eq!(library.find_book("B1").unwrap().unwrap().available, 1);
    assert!(matches!(
        library.return_loan("L1"),
        Err(AppError::AlreadyReturned(_))
    ));
    assert_eq!(library.find_book("B1").unwrap().unwrap().available, 1);

    let alice_loans = library.find_loans_by_user("alice").unwrap();
    assert_eq!(alice_loans.len(), 1);
    assert_eq!(alice_loans[0].code, "L1");

    let report = library.loan_report().unwrap();
    assert_eq!((report.total, report.active, report.returned), (2, 1, 1));
    assert_eq!(report.top_books[0].label, "The Left Hand of Darkness");
    assert_eq!(report.top_books[0].loans, 2);
}

#[test]
fn test_loan_lifecycle_in_memory() {
    loan_lifecycle(StorageBackend::Memory);
}

#[test]
fn test_loan_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    loan_lifecycle(StorageBackend::File(dir.path().to_path_buf()));
}

#[test]
fn test_file_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StorageBackend::File(dir.path().to_path_buf());
    {
        let mut library = seeded(&backend);
        library.issue_loan("L1", "alice", "B2").unwrap();
        library.authenticate("alice", "Abc123!5").unwrap();
    }

    let mut library = Library::open(&backend).unwrap();
    assert_eq!(library.find_all_users().unwrap().len(), 2);
    assert_eq!(library.find_user("alice").unwrap().unwrap().access_count, 1);
    assert_eq!(library.find_book("B2").unwrap().unwrap().available, 0);
    assert!(library.history().is_empty());

    library.return_loan("L1").unwrap();
    assert_eq!(library.find_book("B2").unwrap().unwrap().available, 1);
    assert!(matches!(
        library.register_user("alice", "Abc123!5", false),
        Err(AppError::DuplicateKey(_))
    ));
}

#[test]
fn test_book_update_and_undo() {
    let mut library = seeded(&StorageBackend::Memory);
    library
        .update_book(
            "B1",
            UpdateBook {
                title: "The Left Hand of Darkness".to_string(),
                author: "Ursula K. Le Guin".to_string(),
                year: 1969,
                quantity: 10,
            },
        )
        .unwrap();
    for code in ["L1", "L2", "L3", "L4", "L5", "L6"] {
        library.issue_loan(code, "alice", "B1").unwrap();
    }
    assert_eq!(library.find_book("B1").unwrap().unwrap().available, 4);

    let updated = library
        .update_book(
            "B1",
            UpdateBook {
                title: "The Left Hand of Darkness".to_string(),
                author: "Ursula K. Le Guin".to_string(),
                year: 1976,
                quantity: 5,
            },
        )
        .unwrap();
    assert_eq!(updated.available, 2);

    let restored = library.undo_book_update(None).unwrap();
    assert_eq!((restored.quantity, restored.available), (10, 4));
    assert_eq!(restored.year, 1969);
    assert!(matches!(
        library.undo_book_update(None),
        Err(AppError::NoHistory(_))
    ));
}

#[test]
fn test_user_update_undo_and_reports() {
    let mut library = seeded(&StorageBackend::Memory);
    library.authenticate("bob", "Xyz789?q").unwrap();
    library.authenticate("bob", "Xyz789?q").unwrap();
    assert_eq!(library.authenticate("bob", "wrong").unwrap(), None);

    library.update_user("alice", "New456?x", true).unwrap();
    assert!(library.authenticate("alice", "Abc123!5").unwrap().is_none());

    let restored = library.undo_user_update(Some("alice")).unwrap();
    assert!(!restored.is_admin);
    assert!(library.authenticate("alice", "Abc123!5").unwrap().is_some());

    let report = library.access_report().unwrap();
    assert_eq!(report.entries[0].login, "bob");
    assert_eq!(report.entries[0].access_count, 2);
    assert_eq!(report.total_accesses, 3);
    assert!(report.render().starts_with("=== USER ACCESS REPORT ==="));

    assert_eq!(
        library.history().last().map(|r| r.operation.clone()),
        Some(Operation::UndoUserUpdate {
            login: "alice".to_string()
        })
    );
}

#[test]
fn test_validation_errors() {
    let mut library = Library::open(&StorageBackend::Memory).unwrap();
    assert!(matches!(
        library.register_user("user1", "Abc123!5", false),
        Err(AppError::InvalidLogin(_))
    ));
    assert!(matches!(
        library.register_user("thirteenchars", "Abc123!5", false),
        Err(AppError::InvalidLogin(_))
    ));
    assert!(matches!(
        library.register_user("carol", "Abc12345", false),
        Err(AppError::InvalidPassword(_))
    ));
    assert!(library.register_user("carol", "Abc123!5", false).is_ok());
}
