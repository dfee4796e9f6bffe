//! Append-only log of the mutating operations run through the library

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Descriptor of one successful mutating operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    RegisterUser { login: String },
    UpdateUser { login: String },
    DeleteUser { login: String },
    UndoUserUpdate { login: String },
    RegisterBook { code: String },
    UpdateBook { code: String },
    DeleteBook { code: String },
    UndoBookUpdate { code: String },
    IssueLoan {
        code: String,
        user_login: String,
        book_code: String,
    },
    ReturnLoan { code: String },
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::RegisterUser { login } => write!(f, "register user '{}'", login),
            Operation::UpdateUser { login } => write!(f, "update user '{}'", login),
            Operation::DeleteUser { login } => write!(f, "delete user '{}'", login),
            Operation::UndoUserUpdate { login } => write!(f, "undo update of user '{}'", login),
            Operation::RegisterBook { code } => write!(f, "register book '{}'", code),
            Operation::UpdateBook { code } => write!(f, "update book '{}'", code),
            Operation::DeleteBook { code } => write!(f, "delete book '{}'", code),
            Operation::UndoBookUpdate { code } => write!(f, "undo update of book '{}'", code),
            Operation::IssueLoan {
                code,
                user_login,
                book_code,
            } => write!(f, "issue loan '{}' of '{}' to '{}'", code, book_code, user_login),
            Operation::ReturnLoan { code } => write!(f, "return loan '{}'", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    pub operation: Operation,
    pub executed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct History {
    records: Vec<ExecutionRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, operation: Operation) {
        tracing::debug!("Executed: {}", operation);
        self.records.push(ExecutionRecord {
            operation,
            executed_at: Utc::now(),
        });
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }
}
