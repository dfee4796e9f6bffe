//! User model and related types

use serde::{Deserialize, Serialize};

use crate::repository::Entity;

/// Library account, keyed by its login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub password: String,
    pub is_admin: bool,
    /// Successful authentications since registration or last update
    pub access_count: u64,
}

impl User {
    pub fn new(login: impl Into<String>, password: impl Into<String>, is_admin: bool) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            is_admin,
            access_count: 0,
        }
    }

    /// Plaintext comparison; passwords are not hashed in this deployment
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }

    pub fn record_access(&mut self) {
        self.access_count += 1;
    }
}

impl Entity for User {
    fn key(&self) -> &str {
        &self.login
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "User: {} | Admin: {} | Accesses: {}",
            self.login,
            if self.is_admin { "Yes" } else { "No" },
            self.access_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_without_accesses() {
        let user = User::new("alice", "Secret1!", false);
        assert_eq!(user.access_count, 0);
        assert_eq!(user.key(), "alice");
    }

    #[test]
    fn test_password_matches_is_exact() {
        let user = User::new("alice", "Secret1!", false);
        assert!(user.password_matches("Secret1!"));
        assert!(!user.password_matches("secret1!"));
    }
}
