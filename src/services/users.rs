//! User management service

use crate::{
    error::{AppError, AppResult},
    models::User,
    repository::Repository,
    services::{
        policy::{validate_login, PasswordPolicy},
        reports::AccessReport,
        undo::UndoBuffer,
    },
};

#[derive(Debug)]
pub struct UserManager {
    repository: Box<dyn Repository<User>>,
    policy: PasswordPolicy,
    undo: UndoBuffer<User>,
}

impl UserManager {
    pub fn new(repository: Box<dyn Repository<User>>) -> Self {
        Self::with_policy(repository, PasswordPolicy::default())
    }

    pub fn with_policy(repository: Box<dyn Repository<User>>, policy: PasswordPolicy) -> Self {
        Self {
            repository,
            policy,
            undo: UndoBuffer::new("user"),
        }
    }

    /// Register a new user with no recorded accesses
    pub fn register(&mut self, login: &str, password: &str, is_admin: bool) -> AppResult<User> {
        validate_login(login)?;
        self.policy.validate(password)?;

        if self.repository.exists(login)? {
            return Err(AppError::DuplicateKey(format!(
                "User with login '{}' already exists",
                login
            )));
        }

        let user = self.repository.save(User::new(login, password, is_admin))?;
        tracing::debug!("Registered user '{}'", login);
        Ok(user)
    }

    pub fn find(&self, login: &str) -> AppResult<Option<User>> {
        self.repository.find(login)
    }

    pub fn find_all(&self) -> AppResult<Vec<User>> {
        self.repository.find_all()
    }

    /// Replace password and admin flag; the access count starts over at zero.
    ///
    /// The current record is kept for `undo_last_update` before the new
    /// password is checked. An update rejected with `InvalidPassword` therefore
    /// still replaces any earlier snapshot of this user with the current state,
    /// and the older undo target is lost.
    pub fn update(&mut self, login: &str, password: &str, is_admin: bool) -> AppResult<User> {
        let current = self.require(login)?;
        let replaced = self.undo.remember(current);

        self.policy.validate(password)?;

        match self.repository.update(User::new(login, password, is_admin)) {
            Ok(Some(user)) => {
                tracing::debug!("Updated user '{}'", login);
                Ok(user)
            }
            Ok(None) => {
                self.undo.revert(login, replaced);
                Err(Self::not_found(login))
            }
            Err(e) => {
                self.undo.revert(login, replaced);
                Err(e)
            }
        }
    }

    pub fn delete(&mut self, login: &str) -> AppResult<()> {
        self.require(login)?;
        self.repository.delete(login)?;
        self.undo.discard(login);
        tracing::debug!("Deleted user '{}'", login);
        Ok(())
    }

    /// `Ok(None)` for an unknown login or a wrong password
    pub fn authenticate(&mut self, login: &str, password: &str) -> AppResult<Option<User>> {
        let mut user = match self.repository.find(login)? {
            Some(user) if user.password_matches(password) => user,
            _ => {
                tracing::debug!("Authentication refused for '{}'", login);
                return Ok(None);
            }
        };

        user.record_access();
        self.repository.update(user.clone())?;
        Ok(Some(user))
    }

    /// Restore the state saved by the last update of `login`, or of the most
    /// recently updated user when no login is given
    pub fn undo_last_update(&mut self, login: Option<&str>) -> AppResult<User> {
        self.undo.restore(self.repository.as_mut(), login)
    }

    pub fn pending_undo(&self) -> usize {
        self.undo.len()
    }

    pub fn access_report(&self) -> AppResult<AccessReport> {
        Ok(AccessReport::from_users(&self.repository.find_all()?))
    }

    fn require(&self, login: &str) -> AppResult<User> {
        self.repository
            .find(login)?
            .ok_or_else(|| Self::not_found(login))
    }

    fn not_found(login: &str) -> AppError {
        AppError::NotFound(format!("User with login '{}' not found", login))
    }
}
