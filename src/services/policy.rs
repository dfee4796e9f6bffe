//! Login and password rules applied on registration and update

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub const MAX_LOGIN_LENGTH: usize = 12;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Punctuation accepted as the symbol character of a password
pub const PASSWORD_SYMBOLS: &str = r#"!@#$%^&*()_+-=[]{};:'"|,.<>/?"#;

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]").unwrap());
static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{}]", regex::escape(PASSWORD_SYMBOLS))).unwrap());

pub fn validate_login(login: &str) -> AppResult<()> {
    if login.is_empty() {
        return Err(AppError::InvalidLogin("Login cannot be empty".to_string()));
    }
    if login.chars().count() > MAX_LOGIN_LENGTH {
        return Err(AppError::InvalidLogin(format!(
            "Login must be at most {} characters",
            MAX_LOGIN_LENGTH
        )));
    }
    if DIGIT.is_match(login) {
        return Err(AppError::InvalidLogin(
            "Login cannot contain digits".to_string(),
        ));
    }
    Ok(())
}

/// Single requirement of the password policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength(usize),
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl PasswordRule {
    fn check(&self, password: &str) -> AppResult<()> {
        let (ok, message) = match self {
            PasswordRule::MinLength(min) => (
                password.chars().count() >= *min,
                format!("Password must be at least {} characters", min),
            ),
            PasswordRule::Lowercase => (
                LOWERCASE.is_match(password),
                "Password must contain a lowercase letter".to_string(),
            ),
            PasswordRule::Uppercase => (
                UPPERCASE.is_match(password),
                "Password must contain an uppercase letter".to_string(),
            ),
            PasswordRule::Digit => (
                DIGIT.is_match(password),
                "Password must contain a digit".to_string(),
            ),
            PasswordRule::Symbol => (
                SYMBOL.is_match(password),
                "Password must contain a special character".to_string(),
            ),
        };
        if ok {
            Ok(())
        } else {
            Err(AppError::InvalidPassword(message))
        }
    }
}

/// Rules are checked in order; the first failing rule is reported
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    rules: Vec<PasswordRule>,
}

impl PasswordPolicy {
    pub fn new(rules: Vec<PasswordRule>) -> Self {
        Self { rules }
    }

    pub fn validate(&self, password: &str) -> AppResult<()> {
        self.rules.iter().try_for_each(|rule| rule.check(password))
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(vec![
            PasswordRule::MinLength(MIN_PASSWORD_LENGTH),
            PasswordRule::Lowercase,
            PasswordRule::Uppercase,
            PasswordRule::Digit,
            PasswordRule::Symbol,
        ])
    }
}
