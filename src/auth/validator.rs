use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AuthError;

pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 15;

/// Symbols accepted by the password policy.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|~`";

/// Password rules, declared in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Length,
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
    Whitespace,
}

impl PasswordRule {
    pub fn reason(&self) -> &'static str {
        match self {
            PasswordRule::Length => "password must be between 6 and 15 characters",
            PasswordRule::Lowercase => "password must contain a lowercase letter",
            PasswordRule::Uppercase => "password must contain an uppercase letter",
            PasswordRule::Digit => "password must contain a digit",
            PasswordRule::Symbol => "password must contain a symbol",
            PasswordRule::Whitespace => "password must not contain whitespace",
        }
    }

    fn is_satisfied_by(&self, password: &str) -> bool {
        match self {
            PasswordRule::Length => {
                let len = password.chars().count();
                (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len)
            }
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRule::Symbol => password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
            PasswordRule::Whitespace => !password.chars().any(char::is_whitespace),
        }
    }
}

const PASSWORD_RULES: [PasswordRule; 6] = [
    PasswordRule::Length,
    PasswordRule::Lowercase,
    PasswordRule::Uppercase,
    PasswordRule::Digit,
    PasswordRule::Symbol,
    PasswordRule::Whitespace,
];

/// Checks the password policy, reporting only the first rule that fails.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    match PASSWORD_RULES
        .iter()
        .find(|rule| !rule.is_satisfied_by(password))
    {
        Some(rule) => Err(AuthError::InvalidPassword(*rule)),
        None => Ok(()),
    }
}

pub fn validate_email(email: &str) -> Result<(), AuthError> {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$").unwrap();
    }
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail)
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
