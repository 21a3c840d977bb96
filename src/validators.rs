//! Account field validators
//!
//! Rules for the account records that services commonly log alongside
//! their messages.

use crate::core::{Fields, LogContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 20;
const NAME_MAX_CHARS: usize = 20;
const PHONE_NUMBER_LEN: usize = 11;
const PHONE_PREFIXES: [&str; 5] = ["010", "011", "016", "018", "019"];
const MASK: &str = "********";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("email is not a valid address")]
    InvalidEmail,

    #[error("password must be 8-20 bytes, mix two character classes and not repeat a character three times")]
    InvalidPassword,

    #[error("name must be alphabetic and at most 20 characters")]
    InvalidName,

    #[error("phone number must be 11 digits starting with 010, 011, 016, 018 or 019")]
    InvalidPhoneNumber,
}

/// Password rule: 8 to 20 bytes, no character three times in a row, and at
/// least two of ASCII letters, ASCII digits and everything else.
pub fn is_valid_password(password: &str) -> bool {
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.len()) {
        return false;
    }

    let mut run = 0;
    let mut previous = None;
    for ch in password.chars() {
        if previous == Some(ch) {
            run += 1;
            if run >= 3 {
                return false;
            }
        } else {
            previous = Some(ch);
            run = 1;
        }
    }

    let letters = password.chars().any(|c| c.is_ascii_alphabetic());
    let digits = password.chars().any(|c| c.is_ascii_digit());
    let others = password.chars().any(|c| !c.is_ascii_alphanumeric());

    [letters, digits, others].iter().filter(|&&present| present).count() >= 2
}

/// Phone number rule: hyphens are ignored, the rest must be 11 ASCII digits
/// with a known mobile prefix.
pub fn is_valid_phone_number(number: &str) -> bool {
    let digits: String = number.chars().filter(|&c| c != '-').collect();

    digits.len() == PHONE_NUMBER_LEN
        && digits.bytes().all(|b| b.is_ascii_digit())
        && PHONE_PREFIXES.iter().any(|prefix| digits.starts_with(prefix))
}

/// Loose address check: one `@`, a non-empty local part and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() <= NAME_MAX_CHARS && name.chars().all(char::is_alphabetic)
}

/// Account data as received from a sign-up request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone_number: String,
}

impl AccountRecord {
    /// Check every member, reporting the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("email", &self.email),
            ("password", &self.password),
            ("name", &self.name),
            ("phone_number", &self.phone_number),
        ] {
            if value.is_empty() {
                return Err(ValidationError::Required { field });
            }
        }

        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !is_valid_password(&self.password) {
            return Err(ValidationError::InvalidPassword);
        }
        if !is_valid_name(&self.name) {
            return Err(ValidationError::InvalidName);
        }
        if !is_valid_phone_number(&self.phone_number) {
            return Err(ValidationError::InvalidPhoneNumber);
        }
        Ok(())
    }
}

impl Fields for AccountRecord {
    fn fields(&self) -> LogContext {
        LogContext::with_capacity(4)
            .with_field("email", self.email.as_str())
            .with_field("password", MASK)
            .with_field("name", self.name.as_str())
            .with_field("phone_number", self.phone_number.as_str())
    }
}
