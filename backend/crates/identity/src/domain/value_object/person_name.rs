//! Person Name Value Object
//!
//! Display name of a registered person. Registration may omit it, in which
//! case the record carries [`PLACEHOLDER_NAME`] until the person completes
//! it once.
//!
//! ## Rules
//! - NFC normalization, then surrounding whitespace is trimmed
//! - Length: 3 to 120 characters (after normalization)
//! - Letters only: ASCII `A-Z a-z`, Latin-1 `À-ÿ` except `×` and `÷`,
//!   plus spaces
//! - The placeholder itself is reserved

use kernel::error::code;
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Name stored when registration carries none
pub const PLACEHOLDER_NAME: &str = "Sem Nome";

/// Minimum length for a person name (in characters)
pub const PERSON_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for a person name (in characters)
pub const PERSON_NAME_MAX_LENGTH: usize = 120;

/// Error returned when name validation fails
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersonNameError {
    #[error("Name is too short ({length} characters, minimum {min})")]
    TooShort { length: usize, min: usize },

    #[error("Name is too long ({length} characters, maximum {max})")]
    TooLong { length: usize, max: usize },

    #[error("Name contains invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("Name is reserved")]
    Reserved,
}

impl PersonNameError {
    pub fn code(&self) -> &'static str {
        match self {
            PersonNameError::TooShort { .. } => code::NAME_TOO_SHORT,
            PersonNameError::TooLong { .. } => code::NAME_TOO_LONG,
            PersonNameError::InvalidCharacter(_) => code::NAME_INVALID_CHARSET,
            PersonNameError::Reserved => code::VALIDATION_ERROR,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            PersonNameError::TooShort { .. } => "Enter at least 3 letters",
            PersonNameError::TooLong { .. } => "Shorten the name",
            PersonNameError::InvalidCharacter(_) => "Use only letters and spaces",
            PersonNameError::Reserved => "Enter your real name",
        }
    }
}

/// Validated person name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Normalize and validate a user-supplied name
    pub fn parse(raw: &str) -> Result<Self, PersonNameError> {
        let normalized: String = raw.nfc().collect();
        let trimmed = normalized.trim();

        let length = trimmed.chars().count();
        if length < PERSON_NAME_MIN_LENGTH {
            return Err(PersonNameError::TooShort {
                length,
                min: PERSON_NAME_MIN_LENGTH,
            });
        }

        if let Some(c) = trimmed.chars().find(|c| !is_allowed(*c)) {
            return Err(PersonNameError::InvalidCharacter(c));
        }

        if length > PERSON_NAME_MAX_LENGTH {
            return Err(PersonNameError::TooLong {
                length,
                max: PERSON_NAME_MAX_LENGTH,
            });
        }

        // Storing the placeholder would leave the record name-pending
        if trimmed == PLACEHOLDER_NAME {
            return Err(PersonNameError::Reserved);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Optional name at registration: absent or blank means placeholder
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, PersonNameError> {
        match raw {
            Some(value) if !value.trim().is_empty() => Self::parse(value),
            _ => Ok(Self::placeholder()),
        }
    }

    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_NAME.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_NAME
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' ' || (('\u{C0}'..='\u{FF}').contains(&c) && c != '×' && c != '÷')
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
