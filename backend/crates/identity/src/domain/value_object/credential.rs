//! Credential Value Objects
//!
//! The CPF + phone pair used as a login credential. Values are kept exactly
//! as submitted: fingerprints hash the raw bytes, so the client is
//! responsible for consistent formatting.

use derive_more::Display;
use platform::crypto::fingerprint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("CPF is required")]
    MissingNationalId,

    #[error("Phone is required")]
    MissingPhone,
}

/// Lowercase hex SHA-256 of a credential value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{value}")]
pub struct Fingerprint {
    value: String,
}

impl Fingerprint {
    pub fn of(plaintext: &str) -> Self {
        Self {
            value: fingerprint(plaintext),
        }
    }

    /// Wrap a fingerprint read back from storage
    pub fn from_stored(value: String) -> Self {
        Self { value }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Brazilian national ID (CPF) as submitted
#[derive(Clone, PartialEq, Eq)]
pub struct NationalId(String);

impl NationalId {
    pub fn new(raw: String) -> Result<Self, CredentialError> {
        if raw.trim().is_empty() {
            return Err(CredentialError::MissingNationalId);
        }
        Ok(Self(raw))
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Phone number as submitted
#[derive(Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: String) -> Result<Self, CredentialError> {
        if raw.trim().is_empty() {
            return Err(CredentialError::MissingPhone);
        }
        Ok(Self(raw))
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Personal data never reaches logs through Debug
impl std::fmt::Debug for NationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NationalId([REDACTED])")
    }
}

impl std::fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PhoneNumber([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_rejected() {
        assert_eq!(
            NationalId::new(String::new()).unwrap_err(),
            CredentialError::MissingNationalId
        );
        assert_eq!(
            PhoneNumber::new("  ".to_string()).unwrap_err(),
            CredentialError::MissingPhone
        );
    }

    #[test]
    fn test_fingerprint_uses_raw_value() {
        let a = NationalId::new("111".to_string()).unwrap();
        let b = NationalId::new(" 111".to_string()).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), Fingerprint::of("111"));
        assert_eq!(a.fingerprint().as_str().len(), 64);
    }

    #[test]
    fn test_debug_is_redacted() {
        let phone = PhoneNumber::new("11999990000".to_string()).unwrap();
        assert!(!format!("{phone:?}").contains("1199"));
    }
}
