//! Identity Entity
//!
//! A registered person. Personal fields are held only in encrypted form;
//! the entity never sees plaintext after construction.

use chrono::{DateTime, Utc};
use kernel::id::IdentityId;

use crate::domain::value_object::credential::Fingerprint;

/// Encrypted fields of a new registration
#[derive(Debug, Clone)]
pub struct SealedFields {
    pub encrypted_name: String,
    pub encrypted_national_id: String,
    pub encrypted_phone: String,
}

/// Identity entity
#[derive(Debug, Clone)]
pub struct Identity {
    /// UUID v4, never reused
    pub id: IdentityId,
    pub encrypted_name: String,
    pub encrypted_national_id: String,
    pub encrypted_phone: String,
    /// Unique lookup key for the CPF
    pub national_id_fingerprint: Fingerprint,
    /// Unique lookup key for the phone
    pub phone_fingerprint: Fingerprint,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new non-admin identity
    pub fn register(
        sealed: SealedFields,
        national_id_fingerprint: Fingerprint,
        phone_fingerprint: Fingerprint,
    ) -> Self {
        Self {
            id: IdentityId::new(),
            encrypted_name: sealed.encrypted_name,
            encrypted_national_id: sealed.encrypted_national_id,
            encrypted_phone: sealed.encrypted_phone,
            national_id_fingerprint,
            phone_fingerprint,
            is_admin: false,
            created_at: Utc::now(),
        }
    }
}
