//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Operations that race with concurrent requests report their result as an
//! outcome enum instead of an error, and each implementation must decide
//! them atomically.

use kernel::id::IdentityId;

use crate::domain::entity::Identity;
use crate::domain::value_object::credential::Fingerprint;
use crate::error::IdentityResult;

/// Result of inserting a new identity
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// Stored as given
    Inserted(Identity),
    /// A fingerprint is already taken
    Conflict,
}

/// Result of deleting a non-admin identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Target holds the admin role; nothing was deleted
    IsAdmin,
}

/// Result of setting the admin flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChangeOutcome {
    Changed,
    NotFound,
    /// Demotion would leave no admin; nothing was changed
    LastAdmin,
}

/// Result of a compare-and-set name update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameUpdateOutcome {
    Updated,
    /// Stored name no longer matches the expected value (or record is gone)
    Stale,
}

/// Identity repository trait
#[trait_variant::make(IdentityRepository: Send)]
pub trait LocalIdentityRepository {
    /// Insert unless either fingerprint is already taken
    async fn insert(&self, identity: &Identity) -> IdentityResult<InsertOutcome>;

    /// Find identity by ID
    async fn find_by_id(&self, id: &IdentityId) -> IdentityResult<Option<Identity>>;

    /// Find identity by CPF fingerprint
    async fn find_by_national_id_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> IdentityResult<Option<Identity>>;

    /// Find identity by phone fingerprint
    async fn find_by_phone_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> IdentityResult<Option<Identity>>;

    /// All identities, oldest first
    async fn list_all(&self) -> IdentityResult<Vec<Identity>>;

    /// Replace the encrypted name only if it still equals `expected`
    async fn update_name(
        &self,
        id: &IdentityId,
        expected: &str,
        encrypted_name: &str,
    ) -> IdentityResult<NameUpdateOutcome>;

    /// Delete the identity unless it is an admin
    async fn delete_unless_admin(&self, id: &IdentityId) -> IdentityResult<DeleteOutcome>;

    /// Set the admin flag, refusing to demote the last admin
    async fn set_admin(&self, id: &IdentityId, is_admin: bool)
    -> IdentityResult<RoleChangeOutcome>;
}
