//! Complete Name Use Case
//!
//! Replaces the placeholder name exactly once.

use kernel::id::IdentityId;
use platform::field_cipher::FieldCipher;
use std::sync::Arc;

use crate::application::name_status::is_name_pending;
use crate::domain::repository::{IdentityRepository, NameUpdateOutcome};
use crate::domain::value_object::PersonName;
use crate::error::{IdentityError, IdentityResult};

pub struct CompleteNameUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    cipher: Arc<FieldCipher>,
}

impl<R> CompleteNameUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, cipher: Arc<FieldCipher>) -> Self {
        Self { repo, cipher }
    }

    pub async fn execute(&self, id: &IdentityId, raw_name: &str) -> IdentityResult<()> {
        let name = PersonName::parse(raw_name)?;

        let identity = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound)?;

        if !is_name_pending(&self.cipher, &identity)? {
            return Err(IdentityError::NameAlreadySet);
        }

        let encrypted = self.cipher.encrypt_field(name.as_str())?;

        // Only succeeds if nobody completed the name since we read it
        match self
            .repo
            .update_name(id, &identity.encrypted_name, &encrypted)
            .await?
        {
            NameUpdateOutcome::Updated => {
                tracing::info!(identity_id = %id, "Name completed");
                Ok(())
            }
            NameUpdateOutcome::Stale => Err(IdentityError::NameAlreadySet),
        }
    }
}
