//! Name Status Use Case
//!
//! Reports whether an identity still carries the placeholder name.

use kernel::id::IdentityId;
use platform::field_cipher::FieldCipher;
use std::sync::Arc;

use crate::domain::entity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::PLACEHOLDER_NAME;
use crate::error::{IdentityError, IdentityResult};

/// `true` while the stored name is the placeholder
pub fn is_name_pending(cipher: &FieldCipher, identity: &Identity) -> IdentityResult<bool> {
    let name = cipher.decrypt_field(&identity.encrypted_name)?;
    Ok(name == PLACEHOLDER_NAME)
}

pub struct NameStatusUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    cipher: Arc<FieldCipher>,
}

impl<R> NameStatusUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, cipher: Arc<FieldCipher>) -> Self {
        Self { repo, cipher }
    }

    pub async fn execute(&self, id: &IdentityId) -> IdentityResult<bool> {
        let identity = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound)?;

        is_name_pending(&self.cipher, &identity)
    }
}
