//! List Identities Use Case (admin)
//!
//! Decrypts every record for the admin panel. A record whose fields cannot
//! be decrypted is still listed, with empty fields and `readable = false`.

use kernel::id::IdentityId;
use platform::field_cipher::{CipherError, FieldCipher};
use std::sync::Arc;

use crate::domain::entity::Identity;
use crate::domain::repository::IdentityRepository;
use crate::error::IdentityResult;

/// Decrypted view of one identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySummary {
    pub id: IdentityId,
    pub name: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub readable: bool,
}

pub struct ListIdentitiesUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    cipher: Arc<FieldCipher>,
}

impl<R> ListIdentitiesUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, cipher: Arc<FieldCipher>) -> Self {
        Self { repo, cipher }
    }

    pub async fn execute(&self) -> IdentityResult<Vec<IdentitySummary>> {
        let identities = self.repo.list_all().await?;
        Ok(identities.iter().map(|i| self.summarize(i)).collect())
    }

    fn summarize(&self, identity: &Identity) -> IdentitySummary {
        match self.decrypt_all(identity) {
            Ok((name, national_id, phone)) => IdentitySummary {
                id: identity.id,
                name: Some(name),
                national_id: Some(national_id),
                phone: Some(phone),
                is_admin: identity.is_admin,
                readable: true,
            },
            Err(e) => {
                tracing::warn!(identity_id = %identity.id, error = %e, "Unreadable identity record");
                IdentitySummary {
                    id: identity.id,
                    name: None,
                    national_id: None,
                    phone: None,
                    is_admin: identity.is_admin,
                    readable: false,
                }
            }
        }
    }

    fn decrypt_all(&self, identity: &Identity) -> Result<(String, String, String), CipherError> {
        Ok((
            self.cipher.decrypt_field(&identity.encrypted_name)?,
            self.cipher.decrypt_field(&identity.encrypted_national_id)?,
            self.cipher.decrypt_field(&identity.encrypted_phone)?,
        ))
    }
}
