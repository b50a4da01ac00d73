//! Identify Use Case
//!
//! Treats a CPF + phone pair as a login credential: both known on the same
//! record logs in, both unknown registers, anything else is refused.
//!
//! | by CPF | by phone | same record | outcome |
//! |--------|----------|-------------|---------|
//! | found  | found    | yes         | login |
//! | found  | found    | no          | `MismatchedCredentials` |
//! | found  | absent   |             | `WrongPhoneForId` |
//! | absent | found    |             | `WrongIdForPhone` |
//! | absent | absent   |             | register |

use kernel::id::IdentityId;
use platform::field_cipher::FieldCipher;
use std::sync::Arc;

use crate::domain::entity::{Identity, SealedFields};
use crate::domain::repository::{IdentityRepository, InsertOutcome};
use crate::domain::value_object::{NationalId, PersonName, PhoneNumber};
use crate::error::{IdentityError, IdentityResult};

/// Identify input
pub struct IdentifyInput {
    pub national_id: String,
    pub phone: String,
    /// Absent or blank registers with the placeholder name
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifyOutcome {
    Login,
    Register,
}

/// Identify output
#[derive(Debug, Clone)]
pub struct IdentifyOutput {
    pub outcome: IdentifyOutcome,
    pub identity_id: IdentityId,
    pub is_admin: bool,
}

/// Identify (login-or-register) use case
pub struct IdentifyUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
    cipher: Arc<FieldCipher>,
}

impl<R> IdentifyUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>, cipher: Arc<FieldCipher>) -> Self {
        Self { repo, cipher }
    }

    pub async fn execute(&self, input: IdentifyInput) -> IdentityResult<IdentifyOutput> {
        // Validate everything before touching storage
        let national_id = NationalId::new(input.national_id)?;
        let phone = PhoneNumber::new(input.phone)?;
        let name = PersonName::parse_optional(input.name.as_deref())?;

        let national_id_fingerprint = national_id.fingerprint();
        let phone_fingerprint = phone.fingerprint();

        let by_national_id = self
            .repo
            .find_by_national_id_fingerprint(&national_id_fingerprint)
            .await?;
        let by_phone = self.repo.find_by_phone_fingerprint(&phone_fingerprint).await?;

        match (by_national_id, by_phone) {
            (Some(a), Some(b)) if a.id == b.id => {
                tracing::info!(identity_id = %a.id, is_admin = a.is_admin, "Identity logged in");
                Ok(IdentifyOutput {
                    outcome: IdentifyOutcome::Login,
                    identity_id: a.id,
                    is_admin: a.is_admin,
                })
            }
            (Some(_), Some(_)) => Err(IdentityError::MismatchedCredentials),
            (Some(_), None) => Err(IdentityError::WrongPhoneForId),
            (None, Some(_)) => Err(IdentityError::WrongIdForPhone),
            (None, None) => {
                let sealed = SealedFields {
                    encrypted_name: self.cipher.encrypt_field(name.as_str())?,
                    encrypted_national_id: self.cipher.encrypt_field(national_id.as_str())?,
                    encrypted_phone: self.cipher.encrypt_field(phone.as_str())?,
                };
                let identity = Identity::register(sealed, national_id_fingerprint, phone_fingerprint);

                match self.repo.insert(&identity).await? {
                    InsertOutcome::Inserted(stored) => {
                        tracing::info!(
                            identity_id = %stored.id,
                            name_pending = name.is_placeholder(),
                            "Identity registered"
                        );
                        Ok(IdentifyOutput {
                            outcome: IdentifyOutcome::Register,
                            identity_id: stored.id,
                            is_admin: stored.is_admin,
                        })
                    }
                    InsertOutcome::Conflict => Err(IdentityError::DuplicateCredential),
                }
            }
        }
    }
}
