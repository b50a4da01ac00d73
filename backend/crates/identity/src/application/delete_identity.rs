//! Delete Identity Use Case (admin)

use kernel::id::IdentityId;
use std::sync::Arc;

use crate::domain::repository::{DeleteOutcome, IdentityRepository};
use crate::error::{IdentityError, IdentityResult};

pub struct DeleteIdentityUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> DeleteIdentityUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Admins can delete anyone except themselves and other admins
    pub async fn execute(&self, caller: &IdentityId, target: &IdentityId) -> IdentityResult<()> {
        if caller == target {
            return Err(IdentityError::SelfDeleteForbidden);
        }

        match self.repo.delete_unless_admin(target).await? {
            DeleteOutcome::Deleted => {
                tracing::info!(admin_id = %caller, identity_id = %target, "Identity deleted");
                Ok(())
            }
            DeleteOutcome::IsAdmin => Err(IdentityError::AdminDeleteForbidden),
            DeleteOutcome::NotFound => Err(IdentityError::NotFound),
        }
    }
}
