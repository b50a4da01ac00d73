//! Change Role Use Case (admin)

use kernel::id::IdentityId;
use std::sync::Arc;

use crate::domain::repository::{IdentityRepository, RoleChangeOutcome};
use crate::error::{IdentityError, IdentityResult};

pub struct ChangeRoleUseCase<R>
where
    R: IdentityRepository,
{
    repo: Arc<R>,
}

impl<R> ChangeRoleUseCase<R>
where
    R: IdentityRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Promote or demote `target`. Returns the new admin flag.
    pub async fn execute(
        &self,
        caller: &IdentityId,
        target: &IdentityId,
        is_admin: bool,
    ) -> IdentityResult<bool> {
        if caller == target {
            return Err(IdentityError::SelfRoleChangeForbidden);
        }

        match self.repo.set_admin(target, is_admin).await? {
            RoleChangeOutcome::Changed => {
                tracing::info!(admin_id = %caller, identity_id = %target, is_admin, "Role changed");
                Ok(is_admin)
            }
            RoleChangeOutcome::LastAdmin => Err(IdentityError::LastAdminForbidden),
            RoleChangeOutcome::NotFound => Err(IdentityError::NotFound),
        }
    }
}
