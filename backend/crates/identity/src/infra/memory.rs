//! In-Memory Repository Implementation
//!
//! A mutex-guarded vector. Every operation runs under one lock, which gives
//! the same atomicity the PostgreSQL implementation gets from constraints
//! and row locks.

use kernel::id::IdentityId;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entity::Identity;
use crate::domain::repository::{
    DeleteOutcome, IdentityRepository, InsertOutcome, NameUpdateOutcome, RoleChangeOutcome,
};
use crate::domain::value_object::credential::Fingerprint;
use crate::error::{IdentityError, IdentityResult};

#[derive(Clone, Default)]
pub struct InMemoryIdentityRepository {
    records: Arc<Mutex<Vec<Identity>>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> IdentityResult<MutexGuard<'_, Vec<Identity>>> {
        self.records
            .lock()
            .map_err(|_| IdentityError::Internal("identity store lock poisoned".to_string()))
    }

    /// Number of stored identities
    pub fn len(&self) -> usize {
        self.records().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityRepository for InMemoryIdentityRepository {
    async fn insert(&self, identity: &Identity) -> IdentityResult<InsertOutcome> {
        let mut records = self.records()?;

        let taken = records.iter().any(|r| {
            r.national_id_fingerprint == identity.national_id_fingerprint
                || r.phone_fingerprint == identity.phone_fingerprint
        });
        if taken {
            return Ok(InsertOutcome::Conflict);
        }

        records.push(identity.clone());
        Ok(InsertOutcome::Inserted(identity.clone()))
    }

    async fn find_by_id(&self, id: &IdentityId) -> IdentityResult<Option<Identity>> {
        Ok(self.records()?.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_by_national_id_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> IdentityResult<Option<Identity>> {
        Ok(self
            .records()?
            .iter()
            .find(|r| &r.national_id_fingerprint == fingerprint)
            .cloned())
    }

    async fn find_by_phone_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> IdentityResult<Option<Identity>> {
        Ok(self
            .records()?
            .iter()
            .find(|r| &r.phone_fingerprint == fingerprint)
            .cloned())
    }

    async fn list_all(&self) -> IdentityResult<Vec<Identity>> {
        Ok(self.records()?.clone())
    }

    async fn update_name(
        &self,
        id: &IdentityId,
        expected: &str,
        encrypted_name: &str,
    ) -> IdentityResult<NameUpdateOutcome> {
        let mut records = self.records()?;
        match records
            .iter_mut()
            .find(|r| &r.id == id && r.encrypted_name == expected)
        {
            Some(record) => {
                record.encrypted_name = encrypted_name.to_string();
                Ok(NameUpdateOutcome::Updated)
            }
            None => Ok(NameUpdateOutcome::Stale),
        }
    }

    async fn delete_unless_admin(&self, id: &IdentityId) -> IdentityResult<DeleteOutcome> {
        let mut records = self.records()?;
        let Some(index) = records.iter().position(|r| &r.id == id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        if records[index].is_admin {
            return Ok(DeleteOutcome::IsAdmin);
        }
        records.remove(index);
        Ok(DeleteOutcome::Deleted)
    }

    async fn set_admin(
        &self,
        id: &IdentityId,
        is_admin: bool,
    ) -> IdentityResult<RoleChangeOutcome> {
        let mut records = self.records()?;
        let admins = records.iter().filter(|r| r.is_admin).count();

        let Some(record) = records.iter_mut().find(|r| &r.id == id) else {
            return Ok(RoleChangeOutcome::NotFound);
        };
        if record.is_admin && !is_admin && admins <= 1 {
            return Ok(RoleChangeOutcome::LastAdmin);
        }

        record.is_admin = is_admin;
        Ok(RoleChangeOutcome::Changed)
    }
}
