//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::IdentityId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::Identity;
use crate::domain::repository::{
    DeleteOutcome, IdentityRepository, InsertOutcome, NameUpdateOutcome, RoleChangeOutcome,
};
use crate::domain::value_object::credential::Fingerprint;
use crate::error::IdentityResult;

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityRepository for PgIdentityRepository {
    async fn insert(&self, identity: &Identity) -> IdentityResult<InsertOutcome> {
        // Uniqueness is decided by the constraints, not by a prior lookup
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            INSERT INTO informacoes (
                id,
                nome_criptografado,
                cpf_criptografado,
                telefone_criptografado,
                cpf_hash,
                telefone_hash,
                admin,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT DO NOTHING
            RETURNING
                id,
                nome_criptografado,
                cpf_criptografado,
                telefone_criptografado,
                cpf_hash,
                telefone_hash,
                admin,
                created_at
            "#,
        )
        .bind(identity.id.as_uuid())
        .bind(&identity.encrypted_name)
        .bind(&identity.encrypted_national_id)
        .bind(&identity.encrypted_phone)
        .bind(identity.national_id_fingerprint.as_str())
        .bind(identity.phone_fingerprint.as_str())
        .bind(identity.is_admin)
        .bind(identity.created_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some(row) => InsertOutcome::Inserted(row.into_identity()),
            None => {
                tracing::warn!(identity_id = %identity.id, "Insert lost a fingerprint uniqueness race");
                InsertOutcome::Conflict
            }
        })
    }

    async fn find_by_id(&self, id: &IdentityId) -> IdentityResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                nome_criptografado,
                cpf_criptografado,
                telefone_criptografado,
                cpf_hash,
                telefone_hash,
                admin,
                created_at
            FROM informacoes
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }

    async fn find_by_national_id_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> IdentityResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                nome_criptografado,
                cpf_criptografado,
                telefone_criptografado,
                cpf_hash,
                telefone_hash,
                admin,
                created_at
            FROM informacoes
            WHERE cpf_hash = $1
            "#,
        )
        .bind(fingerprint.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }

    async fn find_by_phone_fingerprint(
        &self,
        fingerprint: &Fingerprint,
    ) -> IdentityResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                nome_criptografado,
                cpf_criptografado,
                telefone_criptografado,
                cpf_hash,
                telefone_hash,
                admin,
                created_at
            FROM informacoes
            WHERE telefone_hash = $1
            "#,
        )
        .bind(fingerprint.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(IdentityRow::into_identity))
    }

    async fn list_all(&self) -> IdentityResult<Vec<Identity>> {
        let rows = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                id,
                nome_criptografado,
                cpf_criptografado,
                telefone_criptografado,
                cpf_hash,
                telefone_hash,
                admin,
                created_at
            FROM informacoes
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(IdentityRow::into_identity).collect())
    }

    async fn update_name(
        &self,
        id: &IdentityId,
        expected: &str,
        encrypted_name: &str,
    ) -> IdentityResult<NameUpdateOutcome> {
        let updated = sqlx::query(
            r#"
            UPDATE informacoes
            SET nome_criptografado = $3
            WHERE id = $1 AND nome_criptografado = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(expected)
        .bind(encrypted_name)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(if updated == 1 {
            NameUpdateOutcome::Updated
        } else {
            NameUpdateOutcome::Stale
        })
    }

    async fn delete_unless_admin(&self, id: &IdentityId) -> IdentityResult<DeleteOutcome> {
        // The role check lives in the statement so a concurrent promotion
        // cannot slip between check and delete
        let deleted = sqlx::query("DELETE FROM informacoes WHERE id = $1 AND admin = FALSE")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 1 {
            return Ok(DeleteOutcome::Deleted);
        }

        let is_admin: Option<bool> =
            sqlx::query_scalar("SELECT admin FROM informacoes WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        Ok(match is_admin {
            Some(true) => DeleteOutcome::IsAdmin,
            _ => DeleteOutcome::NotFound,
        })
    }

    async fn set_admin(
        &self,
        id: &IdentityId,
        is_admin: bool,
    ) -> IdentityResult<RoleChangeOutcome> {
        // Rolls back on drop if any step below returns early
        let mut tx = self.pool.begin().await?;

        // Lock every admin row first so concurrent demotions serialize on
        // the same set and see each other's result
        let admins: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM informacoes WHERE admin = TRUE ORDER BY id FOR UPDATE",
        )
        .fetch_all(&mut *tx)
        .await?;

        let current: Option<bool> =
            sqlx::query_scalar("SELECT admin FROM informacoes WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let Some(current) = current else {
            return Ok(RoleChangeOutcome::NotFound);
        };

        if current && !is_admin && admins.len() <= 1 {
            return Ok(RoleChangeOutcome::LastAdmin);
        }

        sqlx::query("UPDATE informacoes SET admin = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(is_admin)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(RoleChangeOutcome::Changed)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    nome_criptografado: String,
    cpf_criptografado: String,
    telefone_criptografado: String,
    cpf_hash: String,
    telefone_hash: String,
    admin: bool,
    created_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> Identity {
        Identity {
            id: IdentityId::from_uuid(self.id),
            encrypted_name: self.nome_criptografado,
            encrypted_national_id: self.cpf_criptografado,
            encrypted_phone: self.telefone_criptografado,
            national_id_fingerprint: Fingerprint::from_stored(self.cpf_hash),
            phone_fingerprint: Fingerprint::from_stored(self.telefone_hash),
            is_admin: self.admin,
            created_at: self.created_at,
        }
    }
}
