//! PostgreSQL Repository Implementation
//!
//! Table `creche` holds exactly one row with `id = 1`.

use sqlx::PgPool;

use crate::domain::entity::Counters;
use crate::domain::repository::CounterRepository;
use crate::domain::value_object::{CounterField, CounterValue};
use crate::error::{CounterError, CounterResult};

/// PostgreSQL-backed counter repository
#[derive(Clone)]
pub struct PgCounterRepository {
    pool: PgPool,
}

impl PgCounterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CounterRepository for PgCounterRepository {
    async fn ensure_initialized(&self) -> CounterResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO creche (id, total_existentes, total_prometidas)
            VALUES (1, 0, 0)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Counters row created");
        }
        Ok(())
    }

    async fn get(&self) -> CounterResult<Option<Counters>> {
        let row = sqlx::query_as::<_, CountersRow>(
            r#"
            SELECT total_existentes, total_prometidas
            FROM creche
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(CountersRow::into_counters).transpose()
    }

    async fn set(
        &self,
        field: CounterField,
        value: CounterValue,
    ) -> CounterResult<Option<Counters>> {
        let sql = match field {
            CounterField::Existing => {
                r#"
                UPDATE creche SET total_existentes = $1
                WHERE id = 1
                RETURNING total_existentes, total_prometidas
                "#
            }
            CounterField::Promised => {
                r#"
                UPDATE creche SET total_prometidas = $1
                WHERE id = 1
                RETURNING total_existentes, total_prometidas
                "#
            }
        };

        // The domain bound keeps every value inside i32
        let stored = i32::try_from(value.get())
            .map_err(|_| CounterError::Internal(format!("counter {value} exceeds column")))?;

        let row = sqlx::query_as::<_, CountersRow>(sql)
            .bind(stored)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CountersRow::into_counters).transpose()
    }
}

// ============================================================================
// Database row type
// ============================================================================

#[derive(sqlx::FromRow)]
struct CountersRow {
    total_existentes: i32,
    total_prometidas: i32,
}

impl CountersRow {
    fn into_counters(self) -> CounterResult<Counters> {
        let stored = |v: i32| {
            CounterValue::try_from(v)
                .map_err(|e| CounterError::Internal(format!("stored counter invalid: {e}")))
        };

        Ok(Counters {
            existing: stored(self.total_existentes)?,
            promised: stored(self.total_prometidas)?,
        })
    }
}
