//! In-Memory Repository Implementation

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::entity::Counters;
use crate::domain::repository::CounterRepository;
use crate::domain::value_object::{CounterField, CounterValue};
use crate::error::{CounterError, CounterResult};

/// Starts without a row, like an empty table
#[derive(Clone, Default)]
pub struct InMemoryCounterRepository {
    row: Arc<Mutex<Option<Counters>>>,
}

impl InMemoryCounterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counters(counters: Counters) -> Self {
        Self {
            row: Arc::new(Mutex::new(Some(counters))),
        }
    }

    fn row(&self) -> CounterResult<MutexGuard<'_, Option<Counters>>> {
        self.row
            .lock()
            .map_err(|_| CounterError::Internal("counter store lock poisoned".to_string()))
    }
}

impl CounterRepository for InMemoryCounterRepository {
    async fn ensure_initialized(&self) -> CounterResult<()> {
        self.row()?.get_or_insert_with(Counters::zero);
        Ok(())
    }

    async fn get(&self) -> CounterResult<Option<Counters>> {
        Ok(*self.row()?)
    }

    async fn set(
        &self,
        field: CounterField,
        value: CounterValue,
    ) -> CounterResult<Option<Counters>> {
        let mut row = self.row()?;
        Ok(row.as_mut().map(|counters| {
            *counters = counters.with(field, value);
            *counters
        }))
    }
}
