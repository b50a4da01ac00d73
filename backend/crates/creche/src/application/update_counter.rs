//! Update Counter Use Case (admin)
//!
//! Replaces one counter with an absolute value.

use std::sync::Arc;

use crate::domain::entity::Counters;
use crate::domain::repository::CounterRepository;
use crate::domain::value_object::{CounterField, CounterValue};
use crate::error::{CounterError, CounterResult};

/// Raw update as received; validated by [`UpdateCounterUseCase::execute`]
#[derive(Debug, Clone)]
pub struct UpdateCounterInput {
    pub field: String,
    /// `None` when the submitted number was not an integer
    pub value: Option<i64>,
}

pub struct UpdateCounterUseCase<R>
where
    R: CounterRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateCounterUseCase<R>
where
    R: CounterRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: UpdateCounterInput) -> CounterResult<Counters> {
        let field: CounterField = input.field.parse()?;
        let value = CounterValue::new(input.value.ok_or(CounterError::NotAnInteger)?)?;

        let counters = self
            .repo
            .set(field, value)
            .await?
            .ok_or(CounterError::NotFound)?;

        tracing::info!(field = %field, value = %value, "Counter updated");
        Ok(counters)
    }
}
