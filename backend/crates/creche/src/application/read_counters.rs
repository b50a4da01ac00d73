//! Read Counters Use Case (public)

use std::sync::Arc;

use crate::domain::entity::Counters;
use crate::domain::repository::CounterRepository;
use crate::error::{CounterError, CounterResult};

pub struct ReadCountersUseCase<R>
where
    R: CounterRepository,
{
    repo: Arc<R>,
}

impl<R> ReadCountersUseCase<R>
where
    R: CounterRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> CounterResult<Counters> {
        self.repo.get().await?.ok_or(CounterError::NotFound)
    }
}
