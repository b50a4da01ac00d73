//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::Counters;
use crate::domain::value_object::{CounterField, CounterValue};
use crate::error::CounterResult;

/// Counter repository trait
#[trait_variant::make(CounterRepository: Send)]
pub trait LocalCounterRepository {
    /// Create the zeroed row unless it already exists
    async fn ensure_initialized(&self) -> CounterResult<()>;

    /// Current totals, `None` if the row is missing
    async fn get(&self) -> CounterResult<Option<Counters>>;

    /// Replace one field and return the updated totals, `None` if the row is missing
    async fn set(&self, field: CounterField, value: CounterValue)
    -> CounterResult<Option<Counters>>;
}
