//! Application Layer
//!
//! Use cases and application services.

pub mod read_counters;
pub mod update_counter;

// Re-exports
pub use read_counters::ReadCountersUseCase;
pub use update_counter::{UpdateCounterInput, UpdateCounterUseCase};
