//! Infrastructure Layer
//!
//! Database implementations and an in-memory store for tests and local runs.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCounterRepository;
pub use postgres::PgCounterRepository;
