//! Creche Counters Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Counters entity, field/value objects, repository trait
//! - `application/` - Read and update use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Two public totals: facilities delivered (`entregues`) and promised
//! (`prometidas`). Anyone may read them; only admins may change them.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use domain::repository::CounterRepository;
pub use error::{CounterError, CounterResult};
pub use infra::memory::InMemoryCounterRepository;
pub use infra::postgres::PgCounterRepository;
pub use presentation::router::{creche_router, creche_router_generic};
