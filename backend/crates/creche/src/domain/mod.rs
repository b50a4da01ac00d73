//! Domain Layer
//!
//! Contains the counters entity, value objects, and repository trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::Counters;
pub use repository::CounterRepository;
