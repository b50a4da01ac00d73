//! Identity Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Identity record, credential value objects, repository trait
//! - `application/` - Use cases (credential matching, name completion, admin)
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Login-or-register by national ID (CPF) + phone pair
//! - One-time completion of a placeholder name
//! - Admin listing, deletion and role changes with lockout protection
//!
//! ## Security Model
//! - Personal fields stored encrypted (`platform::field_cipher`)
//! - Lookups by SHA-256 fingerprint, unique per credential
//! - Trust carried by cookies through `platform::session::SessionAuthority`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{IdentityError, IdentityResult};
pub use infra::memory::InMemoryIdentityRepository;
pub use infra::postgres::PgIdentityRepository;
pub use presentation::router::{identity_router, identity_router_generic};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
