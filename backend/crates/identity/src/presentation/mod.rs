//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::IdentityAppState;
pub use router::{identity_router, identity_router_generic};
