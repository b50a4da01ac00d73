//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::CrecheAppState;
pub use router::{creche_router, creche_router_generic};
