//! Application Layer
//!
//! Use cases and application services.

pub mod change_role;
pub mod complete_name;
pub mod delete_identity;
pub mod identify;
pub mod list_identities;
pub mod name_status;

// Re-exports
pub use change_role::ChangeRoleUseCase;
pub use complete_name::CompleteNameUseCase;
pub use delete_identity::DeleteIdentityUseCase;
pub use identify::{IdentifyInput, IdentifyOutcome, IdentifyOutput, IdentifyUseCase};
pub use list_identities::{IdentitySummary, ListIdentitiesUseCase};
pub use name_status::NameStatusUseCase;
