//! Value Object Module

pub mod credential;
pub mod person_name;

pub use credential::{CredentialError, Fingerprint, NationalId, PhoneNumber};
pub use person_name::{PLACEHOLDER_NAME, PersonName, PersonNameError};
