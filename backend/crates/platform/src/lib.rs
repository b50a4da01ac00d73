//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256 fingerprints, HMAC, Base64, random tokens)
//! - Field-level encryption for personal data (AES-256-GCM)
//! - Cookie management
//! - CSRF double-submit protection
//! - Session trust resolution and authorization guards
//! - Request extractors that reject with the unified error body

pub mod cookie;
pub mod crypto;
pub mod csrf;
pub mod extract;
pub mod field_cipher;
pub mod guard;
pub mod session;
