//! Field Cipher
//!
//! Reversible encryption of individual personal-data fields before they
//! reach storage.
//!
//! ## Format
//! `base64(nonce (12 bytes) || AES-256-GCM ciphertext || tag (16 bytes))`
//!
//! A fresh random nonce is drawn for every call, so encrypting the same
//! plaintext twice yields different texts. Lookups therefore go through
//! [`crate::crypto::fingerprint`], never through ciphertext equality.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use rand::{RngCore, rngs::OsRng};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{decode_key_32, from_base64, to_base64};

/// AES-GCM nonce length
const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length
const TAG_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Key is missing, not base64, or not 32 bytes
    #[error("Encryption key must be 32 bytes of base64")]
    InvalidKey,

    #[error("Field encryption failed")]
    Encryption,

    /// Bad base64, truncated input, failed tag, wrong key, or non-UTF-8 plaintext
    #[error("Field decryption failed")]
    Decryption,
}

/// Symmetric cipher for personal-data fields
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    /// Build from raw key bytes
    pub fn from_key(key: [u8; 32]) -> Self {
        let key = Zeroizing::new(key);
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..])),
        }
    }

    /// Build from a base64 key (URL-safe or standard, padded or not)
    pub fn from_base64_key(encoded: &str) -> Result<Self, CipherError> {
        let key = decode_key_32(encoded).ok_or(CipherError::InvalidKey)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CipherError::InvalidKey)?;
        Ok(Self { cipher })
    }

    /// Encrypt one field into its text-safe stored form
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encryption)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);

        Ok(to_base64(&combined))
    }

    /// Decrypt a stored field
    pub fn decrypt_field(&self, stored: &str) -> Result<String, CipherError> {
        let combined = from_base64(stored).map_err(|_| CipherError::Decryption)?;

        if combined.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Decryption);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CipherError::Decryption)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::Decryption)
    }
}

impl fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldCipher([REDACTED])")
    }
}
