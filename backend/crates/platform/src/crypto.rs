//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Random token rendered as lowercase hex (`2 * len` characters)
pub fn random_hex(len: usize) -> String {
    hex::encode(random_bytes(len))
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Deterministic lookup fingerprint of a plaintext value.
///
/// Lowercase hex SHA-256 over the raw UTF-8 bytes. No trimming or
/// normalization happens here, so `"123"` and `" 123"` differ.
pub fn fingerprint(plaintext: &str) -> String {
    hex::encode(sha256(plaintext.as_bytes()))
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Encode bytes as unpadded URL-safe base64
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded URL-safe base64
pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Decode a 32-byte secret given in any common base64 flavour.
///
/// Accepts URL-safe or standard alphabets, padded or not. Returns `None`
/// when nothing decodes or the length is not exactly 32 bytes.
pub fn decode_key_32(encoded: &str) -> Option<Zeroizing<[u8; 32]>> {
    let encoded = encoded.trim();
    let engines = [
        &general_purpose::URL_SAFE,
        &general_purpose::URL_SAFE_NO_PAD,
        &general_purpose::STANDARD,
        &general_purpose::STANDARD_NO_PAD,
    ];

    for engine in engines {
        let Ok(bytes) = engine.decode(encoded) else {
            continue;
        };
        let bytes = Zeroizing::new(bytes);
        if bytes.len() == 32 {
            let mut key = Zeroizing::new([0u8; 32]);
            key.copy_from_slice(&bytes);
            return Some(key);
        }
    }

    None
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> [u8; 32] {
    // HMAC accepts keys of any length
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
