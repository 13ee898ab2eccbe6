//! Decoding for credentials stored before salted hashing.
//!
//! Old records kept the password base64-encoded, one byte per character.
//! This module only reads that format; nothing here produces it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;

/// Decode a legacy credential back to its password, or `None` if it is not
/// valid base64.
#[must_use]
pub fn decode(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    Some(bytes.into_iter().map(char::from).collect())
}

/// Whether `password` matches the legacy credential.
///
/// A credential that fails to decode never matches; callers see the same
/// outcome as for a wrong password.
#[must_use]
pub fn matches(encoded: &str, password: &str) -> bool {
    decode(encoded).is_some_and(|decoded| decoded.as_bytes().ct_eq(password.as_bytes()).into())
}
