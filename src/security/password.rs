use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Generate a random salt of `len` bytes, hex-encoded.
#[must_use]
pub fn generate_salt(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 over `salt || password`, hex-encoded.
///
/// The salt is hashed in its hex form so stored records can be verified by
/// any consumer that only sees the persisted strings.
#[must_use]
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Recompute the digest and compare it to `expected_hash` in constant time.
#[must_use]
pub fn verify_password(salt: &str, password: &str, expected_hash: &str) -> bool {
    let computed = hash_password(salt, password);
    computed.as_bytes().ct_eq(expected_hash.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_salt_length_and_uniqueness() {
        let a = generate_salt(16);
        let b = generate_salt(16);

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_matches_known_digest() {
        // sha256("abc")
        assert_eq!(
            hash_password("a", "bc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_salt_changes_digest() {
        assert_ne!(
            hash_password("00", "Password1"),
            hash_password("01", "Password1")
        );
    }

    #[test]
    fn test_verify_password() {
        let salt = generate_salt(16);
        let hash = hash_password(&salt, "Password1");

        assert!(verify_password(&salt, "Password1", &hash));
        assert!(!verify_password(&salt, "password1", &hash));
        assert!(!verify_password(&salt, "Password1", "deadbeef"));
    }
}
