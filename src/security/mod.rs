//! Password handling: salted digests, legacy decoding and strength checks.

pub mod legacy;
pub mod password;
pub mod strength;

pub use password::{generate_salt, hash_password, verify_password};
pub use strength::{PasswordStrength, evaluate_strength};
