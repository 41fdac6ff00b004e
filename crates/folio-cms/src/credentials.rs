//! Password hashing and comparison.
//!
//! New passwords are stored as Argon2id PHC strings. Values that are not
//! PHC strings are treated as plaintext; the compiled-in defaults and
//! documents written before hashing was introduced look like that.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::error::{CmsError, CmsResult};

/// Hash a password using Argon2id.
///
/// Returns the PHC-formatted hash string that includes the salt and parameters.
pub fn hash_password(password: &str) -> CmsResult<String> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| CmsError::Hashing(format!("Failed to encode salt: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CmsError::Hashing(format!("Failed to hash password: {e}")))
}

/// Whether a stored password is a PHC hash
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with("$argon2")
}

/// Check a password against its stored form.
///
/// A stored value that claims to be a hash but does not parse never matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if !is_hashed(stored) {
        return secure_eq(password, stored);
    }
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Compare two secrets without leaking where they differ.
///
/// Both sides are hashed first; `blake3::Hash` compares in constant time.
pub fn secure_eq(a: &str, b: &str) -> bool {
    blake3::hash(a.as_bytes()) == blake3::hash(b.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(is_hashed(&hash));
        assert!(verify_password("correct-horse", &hash));
        assert!(!verify_password("wrong-horse", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_plaintext_fallback() {
        assert!(!is_hashed("team_ay"));
        assert!(verify_password("team_ay", "team_ay"));
        assert!(!verify_password("team_ay ", "team_ay"));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("$argon2id$garbage", "$argon2id$garbage"));
    }
}
