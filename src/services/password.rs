//! Argon2id credential hashing.
//!
//! Hashes use a random salt from [`OsRng`] and are stored as PHC strings so
//! the algorithm parameters travel with the hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};

use crate::domain::types::PasswordHash;

/// Hash a plaintext credential using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<PasswordHash, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(PasswordHash::from_phc(hash.to_string()))
}

/// Returns `Ok(false)` on mismatch and `Err` only when the stored hash is unreadable.
pub fn verify_password(
    password: &str,
    hash: &PasswordHash,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PhcHash::new(hash.as_str())?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct-horse").expect("hashing should succeed");

        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn unreadable_hash_is_an_error() {
        let garbage = PasswordHash::from_phc("plaintext".into());
        assert!(verify_password("plaintext", &garbage).is_err());
    }
}
