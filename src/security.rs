use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{DomainError, DomainResult};

/// hash_password
///
/// Produces a salted argon2 PHC string from the plaintext. The work factor is
/// argon2's default parameter set, tunable without invalidating stored hashes
/// since the parameters travel inside the PHC string.
pub fn hash_password(plaintext: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::Internal(format!("password hashing failed: {}", e)))
}

/// verify_password
///
/// Compares a plaintext candidate against a stored PHC string. The comparison
/// itself happens inside the argon2 crate in constant time; a malformed stored
/// hash is an infrastructure fault, not a credential failure.
pub fn verify_password(plaintext: &str, hash: &str) -> DomainResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| DomainError::Internal(format!("stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok())
}
