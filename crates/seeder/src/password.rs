//! Argon2id hashing of the demo passwords.
//!
//! Hashes use a random salt from [`OsRng`] and are stored as PHC strings so
//! the algorithm parameters travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::SeedError;
use crate::fixtures::{ADMIN_PASSWORD, STAFF_PASSWORD};
use crate::plan::DemoPasswords;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, SeedError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| SeedError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, SeedError> {
    let parsed = PasswordHash::new(hash).map_err(|e| SeedError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(SeedError::PasswordHash(e.to_string())),
    }
}

/// Hash both demo passwords once; every seeded user shares one of them.
///
/// Argon2 is CPU-bound, so this runs on the blocking pool.
pub async fn hash_demo_passwords() -> Result<DemoPasswords, SeedError> {
    tokio::task::spawn_blocking(|| -> Result<DemoPasswords, SeedError> {
        Ok(DemoPasswords {
            admin_hash: hash_password(ADMIN_PASSWORD)?,
            staff_hash: hash_password(STAFF_PASSWORD)?,
        })
    })
    .await
    .map_err(|e| SeedError::PasswordHash(format!("hashing task failed: {e}")))?
}
