//! Secret hashing with Argon2id.
//!
//! Stored hashes are PHC strings, so the parameters a hash was produced with
//! travel with it and raising the work factor never invalidates old hashes.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::{rngs::OsRng, RngCore};

use crate::config::AuthConfig;
use crate::error::AppError;

const SALT_LENGTH: usize = 16;

/// Plaintext hashed once at startup so unknown identifiers still pay for a
/// verification.
const DECOY_SECRET: &str = "decoy-secret-never-issued";

#[derive(Debug, Clone)]
pub struct SecretHasher {
    params: Params,
    decoy_hash: String,
}

impl SecretHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AppError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AppError::ConfigError(format!("invalid hash parameters: {}", e)))?;

        let mut hasher = Self {
            params,
            decoy_hash: String::new(),
        };
        hasher.decoy_hash = hasher.hash(DECOY_SECRET)?;
        Ok(hasher)
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        Self::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `secret` with a fresh random salt.
    pub fn hash(&self, secret: &str) -> Result<String, AppError> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| AppError::InternalError(format!("salt generation failed: {}", e)))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AppError::InternalError(format!("salt encoding failed: {}", e)))?;

        let hash = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AppError::InternalError(format!("secret hashing failed: {}", e)))?;

        Ok(hash.to_string())
    }

    /// A malformed stored hash verifies as false.
    pub fn verify(&self, stored_hash: &str, secret: &str) -> bool {
        let parsed = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        self.argon2()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }

    /// Burn one verification's worth of work. Always false.
    pub fn verify_decoy(&self, secret: &str) -> bool {
        let _ = self.verify(&self.decoy_hash, secret);
        false
    }
}
