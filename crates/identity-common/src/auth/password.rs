//! Password hashing and verification
//!
//! Argon2id with PHC-formatted hashes. The parameters used to create a hash
//! travel inside it, so verification works for any configured cost.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use identity_core::{DomainError, PasswordVerifier};

use crate::error::AppError;

/// Hash a password using Argon2id with default parameters
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    PasswordService::new().hash_with(password)
}

/// Verify a password against a PHC hash
///
/// # Errors
/// Returns an error if the hash is not a valid PHC string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    PasswordService::new().verify_with(password, hash)
}

/// Password service for dependency injection
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService {
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Use explicit Argon2 cost parameters (tests use a very low cost)
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub fn hash_with(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
    }

    /// Verify a password against a hash
    ///
    /// # Errors
    /// Returns an error if the hash is malformed
    pub fn verify_with(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}"))
        })?;

        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl PasswordVerifier for PasswordService {
    fn hash(&self, plain: &str) -> Result<String, DomainError> {
        self.hash_with(plain)
            .map_err(|e| DomainError::InternalError(format!("{e:#}")))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, DomainError> {
        self.verify_with(plain, hash)
            .map_err(|e| DomainError::InternalError(format!("{e:#}")))
    }
}
