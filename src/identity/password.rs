use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};
use thiserror::Error;
use tracing::trace;

use crate::config::SecurityConfig;
use crate::entities::users;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("Password cannot be empty")]
    EmptyPassword,

    #[error("Invalid Argon2 params: {0}")]
    InvalidParams(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid password hash format: {0}")]
    Malformed(String),
}

/// One-way, salted password hashing for identity records.
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` for `user`. The result is opaque and differs between calls.
    fn hash_password(&self, user: &users::Model, password: &str) -> Result<String, HashError>;

    /// Check `password` against a hash produced by [`PasswordHasher::hash_password`].
    ///
    /// A mismatch is `Ok(false)`; a hash that cannot be parsed is an error.
    fn verify_password(
        &self,
        user: &users::Model,
        hash: &str,
        password: &str,
    ) -> Result<bool, HashError>;
}

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(config: &SecurityConfig) -> Result<Self, HashError> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| HashError::InvalidParams(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash_password(&self, user: &users::Model, password: &str) -> Result<String, HashError> {
        if password.is_empty() {
            return Err(HashError::EmptyPassword);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hash(e.to_string()))?;

        trace!(user_name = %user.user_name, "Hashed password");
        Ok(hash.to_string())
    }

    fn verify_password(
        &self,
        _user: &users::Model,
        hash: &str,
        password: &str,
    ) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashError::Malformed(e.to_string()))?;

        // Parameters come from the PHC string, so older hashes still verify.
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
