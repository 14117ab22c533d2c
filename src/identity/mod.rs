//! Identity store records: normalization, password hashing and the seed initializer.

pub mod password;
pub mod seed;

use uuid::Uuid;

pub use password::{Argon2Hasher, HashError, PasswordHasher};
pub use seed::{SeedError, build_seed_role, build_seed_user, identity_model, seed_identity};

/// Canonical form of a lookup field (user name, email, role name).
///
/// Stored copies must always equal `normalize(source)`; lookups compare against them.
#[must_use]
pub fn normalize(value: &str) -> String {
    value.to_uppercase()
}

/// Stable id for a seeded record, derived from its kind and normalized name.
#[must_use]
pub fn seed_id(kind: &str, normalized: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{kind}:{normalized}").as_bytes()).to_string()
}

/// Fresh random value for security/concurrency stamps.
#[must_use]
pub fn new_stamp() -> String {
    Uuid::new_v4().to_string()
}
