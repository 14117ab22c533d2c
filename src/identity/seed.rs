//! Seed data for the identity store.
//!
//! [`seed_identity`] takes the model builder and returns it with the demo account
//! (and any configured roles) registered as seed rows.

use sea_orm::DbBackend;
use thiserror::Error;
use tracing::{debug, info};

use super::{HashError, PasswordHasher, new_stamp, normalize, seed_id};
use crate::config::SeedConfig;
use crate::entities::{prelude::*, roles, users};
use crate::model::{Model, ModelBuilder, ModelError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("No seed password configured (set seed.password or IDENTITY_SEED_PASSWORD)")]
    MissingPassword,

    #[error("Invalid seed value: {0}")]
    Validation(String),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Build the seeded account from `seed`, hashing `password` into it.
pub fn build_seed_user(
    seed: &SeedConfig,
    password: &str,
    hasher: &dyn PasswordHasher,
) -> Result<users::Model, SeedError> {
    if seed.user_name.trim().is_empty() {
        return Err(SeedError::Validation("user_name is empty".to_string()));
    }
    if seed.email.trim().is_empty() {
        return Err(SeedError::Validation("email is empty".to_string()));
    }

    let normalized_user_name = normalize(&seed.user_name);

    let mut user = users::Model {
        id: seed_id("user", &normalized_user_name),
        user_name: seed.user_name.clone(),
        normalized_user_name,
        email: seed.email.clone(),
        normalized_email: normalize(&seed.email),
        email_confirmed: seed.email_confirmed,
        password_hash: String::new(),
        security_stamp: new_stamp(),
        concurrency_stamp: new_stamp(),
        phone_number: seed.phone_number.clone(),
        phone_number_confirmed: seed.phone_number_confirmed,
        two_factor_enabled: seed.two_factor_enabled,
        lockout_enabled: false,
        access_failed_count: 0,
    };

    user.password_hash = hasher.hash_password(&user, password)?;

    Ok(user)
}

pub fn build_seed_role(name: &str) -> Result<roles::Model, SeedError> {
    if name.trim().is_empty() {
        return Err(SeedError::Validation("role name is empty".to_string()));
    }

    let normalized_name = normalize(name);

    Ok(roles::Model {
        id: seed_id("role", &normalized_name),
        name: name.to_string(),
        normalized_name,
        concurrency_stamp: new_stamp(),
    })
}

/// Register the seed account and roles with `builder`.
///
/// The builder must already know the `users` entity (and `roles`, if any are configured).
pub fn seed_identity(
    builder: ModelBuilder,
    seed: &SeedConfig,
    hasher: &dyn PasswordHasher,
) -> Result<ModelBuilder, SeedError> {
    let password = seed.resolve_password().ok_or(SeedError::MissingPassword)?;
    let user = build_seed_user(seed, &password, hasher)?;

    info!(user_name = %user.user_name, id = %user.id, "Seeding identity user");
    let mut builder = builder.has_data(&user)?;

    for name in &seed.roles {
        let role = build_seed_role(name)?;
        debug!(role = %role.name, id = %role.id, "Seeding role");
        builder = builder.has_data(&role)?;
    }

    Ok(builder)
}

/// Identity schema with seed data applied when `seed.enabled` is set.
pub fn identity_model(
    backend: DbBackend,
    seed: &SeedConfig,
    hasher: &dyn PasswordHasher,
) -> Result<Model, SeedError> {
    let builder = ModelBuilder::new(backend).entity(Users).entity(Roles);

    let builder = if seed.enabled {
        seed_identity(builder, seed, hasher)?
    } else {
        debug!("Seeding disabled");
        builder
    };

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SEED_PASSWORD_ENV, SecurityConfig};
    use crate::identity::Argon2Hasher;

    const FIXTURE_PASSWORD: &str = "DDbc123._";

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(&SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        })
        .unwrap()
    }

    fn fixture_seed() -> SeedConfig {
        SeedConfig {
            password: Some(FIXTURE_PASSWORD.to_string()),
            ..SeedConfig::default()
        }
    }

    #[test]
    fn test_seed_user_fields() {
        let user = build_seed_user(&fixture_seed(), FIXTURE_PASSWORD, &hasher()).unwrap();

        assert_eq!(user.user_name, "mandrewcito");
        assert_eq!(user.email, "MM@GMAIL.COM");
        assert_eq!(user.normalized_email, "MM@GMAIL.COM");
        assert_eq!(user.normalized_user_name, "MANDREWCITO");
        assert_eq!(user.phone_number.as_deref(), Some("123456789"));
        assert!(!user.two_factor_enabled);
        assert!(user.email_confirmed);
        assert!(!user.phone_number_confirmed);
        assert_eq!(user.access_failed_count, 0);
    }

    #[test]
    fn test_normalized_fields_track_sources() {
        let seed = SeedConfig {
            user_name: "Mixed.Case".to_string(),
            email: "Someone@Example.org".to_string(),
            ..fixture_seed()
        };
        let user = build_seed_user(&seed, FIXTURE_PASSWORD, &hasher()).unwrap();

        assert_eq!(user.normalized_user_name, user.user_name.to_uppercase());
        assert_eq!(user.normalized_email, user.email.to_uppercase());
    }

    #[test]
    fn test_password_hash_hides_plaintext() {
        let hasher = hasher();
        let user = build_seed_user(&fixture_seed(), FIXTURE_PASSWORD, &hasher).unwrap();

        assert_ne!(user.password_hash, FIXTURE_PASSWORD);
        assert!(!user.password_hash.contains(FIXTURE_PASSWORD));
        assert!(
            hasher
                .verify_password(&user, &user.password_hash, FIXTURE_PASSWORD)
                .unwrap()
        );
    }

    #[test]
    fn test_repeated_builds_differ_only_in_salted_values() {
        let hasher = hasher();
        let first = build_seed_user(&fixture_seed(), FIXTURE_PASSWORD, &hasher).unwrap();
        let second = build_seed_user(&fixture_seed(), FIXTURE_PASSWORD, &hasher).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(
            users::Model {
                password_hash: String::new(),
                security_stamp: String::new(),
                concurrency_stamp: String::new(),
                ..first.clone()
            },
            users::Model {
                password_hash: String::new(),
                security_stamp: String::new(),
                concurrency_stamp: String::new(),
                ..second.clone()
            }
        );

        for user in [&first, &second] {
            assert!(
                hasher
                    .verify_password(user, &user.password_hash, FIXTURE_PASSWORD)
                    .unwrap()
            );
        }
    }

    // The only test in this binary that touches IDENTITY_SEED_PASSWORD; the others
    // set `seed.password`, which takes precedence over the environment.
    #[test]
    fn test_password_from_env_or_missing() {
        let seed = SeedConfig {
            password: None,
            ..SeedConfig::default()
        };

        unsafe { std::env::remove_var(SEED_PASSWORD_ENV) };
        let builder = ModelBuilder::new(DbBackend::Sqlite).entity(Users);
        let err = seed_identity(builder, &seed, &hasher()).err().unwrap();
        assert!(matches!(err, SeedError::MissingPassword));

        unsafe { std::env::set_var(SEED_PASSWORD_ENV, FIXTURE_PASSWORD) };
        let builder = ModelBuilder::new(DbBackend::Sqlite).entity(Users);
        let result = seed_identity(builder, &seed, &hasher());
        unsafe { std::env::remove_var(SEED_PASSWORD_ENV) };

        assert_eq!(result.unwrap().build().seed_count("users"), 1);
    }

    #[test]
    fn test_empty_user_name_rejected() {
        let seed = SeedConfig {
            user_name: String::new(),
            ..fixture_seed()
        };
        let err = build_seed_user(&seed, FIXTURE_PASSWORD, &hasher()).unwrap_err();
        assert!(matches!(err, SeedError::Validation(_)));
    }

    #[test]
    fn test_seed_identity_registers_one_user() {
        let builder = ModelBuilder::new(DbBackend::Sqlite).entity(Users);
        let model = seed_identity(builder, &fixture_seed(), &hasher())
            .unwrap()
            .build();

        assert_eq!(model.seed_count("users"), 1);
        assert_eq!(model.seed_count("roles"), 0);
    }

    #[test]
    fn test_seed_identity_with_roles() {
        let seed = SeedConfig {
            roles: vec!["Admin".to_string(), "User".to_string()],
            ..fixture_seed()
        };
        let model = identity_model(DbBackend::Sqlite, &seed, &hasher()).unwrap();

        assert_eq!(model.seed_count("users"), 1);
        assert_eq!(model.seed_count("roles"), 2);
    }

    #[test]
    fn test_case_duplicate_roles_rejected() {
        let seed = SeedConfig {
            roles: vec!["Admin".to_string(), "ADMIN".to_string()],
            ..fixture_seed()
        };
        let err = identity_model(DbBackend::Sqlite, &seed, &hasher()).unwrap_err();
        assert!(matches!(
            err,
            SeedError::Model(ModelError::DuplicateSeedKey { .. })
        ));
    }

    #[test]
    fn test_roles_without_entity_rejected() {
        let seed = SeedConfig {
            roles: vec!["Admin".to_string()],
            ..fixture_seed()
        };
        let builder = ModelBuilder::new(DbBackend::Sqlite).entity(Users);
        let err = seed_identity(builder, &seed, &hasher()).err().unwrap();
        assert!(matches!(
            err,
            SeedError::Model(ModelError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_disabled_seed_registers_schema_only() {
        let seed = SeedConfig {
            enabled: false,
            password: None,
            ..SeedConfig::default()
        };
        let model = identity_model(DbBackend::Sqlite, &seed, &hasher()).unwrap();

        assert_eq!(model.tables().len(), 2);
        assert!(model.seed_rows().is_empty());
    }
}
