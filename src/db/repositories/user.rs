use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use tokio::task;

use crate::entities::users;
use crate::identity::{Argon2Hasher, PasswordHasher, normalize};

/// User data returned from repository (without password hash or security stamp)
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub two_factor_enabled: bool,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            user_name: model.user_name,
            email: model.email,
            email_confirmed: model.email_confirmed,
            phone_number: model.phone_number,
            phone_number_confirmed: model.phone_number_confirmed,
            two_factor_enabled: model.two_factor_enabled,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
    hasher: Argon2Hasher,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, hasher: Argon2Hasher) -> Self {
        Self { conn, hasher }
    }

    /// Get user by name, ignoring case
    pub async fn find_by_name(&self, user_name: &str) -> Result<Option<User>> {
        Ok(self.find_model_by_name(user_name).await?.map(User::from))
    }

    /// Get user by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.find_model_by_email(email).await?.map(User::from))
    }

    pub async fn count(&self) -> Result<u64> {
        users::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    /// Verify password for the user matching `login` by name, or by email when no name matches.
    /// Note: Argon2 verification runs in `spawn_blocking` so it doesn't stall the runtime.
    pub async fn check_password(&self, login: &str, password: &str) -> Result<bool> {
        let user = match self.find_model_by_name(login).await? {
            Some(user) => Some(user),
            None => self.find_model_by_email(login).await?,
        };

        let Some(user) = user else {
            return Ok(false);
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            hasher.verify_password(&user, &user.password_hash, &password)
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    async fn find_model_by_name(&self, user_name: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::NormalizedUserName.eq(normalize(user_name)))
            .one(&self.conn)
            .await
            .context("Failed to query user by name")
    }

    async fn find_model_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::NormalizedEmail.eq(normalize(email)))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }
}
