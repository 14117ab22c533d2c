use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::prelude::SchemaManager;
use std::path::Path;
use std::time::Duration;
use tokio::task;
use tracing::info;

use crate::config::Config;
use crate::identity::{Argon2Hasher, identity_model};
use crate::model::Model;

pub mod repositories;

pub use repositories::role::RoleRepository;
pub use repositories::user::{User, UserRepository};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    hasher: Argon2Hasher,
}

impl Store {
    /// Open the configured database and apply the identity model, seed rows included.
    pub async fn connect(config: &Config) -> Result<Self> {
        let store = Self::open(config).await?;

        let backend = store.conn.get_database_backend();
        let seed = config.seed.clone();
        let hasher = store.hasher.clone();

        // Argon2 is CPU-bound; keep it off the async workers.
        let model = task::spawn_blocking(move || identity_model(backend, &seed, &hasher))
            .await
            .context("Model build task panicked")?
            .context("Failed to build identity model")?;

        store.apply_model(&model).await?;

        Ok(store)
    }

    /// Open the configured database without touching its schema.
    pub async fn open(config: &Config) -> Result<Self> {
        let hasher = Argon2Hasher::new(&config.security)?;
        let conn = Self::connect_pool(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self { conn, hasher })
    }

    async fn connect_pool(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<DatabaseConnection> {
        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to {db_url}"))?;

        info!(
            "Database connected (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(conn)
    }

    pub async fn apply_model(&self, model: &Model) -> Result<()> {
        let manager = SchemaManager::new(&self.conn);
        model
            .apply(&manager)
            .await
            .context("Failed to apply identity model")
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.conn.clone(), self.hasher.clone())
    }

    #[must_use]
    pub fn roles(&self) -> RoleRepository {
        RoleRepository::new(self.conn.clone())
    }
}
