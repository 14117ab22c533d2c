use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable consulted when `seed.password` is not set in the config file.
pub const SEED_PASSWORD_ENV: &str = "IDENTITY_SEED_PASSWORD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub security: SecurityConfig,

    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/identity.db".to_string(),
            log_level: "info".to_string(),
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

/// Values for the demonstration account written as seed data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,

    pub user_name: String,

    pub email: String,

    pub phone_number: Option<String>,

    pub email_confirmed: bool,

    pub phone_number_confirmed: bool,

    pub two_factor_enabled: bool,

    /// Plaintext password for the seeded account.
    /// Prefer `IDENTITY_SEED_PASSWORD` over committing this to a config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Role names seeded alongside the user, e.g. `["Admin", "User"]`. Empty by default.
    pub roles: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_name: "mandrewcito".to_string(),
            email: "MM@GMAIL.COM".to_string(),
            phone_number: Some("123456789".to_string()),
            email_confirmed: true,
            phone_number_confirmed: false,
            two_factor_enabled: false,
            password: None,
            roles: Vec::new(),
        }
    }
}

impl SeedConfig {
    /// The configured password, falling back to [`SEED_PASSWORD_ENV`].
    #[must_use]
    pub fn resolve_password(&self) -> Option<String> {
        resolve_password_from(
            self.password.as_deref(),
            std::env::var(SEED_PASSWORD_ENV).ok(),
        )
    }
}

/// Blank values count as unset.
#[must_use]
pub fn resolve_password_from(configured: Option<&str>, env: Option<String>) -> Option<String> {
    configured
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or_else(|| env.filter(|p| !p.is_empty()))
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("identity-seed").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".identity-seed").join("config.toml"));
        }

        paths
    }

    #[must_use]
    pub fn default_config_path() -> PathBuf {
        PathBuf::from("identity-seed.toml")
    }

    /// Writes the default config to `path` unless a file already exists there.
    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("min_db_connections cannot exceed max_db_connections");
        }

        if self.seed.enabled {
            if self.seed.user_name.trim().is_empty() {
                anyhow::bail!("Seed user_name cannot be empty when seeding is enabled");
            }
            if self.seed.email.trim().is_empty() {
                anyhow::bail!("Seed email cannot be empty when seeding is enabled");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.database_path, "sqlite:data/identity.db");
        assert_eq!(config.security.argon2_time_cost, 3);
        assert_eq!(config.seed.user_name, "mandrewcito");
        assert_eq!(config.seed.email, "MM@GMAIL.COM");
        assert!(config.seed.password.is_none());
        assert!(config.seed.roles.is_empty());
    }

    #[test]
    fn test_config_serialization_omits_unset_password() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[seed]"));
        assert!(!toml_str.contains("password ="));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [seed]
            user_name = "demo"
            roles = ["Admin", "User"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.seed.user_name, "demo");
        assert_eq!(config.seed.roles, vec!["Admin", "User"]);

        assert_eq!(config.seed.email, "MM@GMAIL.COM");
        assert_eq!(config.security.argon2_parallelism, 1);
    }

    #[test]
    fn test_resolve_password_prefers_config() {
        assert_eq!(
            resolve_password_from(Some("from-file"), Some("from-env".to_string())),
            Some("from-file".to_string())
        );
        assert_eq!(
            resolve_password_from(Some(""), Some("from-env".to_string())),
            Some("from-env".to_string())
        );
        assert_eq!(resolve_password_from(None, Some(String::new())), None);
        assert_eq!(resolve_password_from(None, None), None);
    }

    #[test]
    fn test_validate_rejects_empty_seed_user() {
        let mut config = Config::default();
        config.seed.user_name = "  ".to_string();
        assert!(config.validate().is_err());

        config.seed.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_pool_bounds() {
        let mut config = Config::default();
        config.general.min_db_connections = 10;
        assert!(config.validate().is_err());
    }
}
