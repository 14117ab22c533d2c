//! Show command handler

use crate::config::Config;
use crate::identity::{Argon2Hasher, SeedError, build_seed_user};

pub fn cmd_show(config: &Config) -> anyhow::Result<()> {
    if !config.seed.enabled {
        println!("Seeding is disabled.");
        return Ok(());
    }

    let password = config
        .seed
        .resolve_password()
        .ok_or(SeedError::MissingPassword)?;
    let hasher = Argon2Hasher::new(&config.security)?;
    let user = build_seed_user(&config.seed, &password, &hasher)?;

    println!("{}", serde_json::to_string_pretty(&user)?);

    if !config.seed.roles.is_empty() {
        println!("Roles: {}", config.seed.roles.join(", "));
    }

    Ok(())
}
