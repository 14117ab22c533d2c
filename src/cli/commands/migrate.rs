//! Migrate command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(config).await?;

    let users = store.users().count().await?;
    let roles = store.roles().list().await?;

    println!("Identity schema applied to {}", config.general.database_path);
    println!("  users: {users}");
    if !roles.is_empty() {
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        println!("  roles: {}", names.join(", "));
    }

    Ok(())
}
