//! Verify command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_verify(config: &Config, login: &str, password: &str) -> anyhow::Result<()> {
    let store = Store::open(config).await?;

    if store.users().check_password(login, password).await? {
        println!("Password OK for '{login}'");
        Ok(())
    } else {
        anyhow::bail!("Invalid credentials for '{login}'")
    }
}
