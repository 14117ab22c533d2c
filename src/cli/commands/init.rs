use std::path::Path;

pub fn cmd_init(path: &Path) -> anyhow::Result<()> {
    if crate::config::Config::create_default_if_missing(path)? {
        println!("Created {}", path.display());
        println!("Set the seed password with IDENTITY_SEED_PASSWORD before running migrate.");
    } else {
        println!("Config already exists: {}", path.display());
    }
    Ok(())
}
