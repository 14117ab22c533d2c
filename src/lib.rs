pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod identity;
pub mod model;

use anyhow::Context;
use cli::{Cli, Commands};
pub use config::Config;
use tracing_subscriber::EnvFilter;

pub async fn run(args: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    if let Commands::Init = args.command {
        init_logging("info")?;
        let path = args.config.unwrap_or_else(Config::default_config_path);
        return cli::cmd_init(&path);
    }

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    config.validate()?;

    init_logging(&config.general.log_level)?;

    match args.command {
        Commands::Init => Ok(()),
        Commands::Migrate => cli::cmd_migrate(&config).await,
        Commands::Show => cli::cmd_show(&config),
        Commands::Verify { login, password } => cli::cmd_verify(&config, &login, &password).await,
    }
}

fn init_logging(log_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize logging")
}
