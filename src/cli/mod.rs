//! CLI module - Command-line interface for identity-seed
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// identity-seed - Identity store schema and demo account seeding
#[derive(Parser)]
#[command(name = "identity-seed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create default config file
    Init,

    /// Create the identity tables and upsert the seed rows
    Migrate,

    /// Print the seed account that would be written (no password hash)
    Show,

    /// Check a password against a stored account
    Verify {
        /// User name or email
        login: String,
        /// Password to check
        password: String,
    },
}

pub use commands::*;
