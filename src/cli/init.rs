//! `pointree init` command
//!
//! Writes a default `.pointree/config.toml`.
//!
//! # Usage
//! ```bash
//! pointree init                                  # In current directory
//! pointree init /path/to/project                 # In specific path
//! pointree init --global                         # In ~/.pointree
//! pointree init --server-url http://kb:5000      # With a server URL
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use super::GlobalArgs;
use crate::config::{Config, CONFIG_DIR};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Initialize global config (~/.pointree)
    #[arg(long)]
    pub global: bool,

    /// Overwrite an existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalArgs) -> Result<()> {
    let base_path = if args.global {
        directories::UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Cannot determine home directory")?
    } else {
        args.path.unwrap_or_else(|| PathBuf::from("."))
    };

    let config_path = base_path.join(CONFIG_DIR).join("config.toml");
    if is_initialized(&base_path) && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    let mut config = Config::default();
    if let Some(url) = &global.server_url {
        config.server.url = url.clone();
    }
    config.save_to(&config_path)?;

    println!("{} Initialized pointree", "✓".green());
    println!("   Config: {}", config_path.display());
    println!("   Server: {}", config.server.url);
    println!("\nNext steps:");
    println!("  pointree ls");
    println!("  pointree add --title \"First topic\"");
    println!("  pointree shell");

    Ok(())
}

fn is_initialized(path: &Path) -> bool {
    path.join(CONFIG_DIR).join("config.toml").exists()
}
