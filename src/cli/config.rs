//! `pointree config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! pointree config                         # Show config file
//! pointree config server.url              # Get value
//! pointree config server.url http://kb    # Set value
//! pointree config graph.min_size 10       # Numbers stay numbers
//! pointree config --path                  # Show config locations
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use toml_edit::{value, DocumentMut, Item, Value};

use super::GlobalArgs;
use crate::config::{Config, CONFIG_DIR};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., server.url, graph.base_size)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// Show config file locations
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.pointree/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

/// Which file this invocation reads and writes
fn config_path(args: &ConfigArgs, global: &GlobalArgs) -> Result<PathBuf> {
    if let Some(explicit) = &global.config {
        return Ok(explicit.clone());
    }
    if args.global {
        return Config::global_config_path().context("Cannot determine home directory");
    }
    Ok(Config::find_local_config()
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("config.toml")))
}

pub fn run(args: ConfigArgs, global: &GlobalArgs) -> Result<()> {
    let path = config_path(&args, global)?;

    if args.path {
        if let Some(global_path) = Config::global_config_path() {
            println!("Global: {}", global_path.display());
        }
        match Config::find_local_config() {
            Some(local) => println!("Local:  {}", local.display()),
            None => println!("Local:  (none)"),
        }
        println!();
        if path.exists() {
            println!("{} Active: {}", "✓".green(), path.display());
        } else {
            println!("{} No config file at {}, using defaults", "⚠".yellow(), path.display());
        }
        return Ok(());
    }

    match (&args.key, &args.value) {
        (None, _) => {
            if path.exists() {
                println!("{}", fs::read_to_string(&path)?);
            } else {
                println!("# defaults ({} not found)", path.display());
                println!("{}", toml::to_string_pretty(&Config::default())?);
            }
        }
        (Some(key), None) => match get_config_value(&path, key)? {
            Some(v) => println!("{}", v),
            None => println!("(not set)"),
        },
        (Some(key), Some(val)) => {
            set_config_value(&path, key, val)?;
            println!("{} Set {} = {} (in {})", "✓".green(), key, val, path.display());
        }
    }

    Ok(())
}

/// Set a `section.key` value, keeping the rest of the file as written
fn set_config_value(path: &Path, key: &str, val: &str) -> Result<()> {
    let (section, name) = split_key(key)?;

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    if doc.get(section).is_none() {
        doc[section] = toml_edit::table();
    }
    doc[section][name] = value(parse_toml_value(val));

    let updated = doc.to_string();
    toml::from_str::<Config>(&updated)
        .with_context(|| format!("Invalid value for {}: {}", key, val))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, updated)?;
    Ok(())
}

/// Get a `section.key` value from the file
fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    let (section, name) = split_key(key)?;
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    Ok(doc
        .get(section)
        .and_then(|t| t.get(name))
        .and_then(Item::as_value)
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string().trim().to_string(),
        }))
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    match key.split_once('.') {
        Some((section, name)) if !section.is_empty() && !name.is_empty() && !name.contains('.') => {
            Ok((section, name))
        }
        _ => bail!("Expected section.key, got: {}", key),
    }
}

/// Parse string value to the matching TOML type
fn parse_toml_value(s: &str) -> Value {
    if let Ok(b) = s.parse::<bool>() {
        return Value::from(b);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::from(f);
    }
    Value::from(s)
}
