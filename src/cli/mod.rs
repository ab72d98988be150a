//! CLI module - Command definitions and handlers

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod add;
pub mod browse;
pub mod config;
pub mod edit;
pub mod generate;
pub mod graph;
pub mod init;
pub mod remove;
pub mod shell;
pub mod show;
pub mod utils;

/// pointree - browse, edit and visualize a tree of knowledge points
#[derive(Parser, Debug)]
#[command(name = "pointree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "POINTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Points server URL (overrides config)
    #[arg(long, global = true, env = "POINTREE_SERVER_URL")]
    pub server_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a local .pointree/config.toml
    Init(init::InitArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),

    /// List root points or the children of a point
    Ls(browse::LsArgs),

    /// Show the point tree
    Tree(browse::TreeArgs),

    /// Show one point
    Show(show::ShowArgs),

    /// Create a point
    Add(add::AddArgs),

    /// Edit a point's title or description
    Edit(edit::EditArgs),

    /// Delete a point and everything below it
    Rm(remove::RmArgs),

    /// Save through the generator, expanding a topic into a subtree
    Generate(generate::GenerateArgs),

    /// Generate description text for a title without saving
    Expand(generate::ExpandArgs),

    /// Show the subtree graph of a point
    Graph(graph::GraphArgs),

    /// Interactive browsing session
    Shell(shell::ShellArgs),
}
