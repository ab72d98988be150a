//! pointree CLI - Entry point
//!
//! Usage: pointree <command> [options]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pointree::cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose raises the default to debug
    let default_level = if cli.global.verbose { "warn,pointree=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let global = cli.global;
    match cli.command {
        Commands::Init(args) => pointree::cli::init::run(args, &global),
        Commands::Config(args) => pointree::cli::config::run(args, &global),
        Commands::Ls(args) => pointree::cli::browse::run_ls(args, &global).await,
        Commands::Tree(args) => pointree::cli::browse::run_tree(args, &global).await,
        Commands::Show(args) => pointree::cli::show::run(args, &global).await,
        Commands::Add(args) => pointree::cli::add::run(args, &global).await,
        Commands::Edit(args) => pointree::cli::edit::run(args, &global).await,
        Commands::Rm(args) => pointree::cli::remove::run(args, &global).await,
        Commands::Generate(args) => pointree::cli::generate::run_generate(args, &global).await,
        Commands::Expand(args) => pointree::cli::generate::run_expand(args, &global).await,
        Commands::Graph(args) => pointree::cli::graph::run(args, &global).await,
        Commands::Shell(args) => pointree::cli::shell::run(args, &global).await,
    }
}
