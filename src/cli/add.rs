//! `pointree add` command
//!
//! Create a point at the root or under a parent.
//!
//! # Usage
//! ```bash
//! pointree add --title "Rust"
//! pointree add --title "Ownership" --parent 1 --description "Moves and borrows"
//! pointree add --title "Lifetimes" --parent 3 --file notes/lifetimes.md
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::{connect, find_point, print_notices, read_description};
use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title of the new point
    #[arg(short, long)]
    pub title: String,

    /// Markdown description
    #[arg(short, long, conflicts_with = "file")]
    pub description: Option<String>,

    /// Read the description from a file
    #[arg(short, long)]
    pub file: Option<String>,

    /// Parent point id (default: new root)
    #[arg(short, long)]
    pub parent: Option<String>,
}

pub async fn run(args: AddArgs, global: &GlobalArgs) -> Result<()> {
    let description = read_description(args.description, args.file.as_deref())?;
    let (mut ws, _) = connect(global).await?;

    let parent = match &args.parent {
        Some(target) => Some(find_point(&mut ws, target).await?.id),
        None => None,
    };

    ws.start_create(parent.clone());
    ws.set_title(&args.title)?;
    if let Some(text) = &description {
        ws.set_description(text)?;
    }

    let result = ws.submit().await;
    print_notices(ws.notices().drain());
    result?;

    match parent {
        Some(id) => println!("{} Created \"{}\" under #{}", "✓".green(), args.title, id),
        None => println!("{} Created root \"{}\"", "✓".green(), args.title),
    }
    Ok(())
}
