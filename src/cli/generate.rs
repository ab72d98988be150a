//! `pointree generate` and `pointree expand` commands
//!
//! Both talk to the server's generator.
//!
//! - `generate` saves: it creates a new point (or re-saves an existing one)
//!   and lets the server expand it into a subtree.
//! - `expand` only asks for description text and prints it. Nothing is saved.
//!
//! # Usage
//! ```bash
//! pointree generate --title "Async Rust"                 # New root topic
//! pointree generate --title "Pinning" --parent 4         # Under a parent
//! pointree generate --id 4                                # Regenerate below 4
//!
//! pointree expand --title "Futures"
//! pointree expand --title "Futures" --description "Start with poll"
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::{connect, find_point, print_notices, workspace};
use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Title of the topic
    #[arg(short, long, required_unless_present = "id")]
    pub title: Option<String>,

    /// Markdown description to seed the generator
    #[arg(short, long)]
    pub description: Option<String>,

    /// Parent for a new topic (default: new root)
    #[arg(short, long, conflicts_with = "id")]
    pub parent: Option<String>,

    /// Existing point to generate under
    #[arg(long)]
    pub id: Option<String>,
}

pub async fn run_generate(args: GenerateArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, _) = connect(global).await?;

    if let Some(target) = &args.id {
        let point = find_point(&mut ws, target).await?;
        ws.open(&point.id)?;
        ws.start_edit()?;
    } else {
        let parent = match &args.parent {
            Some(target) => Some(find_point(&mut ws, target).await?.id),
            None => None,
        };
        ws.start_create(parent);
    }

    if let Some(title) = &args.title {
        ws.set_title(title)?;
    }
    if let Some(text) = &args.description {
        ws.set_description(text)?;
    }

    let title = ws.fields().title;
    println!("{}", ws.generate_control().label.dimmed());
    let result = ws.generate_and_save().await;
    print_notices(ws.notices().drain());
    result?;

    println!("{} Generated points for \"{}\"", "✓".green(), title);
    Ok(())
}

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Title to generate text for
    #[arg(short, long)]
    pub title: String,

    /// Existing text; generated text is appended after it
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Generated text goes to stdout so it can be piped into a file
pub async fn run_expand(args: ExpandArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, _) = workspace(global)?;

    ws.start_create(None);
    ws.set_title(&args.title)?;
    if let Some(text) = &args.description {
        ws.set_description(text)?;
    }

    let result = ws.generate_content().await;
    print_notices(ws.notices().drain());
    result?;

    println!("{}", ws.fields().description);
    Ok(())
}
