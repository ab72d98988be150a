//! `pointree rm` command
//!
//! Delete a point. The server removes its whole subtree.
//!
//! # Usage
//! ```bash
//! pointree rm 7               # Asks first
//! pointree rm 7 --force       # No prompt
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::{confirm_on_terminal, connect, find_point, print_notices};
use super::GlobalArgs;
use crate::core::workspace::Outcome;

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Point id
    pub id: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

pub async fn run(args: RmArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, _) = connect(global).await?;
    let point = find_point(&mut ws, &args.id).await?;

    println!(
        "{} #{} \"{}\"",
        "Deleting".yellow(),
        point.id,
        point.label(ws.unnamed_label())
    );

    let force = args.force;
    let mut gate = |prompt: &str| force || confirm_on_terminal(prompt);
    let result = ws.delete(&point.id, &mut gate).await;
    print_notices(ws.notices().drain());

    match result? {
        Outcome::Declined => println!("Cancelled."),
        _ => println!("{} Deleted #{}", "✓".green(), point.id),
    }
    Ok(())
}
