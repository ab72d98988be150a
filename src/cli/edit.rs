//! `pointree edit` command
//!
//! Change the title or description of an existing point. Fields not given
//! keep their current value.
//!
//! # Usage
//! ```bash
//! pointree edit 5 --title "Borrow checker"
//! pointree edit 5 --file notes/borrowck.md
//! pointree edit 5 --generate              # Append generated text, then save
//! ```

use anyhow::{bail, Result};
use clap::Args;

use super::utils::{connect, find_point, print_notices, read_description};
use super::GlobalArgs;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Point id
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New markdown description
    #[arg(short, long, conflicts_with = "file")]
    pub description: Option<String>,

    /// Read the new description from a file
    #[arg(short, long)]
    pub file: Option<String>,

    /// Append generated text to the description before saving
    #[arg(short, long)]
    pub generate: bool,
}

pub async fn run(args: EditArgs, global: &GlobalArgs) -> Result<()> {
    let description = read_description(args.description, args.file.as_deref())?;
    if args.title.is_none() && description.is_none() && !args.generate {
        bail!("Nothing to change. Pass --title, --description, --file or --generate.");
    }

    let (mut ws, _) = connect(global).await?;
    let point = find_point(&mut ws, &args.id).await?;

    ws.open(&point.id)?;
    ws.start_edit()?;
    if let Some(title) = &args.title {
        ws.set_title(title)?;
    }
    if let Some(text) = &description {
        ws.set_description(text)?;
    }

    if args.generate {
        let result = ws.generate_content().await;
        print_notices(ws.notices().drain());
        result?;
    }

    let result = ws.submit().await;
    print_notices(ws.notices().drain());
    result?;
    Ok(())
}
