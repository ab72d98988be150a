//! `pointree show` command
//!
//! Show one point with its rendered description.
//!
//! # Usage
//! ```bash
//! pointree show 12            # Title and rendered markdown
//! pointree show 12 --raw      # Markdown source
//! pointree show 12 --json     # As served
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::{connect, find_point, markdown_to_text, CliWorkspace};
use super::GlobalArgs;
use crate::core::backend::PointsBackend;
use crate::core::editor::EditorSurface;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Point id
    pub id: String,

    /// Print the markdown source instead of the rendered text
    #[arg(long)]
    pub raw: bool,

    /// Output as JSON
    #[arg(long, conflicts_with = "raw")]
    pub json: bool,
}

pub async fn run(args: ShowArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, _) = connect(global).await?;
    let point = find_point(&mut ws, &args.id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&point)?);
        return Ok(());
    }

    ws.open(&point.id)?;
    print_session(&ws, args.raw);
    Ok(())
}

/// Print whatever the editor currently shows
pub fn print_session<B: PointsBackend>(ws: &CliWorkspace<B>, raw: bool) {
    let session = ws.session();
    let fields = ws.fields();
    let title = if fields.title.trim().is_empty() {
        ws.unnamed_label().to_string()
    } else {
        fields.title.clone()
    };

    let id = session
        .point()
        .map(|p| format!(" #{}", p.id))
        .unwrap_or_default();
    println!("{}{}", title.bold(), id.dimmed());
    if let Some(parent) = session.point().and_then(|p| p.parent_id.as_ref()) {
        println!("{}", format!("parent #{}", parent).dimmed());
    }
    println!("{}", "─".repeat(40).dimmed());

    let buffer = ws.form().surface().buffer();
    let body = if raw || session.is_editable() {
        buffer
    } else {
        markdown_to_text(&buffer)
    };
    if body.trim().is_empty() {
        println!("{}", "(no description)".dimmed());
    } else {
        println!("{}", body);
    }
}
