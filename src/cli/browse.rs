//! `pointree ls` and `pointree tree` commands
//!
//! Browse the point hierarchy.
//!
//! # Usage
//! ```bash
//! pointree ls                 # List root points
//! pointree ls 12              # List children of point 12
//! pointree ls --json          # Machine readable
//!
//! pointree tree               # Tree, three levels deep
//! pointree tree --depth 5     # Deeper
//! ```

use std::collections::HashSet;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::utils::{connect, find_point, print_notices, CliWorkspace};
use super::GlobalArgs;
use crate::core::directory::Listing;
use crate::core::point::{Point, PointId};
use crate::core::tree::{Phase, TreeLine, TreeView};

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Point whose children to list (default: roots)
    pub id: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct PointRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl PointRow {
    fn new(point: &Point, unnamed: &str) -> Self {
        Self {
            id: point.id.to_string(),
            title: point.label(unnamed).to_string(),
            description: summary(point.description_text(), 60),
        }
    }
}

/// First line of a description, cut to `max` chars
pub fn summary(text: &str, max: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

pub async fn run_ls(args: LsArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, _) = connect(global).await?;

    let key = match &args.id {
        Some(target) => {
            let point = find_point(&mut ws, target).await?;
            let result = ws.select(&point.id).await;
            print_notices(ws.notices().drain());
            result?;
            Listing::Children(point.id)
        }
        None => Listing::Roots,
    };

    let points: Vec<Point> = ws
        .directory()
        .listing(&key)
        .unwrap_or_default()
        .into_iter()
        .cloned()
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    if points.is_empty() {
        match &args.id {
            Some(id) => println!("No children under {}", id),
            None => println!("No points yet. Create one with: pointree add --title \"...\""),
        }
        return Ok(());
    }

    let rows: Vec<PointRow> = points
        .iter()
        .map(|p| PointRow::new(p, ws.unnamed_label()))
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Maximum depth
    #[arg(short, long, default_value = "3")]
    pub depth: usize,
}

pub async fn run_tree(args: TreeArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, _) = connect(global).await?;
    expand_to_depth(&mut ws, args.depth).await?;

    let lines = ws.render_tree();
    if lines.is_empty() {
        println!("No points yet.");
        return Ok(());
    }
    for line in &lines {
        println!("{}", format_line(line, ws.tree()));
    }
    Ok(())
}

/// Expand every visible node above `depth`, level by level
async fn expand_to_depth(ws: &mut CliWorkspace, depth: usize) -> Result<()> {
    let mut visited: HashSet<PointId> = HashSet::new();
    loop {
        let pending: Vec<PointId> = ws
            .render_tree()
            .into_iter()
            .filter(|l| l.depth + 1 < depth && l.phase == Phase::Collapsed)
            .filter(|l| !visited.contains(&l.id))
            .map(|l| l.id)
            .collect();
        if pending.is_empty() {
            return Ok(());
        }
        for id in pending {
            visited.insert(id.clone());
            let result = ws.select(&id).await;
            print_notices(ws.notices().drain());
            result?;
        }
    }
}

/// One tree line with indent, expansion marker and id
pub fn format_line(line: &TreeLine, tree: &TreeView) -> String {
    let leaf = tree
        .node(&line.id)
        .and_then(|n| n.children.as_ref())
        .is_some_and(|c| c.is_empty());
    let marker = match line.phase {
        Phase::Expanded if leaf => "·",
        Phase::Expanded => "▾",
        Phase::Loading => "…",
        Phase::Collapsed => "▸",
    };
    let label = if line.active {
        line.label.bold().cyan().to_string()
    } else {
        line.label.clone()
    };
    format!(
        "{}{} {} {}",
        "  ".repeat(line.depth),
        marker,
        label,
        format!("#{}", line.id).dimmed()
    )
}
