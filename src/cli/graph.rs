//! `pointree graph` command
//!
//! Fetch the subtree graph of a point and draw it as text. Node sizes shrink
//! with depth the same way a canvas renderer would size them.
//!
//! # Usage
//! ```bash
//! pointree graph 3                # Text drawing
//! pointree graph 3 --open 4       # Plus the detail popup of node 4
//! pointree graph 3 --json         # Renderer-ready nodes and edges
//! ```

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::utils::{markdown_to_text, print_notices, workspace, CliWorkspace};
use super::GlobalArgs;
use crate::core::backend::PointsBackend;
use crate::core::graph::{GraphRenderer, RenderHandle, RenderOptions, VisualEdge, VisualNode};
use crate::core::point::PointId;

/// Renders graphs as indented text
///
/// Keeps the drawing of the live instance until it is destroyed.
#[derive(Debug, Default)]
pub struct TextGraphRenderer {
    next: u64,
    live: Option<(RenderHandle, String)>,
}

impl TextGraphRenderer {
    /// Drawing of the live instance
    pub fn drawing(&self) -> Option<&str> {
        self.live.as_ref().map(|(_, text)| text.as_str())
    }
}

impl GraphRenderer for TextGraphRenderer {
    fn construct(
        &mut self,
        nodes: &[VisualNode],
        edges: &[VisualEdge],
        options: &RenderOptions,
    ) -> RenderHandle {
        self.next += 1;
        let handle = RenderHandle(self.next);
        self.live = Some((handle, draw(nodes, edges, options)));
        handle
    }

    fn destroy(&mut self, handle: RenderHandle) {
        if self.live.as_ref().is_some_and(|(live, _)| *live == handle) {
            self.live = None;
        }
    }
}

/// Lay nodes out depth first from every node without an incoming edge
fn draw(nodes: &[VisualNode], edges: &[VisualEdge], options: &RenderOptions) -> String {
    let by_id: HashMap<&PointId, &VisualNode> = nodes.iter().map(|n| (&n.id, n)).collect();
    let mut children: HashMap<&PointId, Vec<&PointId>> = HashMap::new();
    let mut has_parent: HashSet<&PointId> = HashSet::new();
    for edge in edges {
        children.entry(&edge.from).or_default().push(&edge.to);
        has_parent.insert(&edge.to);
    }

    let connector = if options.directed { "└→ " } else { "└─ " };
    let mut out = String::new();
    let mut seen: HashSet<&PointId> = HashSet::new();
    let mut stack: Vec<(usize, &PointId)> = nodes
        .iter()
        .rev()
        .filter(|n| !has_parent.contains(&n.id))
        .map(|n| (0, &n.id))
        .collect();

    while let Some((depth, id)) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let Some(node) = by_id.get(id) else {
            continue;
        };
        let prefix = if depth == 0 {
            String::new()
        } else {
            format!("{}{}", "   ".repeat(depth - 1), connector)
        };
        out.push_str(&format!(
            "{}● {} (#{}, size {})\n",
            prefix, node.label, node.id, node.size
        ));
        if let Some(kids) = children.get(id) {
            stack.extend(kids.iter().rev().map(|k| (depth + 1, *k)));
        }
    }
    out
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Root point id
    pub id: String,

    /// Open the detail popup of this node
    #[arg(long)]
    pub open: Option<String>,

    /// Output renderer-ready nodes and edges as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct GraphJson<'a> {
    nodes: &'a [VisualNode],
    edges: &'a [VisualEdge],
}

pub async fn run(args: GraphArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, _) = workspace(global)?;
    let root: PointId = args.id.parse()?;

    let result = ws.show_graph(&root).await;
    print_notices(ws.notices().drain());
    result?;

    if args.json {
        if let Some(projection) = ws.graph().projection() {
            let out = GraphJson {
                nodes: &projection.nodes,
                edges: &projection.edges,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        return Ok(());
    }

    print_graph(&ws);
    if let Some(target) = &args.open {
        open_popup(&mut ws, target)?;
    }
    Ok(())
}

/// Print the live drawing
pub fn print_graph<B: PointsBackend>(ws: &CliWorkspace<B>) {
    match ws.graph().renderer().drawing() {
        Some(text) if !text.is_empty() => print!("{}", text),
        _ => println!("(empty graph)"),
    }
}

/// Click a node and print its popup
pub fn open_popup<B: PointsBackend>(ws: &mut CliWorkspace<B>, target: &str) -> Result<()> {
    println!();
    println!("{}", popup_text(ws, target)?);
    Ok(())
}

/// Popup for a node as terminal text; the description is printed from its
/// markdown source rather than the rendered HTML body
fn popup_text<B: PointsBackend>(ws: &mut CliWorkspace<B>, target: &str) -> Result<String> {
    let id: PointId = target.parse()?;
    let Some(popup) = ws.click_graph_node(&id).cloned() else {
        bail!("Node {} is not in the graph", target);
    };
    let body = ws
        .graph()
        .projection()
        .and_then(|p| p.node(&id))
        .and_then(|n| n.description.as_deref())
        .filter(|d| !d.trim().is_empty())
        .map(markdown_to_text)
        .unwrap_or(popup.body);
    Ok(format!(
        "{} {}\n{}\n{}",
        popup.title.bold(),
        format!("#{}", popup.id).dimmed(),
        "─".repeat(40).dimmed(),
        body
    ))
}
