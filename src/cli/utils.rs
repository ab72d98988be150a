//! CLI utility functions
//!
//! Common helpers shared across commands:
//! - Config loading with command line overrides
//! - Workspace construction against the configured server
//! - Point lookup by id text
//! - Notice printing and delete confirmation

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use super::graph::TextGraphRenderer;
use super::GlobalArgs;
use crate::config::Config;
use crate::core::backend::PointsBackend;
use crate::core::editor::BufferSurface;
use crate::core::notice::{Notice, NoticeKind};
use crate::core::point::Point;
use crate::core::workspace::Workspace;
use crate::remote::PointsClient;

/// Workspace as used by the command line
pub type CliWorkspace<B = PointsClient> = Workspace<B, BufferSurface, TextGraphRenderer>;

/// Load config and apply global overrides
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load_with(global.config.as_deref())?;
    if let Some(url) = &global.server_url {
        config.server.url = url.clone();
    }
    if !config.ui.color {
        colored::control::set_override(false);
    }
    Ok(config)
}

/// Build a workspace without talking to the server
pub fn workspace(global: &GlobalArgs) -> Result<(CliWorkspace, Config)> {
    let config = load_config(global)?;
    let client = PointsClient::from_config(&config.server)?;
    let ws = Workspace::new(
        client,
        BufferSurface::new(),
        TextGraphRenderer::default(),
        &config,
    );
    Ok((ws, config))
}

/// Build a workspace and load the root level
pub async fn connect(global: &GlobalArgs) -> Result<(CliWorkspace, Config)> {
    let (mut ws, config) = workspace(global)?;
    let result = ws.start().await;
    print_notices(ws.notices().drain());
    result.with_context(|| format!("Cannot reach points server at {}", config.server.url))?;
    Ok((ws, config))
}

/// Find a point anywhere in the tree
///
/// # Errors
/// Returns an error if the tree cannot be walked or no point has that id.
pub async fn find_point<B: PointsBackend>(ws: &mut CliWorkspace<B>, target: &str) -> Result<Point> {
    match ws.locate(target).await? {
        Some(point) => Ok(point),
        None => bail!("Point not found: {}", target),
    }
}

/// Read a description from `--file` or fall back to the inline value
pub fn read_description(inline: Option<String>, file: Option<&str>) -> Result<Option<String>> {
    match file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path))?;
            Ok(Some(text))
        }
        None => Ok(inline),
    }
}

/// Print queued notices to stderr
pub fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Success => eprintln!("{} {}", "✓".green(), notice.text),
            NoticeKind::Error => eprintln!("{} {}", "✗".red(), notice.text),
        }
    }
}

/// Ask on the terminal before deleting
pub fn confirm_on_terminal(prompt: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Markdown as plain terminal text, keeping paragraphs and list items apart
pub fn markdown_to_text(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(markdown.len());
    // One entry per open list: next number, or None when bulleted
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::List(start)) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                out.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{}. ", n));
                        *n += 1;
                    }
                    _ => out.push_str("• "),
                }
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph) => {
                out.push('\n');
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Heading(_)) => out.push_str("\n\n"),
            Event::End(TagEnd::CodeBlock) | Event::End(TagEnd::TableRow) => out.push('\n'),
            Event::End(TagEnd::TableCell) => out.push_str("  "),
            Event::TaskListMarker(done) => out.push_str(if done { "[x] " } else { "[ ] " }),
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str("────\n\n"),
            _ => {}
        }
    }
    out.trim_end().to_string()
}
