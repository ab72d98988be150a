//! `pointree shell` command
//!
//! Line-oriented browsing session. One workspace lives for the whole session,
//! so expansion, selection and the open editor carry over between commands.
//!
//! # Usage
//! ```text
//! pointree> tree
//! pointree> select 1          # view and expand/collapse
//! pointree> new 1             # create under 1
//! pointree> title Lifetimes
//! pointree> desc Named regions\nof code
//! pointree> expand            # append generated text
//! pointree> save
//! pointree> graph 1
//! pointree> click 3
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use super::browse::format_line;
use super::graph::{open_popup, print_graph};
use super::show::print_session;
use super::utils::{confirm_on_terminal, connect, print_notices, CliWorkspace};
use super::GlobalArgs;
use crate::core::backend::PointsBackend;
use crate::core::point::PointId;
use crate::core::workspace::{Confirm, Outcome};

const HELP: &str = "\
Browsing
  tree | ls            show the tree
  select <id>          view a point and toggle its expansion
  show [--raw]         print the editor
  reload               refetch everything
Editing
  edit                 edit the viewed point
  new [parent]         start a new point (root without parent)
  title <text>         set the title
  desc <text>          set the description (\\n for newlines)
  expand               append generated text to the description
  save                 save the form
  gen                  save through the generator
  cancel               leave edit/create
  rm [id]              delete a point (default: active)
Graph
  graph [id]           draw the subtree (default: active)
  click <id>           open a node's details
  close                close the graph
Session
  help                 this text
  quit | exit";

#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Don't print the tree on start
    #[arg(short, long)]
    pub quiet: bool,
}

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub async fn run(args: ShellArgs, global: &GlobalArgs) -> Result<()> {
    let (mut ws, config) = connect(global).await?;
    println!(
        "Connected to {}. Type {} for commands.",
        config.server.url.cyan(),
        "help".bold()
    );
    if !args.quiet {
        print_tree(&ws);
    }

    let stdin = io::stdin();
    let mut gate = |prompt: &str| confirm_on_terminal(prompt);
    loop {
        print!("{} ", "pointree>".green());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = dispatch(&mut ws, line, &mut gate).await;
        print_notices(ws.notices().drain());
        match result {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("{} {}", "error:".red(), e),
        }
    }
    Ok(())
}

fn print_tree<B: PointsBackend>(ws: &CliWorkspace<B>) {
    let lines = ws.render_tree();
    if lines.is_empty() {
        println!("(no points)");
    }
    for line in &lines {
        println!("{}", format_line(line, ws.tree()));
    }
}

/// Point named on the line, or the active one
fn target<B: PointsBackend>(ws: &CliWorkspace<B>, arg: &str) -> Result<PointId> {
    if !arg.is_empty() {
        return match ws.find(arg) {
            Some(point) => Ok(point.id.clone()),
            None => bail!("Unknown point {} (expand its parent first)", arg),
        };
    }
    match ws.tree().active() {
        Some(id) => Ok(id.clone()),
        None => bail!("No point selected"),
    }
}

async fn dispatch<B: PointsBackend>(
    ws: &mut CliWorkspace<B>,
    line: &str,
    gate: &mut dyn Confirm,
) -> Result<Flow> {
    let (cmd, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let arg = arg.trim();

    match cmd {
        "help" | "?" => println!("{}", HELP),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "tree" | "ls" => print_tree(ws),
        "reload" => {
            ws.reload().await?;
            print_tree(ws);
        }
        "select" | "s" => {
            let id = target(ws, arg)?;
            ws.select(&id).await?;
            print_tree(ws);
        }
        "show" => print_session(ws, arg == "--raw"),
        "edit" => {
            ws.start_edit()?;
            print_session(ws, true);
        }
        "new" => {
            let parent = if arg.is_empty() {
                None
            } else {
                Some(target(ws, arg)?)
            };
            ws.start_create(parent);
            println!("{}", ws.session().heading().bold());
        }
        "title" => ws.set_title(arg)?,
        "desc" => ws.set_description(&arg.replace("\\n", "\n"))?,
        "expand" => {
            ws.generate_content().await?;
            print_session(ws, true);
        }
        "save" | "submit" => {
            if ws.submit().await? == Outcome::Reloaded {
                print_tree(ws);
            }
        }
        "gen" => {
            println!("{}", ws.generate_control().label.dimmed());
            ws.generate_and_save().await?;
            print_tree(ws);
        }
        "cancel" => ws.cancel(),
        "rm" => {
            let id = target(ws, arg)?;
            if ws.delete(&id, gate).await? == Outcome::Reloaded {
                print_tree(ws);
            }
        }
        "graph" => {
            let id = target(ws, arg)?;
            ws.show_graph(&id).await?;
            print_graph(ws);
        }
        "click" => open_popup(ws, arg)?,
        "close" => ws.close_graph(),
        other => bail!("Unknown command: {} (try help)", other),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::backend::memory::{Call, MemoryBackend};
    use crate::core::editor::BufferSurface;
    use crate::core::form::EditorSession;
    use crate::core::point::Point;
    use crate::core::workspace::Workspace;
    use crate::cli::graph::TextGraphRenderer;

    async fn workspace() -> CliWorkspace<MemoryBackend> {
        let backend = MemoryBackend::new(vec![
            Point::new(1, "Rust"),
            Point::new(2, "Ownership").with_parent(1),
            Point::new(3, "Borrowing").with_description("**shared**").with_parent(2),
        ]);
        let mut ws = Workspace::new(
            backend,
            BufferSurface::new(),
            TextGraphRenderer::default(),
            &Config::default(),
        );
        ws.start().await.unwrap();
        ws
    }

    async fn run_lines(ws: &mut CliWorkspace<MemoryBackend>, lines: &[&str]) -> Result<()> {
        let mut accept = |_: &str| true;
        for line in lines {
            dispatch(ws, line, &mut accept).await?;
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_create_under_selected_parent() -> Result<()> {
        let mut ws = workspace().await;
        run_lines(&mut ws, &["select 1", "new 1", "title Lifetimes", "desc a\\nb", "save"]).await?;

        let created = ws
            .backend()
            .calls()
            .into_iter()
            .find_map(|c| match c {
                Call::Create(req) => Some(req),
                _ => None,
            })
            .unwrap();
        assert_eq!(created.title, "Lifetimes");
        assert_eq!(created.description, "a\nb");
        assert_eq!(created.parent_id, Some(PointId::Num(1)));
        assert_eq!(ws.session(), &EditorSession::Idle);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_point_until_parent_expanded() -> Result<()> {
        let mut ws = workspace().await;
        assert!(run_lines(&mut ws, &["select 2"]).await.is_err());

        run_lines(&mut ws, &["select 1", "select 2"]).await?;
        assert!(ws.tree().is_active(&PointId::Num(2)));
        Ok(())
    }

    #[tokio::test]
    async fn test_graph_click_and_close() -> Result<()> {
        let mut ws = workspace().await;
        run_lines(&mut ws, &["graph 1", "click 3"]).await?;
        assert_eq!(ws.graph().popup().unwrap().title, "Borrowing");

        run_lines(&mut ws, &["close"]).await?;
        assert!(ws.graph().projection().is_none());
        assert!(ws.graph().renderer().drawing().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_rm_active_point() -> Result<()> {
        let mut ws = workspace().await;
        run_lines(&mut ws, &["select 1", "rm"]).await?;
        assert_eq!(ws.backend().calls().last(), Some(&Call::Roots));
        assert!(ws.render_tree().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_quit_and_unknown_commands() -> Result<()> {
        let mut ws = workspace().await;
        let mut accept = |_: &str| true;
        assert_eq!(dispatch(&mut ws, "quit", &mut accept).await?, Flow::Quit);
        assert!(dispatch(&mut ws, "frobnicate", &mut accept).await.is_err());
        Ok(())
    }
}
