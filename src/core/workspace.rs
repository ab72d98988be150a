//! Workspace - the synchronization engine
//!
//! Ties the directory, tree view, form and graph view to one backend and
//! turns user actions into server calls.
//!
//! # Refresh policy
//! - **Update**: patch the point in place, no refetch
//! - **Create / Delete / Save and Generate**: reload
//!
//! A reload refetches the roots and the children of every node that was
//! expanded, then resets selection, editor and graph view. Expansion survives.
//! After a confirmed mutation the reset happens even if the refetch fails; the
//! old rows then stay on screen and the outcome is [`Outcome::Stale`].
//!
//! Remote failures are turned into a single error notice and returned to the
//! caller; nothing retries.

use std::collections::{HashSet, VecDeque};

use tracing::{info, warn};

use super::backend::PointsBackend;
use super::directory::PointDirectory;
use super::editor::EditorSurface;
use super::error::{SyncError, SyncResult};
use super::form::{EditorSession, Form, Submission};
use super::graph::{DetailPopup, GraphProjection, GraphRenderer, GraphView};
use super::notice::{NoticeBoard, Notifier};
use super::point::{Fields, Point, PointId};
use super::tree::{Toggle, TreeLine, TreeView};
use crate::config::{Config, GraphConfig};
use crate::remote::GenerateContentRequest;

pub const GENERATE_LABEL: &str = "Save and Generate";
pub const GENERATE_BUSY_LABEL: &str = "Generating...";

/// Explicit confirmation gate for destructive actions
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// State of the save-and-generate control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub enabled: bool,
    pub label: &'static str,
}

impl Control {
    const READY: Control = Control {
        enabled: true,
        label: GENERATE_LABEL,
    };
    const BUSY: Control = Control {
        enabled: false,
        label: GENERATE_BUSY_LABEL,
    };
}

/// What an operation did to the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tree and editor were rebuilt from the server
    Reloaded,
    /// One point was patched in place
    Patched,
    Expanded,
    Collapsed,
    /// Generated text went into the editor buffer
    Appended,
    /// A graph instance was rendered
    Rendered,
    /// The change was saved but the view could not be refetched
    Stale,
    /// The confirmation gate said no; nothing was sent
    Declined,
}

/// Browsing and editing session against one backend
pub struct Workspace<B: PointsBackend, S: EditorSurface, R: GraphRenderer> {
    backend: B,
    directory: PointDirectory,
    tree: TreeView,
    form: Form<S>,
    graph: GraphView<R>,
    notices: NoticeBoard,
    control: Control,
    sizing: GraphConfig,
    unnamed: String,
}

impl<B: PointsBackend, S: EditorSurface, R: GraphRenderer> Workspace<B, S, R> {
    pub fn new(backend: B, surface: S, renderer: R, config: &Config) -> Self {
        Self {
            backend,
            directory: PointDirectory::new(),
            tree: TreeView::new(),
            form: Form::new(surface),
            graph: GraphView::new(renderer),
            notices: NoticeBoard::default(),
            control: Control::READY,
            sizing: config.graph.clone(),
            unnamed: config.ui.unnamed_label.clone(),
        }
    }

    // ============== Accessors ==============

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn directory(&self) -> &PointDirectory {
        &self.directory
    }

    pub fn tree(&self) -> &TreeView {
        &self.tree
    }

    pub fn form(&self) -> &Form<S> {
        &self.form
    }

    pub fn session(&self) -> &EditorSession {
        self.form.session()
    }

    pub fn graph(&self) -> &GraphView<R> {
        &self.graph
    }

    pub fn notices(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn generate_control(&self) -> Control {
        self.control
    }

    pub fn unnamed_label(&self) -> &str {
        &self.unnamed
    }

    /// Render the visible tree
    pub fn render_tree(&self) -> Vec<TreeLine> {
        self.tree.render(&self.directory, &self.unnamed)
    }

    /// Look up a known point by id text
    pub fn find(&self, text: &str) -> Option<&Point> {
        self.directory.find_by_text(text)
    }

    /// Normalize a failure into a notice and hand it back
    fn failed(&mut self, message: &str, err: SyncError) -> SyncError {
        warn!(error = %err, "{}", message);
        self.notices.error(message);
        err
    }

    // ============== Loading ==============

    /// Initial load of the root level
    pub async fn start(&mut self) -> SyncResult<()> {
        match self.directory.get_roots(&self.backend).await {
            Ok(roots) => {
                self.tree.set_roots(&roots);
                Ok(())
            }
            Err(e) => Err(self.failed("Failed to load knowledge", e)),
        }
    }

    /// Rebuild the view from the server, keeping expanded nodes expanded
    ///
    /// If the roots cannot be fetched the previous view stays as it was.
    pub async fn reload(&mut self) -> SyncResult<Outcome> {
        self.refresh().await?;
        self.settle();
        info!("view reloaded");
        Ok(Outcome::Reloaded)
    }

    /// Refetch roots and the children of expanded nodes
    ///
    /// Directory and tree are only replaced once the roots arrive.
    async fn refresh(&mut self) -> SyncResult<()> {
        let expanded = self.tree.expanded();
        let mut fresh = PointDirectory::new();

        let roots = match fresh.get_roots(&self.backend).await {
            Ok(roots) => roots,
            Err(e) => return Err(self.failed("Failed to load knowledge", e)),
        };
        self.tree.set_roots(&roots);

        let mut reachable: HashSet<PointId> = roots.into_iter().map(|p| p.id).collect();
        for id in expanded {
            if !reachable.contains(&id) {
                continue;
            }
            match fresh.get_children(&self.backend, &id).await {
                Ok(children) => {
                    self.tree.finish_expand(&id, &children);
                    reachable.extend(children.into_iter().map(|p| p.id));
                }
                Err(e) => {
                    warn!(parent = %id, error = %e, "dropping expansion on reload");
                    self.tree.fail_expand(&id);
                }
            }
        }

        self.directory = fresh;
        self.tree.prune();
        Ok(())
    }

    /// Drop selection, editor session and graph view
    fn settle(&mut self) {
        self.tree.deactivate();
        self.form.reset();
        self.graph.close();
        self.control = Control::READY;
    }

    /// Reset after a write the server accepted, then try to refetch
    ///
    /// The write stands either way, so a failed refetch is not an error.
    async fn after_write(&mut self) -> Outcome {
        self.settle();
        match self.refresh().await {
            Ok(()) => {
                info!("view reloaded");
                Outcome::Reloaded
            }
            Err(_) => Outcome::Stale,
        }
    }

    // ============== Tree ==============

    /// Select a node: activate it, show it, and toggle its expansion
    pub async fn select(&mut self, id: &PointId) -> SyncResult<Outcome> {
        let point = self
            .directory
            .point(id)
            .cloned()
            .ok_or_else(|| SyncError::Validation(format!("Unknown point: {}", id)))?;

        self.tree.activate(id);
        self.form.view(point);

        match self.tree.begin_toggle(id) {
            Toggle::Collapsed => Ok(Outcome::Collapsed),
            Toggle::Fetch => match self.directory.get_children(&self.backend, id).await {
                Ok(children) => {
                    self.tree.finish_expand(id, &children);
                    Ok(Outcome::Expanded)
                }
                Err(e) => {
                    self.tree.fail_expand(id);
                    Err(self.failed("Failed to load children", e))
                }
            },
        }
    }

    /// Activate and show a known point without touching its expansion
    pub fn open(&mut self, id: &PointId) -> SyncResult<()> {
        let point = self
            .directory
            .point(id)
            .cloned()
            .ok_or_else(|| SyncError::Validation(format!("Unknown point: {}", id)))?;
        self.tree.activate(id);
        self.form.view(point);
        Ok(())
    }

    /// Find a point anywhere in the tree by its printed id
    ///
    /// Searches breadth first from the roots, fetching listings into the
    /// directory as it goes. The tree view is not touched.
    pub async fn locate(&mut self, text: &str) -> SyncResult<Option<Point>> {
        if let Some(point) = self.directory.find_by_text(text) {
            return Ok(Some(point.clone()));
        }

        let mut queue: VecDeque<PointId> = match self.directory.get_roots(&self.backend).await {
            Ok(roots) => roots.into_iter().map(|p| p.id).collect(),
            Err(e) => return Err(self.failed("Failed to load knowledge", e)),
        };
        if let Some(point) = self.directory.find_by_text(text) {
            return Ok(Some(point.clone()));
        }

        let mut seen = HashSet::new();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let children = match self.directory.get_children(&self.backend, &id).await {
                Ok(children) => children,
                Err(e) => return Err(self.failed("Failed to load children", e)),
            };
            if let Some(hit) = children.iter().find(|p| p.id.to_string() == text) {
                return Ok(Some(hit.clone()));
            }
            queue.extend(children.into_iter().map(|p| p.id));
        }
        Ok(None)
    }

    // ============== Form ==============

    pub fn start_edit(&mut self) -> SyncResult<()> {
        self.form.start_edit()
    }

    pub fn start_create(&mut self, parent: Option<PointId>) {
        self.form.start_create(parent);
    }

    pub fn cancel(&mut self) {
        self.form.cancel();
    }

    pub fn set_title(&mut self, title: &str) -> SyncResult<()> {
        self.form.set_title(title)
    }

    pub fn set_description(&mut self, description: &str) -> SyncResult<()> {
        self.form.set_description(description)
    }

    pub fn fields(&self) -> Fields {
        self.form.fields()
    }

    // ============== Mutations ==============

    /// Save the form: update in Editing, create in Creating
    ///
    /// On failure the session and the typed fields stay as they were.
    pub async fn submit(&mut self) -> SyncResult<Outcome> {
        match self.form.submission()? {
            Submission::Update(req) => match self.backend.update_point(&req).await {
                Ok(()) => {
                    self.directory.patch(&req.id, &req.title, &req.description);
                    self.form.complete_update(&req);
                    self.notices.success("Saved successfully");
                    info!(id = %req.id, "point updated");
                    Ok(Outcome::Patched)
                }
                Err(e) => Err(self.failed("Failed to update knowledge", e)),
            },
            Submission::Create(req) => match self.backend.create_point(&req).await {
                Ok(()) => {
                    info!(parent = ?req.parent_id, "point created");
                    Ok(self.after_write().await)
                }
                Err(e) => Err(self.failed("Failed to create item", e)),
            },
        }
    }

    /// Delete a point after explicit confirmation
    pub async fn delete(&mut self, id: &PointId, gate: &mut dyn Confirm) -> SyncResult<Outcome> {
        if !gate.confirm("Are you sure you want to delete this item?") {
            return Ok(Outcome::Declined);
        }

        match self.backend.delete_point(id).await {
            Ok(()) => {
                info!(id = %id, "point deleted");
                Ok(self.after_write().await)
            }
            Err(e) => Err(self.failed("Failed to delete item", e)),
        }
    }

    /// Save the form through the generation endpoint
    pub async fn generate_and_save(&mut self) -> SyncResult<Outcome> {
        if !self.control.enabled {
            return Err(SyncError::InvalidState("generating"));
        }

        let req = self.form.generation_request();
        self.control = Control::BUSY;
        self.notices.success("Generating content, please wait...");

        match self.backend.generate_points(&req).await {
            Ok(()) => {
                info!(id = ?req.id, parent = ?req.parent_id, "generated points saved");
                Ok(self.after_write().await)
            }
            Err(e) => {
                self.control = Control::READY;
                Err(self.failed("Failed to generate content", e))
            }
        }
    }

    /// Fetch generated text and append it to the editor buffer
    ///
    /// Needs a non-blank title; without one nothing is sent.
    pub async fn generate_content(&mut self) -> SyncResult<Outcome> {
        if !self.form.session().is_editable() {
            return Err(SyncError::InvalidState(self.form.session().name()));
        }

        let fields = self.form.fields();
        if fields.title.trim().is_empty() {
            self.notices.error("Please enter a title first");
            return Err(SyncError::Validation(
                "A title is required to generate content".to_string(),
            ));
        }

        let req = GenerateContentRequest {
            title: fields.title,
            description: fields.description,
        };
        match self.backend.generate_content(&req).await {
            Ok(content) => {
                self.form.append_generated(&content)?;
                Ok(Outcome::Appended)
            }
            Err(e) => Err(self.failed("Failed to generate content", e)),
        }
    }

    // ============== Graph ==============

    /// Fetch and render the subtree graph rooted at `id`
    pub async fn show_graph(&mut self, id: &PointId) -> SyncResult<Outcome> {
        match self.backend.load_graph(id).await {
            Ok(snapshot) => {
                let projection = GraphProjection::build(id, snapshot, &self.sizing, &self.unnamed);
                self.graph.show(projection);
                Ok(Outcome::Rendered)
            }
            Err(e) => Err(self.failed("Failed to load graph", e)),
        }
    }

    /// Node click inside the graph
    pub fn click_graph_node(&mut self, id: &PointId) -> Option<&DetailPopup> {
        self.graph.click(id, self.form.surface())
    }

    pub fn close_graph(&mut self) {
        self.graph.close();
    }
}
