//! Form state machine
//!
//! Drives the single editor surface through its modes. Every transition
//! computes a fresh [`EditorSession`] value and then re-derives the surface
//! from it; nothing else rebinds the surface.
//!
//! ```text
//!            view                 start_edit
//!   Idle ----------> Viewing(p) ------------> Editing(p)
//!    ^                 ^   ^                      |
//!    |                 |   +------ cancel --------+
//!    |   cancel (no    |  cancel (last viewed)
//!    +-- last viewed)--+----------------------- Creating(parent?)
//!                          start_create (from any state)
//! ```

use super::editor::{EditorSurface, SurfaceMode};
use super::error::{SyncError, SyncResult};
use super::point::{Fields, Point, PointId};
use crate::remote::{CreatePointRequest, GeneratePointsRequest, UpdatePointRequest};

/// The live editor session
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorSession {
    /// Nothing shown
    #[default]
    Idle,
    /// Read-only details with rendered preview
    Viewing { point: Point },
    /// Editing an existing point; `title` is the draft
    Editing { point: Point, title: String },
    /// Creating a new point under `parent` (root when `None`)
    Creating { parent: Option<PointId>, title: String },
}

impl EditorSession {
    pub fn name(&self) -> &'static str {
        match self {
            EditorSession::Idle => "idle",
            EditorSession::Viewing { .. } => "viewing",
            EditorSession::Editing { .. } => "editing",
            EditorSession::Creating { .. } => "creating",
        }
    }

    /// Fields are mutable
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            EditorSession::Editing { .. } | EditorSession::Creating { .. }
        )
    }

    /// Point bound to the session, if any
    pub fn point(&self) -> Option<&Point> {
        match self {
            EditorSession::Viewing { point } | EditorSession::Editing { point, .. } => Some(point),
            _ => None,
        }
    }

    /// Heading shown above the form
    pub fn heading(&self) -> &'static str {
        match self {
            EditorSession::Idle => "",
            EditorSession::Viewing { .. } => "Knowledge Details",
            EditorSession::Editing { .. } => "Edit Knowledge",
            EditorSession::Creating { parent: Some(_), .. } => "Add New Child Knowledge",
            EditorSession::Creating { parent: None, .. } => "Add New Root Knowledge",
        }
    }
}

/// Server call a submit turns into
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Update(UpdatePointRequest),
    Create(CreatePointRequest),
}

/// Join generated text onto an existing description
///
/// Blank descriptions are replaced, anything else gets a blank-line separator.
pub fn append_content(existing: &str, generated: &str) -> String {
    if existing.trim().is_empty() {
        generated.to_string()
    } else {
        format!("{}\n\n{}", existing, generated)
    }
}

/// Form bound to an editor surface
#[derive(Debug)]
pub struct Form<S: EditorSurface> {
    session: EditorSession,
    last_viewed: Option<Point>,
    surface: S,
}

impl<S: EditorSurface> Form<S> {
    pub fn new(mut surface: S) -> Self {
        surface.set_buffer("");
        surface.set_mode(SurfaceMode::Preview);
        Self {
            session: EditorSession::Idle,
            last_viewed: None,
            surface,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn last_viewed(&self) -> Option<&Point> {
        self.last_viewed.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Current field values as the user sees them
    pub fn fields(&self) -> Fields {
        let title = match &self.session {
            EditorSession::Idle => String::new(),
            EditorSession::Viewing { point } => point.title.clone(),
            EditorSession::Editing { title, .. } | EditorSession::Creating { title, .. } => {
                title.clone()
            }
        };
        Fields::new(title, self.surface.buffer())
    }

    /// Install a new session and re-derive the surface from it
    fn enter(&mut self, next: EditorSession) {
        match &next {
            EditorSession::Idle => {
                self.surface.set_mode(SurfaceMode::Preview);
                self.surface.set_buffer("");
            }
            EditorSession::Viewing { point } => {
                self.surface.set_mode(SurfaceMode::Preview);
                self.surface.set_buffer(point.description_text());
            }
            EditorSession::Editing { point, .. } => {
                self.surface.set_buffer(point.description_text());
                self.surface.set_mode(SurfaceMode::Edit);
            }
            EditorSession::Creating { .. } => {
                self.surface.set_buffer("");
                self.surface.set_mode(SurfaceMode::Edit);
            }
        }
        tracing::debug!(from = self.session.name(), to = next.name(), "editor transition");
        self.session = next;
    }

    // ============== Transitions ==============

    /// Any state -> Viewing(point); unsaved edits are dropped
    pub fn view(&mut self, point: Point) {
        self.last_viewed = Some(point.clone());
        self.enter(EditorSession::Viewing { point });
    }

    /// Viewing(point) -> Editing(point)
    pub fn start_edit(&mut self) -> SyncResult<()> {
        let EditorSession::Viewing { point } = &self.session else {
            return Err(SyncError::InvalidState(self.session.name()));
        };
        let next = EditorSession::Editing {
            title: point.title.clone(),
            point: point.clone(),
        };
        self.enter(next);
        Ok(())
    }

    /// Any state -> Creating(parent) with blank fields
    pub fn start_create(&mut self, parent: Option<PointId>) {
        self.enter(EditorSession::Creating {
            parent,
            title: String::new(),
        });
    }

    /// Leave an editable state without saving
    ///
    /// Editing returns to its point, Creating to the last viewed point or
    /// Idle. In other states this does nothing.
    pub fn cancel(&mut self) {
        let next = match &self.session {
            EditorSession::Editing { point, .. } => EditorSession::Viewing {
                point: point.clone(),
            },
            EditorSession::Creating { .. } => match &self.last_viewed {
                Some(point) => EditorSession::Viewing {
                    point: point.clone(),
                },
                None => EditorSession::Idle,
            },
            EditorSession::Idle | EditorSession::Viewing { .. } => return,
        };
        self.enter(next);
    }

    /// Back to Idle and forget the last viewed point
    pub fn reset(&mut self) {
        self.last_viewed = None;
        self.enter(EditorSession::Idle);
    }

    // ============== Field edits ==============

    fn ensure_editable(&self) -> SyncResult<()> {
        if self.session.is_editable() {
            Ok(())
        } else {
            Err(SyncError::InvalidState(self.session.name()))
        }
    }

    pub fn set_title(&mut self, value: &str) -> SyncResult<()> {
        self.ensure_editable()?;
        if let EditorSession::Editing { title, .. } | EditorSession::Creating { title, .. } =
            &mut self.session
        {
            *title = value.to_string();
        }
        Ok(())
    }

    pub fn set_description(&mut self, value: &str) -> SyncResult<()> {
        self.ensure_editable()?;
        self.surface.set_buffer(value);
        Ok(())
    }

    /// Append generated text to the live buffer
    pub fn append_generated(&mut self, generated: &str) -> SyncResult<()> {
        self.ensure_editable()?;
        let joined = append_content(&self.surface.buffer(), generated);
        self.surface.set_buffer(&joined);
        Ok(())
    }

    // ============== Submit ==============

    /// Request a submit in the current state would send
    pub fn submission(&self) -> SyncResult<Submission> {
        let fields = self.fields();
        match &self.session {
            EditorSession::Editing { point, .. } => Ok(Submission::Update(UpdatePointRequest {
                id: point.id.clone(),
                title: fields.title,
                description: fields.description,
            })),
            EditorSession::Creating { parent, .. } => Ok(Submission::Create(CreatePointRequest {
                title: fields.title,
                description: fields.description,
                parent_id: parent.clone(),
            })),
            other => Err(SyncError::InvalidState(other.name())),
        }
    }

    /// Request for save-and-generate from the current fields
    ///
    /// Creating sends its parent, Editing sends the point id, other states
    /// send neither.
    pub fn generation_request(&self) -> GeneratePointsRequest {
        let fields = self.fields();
        let (parent_id, id) = match &self.session {
            EditorSession::Creating { parent, .. } => (parent.clone(), None),
            EditorSession::Editing { point, .. } => (None, Some(point.id.clone())),
            _ => (None, None),
        };
        GeneratePointsRequest {
            title: fields.title,
            description: fields.description,
            parent_id,
            id,
        }
    }

    /// A successful update: show the patched point
    pub fn complete_update(&mut self, req: &UpdatePointRequest) {
        let mut point = match &self.session {
            EditorSession::Editing { point, .. } if point.id == req.id => point.clone(),
            _ => return,
        };
        point.title = req.title.clone();
        point.description = Some(req.description.clone());
        self.view(point);
    }
}
