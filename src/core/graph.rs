//! Graph projection
//!
//! Turns a subtree snapshot from `GET /points/graph/{id}` into sized nodes and
//! directed edges for a force-directed renderer, and answers node clicks with
//! a detail popup.
//!
//! # Sizing
//! `size = max(min_size, base_size - level * level_decrease)`; with the
//! defaults 30 / 6 / 12 the root is 30 and everything from level 3 down is 12.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::editor::MarkdownRenderer;
use super::point::PointId;
use crate::config::GraphConfig;

/// Text shown in the popup when a point has no description
pub const EMPTY_DESCRIPTION: &str = "No description available.";

// ============== Snapshot (wire) ==============

/// Node of a subtree snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: PointId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Distance from the requested subtree root
    #[serde(default)]
    pub level: u32,
}

/// Parent to child link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: PointId,
    pub target: PointId,
}

/// Subtree snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

// ============== Projection ==============

/// Node size for a depth
pub fn node_size(level: u32, sizing: &GraphConfig) -> f64 {
    let shrunk = sizing.base_size - f64::from(level) * sizing.level_decrease;
    shrunk.max(sizing.min_size)
}

/// Node as handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub id: PointId,
    pub label: String,
    pub size: f64,
    pub level: u32,
}

/// Directed edge as handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub from: PointId,
    pub to: PointId,
}

/// Renderer options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Draw arrow heads parent -> child
    pub directed: bool,
    /// Run the force-directed layout
    pub physics: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            directed: true,
            physics: true,
        }
    }
}

/// Renderer-ready graph plus the id lookup table used on click
#[derive(Debug, Clone, Default)]
pub struct GraphProjection {
    pub root: Option<PointId>,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    details: HashMap<PointId, GraphNode>,
}

impl GraphProjection {
    /// Project a snapshot
    ///
    /// Links that reference unknown nodes are dropped, the renderer would
    /// otherwise invent phantom nodes for them.
    pub fn build(
        root: &PointId,
        snapshot: GraphSnapshot,
        sizing: &GraphConfig,
        unnamed: &str,
    ) -> Self {
        let mut details = HashMap::with_capacity(snapshot.nodes.len());
        let mut nodes = Vec::with_capacity(snapshot.nodes.len());

        for node in snapshot.nodes {
            if details.contains_key(&node.id) {
                continue;
            }
            let label = if node.title.trim().is_empty() {
                unnamed.to_string()
            } else {
                node.title.clone()
            };
            nodes.push(VisualNode {
                id: node.id.clone(),
                label,
                size: node_size(node.level, sizing),
                level: node.level,
            });
            details.insert(node.id.clone(), node);
        }

        let edges = snapshot
            .links
            .into_iter()
            .filter(|l| details.contains_key(&l.source) && details.contains_key(&l.target))
            .map(|l| VisualEdge {
                from: l.source,
                to: l.target,
            })
            .collect();

        Self {
            root: Some(root.clone()),
            nodes,
            edges,
            details,
        }
    }

    /// Snapshot node for an id
    pub fn node(&self, id: &PointId) -> Option<&GraphNode> {
        self.details.get(id)
    }
}

// ============== Rendering ==============

/// Opaque handle returned by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Graph rendering / physics engine
pub trait GraphRenderer {
    fn construct(
        &mut self,
        nodes: &[VisualNode],
        edges: &[VisualEdge],
        options: &RenderOptions,
    ) -> RenderHandle;

    /// Tear down a rendered instance; required before constructing another
    fn destroy(&mut self, handle: RenderHandle);
}

/// Detail popup opened by a node click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPopup {
    pub id: PointId,
    pub title: String,
    /// Rendered HTML, or [`EMPTY_DESCRIPTION`]
    pub body: String,
}

/// Graph view: owns at most one rendered instance and the open popup
#[derive(Debug)]
pub struct GraphView<R: GraphRenderer> {
    renderer: R,
    options: RenderOptions,
    current: Option<(RenderHandle, GraphProjection)>,
    popup: Option<DetailPopup>,
}

impl<R: GraphRenderer> GraphView<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            options: RenderOptions::default(),
            current: None,
            popup: None,
        }
    }

    /// Render a projection, replacing whatever was shown before
    pub fn show(&mut self, projection: GraphProjection) {
        self.close();
        let handle = self
            .renderer
            .construct(&projection.nodes, &projection.edges, &self.options);
        self.current = Some((handle, projection));
    }

    /// Destroy the rendered instance and close the popup
    pub fn close(&mut self) {
        if let Some((handle, _)) = self.current.take() {
            self.renderer.destroy(handle);
        }
        self.popup = None;
    }

    /// Node click notification
    ///
    /// Unknown ids leave the popup untouched.
    pub fn click(&mut self, id: &PointId, markdown: &dyn MarkdownRenderer) -> Option<&DetailPopup> {
        let (_, projection) = self.current.as_ref()?;
        let node = projection.node(id)?;

        let description = node.description.as_deref().unwrap_or("");
        let body = if description.trim().is_empty() {
            EMPTY_DESCRIPTION.to_string()
        } else {
            markdown.render(description)
        };
        let title = projection
            .nodes
            .iter()
            .find(|n| &n.id == id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| node.title.clone());

        self.popup = Some(DetailPopup {
            id: id.clone(),
            title,
            body,
        });
        self.popup.as_ref()
    }

    pub fn popup(&self) -> Option<&DetailPopup> {
        self.popup.as_ref()
    }

    pub fn projection(&self) -> Option<&GraphProjection> {
        self.current.as_ref().map(|(_, p)| p)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
