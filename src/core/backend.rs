//! Points backend abstraction
//!
//! The engine talks to storage only through [`PointsBackend`]. The HTTP
//! implementation lives in `crate::remote`.

use async_trait::async_trait;

use super::error::SyncResult;
use super::graph::GraphSnapshot;
use super::point::{Point, PointId};
use crate::remote::{
    CreatePointRequest, GenerateContentRequest, GeneratePointsRequest, UpdatePointRequest,
};

/// Backend trait for point operations
#[async_trait]
pub trait PointsBackend: Send + Sync {
    /// Points without a parent
    async fn list_roots(&self) -> SyncResult<Vec<Point>>;

    /// Direct children of a point
    async fn list_children(&self, id: &PointId) -> SyncResult<Vec<Point>>;

    /// Create a point (the server allocates the id)
    async fn create_point(&self, req: &CreatePointRequest) -> SyncResult<()>;

    /// Replace title and description of a point
    async fn update_point(&self, req: &UpdatePointRequest) -> SyncResult<()>;

    /// Delete a point and its subtree
    async fn delete_point(&self, id: &PointId) -> SyncResult<()>;

    /// Generate a subtree server side and store it
    async fn generate_points(&self, req: &GeneratePointsRequest) -> SyncResult<()>;

    /// Generate description text without storing anything
    async fn generate_content(&self, req: &GenerateContentRequest) -> SyncResult<String>;

    /// Subtree rooted at `id` as nodes and links
    async fn load_graph(&self, id: &PointId) -> SyncResult<GraphSnapshot>;
}

#[cfg(test)]
pub(crate) mod memory {
    //! Scripted in-memory backend for engine tests

    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;
    use crate::core::error::SyncError;
    use crate::core::graph::{GraphLink, GraphNode};

    /// One recorded call
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Roots,
        Children(PointId),
        Create(CreatePointRequest),
        Update(UpdatePointRequest),
        Delete(PointId),
        Generate(GeneratePointsRequest),
        Content(GenerateContentRequest),
        Graph(PointId),
    }

    #[derive(Default)]
    struct Inner {
        points: Vec<Point>,
        next_id: i64,
        calls: Vec<Call>,
        failing: HashSet<&'static str>,
        content: String,
    }

    /// Tree held in memory, with per-operation failure injection
    #[derive(Default)]
    pub struct MemoryBackend {
        inner: Mutex<Inner>,
    }

    impl MemoryBackend {
        pub fn new(points: Vec<Point>) -> Self {
            let next_id = points
                .iter()
                .filter_map(|p| match p.id {
                    PointId::Num(n) => Some(n),
                    PointId::Str(_) => None,
                })
                .max()
                .unwrap_or(0)
                + 1;
            Self {
                inner: Mutex::new(Inner {
                    points,
                    next_id,
                    ..Inner::default()
                }),
            }
        }

        /// Make every call of `op` fail with a 500
        pub fn fail(&self, op: &'static str) {
            self.inner.lock().unwrap().failing.insert(op);
        }

        pub fn heal(&self, op: &'static str) {
            self.inner.lock().unwrap().failing.remove(op);
        }

        pub fn set_generated_content(&self, content: &str) {
            self.inner.lock().unwrap().content = content.to_string();
        }

        pub fn calls(&self) -> Vec<Call> {
            self.inner.lock().unwrap().calls.clone()
        }

        pub fn clear_calls(&self) {
            self.inner.lock().unwrap().calls.clear();
        }

        fn record(&self, op: &'static str, call: Call) -> SyncResult<std::sync::MutexGuard<'_, Inner>> {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(call);
            if inner.failing.contains(op) {
                return Err(SyncError::Server {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
            Ok(inner)
        }
    }

    fn descendants(points: &[Point], root: &PointId) -> HashSet<PointId> {
        let mut out = HashSet::new();
        let mut stack = vec![root.clone()];
        while let Some(id) = stack.pop() {
            if out.insert(id.clone()) {
                stack.extend(
                    points
                        .iter()
                        .filter(|p| p.parent_id.as_ref() == Some(&id))
                        .map(|p| p.id.clone()),
                );
            }
        }
        out
    }

    #[async_trait]
    impl PointsBackend for MemoryBackend {
        async fn list_roots(&self) -> SyncResult<Vec<Point>> {
            let inner = self.record("roots", Call::Roots)?;
            Ok(inner
                .points
                .iter()
                .filter(|p| p.parent_id.is_none())
                .cloned()
                .collect())
        }

        async fn list_children(&self, id: &PointId) -> SyncResult<Vec<Point>> {
            let inner = self.record("children", Call::Children(id.clone()))?;
            Ok(inner
                .points
                .iter()
                .filter(|p| p.parent_id.as_ref() == Some(id))
                .cloned()
                .collect())
        }

        async fn create_point(&self, req: &CreatePointRequest) -> SyncResult<()> {
            let mut inner = self.record("create", Call::Create(req.clone()))?;
            let id = inner.next_id;
            inner.next_id += 1;
            inner.points.push(Point {
                id: PointId::Num(id),
                title: req.title.clone(),
                description: Some(req.description.clone()),
                parent_id: req.parent_id.clone(),
            });
            Ok(())
        }

        async fn update_point(&self, req: &UpdatePointRequest) -> SyncResult<()> {
            let mut inner = self.record("update", Call::Update(req.clone()))?;
            let point = inner
                .points
                .iter_mut()
                .find(|p| p.id == req.id)
                .ok_or(SyncError::Server {
                    status: reqwest::StatusCode::NOT_FOUND,
                })?;
            point.title = req.title.clone();
            point.description = Some(req.description.clone());
            Ok(())
        }

        async fn delete_point(&self, id: &PointId) -> SyncResult<()> {
            let mut inner = self.record("delete", Call::Delete(id.clone()))?;
            let doomed = descendants(&inner.points, id);
            inner.points.retain(|p| !doomed.contains(&p.id));
            Ok(())
        }

        async fn generate_points(&self, req: &GeneratePointsRequest) -> SyncResult<()> {
            let mut inner = self.record("generate", Call::Generate(req.clone()))?;
            let parent = req.id.clone().or_else(|| req.parent_id.clone());
            let id = inner.next_id;
            inner.next_id += 1;
            inner.points.push(Point {
                id: PointId::Num(id),
                title: format!("{} (generated)", req.title),
                description: None,
                parent_id: parent,
            });
            Ok(())
        }

        async fn generate_content(&self, req: &GenerateContentRequest) -> SyncResult<String> {
            let inner = self.record("content", Call::Content(req.clone()))?;
            Ok(inner.content.clone())
        }

        async fn load_graph(&self, id: &PointId) -> SyncResult<GraphSnapshot> {
            let inner = self.record("graph", Call::Graph(id.clone()))?;
            let mut levels: HashMap<PointId, u32> = HashMap::new();
            let mut nodes = Vec::new();
            let mut links = Vec::new();
            let mut frontier = vec![id.clone()];
            levels.insert(id.clone(), 0);
            while let Some(current) = frontier.pop() {
                let level = levels[&current];
                if let Some(p) = inner.points.iter().find(|p| p.id == current) {
                    nodes.push(GraphNode {
                        id: p.id.clone(),
                        title: p.title.clone(),
                        description: p.description.clone(),
                        level,
                    });
                }
                for child in inner
                    .points
                    .iter()
                    .filter(|p| p.parent_id.as_ref() == Some(&current))
                {
                    levels.insert(child.id.clone(), level + 1);
                    links.push(GraphLink {
                        source: current.clone(),
                        target: child.id.clone(),
                    });
                    frontier.push(child.id.clone());
                }
            }
            Ok(GraphSnapshot { nodes, links })
        }
    }
}
