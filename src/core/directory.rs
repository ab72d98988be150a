//! Point directory
//!
//! On-demand fetch of roots and children, keyed by parent. Every successful
//! fetch replaces the list held for that key; a failed fetch leaves it alone.
//! Each point seen is also indexed by id.

use std::collections::HashMap;

use tracing::debug;

use super::backend::PointsBackend;
use super::error::SyncResult;
use super::point::{Point, PointId};

/// Listing key: the root level or one point's children
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Listing {
    Roots,
    Children(PointId),
}

/// Session cache of fetched listings
#[derive(Debug, Default)]
pub struct PointDirectory {
    listings: HashMap<Listing, Vec<PointId>>,
    points: HashMap<PointId, Point>,
}

impl PointDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch root points, replacing the held root listing
    pub async fn get_roots(&mut self, backend: &dyn PointsBackend) -> SyncResult<Vec<Point>> {
        let roots = backend.list_roots().await?;
        debug!(count = roots.len(), "fetched roots");
        self.store(Listing::Roots, &roots);
        Ok(roots)
    }

    /// Fetch children of `id`, replacing the held listing for it
    pub async fn get_children(
        &mut self,
        backend: &dyn PointsBackend,
        id: &PointId,
    ) -> SyncResult<Vec<Point>> {
        let children = backend.list_children(id).await?;
        debug!(parent = %id, count = children.len(), "fetched children");
        self.store(Listing::Children(id.clone()), &children);
        Ok(children)
    }

    fn store(&mut self, key: Listing, points: &[Point]) {
        let ids = points.iter().map(|p| p.id.clone()).collect();
        for point in points {
            self.points.insert(point.id.clone(), point.clone());
        }
        self.listings.insert(key, ids);
    }

    /// Last fetched listing, if any
    pub fn listing(&self, key: &Listing) -> Option<Vec<&Point>> {
        self.listings
            .get(key)
            .map(|ids| ids.iter().filter_map(|id| self.points.get(id)).collect())
    }

    pub fn point(&self, id: &PointId) -> Option<&Point> {
        self.points.get(id)
    }

    /// Find a point by its printed id, e.g. as typed on the command line
    pub fn find_by_text(&self, text: &str) -> Option<&Point> {
        self.points.values().find(|p| p.id.to_string() == text)
    }

    /// Apply a local title/description patch after a confirmed update
    pub fn patch(&mut self, id: &PointId, title: &str, description: &str) -> Option<&Point> {
        let point = self.points.get_mut(id)?;
        point.title = title.to_string();
        point.description = Some(description.to_string());
        Some(point)
    }
}
