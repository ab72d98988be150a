//! Tree view state
//!
//! Id -> view-state map for the browsing tree, plus a render-from-state pass
//! that produces indented lines. Point data itself lives in the directory.
//!
//! # Node lifecycle
//! ```text
//! Collapsed --select--> Loading --fetched--> Expanded --select--> Collapsed
//!                          |
//!                          +--fetch failed--> Collapsed
//! ```
//! Collapsing hides children but keeps the last fetched list; expanding again
//! always re-fetches.

use std::collections::{HashMap, HashSet};

use super::directory::PointDirectory;
use super::point::{Point, PointId};

/// Expansion phase of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Collapsed,
    Loading,
    Expanded,
}

/// View state of one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeView {
    pub phase: Phase,
    /// Last fetched children, in server order
    pub children: Option<Vec<PointId>>,
}

/// What selecting a node asks of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The node was expanded and is now collapsed; nothing to fetch
    Collapsed,
    /// The node is loading; fetch its children and report back
    Fetch,
}

/// One rendered line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub id: PointId,
    pub label: String,
    pub phase: Phase,
    pub active: bool,
}

/// Browsing tree
#[derive(Debug, Default)]
pub struct TreeView {
    roots: Vec<PointId>,
    nodes: HashMap<PointId, NodeView>,
    active: Option<PointId>,
}

impl TreeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the root level
    pub fn set_roots(&mut self, roots: &[Point]) {
        self.roots = roots.iter().map(|p| p.id.clone()).collect();
        for id in &self.roots {
            self.nodes.entry(id.clone()).or_default();
        }
    }

    pub fn roots(&self) -> &[PointId] {
        &self.roots
    }

    pub fn node(&self, id: &PointId) -> Option<&NodeView> {
        self.nodes.get(id)
    }

    pub fn phase(&self, id: &PointId) -> Phase {
        self.nodes.get(id).map(|n| n.phase).unwrap_or_default()
    }

    // ============== Selection ==============

    /// Make `id` the only active node
    pub fn activate(&mut self, id: &PointId) {
        self.active = Some(id.clone());
    }

    pub fn active(&self) -> Option<&PointId> {
        self.active.as_ref()
    }

    pub fn is_active(&self, id: &PointId) -> bool {
        self.active.as_ref() == Some(id)
    }

    pub fn deactivate(&mut self) {
        self.active = None;
    }

    // ============== Expansion ==============

    /// Flip a node between collapsed and expanded
    pub fn begin_toggle(&mut self, id: &PointId) -> Toggle {
        let node = self.nodes.entry(id.clone()).or_default();
        match node.phase {
            Phase::Expanded => {
                node.phase = Phase::Collapsed;
                Toggle::Collapsed
            }
            Phase::Collapsed | Phase::Loading => {
                node.phase = Phase::Loading;
                Toggle::Fetch
            }
        }
    }

    /// Children arrived: expand and show them collapsed
    pub fn finish_expand(&mut self, id: &PointId, children: &[Point]) {
        let ids: Vec<PointId> = children.iter().map(|p| p.id.clone()).collect();
        for child in &ids {
            self.nodes.entry(child.clone()).or_default().phase = Phase::Collapsed;
        }
        let node = self.nodes.entry(id.clone()).or_default();
        node.phase = Phase::Expanded;
        node.children = Some(ids);
    }

    /// Fetch failed: back to collapsed, earlier children kept
    pub fn fail_expand(&mut self, id: &PointId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.phase = Phase::Collapsed;
        }
    }

    /// Expanded nodes in display order, parents before children
    pub fn expanded(&self) -> Vec<PointId> {
        let mut out = Vec::new();
        self.walk(|_, id, node| {
            if node.phase == Phase::Expanded {
                out.push(id.clone());
            }
        });
        out
    }

    /// Drop view state of nodes no longer reachable from the roots
    pub fn prune(&mut self) {
        let mut reachable = HashSet::new();
        let mut stack: Vec<PointId> = self.roots.clone();
        while let Some(id) = stack.pop() {
            if !reachable.insert(id.clone()) {
                continue;
            }
            if let Some(children) = self.nodes.get(&id).and_then(|n| n.children.as_ref()) {
                stack.extend(children.iter().cloned());
            }
        }
        self.nodes.retain(|id, _| reachable.contains(id));
        if let Some(active) = &self.active {
            if !reachable.contains(active) {
                self.active = None;
            }
        }
    }

    // ============== Rendering ==============

    /// Visit visible nodes depth first
    fn walk<'a>(&'a self, mut visit: impl FnMut(usize, &'a PointId, &'a NodeView)) {
        let mut stack: Vec<(usize, &PointId)> = self.roots.iter().rev().map(|id| (0, id)).collect();
        let mut seen = HashSet::new();

        while let Some((depth, id)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            visit(depth, id, node);
            if node.phase == Phase::Expanded {
                if let Some(children) = &node.children {
                    stack.extend(children.iter().rev().map(|c| (depth + 1, c)));
                }
            }
        }
    }

    /// Render visible nodes to lines, labels taken from the directory
    pub fn render(&self, directory: &PointDirectory, unnamed: &str) -> Vec<TreeLine> {
        let mut lines = Vec::new();
        self.walk(|depth, id, node| {
            let label = directory
                .point(id)
                .map(|p| p.label(unnamed).to_string())
                .unwrap_or_else(|| unnamed.to_string());
            lines.push(TreeLine {
                depth,
                id: id.clone(),
                label,
                phase: node.phase,
                active: self.is_active(id),
            });
        });
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_roots(ids: &[i64]) -> TreeView {
        let mut tree = TreeView::new();
        let roots: Vec<Point> = ids.iter().map(|&i| Point::new(i, format!("p{}", i))).collect();
        tree.set_roots(&roots);
        tree
    }

    fn toggle(tree: &mut TreeView, id: &PointId) {
        if tree.begin_toggle(id) == Toggle::Fetch {
            tree.finish_expand(id, &[]);
        }
    }

    #[test]
    fn test_toggle_parity() {
        for n in 1..8 {
            let mut tree = tree_with_roots(&[1]);
            let id = PointId::Num(1);
            for _ in 0..n {
                toggle(&mut tree, &id);
            }
            let expected = if n % 2 == 1 {
                Phase::Expanded
            } else {
                Phase::Collapsed
            };
            assert_eq!(tree.phase(&id), expected, "after {} toggles", n);
        }
    }

    #[test]
    fn test_activation_is_exclusive() {
        let mut tree = tree_with_roots(&[1, 2]);
        tree.activate(&PointId::Num(1));
        tree.activate(&PointId::Num(2));

        assert!(tree.is_active(&PointId::Num(2)));
        assert!(!tree.is_active(&PointId::Num(1)));
    }

    #[test]
    fn test_collapse_keeps_children_and_failure_restores() {
        let mut tree = tree_with_roots(&[1]);
        let id = PointId::Num(1);
        tree.begin_toggle(&id);
        tree.finish_expand(&id, &[Point::new(2, "child").with_parent(1)]);

        assert_eq!(tree.begin_toggle(&id), Toggle::Collapsed);
        assert_eq!(tree.node(&id).unwrap().children.as_ref().unwrap().len(), 1);

        assert_eq!(tree.begin_toggle(&id), Toggle::Fetch);
        assert_eq!(tree.phase(&id), Phase::Loading);
        tree.fail_expand(&id);
        assert_eq!(tree.phase(&id), Phase::Collapsed);
        assert_eq!(tree.node(&id).unwrap().children.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_siblings_expand_independently_and_render_in_order() {
        let mut tree = tree_with_roots(&[1, 2]);
        let a = PointId::Num(1);
        let b = PointId::Num(2);
        tree.begin_toggle(&a);
        tree.finish_expand(&a, &[Point::new(10, "a1"), Point::new(11, "a2")]);
        tree.begin_toggle(&b);
        tree.finish_expand(&b, &[Point::new(20, "b1")]);
        tree.activate(&PointId::Num(11));

        let directory = PointDirectory::new();
        let lines = tree.render(&directory, "?");
        let order: Vec<(usize, String)> = lines
            .iter()
            .map(|l| (l.depth, l.id.to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "1".to_string()),
                (1, "10".to_string()),
                (1, "11".to_string()),
                (0, "2".to_string()),
                (1, "20".to_string()),
            ]
        );
        assert!(lines[2].active);
        assert_eq!(tree.expanded(), vec![a, b]);
    }

    #[test]
    fn test_prune_drops_unreachable_and_active() {
        let mut tree = tree_with_roots(&[1, 2]);
        let a = PointId::Num(1);
        tree.begin_toggle(&a);
        tree.finish_expand(&a, &[Point::new(10, "a1")]);
        tree.activate(&PointId::Num(10));

        tree.set_roots(&[Point::new(2, "p2")]);
        tree.prune();

        assert!(tree.node(&a).is_none());
        assert!(tree.node(&PointId::Num(10)).is_none());
        assert!(tree.active().is_none());
    }
}
