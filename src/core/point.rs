//! Point - Core data structure
//!
//! A point is one node of the knowledge tree.
//!
//! # Key Properties
//! - **id**: opaque server identifier (string or integer on the wire)
//! - **title**: plain text, blank allowed
//! - **description**: Markdown content, optional
//! - **parent_id**: fixed at creation, there is no reparenting

use serde::{Deserialize, Serialize};

/// Opaque point identifier
///
/// The server owns id allocation. Whatever JSON scalar it hands out is kept
/// verbatim so it can be echoed back in request bodies unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Num(i64),
    Str(String),
}

impl PointId {
    /// Path segment form used in `/points/{id}` style URLs
    pub fn as_segment(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointId::Num(n) => write!(f, "{}", n),
            PointId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl std::str::FromStr for PointId {
    type Err = std::convert::Infallible;

    /// Integers become `Num`, everything else stays a string id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => PointId::Num(n),
            Err(_) => PointId::Str(s.to_string()),
        })
    }
}

impl From<i64> for PointId {
    fn from(n: i64) -> Self {
        PointId::Num(n)
    }
}

impl From<i32> for PointId {
    fn from(n: i32) -> Self {
        PointId::Num(i64::from(n))
    }
}

impl From<&str> for PointId {
    fn from(s: &str) -> Self {
        PointId::Str(s.to_string())
    }
}

/// A knowledge point as served by `GET /points` and `GET /points/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PointId>,
}

impl Point {
    pub fn new(id: impl Into<PointId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            parent_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<PointId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Description text, empty when the server sent none
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Title for display, falling back when blank
    pub fn label<'a>(&'a self, unnamed: &'a str) -> &'a str {
        if self.title.trim().is_empty() {
            unnamed
        } else {
            &self.title
        }
    }
}

/// Title and description being typed into the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub title: String,
    pub description: String,
}

impl Fields {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn from_point(point: &Point) -> Self {
        Self::new(point.title.clone(), point.description_text())
    }
}
