//! Remote API types
//!
//! Request and response bodies for the points server.

use serde::{Deserialize, Serialize};

use crate::core::point::PointId;

// ============== Point Mutations ==============

/// Body of `POST /points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePointRequest {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PointId>,
}

/// Body of `PUT /points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePointRequest {
    pub id: PointId,
    pub title: String,
    pub description: String,
}

// ============== Generation ==============

/// Body of `POST /points/generate`
///
/// `parent_id` places a freshly generated subtree; `id` expands an existing
/// point in place. At most one of them is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratePointsRequest {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<PointId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PointId>,
}

/// Body of `POST /generate_content`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub title: String,
    pub description: String,
}

/// Response of `POST /generate_content`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    pub content: String,
}
