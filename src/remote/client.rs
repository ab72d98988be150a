//! Points server HTTP client
//!
//! Async client for the points API. Responses are judged by status code only;
//! error bodies are never parsed.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::types::*;
use crate::config::ServerConfig;
use crate::core::backend::PointsBackend;
use crate::core::error::{SyncError, SyncResult};
use crate::core::graph::GraphSnapshot;
use crate::core::point::{Point, PointId};

/// HTTP client for the points server
#[derive(Debug, Clone)]
pub struct PointsClient {
    client: Client,
    base_url: Url,
}

impl PointsClient {
    /// Create new client from server config
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        Self::new(&config.url, config.timeout_secs)
    }

    /// Create new client with explicit parameters
    ///
    /// `timeout_secs = None` leaves requests unbounded, the server decides
    /// when a generation call is done.
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid server URL: {}", base_url))?;

        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL below the configured base path
    fn url(&self, segments: &[&str]) -> SyncResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| SyncError::Validation(format!("Invalid server URL: {}", self.base_url)))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// Build `/points/{id}` style URLs with the id as one encoded segment
    fn point_url(&self, prefix: &[&str], id: &PointId) -> SyncResult<Url> {
        let id = id.as_segment();
        let mut segments = prefix.to_vec();
        segments.push(&id);
        self.url(&segments)
    }

    // ============== Helpers ==============

    /// Fail on any non-success status
    fn check_status(resp: Response) -> SyncResult<Response> {
        let status = resp.status();
        if !status.is_success() {
            return Err(SyncError::Server { status });
        }
        Ok(resp)
    }

    /// Check status and deserialize the body
    async fn handle_response<T: DeserializeOwned>(resp: Response) -> SyncResult<T> {
        let resp = Self::check_status(resp)?;
        resp.json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> SyncResult<Response> {
        let resp = builder.send().await.map_err(SyncError::Network)?;
        debug!(status = %resp.status(), url = %resp.url(), "points server replied");
        Ok(resp)
    }
}

#[async_trait]
impl PointsBackend for PointsClient {
    async fn list_roots(&self) -> SyncResult<Vec<Point>> {
        let url = self.url(&["points"])?;
        let resp = self.send(self.client.get(url)).await?;
        Self::handle_response(resp).await
    }

    async fn list_children(&self, id: &PointId) -> SyncResult<Vec<Point>> {
        let url = self.point_url(&["points"], id)?;
        let resp = self.send(self.client.get(url)).await?;
        Self::handle_response(resp).await
    }

    async fn create_point(&self, req: &CreatePointRequest) -> SyncResult<()> {
        let url = self.url(&["points"])?;
        let resp = self.send(self.client.post(url).json(req)).await?;
        Self::check_status(resp).map(|_| ())
    }

    async fn update_point(&self, req: &UpdatePointRequest) -> SyncResult<()> {
        let url = self.url(&["points"])?;
        let resp = self.send(self.client.put(url).json(req)).await?;
        Self::check_status(resp).map(|_| ())
    }

    async fn delete_point(&self, id: &PointId) -> SyncResult<()> {
        let url = self.point_url(&["points"], id)?;
        let resp = self.send(self.client.delete(url)).await?;
        Self::check_status(resp).map(|_| ())
    }

    async fn generate_points(&self, req: &GeneratePointsRequest) -> SyncResult<()> {
        let url = self.url(&["points", "generate"])?;
        let resp = self.send(self.client.post(url).json(req)).await?;
        Self::check_status(resp).map(|_| ())
    }

    async fn generate_content(&self, req: &GenerateContentRequest) -> SyncResult<String> {
        let url = self.url(&["generate_content"])?;
        let resp = self.send(self.client.post(url).json(req)).await?;
        Self::handle_response::<GenerateContentResponse>(resp)
            .await
            .map(|r| r.content)
    }

    async fn load_graph(&self, id: &PointId) -> SyncResult<GraphSnapshot> {
        let url = self.point_url(&["points", "graph"], id)?;
        let resp = self.send(self.client.get(url)).await?;
        Self::handle_response(resp).await
    }
}
