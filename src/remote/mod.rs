//! Remote server client module
//!
//! Provides the HTTP client for the points server.

mod client;
mod types;

pub use client::PointsClient;
pub use types::*;
