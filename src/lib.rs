//! pointree - interactive client for a hierarchical knowledge base
//!
//! Points form an arbitrarily deep tree held by a server. This crate keeps a
//! partially fetched view of that tree in sync with what the user does.
//!
//! ## Key Concepts
//!
//! - **Point**: title + markdown description, children fetched on demand
//! - **Tree view**: per-node expansion, one active node
//! - **Editor session**: Idle / Viewing / Editing / Creating over one surface
//! - **Graph projection**: subtree as sized nodes and directed edges

pub mod cli;
pub mod config;
pub mod core;
pub mod remote;

pub use core::error::{SyncError, SyncResult};
pub use core::point::{Point, PointId};
pub use core::workspace::{Outcome, Workspace};
pub use remote::PointsClient;
