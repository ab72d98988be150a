//! Core module - Synchronization engine
//!
//! Keeps a partial view of the server-held point tree consistent with user
//! actions, drives the editor surface, and projects subtrees to graphs.

pub mod backend;
pub mod directory;
pub mod editor;
pub mod error;
pub mod form;
pub mod graph;
pub mod notice;
pub mod point;
pub mod tree;
pub mod workspace;
