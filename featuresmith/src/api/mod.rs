//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! The single functional endpoint is `POST /api/v1/generate`, which runs the
//! whole fetch → generate → persist pipeline for one work item.

pub mod handlers;
pub mod models;
