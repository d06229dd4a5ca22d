//! Axum route handlers.

pub mod generate;
