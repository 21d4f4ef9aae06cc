//! Shared types for Dayflow
//!
//! Common types used across the workspace: domain models, the unified
//! error system, the action response envelope, and small utilities.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use response::{ActionResponse, Paged};
