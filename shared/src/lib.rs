//! Shared types for the reservation service
//!
//! Domain models, the unified error system, and the response envelope used
//! by the server and by any client that talks to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
