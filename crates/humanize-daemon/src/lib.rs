//! Humanize daemon library
//!
//! This module provides the components of the `humanized` service:
//! - REST API with SSE progress streaming
//! - HTTP model backends (Ollama, OpenAI-compatible)
//! - Configuration loading
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError};
pub use models::build_registry;
pub use server::Server;
