//! Humanize Types - Core data model for the humanization pipeline
//!
//! The pipeline rewrites machine-generated text toward a writer's own style.
//! These types are shared between the pipeline library and the daemon that
//! serves it over HTTP.
//!
//! ## Key Concepts
//!
//! - **StyleProfile**: Statistical fingerprint of a writer's text
//! - **HumanizationRequest**: Text to rewrite plus an optional profile
//! - **PipelineStep**: The fixed sequence of pipeline stages
//! - **ProgressEvent**: Streamed notifications emitted while a request runs

#![deny(unsafe_code)]

pub mod events;
pub mod profile;
pub mod request;

pub use events::{PipelineStep, ProgressEvent};
pub use profile::{StyleProfile, VocabComplexity};
pub use request::HumanizationRequest;
