//! REST endpoints with SSE progress streaming

pub mod handlers;
pub mod router;
pub mod state;

pub use state::AppState;
