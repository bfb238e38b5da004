//! API request handlers

mod health;
mod humanize;
mod patterns;

pub use health::*;
pub use humanize::*;
pub use patterns::*;
