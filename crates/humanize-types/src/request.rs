//! Humanization request payload

use crate::StyleProfile;
use serde::{Deserialize, Serialize};

/// A request to humanize (or analyze) a piece of text.
///
/// Only `text` is required on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizationRequest {
    /// Text to rewrite
    pub text: String,

    /// Caller identity, informational only
    #[serde(default)]
    pub user_id: String,

    /// Profile to target; analyzed from `text` when absent
    #[serde(default)]
    pub user_patterns: Option<StyleProfile>,

    /// Requested style; only the default pipeline exists
    #[serde(default = "default_target_style")]
    pub target_style: String,

    /// Meaning preservation is enforced by the coherence gate
    #[serde(default = "default_true")]
    pub preserve_meaning: bool,
}

impl HumanizationRequest {
    /// Create a request with default options.
    pub fn new(text: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            user_id: user_id.into(),
            user_patterns: None,
            target_style: default_target_style(),
            preserve_meaning: true,
        }
    }

    /// Supply a precomputed profile, skipping pattern analysis.
    pub fn with_patterns(mut self, profile: StyleProfile) -> Self {
        self.user_patterns = Some(profile);
        self
    }
}

fn default_target_style() -> String {
    "natural".to_string()
}

fn default_true() -> bool {
    true
}
