//! Progress events streamed while a humanization request runs

use crate::StyleProfile;
use serde::{Deserialize, Serialize};

/// Pipeline steps, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Style profile derivation (skipped when a profile is supplied)
    Analyzing,
    /// Sentence-length restructuring
    Structural,
    /// Lexical substitution
    Vocabulary,
    /// Generative naturalness pass
    Authenticity,
    /// Personal phrase integration
    Voice,
    /// Semantic similarity gate
    Coherence,
}

impl PipelineStep {
    /// All steps in the order they run.
    pub const ALL: [PipelineStep; 6] = [
        PipelineStep::Analyzing,
        PipelineStep::Structural,
        PipelineStep::Vocabulary,
        PipelineStep::Authenticity,
        PipelineStep::Voice,
        PipelineStep::Coherence,
    ];

    /// Position of the step in the pipeline (0-based).
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Wire name of the step.
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStep::Analyzing => "analyzing",
            PipelineStep::Structural => "structural",
            PipelineStep::Vocabulary => "vocabulary",
            PipelineStep::Authenticity => "authenticity",
            PipelineStep::Voice => "voice",
            PipelineStep::Coherence => "coherence",
        }
    }

    /// User-facing progress message for the step.
    pub fn message(self) -> &'static str {
        match self {
            PipelineStep::Analyzing => "Analyzing writing patterns...",
            PipelineStep::Structural => "Restructuring sentences...",
            PipelineStep::Vocabulary => "Adapting vocabulary...",
            PipelineStep::Authenticity => "Adding natural imperfections...",
            PipelineStep::Voice => "Integrating personal voice...",
            PipelineStep::Coherence => "Preserving coherence...",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event emitted by the orchestrator.
///
/// Serialized with a `type` tag: `progress`, `complete` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// A stage is about to start
    Progress { step: PipelineStep, message: String },

    /// The pipeline finished
    Complete {
        text: String,
        similarity_score: f64,
        user_patterns: StyleProfile,
    },

    /// The pipeline aborted
    Error { message: String },
}

impl ProgressEvent {
    /// Progress notification for a step.
    pub fn progress(step: PipelineStep) -> Self {
        ProgressEvent::Progress {
            step,
            message: step.message().to_string(),
        }
    }

    /// Error notification.
    pub fn error(message: impl Into<String>) -> Self {
        ProgressEvent::Error {
            message: message.into(),
        }
    }

    /// Whether no further events follow this one.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress { .. })
    }

    /// Step of a progress event.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            ProgressEvent::Progress { step, .. } => Some(*step),
            _ => None,
        }
    }
}
