//! Model collaborator contracts.
//!
//! The pipeline never talks to a concrete model runtime. Generative rewrite,
//! sentence embedding and linguistic parsing are reached through the traits
//! below, so any backend (HTTP service, local runtime, test double) can be
//! plugged into the [`ModelRegistry`].

mod limit;
mod registry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::nlp::ParsedDoc;

pub use limit::ConcurrencyLimited;
pub use registry::{ModelRegistry, ModelRegistryBuilder};

/// Prompt budget of every generative call, in tokens.
pub const MAX_INPUT_TOKENS: usize = 512;

/// Decoding parameters for a generative call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Prompt is truncated to this many tokens
    pub max_input_tokens: usize,
    /// Upper bound on generated tokens
    pub max_output_tokens: usize,
    /// Beam count (ignored by backends without beam search)
    pub num_beams: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling mass, if any
    pub top_p: Option<f32>,
    /// Sample instead of greedy decoding
    pub do_sample: bool,
}

impl GenerationParams {
    /// Parameters of the sentence-splitting rewrite.
    pub fn sentence_split() -> Self {
        Self {
            max_input_tokens: MAX_INPUT_TOKENS,
            max_output_tokens: 256,
            num_beams: 4,
            temperature: 0.7,
            top_p: None,
            do_sample: true,
        }
    }

    /// Parameters of the authenticity rewrite for a prompt of `prompt_tokens` tokens.
    pub fn authenticity(prompt_tokens: usize) -> Self {
        Self {
            max_input_tokens: MAX_INPUT_TOKENS,
            max_output_tokens: prompt_tokens.min(MAX_INPUT_TOKENS) + 100,
            num_beams: 1,
            temperature: 0.8,
            top_p: Some(0.9),
            do_sample: true,
        }
    }

    /// Temperature to send to backends without a sampling switch.
    pub fn effective_temperature(&self) -> f32 {
        if self.do_sample {
            self.temperature
        } else {
            0.0
        }
    }
}

/// Text-to-text generative model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Name used in logs and health output.
    fn name(&self) -> &str;

    /// Rewrite `prompt` under the given decoding parameters.
    async fn generate(&self, prompt: &str, params: &GenerationParams)
        -> Result<String, ModelError>;
}

/// Text-to-vector embedding model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Name used in logs and health output.
    fn name(&self) -> &str;

    /// Embed `text` into a dense vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError>;
}

/// Sentence segmentation, POS tagging and lemmatization.
#[async_trait]
pub trait LinguisticParser: Send + Sync {
    /// Name used in logs and health output.
    fn name(&self) -> &str;

    /// Parse `text` into sentences of annotated tokens.
    async fn parse(&self, text: &str) -> Result<ParsedDoc, ModelError>;
}

/// Number of whitespace-delimited tokens in `text`.
///
/// Token budgets are approximated with whitespace tokens.
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Keep at most the first `max_tokens` whitespace-delimited tokens of `text`.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> String {
    if count_tokens(text) <= max_tokens {
        return text.to_string();
    }
    text.split_whitespace()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}
