//! Semantic-similarity gate between the original and the rewritten text.

use std::sync::Arc;
use std::time::Duration;

use humanize_types::PipelineStep;
use tracing::{debug, warn};

use crate::context::bounded;
use crate::embedding::cosine_similarity;
use crate::error::{HumanizeError, ModelError};
use crate::models::ModelRegistry;

/// Minimum similarity for a rewrite to be kept.
pub const COHERENCE_THRESHOLD: f64 = 0.85;

/// Decision of the coherence gate.
#[derive(Debug, Clone, PartialEq)]
pub struct CoherenceVerdict {
    /// Text to return to the caller
    pub text: String,
    /// Cosine similarity between original and rewrite
    pub similarity: f64,
    /// Whether the rewrite was discarded
    pub reverted: bool,
}

/// Accept or revert the cumulative rewrite as a whole.
#[derive(Clone)]
pub struct CoherenceGate {
    models: Arc<ModelRegistry>,
    threshold: f64,
}

impl CoherenceGate {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self {
            models,
            threshold: COHERENCE_THRESHOLD,
        }
    }

    /// Compare `original` with `transformed`.
    ///
    /// Identical texts are accepted with similarity 1.0 without calling the
    /// embedder. Below the threshold the original text is returned verbatim.
    pub async fn check(
        &self,
        original: &str,
        transformed: &str,
        timeout: Duration,
    ) -> Result<CoherenceVerdict, HumanizeError> {
        if original == transformed {
            return Ok(CoherenceVerdict {
                text: original.to_string(),
                similarity: 1.0,
                reverted: false,
            });
        }

        let embedder = self.models.embedder()?;
        let (original_vec, transformed_vec) = tokio::try_join!(
            bounded(PipelineStep::Coherence, timeout, embedder.embed(original)),
            bounded(PipelineStep::Coherence, timeout, embedder.embed(transformed)),
        )?;

        let similarity = cosine_similarity(&original_vec, &transformed_vec).ok_or_else(|| {
            HumanizeError::generation(
                PipelineStep::Coherence,
                ModelError::Response(format!(
                    "embedding dimensions differ: {} vs {}",
                    original_vec.len(),
                    transformed_vec.len()
                )),
            )
        })?;
        let similarity = if similarity.is_finite() { similarity } else { 0.0 };

        Ok(self.decide(original, transformed, similarity))
    }

    fn decide(&self, original: &str, transformed: &str, similarity: f64) -> CoherenceVerdict {
        if similarity < self.threshold {
            warn!(
                similarity,
                threshold = self.threshold,
                "Coherence too low, reverting changes"
            );
            CoherenceVerdict {
                text: original.to_string(),
                similarity,
                reverted: true,
            }
        } else {
            debug!(similarity, "Rewrite accepted");
            CoherenceVerdict {
                text: transformed.to_string(),
                similarity,
                reverted: false,
            }
        }
    }
}
