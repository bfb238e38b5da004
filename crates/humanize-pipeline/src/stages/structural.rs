use std::sync::Arc;

use async_trait::async_trait;
use humanize_types::{PipelineStep, StyleProfile};
use tracing::debug;

use crate::context::{bounded, PipelineContext, StageOutcome};
use crate::error::{HumanizeError, ModelError};
use crate::models::{truncate_tokens, GenerationParams, ModelRegistry};
use crate::traits::TransformStage;

const SPLIT_PROMPT: &str = "Rewrite this sentence into 2-3 shorter, natural sentences: ";

/// Splits sentences longer than the profile's length band.
///
/// Sentences inside or below the band pass through untouched; short
/// sentences are not merged.
pub struct StructuralStage {
    models: Arc<ModelRegistry>,
}

impl StructuralStage {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }

    async fn split_sentence(
        &self,
        sentence: &str,
        context: &PipelineContext,
    ) -> Result<String, HumanizeError> {
        let generator = self.models.structural_generator()?;
        let params = GenerationParams::sentence_split();
        let prompt = truncate_tokens(&format!("{SPLIT_PROMPT}{sentence}"), params.max_input_tokens);

        let generated = bounded(
            PipelineStep::Structural,
            context.model_timeout,
            generator.generate(&prompt, &params),
        )
        .await?;

        Ok(choose_split(sentence, &generated))
    }
}

/// Whether a sentence of `word_count` tokens exceeds the profile's band.
pub fn is_overlong(word_count: usize, profile: &StyleProfile) -> bool {
    word_count as f64 > profile.upper_length_bound()
}

/// Period-delimited fragments of generated text, each trimmed and re-terminated.
pub fn split_fragments(generated: &str) -> Vec<String> {
    generated
        .split('.')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{fragment}."))
        .collect()
}

/// The rewrite of `original` to keep, given the generator's output.
///
/// The split is kept only when it has several fragments and no less
/// non-whitespace content than the original; otherwise `original` is
/// returned verbatim.
pub fn choose_split(original: &str, generated: &str) -> String {
    let fragments = split_fragments(generated);
    if fragments.len() > 1 && content_len(&fragments.concat()) >= content_len(original) {
        fragments.join(" ")
    } else {
        original.to_string()
    }
}

fn content_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

#[async_trait]
impl TransformStage for StructuralStage {
    fn step(&self) -> PipelineStep {
        PipelineStep::Structural
    }

    async fn apply(&self, context: &mut PipelineContext) -> Result<StageOutcome, HumanizeError> {
        let parser = self.models.parser()?;
        let doc = tokio::time::timeout(context.model_timeout, parser.parse(&context.current))
            .await
            .map_err(|_| HumanizeError::analysis(ModelError::Timeout(context.model_timeout)))?
            .map_err(HumanizeError::analysis)?;

        if doc.sentences.is_empty() {
            return Ok(StageOutcome::Unchanged);
        }

        let mut sentences = Vec::with_capacity(doc.sentences.len());
        let mut split = 0usize;
        for sentence in &doc.sentences {
            if is_overlong(sentence.word_count(), &context.profile) {
                let rewritten = self.split_sentence(&sentence.text, context).await?;
                if rewritten != sentence.text {
                    split += 1;
                }
                sentences.push(rewritten);
            } else {
                sentences.push(sentence.text.clone());
            }
        }

        let restructured = sentences.join(" ");
        debug!(sentences = doc.sentences.len(), split, "Structural pass done");
        let outcome = StageOutcome::from_change(&context.current, &restructured);
        context.current = restructured;
        Ok(outcome)
    }
}
