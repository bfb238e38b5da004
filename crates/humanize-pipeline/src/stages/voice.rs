use async_trait::async_trait;
use humanize_types::PipelineStep;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::context::{PipelineContext, StageOutcome};
use crate::error::HumanizeError;
use crate::traits::TransformStage;

/// Chance that a sentence boundary gets a personal phrase.
pub const PHRASE_PROBABILITY: f64 = 0.3;

/// Interleave the writer's recurring phrases as trailing clauses.
///
/// An empty phrase list returns `text` unchanged. Otherwise the text is cut
/// on periods, empty fragments are dropped and every fragment except the last
/// gets `", <phrase>"` with probability [`PHRASE_PROBABILITY`].
pub fn integrate_phrases<R: Rng>(text: &str, phrases: &[String], rng: &mut R) -> String {
    if phrases.is_empty() {
        return text.to_string();
    }

    let pieces: Vec<&str> = text.split('.').collect();
    let last = pieces.len() - 1;
    let mut fragments = Vec::with_capacity(pieces.len());

    for (index, piece) in pieces.iter().enumerate() {
        let fragment = piece.trim();
        if fragment.is_empty() {
            continue;
        }
        let mut fragment = fragment.to_string();
        if index < last && rng.gen_bool(PHRASE_PROBABILITY) {
            if let Some(phrase) = phrases.choose(rng) {
                fragment.push_str(", ");
                fragment.push_str(phrase);
            }
        }
        fragments.push(fragment);
    }

    let mut joined = fragments.join(". ");
    if !joined.is_empty() && text.trim_end().ends_with('.') {
        joined.push('.');
    }
    joined
}

/// Stochastic personal-voice pass driven by the profile's common phrases.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoiceStage;

impl VoiceStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransformStage for VoiceStage {
    fn step(&self) -> PipelineStep {
        PipelineStep::Voice
    }

    async fn apply(&self, context: &mut PipelineContext) -> Result<StageOutcome, HumanizeError> {
        let PipelineContext {
            current,
            profile,
            rng,
            ..
        } = context;
        let voiced = integrate_phrases(current, &profile.common_phrases, rng);
        let outcome = StageOutcome::from_change(current, &voiced);
        *current = voiced;
        Ok(outcome)
    }
}
