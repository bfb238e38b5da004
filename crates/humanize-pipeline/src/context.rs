use std::future::Future;
use std::time::Duration;

use humanize_types::{PipelineStep, StyleProfile};
use rand::rngs::StdRng;

use crate::error::{HumanizeError, ModelError};

/// Result of a single transform stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    /// Stage changed the text
    Applied,
    /// Stage ran and left the text as it was
    Unchanged,
    /// Stage hit a recoverable condition and kept the pre-stage text
    FellBack(String),
}

impl StageOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StageOutcome::Applied)
    }

    /// Compare before/after text.
    pub fn from_change(before: &str, after: &str) -> Self {
        if before == after {
            StageOutcome::Unchanged
        } else {
            StageOutcome::Applied
        }
    }
}

/// Per-request pipeline state threaded through the transform stages.
///
/// Lives for one request only. Stages read `profile` and rewrite `current`;
/// `original` is kept for the coherence gate.
pub struct PipelineContext {
    /// Request text as received
    pub original: String,
    /// Text after the stages run so far
    pub current: String,
    /// Profile driving the stages
    pub profile: StyleProfile,
    /// Random source for stochastic stages
    pub rng: StdRng,
    /// Upper bound on a single model call
    pub model_timeout: Duration,
    /// Results from each stage, in run order
    pub stage_results: Vec<(PipelineStep, StageOutcome)>,
}

impl PipelineContext {
    pub fn new(
        text: impl Into<String>,
        profile: StyleProfile,
        rng: StdRng,
        model_timeout: Duration,
    ) -> Self {
        let original = text.into();
        Self {
            current: original.clone(),
            original,
            profile,
            rng,
            model_timeout,
            stage_results: Vec::new(),
        }
    }

    /// Record a stage result.
    pub fn record_stage(&mut self, step: PipelineStep, outcome: StageOutcome) {
        self.stage_results.push((step, outcome));
    }

    /// Steps that fell back to their input.
    pub fn fallbacks(&self) -> Vec<PipelineStep> {
        self.stage_results
            .iter()
            .filter(|(_, outcome)| matches!(outcome, StageOutcome::FellBack(_)))
            .map(|(step, _)| *step)
            .collect()
    }
}

/// Run a model call under `limit`, mapping expiry and failure to
/// [`HumanizeError::GenerationFailure`] for `step`.
pub async fn bounded<T, F>(step: PipelineStep, limit: Duration, call: F) -> Result<T, HumanizeError>
where
    F: Future<Output = Result<T, ModelError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(|source| HumanizeError::generation(step, source)),
        Err(_) => Err(HumanizeError::generation(
            step,
            ModelError::Timeout(limit),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_context() -> PipelineContext {
        PipelineContext::new(
            "Hello there.",
            StyleProfile::default(),
            StdRng::seed_from_u64(7),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn new_context_starts_from_original() {
        let ctx = test_context();
        assert_eq!(ctx.original, ctx.current);
        assert!(ctx.stage_results.is_empty());
    }

    #[test]
    fn tracks_fallbacks() {
        let mut ctx = test_context();
        ctx.record_stage(PipelineStep::Structural, StageOutcome::Unchanged);
        ctx.record_stage(
            PipelineStep::Authenticity,
            StageOutcome::FellBack("empty".into()),
        );
        assert_eq!(ctx.fallbacks(), vec![PipelineStep::Authenticity]);
    }

    #[test]
    fn outcome_from_change() {
        assert_eq!(StageOutcome::from_change("a", "a"), StageOutcome::Unchanged);
        assert!(StageOutcome::from_change("a", "b").is_applied());
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_call_times_out() {
        let err = bounded(PipelineStep::Structural, Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ModelError>(())
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            HumanizeError::GenerationFailure {
                step: PipelineStep::Structural,
                source: ModelError::Timeout(_)
            }
        ));
    }

    #[tokio::test]
    async fn bounded_call_maps_model_errors() {
        let err = bounded(PipelineStep::Coherence, Duration::from_secs(1), async {
            Err::<(), _>(ModelError::Request("refused".into()))
        })
        .await
        .unwrap_err();
        assert!(err.to_string().contains("coherence"));
    }
}
