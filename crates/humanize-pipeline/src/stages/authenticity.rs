use std::sync::Arc;

use async_trait::async_trait;
use humanize_types::PipelineStep;
use tracing::{debug, warn};

use crate::context::{bounded, PipelineContext, StageOutcome};
use crate::error::HumanizeError;
use crate::models::{
    count_tokens, truncate_tokens, GenerationParams, ModelRegistry, MAX_INPUT_TOKENS,
};
use crate::traits::TransformStage;

const AUTHENTICITY_PROMPT: &str =
    "Rewrite this text to sound more natural and human, with minor imperfections: ";

/// Generative rewrite that adds natural variation to the whole text.
pub struct AuthenticityStage {
    models: Arc<ModelRegistry>,
}

impl AuthenticityStage {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }
}

/// Build the (truncated) prompt for `text`.
pub fn authenticity_prompt(text: &str, max_input_tokens: usize) -> String {
    truncate_tokens(&format!("{AUTHENTICITY_PROMPT}{text}"), max_input_tokens)
}

/// Remove any echo of `prompt` from `generated` and trim.
///
/// `None` when nothing usable remains.
pub fn strip_prompt_echo(generated: &str, prompt: &str) -> Option<String> {
    let cleaned = if prompt.is_empty() {
        generated.trim().to_string()
    } else {
        generated.replace(prompt, "").trim().to_string()
    };
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[async_trait]
impl TransformStage for AuthenticityStage {
    fn step(&self) -> PipelineStep {
        PipelineStep::Authenticity
    }

    async fn apply(&self, context: &mut PipelineContext) -> Result<StageOutcome, HumanizeError> {
        let generator = self.models.authenticity_generator()?;
        let prompt = authenticity_prompt(&context.current, MAX_INPUT_TOKENS);
        let params = GenerationParams::authenticity(count_tokens(&prompt));

        let generated = bounded(
            PipelineStep::Authenticity,
            context.model_timeout,
            generator.generate(&prompt, &params),
        )
        .await?;

        match strip_prompt_echo(&generated, &prompt) {
            Some(rewritten) => {
                debug!(
                    model = generator.name(),
                    chars = rewritten.len(),
                    "Authenticity rewrite accepted"
                );
                let outcome = StageOutcome::from_change(&context.current, &rewritten);
                context.current = rewritten;
                Ok(outcome)
            }
            None => {
                let reason = HumanizeError::EmptyResult(PipelineStep::Authenticity);
                warn!(model = generator.name(), %reason, "Keeping pre-injection text");
                Ok(StageOutcome::FellBack(reason.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{self, ScriptedGenerator};
    use humanize_types::StyleProfile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    async fn run_with(
        generator: ScriptedGenerator,
        text: &str,
    ) -> (Result<StageOutcome, HumanizeError>, String) {
        let models = Arc::new(mocks::registry_with(ScriptedGenerator::echo(), generator));
        let stage = AuthenticityStage::new(models);
        let mut ctx = PipelineContext::new(
            text,
            StyleProfile::default(),
            StdRng::seed_from_u64(3),
            Duration::from_secs(5),
        );
        let result = stage.apply(&mut ctx).await;
        (result, ctx.current)
    }

    #[test]
    fn strips_echoed_prompt() {
        let prompt = authenticity_prompt("Hello there.", 512);
        let generated = format!("{prompt} Hi there, I guess.");
        assert_eq!(
            strip_prompt_echo(&generated, &prompt).as_deref(),
            Some("Hi there, I guess.")
        );
    }

    #[test]
    fn empty_after_strip_is_none() {
        let prompt = authenticity_prompt("Hello.", 512);
        assert!(strip_prompt_echo(&prompt, &prompt).is_none());
        assert!(strip_prompt_echo("   ", &prompt).is_none());
    }

    #[test]
    fn prompt_is_truncated_to_input_budget() {
        let text = "word ".repeat(600);
        assert_eq!(count_tokens(&authenticity_prompt(&text, 512)), 512);
    }

    #[tokio::test]
    async fn rewrite_replaces_current_text() {
        let (outcome, current) = run_with(
            ScriptedGenerator::fixed("Honestly, it kinda works."),
            "It works well.",
        )
        .await;
        assert_eq!(outcome.unwrap(), StageOutcome::Applied);
        assert_eq!(current, "Honestly, it kinda works.");
    }

    #[tokio::test]
    async fn empty_generation_falls_back() {
        let (outcome, current) = run_with(ScriptedGenerator::fixed("   "), "It works well.").await;
        assert!(matches!(outcome.unwrap(), StageOutcome::FellBack(_)));
        assert_eq!(current, "It works well.");
    }

    #[tokio::test]
    async fn pure_echo_falls_back() {
        let (outcome, current) = run_with(ScriptedGenerator::echo(), "It works well.").await;
        assert!(matches!(outcome.unwrap(), StageOutcome::FellBack(_)));
        assert_eq!(current, "It works well.");
    }

    #[tokio::test]
    async fn passthrough_is_unchanged() {
        let (outcome, _) = run_with(ScriptedGenerator::passthrough(), "It works well.").await;
        assert_eq!(outcome.unwrap(), StageOutcome::Unchanged);
    }

    #[tokio::test]
    async fn failure_is_not_recovered() {
        let (outcome, current) = run_with(ScriptedGenerator::failing("oom"), "It works well.").await;
        assert!(matches!(
            outcome.unwrap_err(),
            HumanizeError::GenerationFailure {
                step: PipelineStep::Authenticity,
                ..
            }
        ));
        assert_eq!(current, "It works well.");
    }
}
