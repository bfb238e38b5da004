use async_trait::async_trait;
use humanize_types::PipelineStep;

use crate::context::{PipelineContext, StageOutcome};
use crate::error::HumanizeError;
use crate::traits::TransformStage;

/// AI-flavored terms and their plainer replacements, applied in this order.
///
/// Matching is case-sensitive literal substring matching.
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("utilize", "use"),
    ("facilitate", "help"),
    ("demonstrate", "show"),
    ("implement", "do"),
    ("consequently", "so"),
    ("furthermore", "also"),
    ("nevertheless", "but"),
    ("comprehensive", "complete"),
];

/// Apply [`REPLACEMENTS`] until the text no longer changes.
///
/// Every replacement is shorter than its pattern, so this terminates, and a
/// second application is always a no-op.
pub fn adapt_vocabulary(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = REPLACEMENTS
            .iter()
            .fold(current.clone(), |acc, (pattern, replacement)| {
                acc.replace(pattern, replacement)
            });
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Deterministic lexical substitution.
#[derive(Debug, Default, Clone, Copy)]
pub struct VocabularyStage;

impl VocabularyStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransformStage for VocabularyStage {
    fn step(&self) -> PipelineStep {
        PipelineStep::Vocabulary
    }

    async fn apply(&self, context: &mut PipelineContext) -> Result<StageOutcome, HumanizeError> {
        let adapted = adapt_vocabulary(&context.current);
        let outcome = StageOutcome::from_change(&context.current, &adapted);
        context.current = adapted;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn replaces_listed_terms() {
        assert_eq!(
            adapt_vocabulary("We utilize tools to facilitate work; furthermore it is comprehensive."),
            "We use tools to help work; also it is complete."
        );
    }

    #[test]
    fn matches_inside_words_and_case_sensitively() {
        assert_eq!(adapt_vocabulary("implementation"), "doation");
        assert_eq!(adapt_vocabulary("Utilize"), "Utilize");
    }

    #[test]
    fn replacements_are_shorter_than_patterns() {
        for (pattern, replacement) in REPLACEMENTS {
            assert!(replacement.len() < pattern.len());
        }
    }

    #[test]
    fn repeated_terms_all_replaced() {
        let once = adapt_vocabulary("utilizeutilize, nevertheless utilize");
        assert_eq!(once, "useuse, but use");
        assert_eq!(adapt_vocabulary(&once), once);
    }

    proptest! {
        #[test]
        fn adaptation_is_idempotent(text in "(utilize|facilitate|implement|use|help|do|[a-z ]{0,6}){0,12}") {
            let once = adapt_vocabulary(&text);
            prop_assert_eq!(adapt_vocabulary(&once), once);
        }
    }
}
