//! Style analysis: derive a [`StyleProfile`] from a text sample.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use humanize_types::profile::{
    DEFAULT_AVG_SENTENCE_LENGTH, DEFAULT_AVG_WORD_LENGTH, DEFAULT_SENTENCE_LENGTH_STD,
    DEFAULT_UNIQUE_WORD_RATIO, SENTENCE_LENGTH_SAMPLE_LIMIT, SENTENCE_STRUCTURE_LIMIT,
};
use humanize_types::{StyleProfile, VocabComplexity};
use tracing::debug;

use crate::error::{HumanizeError, ModelError};
use crate::models::ModelRegistry;
use crate::nlp::ParsedDoc;

/// Sentences inspected for structure templates.
const STRUCTURE_WINDOW: usize = 20;

/// Derives writing-style profiles through the registry's parser.
#[derive(Clone)]
pub struct StyleAnalyzer {
    models: Arc<ModelRegistry>,
}

impl StyleAnalyzer {
    pub fn new(models: Arc<ModelRegistry>) -> Self {
        Self { models }
    }

    /// Parse `text` and compute its profile.
    ///
    /// A missing parser is [`HumanizeError::ModelUnavailable`]; a parser error
    /// or a parse exceeding `timeout` is [`HumanizeError::AnalysisFailure`].
    pub async fn analyze(
        &self,
        text: &str,
        timeout: Option<Duration>,
    ) -> Result<StyleProfile, HumanizeError> {
        let parser = self.models.parser()?;
        let parse = parser.parse(text);
        let doc = match timeout {
            Some(limit) => tokio::time::timeout(limit, parse)
                .await
                .map_err(|_| HumanizeError::analysis(ModelError::Timeout(limit)))?,
            None => parse.await,
        }
        .map_err(HumanizeError::analysis)?;

        let profile = profile_from_doc(&doc);
        debug!(
            parser = parser.name(),
            sentences = doc.sentences.len(),
            avg_sentence_length = profile.avg_sentence_length,
            "Style profile computed"
        );
        Ok(profile)
    }
}

/// Compute a profile from an already parsed document.
///
/// Deterministic; empty documents get the documented defaults.
pub fn profile_from_doc(doc: &ParsedDoc) -> StyleProfile {
    let lengths: Vec<usize> = doc.sentences.iter().map(|s| s.word_count()).collect();
    let (avg_sentence_length, sentence_length_std) = length_stats(&lengths);

    let sentence_structures = doc
        .sentences
        .iter()
        .take(STRUCTURE_WINDOW)
        .map(|sentence| sentence.structure())
        .take(SENTENCE_STRUCTURE_LIMIT)
        .collect();

    StyleProfile {
        avg_sentence_length,
        sentence_length_std,
        sentence_length_sample: lengths
            .iter()
            .copied()
            .take(SENTENCE_LENGTH_SAMPLE_LIMIT)
            .collect(),
        vocab_complexity: vocab_complexity(doc),
        sentence_structures,
        common_phrases: Vec::new(),
    }
}

/// Mean and population standard deviation.
fn length_stats(lengths: &[usize]) -> (f64, f64) {
    if lengths.is_empty() {
        return (DEFAULT_AVG_SENTENCE_LENGTH, DEFAULT_SENTENCE_LENGTH_STD);
    }
    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<usize>() as f64 / n;
    let variance = lengths
        .iter()
        .map(|&len| {
            let diff = len as f64 - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

fn vocab_complexity(doc: &ParsedDoc) -> VocabComplexity {
    let mut pos_distribution = BTreeMap::new();
    let mut alpha_count = 0usize;
    let mut alpha_chars = 0usize;
    let mut lemmas = HashSet::new();

    for token in doc.tokens() {
        *pos_distribution
            .entry(token.pos.as_str().to_string())
            .or_insert(0) += 1;
        if token.is_alpha {
            alpha_count += 1;
            alpha_chars += token.text.chars().count();
            lemmas.insert(token.lemma.as_str());
        }
    }

    if alpha_count == 0 {
        return VocabComplexity {
            avg_word_length: DEFAULT_AVG_WORD_LENGTH,
            pos_distribution,
            unique_word_ratio: DEFAULT_UNIQUE_WORD_RATIO,
        };
    }

    VocabComplexity {
        avg_word_length: alpha_chars as f64 / alpha_count as f64,
        pos_distribution,
        unique_word_ratio: lemmas.len() as f64 / alpha_count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::RuleParser;

    fn analyzer() -> StyleAnalyzer {
        let models = ModelRegistry::builder()
            .parser(Arc::new(RuleParser::new()))
            .build();
        StyleAnalyzer::new(Arc::new(models))
    }

    #[tokio::test]
    async fn whitespace_input_gets_defaults() {
        let profile = analyzer().analyze("   \n ", None).await.unwrap();
        assert_eq!(profile.avg_sentence_length, 15.0);
        assert_eq!(profile.sentence_length_std, 5.0);
        assert_eq!(profile.vocab_complexity.avg_word_length, 5.0);
        assert_eq!(profile.vocab_complexity.unique_word_ratio, 0.5);
        assert!(profile.sentence_length_sample.is_empty());
        assert!(profile.sentence_structures.is_empty());
    }

    #[tokio::test]
    async fn computes_length_statistics() {
        let profile = analyzer()
            .analyze("One two three four. One two.", None)
            .await
            .unwrap();
        assert_eq!(profile.sentence_length_sample, vec![4, 2]);
        assert_eq!(profile.avg_sentence_length, 3.0);
        assert_eq!(profile.sentence_length_std, 1.0);
    }

    #[tokio::test]
    async fn vocabulary_statistics() {
        let profile = analyzer().analyze("Cats chase cats.", None).await.unwrap();
        let vocab = &profile.vocab_complexity;
        // chase/cat over three alphabetic tokens
        assert!((vocab.unique_word_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert!((vocab.avg_word_length - 13.0 / 3.0).abs() < 1e-9);
        assert_eq!(vocab.pos_distribution.get("PUNCT"), Some(&1));
        assert_eq!(vocab.pos_distribution.values().sum::<usize>(), 4);
    }

    #[tokio::test]
    async fn caps_samples_and_structures() {
        let text = "We ship code. ".repeat(60);
        let profile = analyzer().analyze(&text, None).await.unwrap();
        assert_eq!(profile.sentence_length_sample.len(), 50);
        assert_eq!(profile.sentence_structures.len(), 10);
        assert_eq!(profile.sentence_structures[0], "PRON VERB NOUN PUNCT");
    }

    #[tokio::test]
    async fn missing_parser_is_unavailable() {
        let analyzer = StyleAnalyzer::new(Arc::new(ModelRegistry::default()));
        let err = analyzer.analyze("text", None).await.unwrap_err();
        assert!(matches!(err, HumanizeError::ModelUnavailable(_)));
    }

    #[test]
    fn analysis_is_deterministic() {
        let doc = RuleParser::new().parse_text("A short one. And then a much longer sentence follows it.");
        assert_eq!(profile_from_doc(&doc), profile_from_doc(&doc));
    }
}
