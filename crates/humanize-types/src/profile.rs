//! Writing-style profile types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Average sentence length assumed when a text has no sentences.
pub const DEFAULT_AVG_SENTENCE_LENGTH: f64 = 15.0;

/// Sentence length deviation assumed when a text has no sentences.
pub const DEFAULT_SENTENCE_LENGTH_STD: f64 = 5.0;

/// Average word length assumed when a text has no alphabetic words.
pub const DEFAULT_AVG_WORD_LENGTH: f64 = 5.0;

/// Lexical diversity assumed when a text has no alphabetic words.
pub const DEFAULT_UNIQUE_WORD_RATIO: f64 = 0.5;

/// Maximum number of sentence lengths kept in a profile.
pub const SENTENCE_LENGTH_SAMPLE_LIMIT: usize = 50;

/// Maximum number of sentence structure templates kept in a profile.
pub const SENTENCE_STRUCTURE_LIMIT: usize = 10;

/// Statistical and structural fingerprint of a writer's text.
///
/// Produced fresh per request by the style analyzer or supplied by the
/// caller. Every field has a default so that partial caller-supplied
/// profiles still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Mean sentence length in whitespace-delimited tokens
    #[serde(default = "default_avg_sentence_length")]
    pub avg_sentence_length: f64,

    /// Population standard deviation of sentence lengths
    #[serde(default = "default_sentence_length_std")]
    pub sentence_length_std: f64,

    /// Lengths of the first sentences of the sample
    #[serde(default, alias = "sentence_lengths")]
    pub sentence_length_sample: Vec<usize>,

    /// Vocabulary statistics
    #[serde(default)]
    pub vocab_complexity: VocabComplexity,

    /// Space-joined part-of-speech sequences of the first sentences
    #[serde(default)]
    pub sentence_structures: Vec<String>,

    /// Recurring phrases of the writer, used as sentence transitions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_phrases: Vec<String>,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            avg_sentence_length: DEFAULT_AVG_SENTENCE_LENGTH,
            sentence_length_std: DEFAULT_SENTENCE_LENGTH_STD,
            sentence_length_sample: Vec::new(),
            vocab_complexity: VocabComplexity::default(),
            sentence_structures: Vec::new(),
            common_phrases: Vec::new(),
        }
    }
}

impl StyleProfile {
    /// Attach recurring phrases to the profile.
    pub fn with_common_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Upper bound of the target sentence-length band.
    pub fn upper_length_bound(&self) -> f64 {
        self.avg_sentence_length + self.sentence_length_std
    }
}

/// Vocabulary statistics of a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabComplexity {
    /// Mean character length of alphabetic words
    #[serde(default = "default_avg_word_length")]
    pub avg_word_length: f64,

    /// Token count per part-of-speech tag
    #[serde(default)]
    pub pos_distribution: BTreeMap<String, usize>,

    /// Distinct lemmas over alphabetic tokens, in [0, 1]
    #[serde(default = "default_unique_word_ratio")]
    pub unique_word_ratio: f64,
}

impl Default for VocabComplexity {
    fn default() -> Self {
        Self {
            avg_word_length: DEFAULT_AVG_WORD_LENGTH,
            pos_distribution: BTreeMap::new(),
            unique_word_ratio: DEFAULT_UNIQUE_WORD_RATIO,
        }
    }
}

fn default_avg_sentence_length() -> f64 {
    DEFAULT_AVG_SENTENCE_LENGTH
}

fn default_sentence_length_std() -> f64 {
    DEFAULT_SENTENCE_LENGTH_STD
}

fn default_avg_word_length() -> f64 {
    DEFAULT_AVG_WORD_LENGTH
}

fn default_unique_word_ratio() -> f64 {
    DEFAULT_UNIQUE_WORD_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_profile_uses_defaults() {
        let profile: StyleProfile =
            serde_json::from_str(r#"{"common_phrases": ["to be fair"]}"#).unwrap();
        assert_eq!(profile.avg_sentence_length, 15.0);
        assert_eq!(profile.sentence_length_std, 5.0);
        assert_eq!(profile.vocab_complexity.unique_word_ratio, 0.5);
        assert_eq!(profile.common_phrases, vec!["to be fair".to_string()]);
    }

    #[test]
    fn test_empty_phrases_not_serialized() {
        let json = serde_json::to_value(StyleProfile::default()).unwrap();
        assert!(json.get("common_phrases").is_none());
        assert!(json.get("vocab_complexity").is_some());
        assert_eq!(json["avg_sentence_length"], 15.0);
    }

    #[test]
    fn test_length_band() {
        let profile = StyleProfile {
            avg_sentence_length: 12.0,
            sentence_length_std: 3.0,
            ..Default::default()
        };
        assert_eq!(profile.upper_length_bound(), 15.0);
    }

    #[test]
    fn test_accepts_sentence_lengths_alias() {
        let profile: StyleProfile =
            serde_json::from_str(r#"{"sentence_lengths": [3, 4, 5]}"#).unwrap();
        assert_eq!(profile.sentence_length_sample, vec![3, 4, 5]);
    }
}
