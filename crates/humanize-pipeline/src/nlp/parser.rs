use async_trait::async_trait;

use super::{lemmatize, split_sentences, tag_tokens, tokenize, ParsedDoc, ParsedSentence, Token};
use crate::error::ModelError;
use crate::models::LinguisticParser;

/// Deterministic, offline [`LinguisticParser`].
///
/// Regex segmentation, lexicon/suffix POS tagging and suffix-stripping
/// lemmatization. Good enough for style statistics; not a full tagger.
#[derive(Debug, Clone, Default)]
pub struct RuleParser;

impl RuleParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse synchronously.
    pub fn parse_text(&self, text: &str) -> ParsedDoc {
        let sentences = split_sentences(text)
            .into_iter()
            .map(|sentence| {
                let words = tokenize(&sentence);
                let tags = tag_tokens(&words);
                let tokens = words
                    .iter()
                    .zip(tags)
                    .map(|(word, pos)| Token {
                        text: word.to_string(),
                        pos,
                        lemma: lemmatize(word, pos),
                        is_alpha: word.chars().all(char::is_alphabetic),
                    })
                    .collect();
                ParsedSentence {
                    text: sentence,
                    tokens,
                }
            })
            .collect();

        ParsedDoc { sentences }
    }
}

#[async_trait]
impl LinguisticParser for RuleParser {
    fn name(&self) -> &str {
        "rule-based"
    }

    async fn parse(&self, text: &str) -> Result<ParsedDoc, ModelError> {
        Ok(self.parse_text(text))
    }
}
