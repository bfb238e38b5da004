//! Linguistic analysis: parsed document types and the rule-based parser.

mod parser;
mod segment;
mod tagger;

use serde::{Deserialize, Serialize};

pub use parser::RuleParser;
pub use segment::{split_sentences, tokenize};
pub use tagger::{lemmatize, tag_tokens};

/// Universal part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PosTag {
    pub fn as_str(self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
        }
    }

    /// Open-class tags, the ones a context rule may override.
    pub fn is_open_class(self) -> bool {
        matches!(
            self,
            PosTag::Noun | PosTag::Verb | PosTag::Adj | PosTag::Adv | PosTag::Propn
        )
    }
}

impl std::fmt::Display for PosTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotated token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub pos: PosTag,
    pub lemma: String,
    /// Token consists of letters only
    pub is_alpha: bool,
}

/// A sentence and its tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSentence {
    pub text: String,
    pub tokens: Vec<Token>,
}

impl ParsedSentence {
    /// Sentence length in whitespace-delimited tokens.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Space-joined POS sequence of the sentence.
    pub fn structure(&self) -> String {
        self.tokens
            .iter()
            .map(|token| token.pos.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of parsing a text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDoc {
    pub sentences: Vec<ParsedSentence>,
}

impl ParsedDoc {
    /// All tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sentences.iter().flat_map(|sentence| sentence.tokens.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}
