use once_cell::sync::Lazy;
use regex::Regex;

/// Terminal punctuation, optional closing quotes or brackets, then whitespace or end of text.
static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*(?:\s+|$)"#).unwrap());

/// Words with internal apostrophes or hyphens, or a single symbol.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['\u{2019}\-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]").unwrap()
});

/// Abbreviations whose period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g.", "i.e.", "etc.", "mr.", "mrs.", "ms.", "dr.", "vs.", "st.",
];

/// Split `text` into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END_RE.find_iter(text) {
        let candidate = &text[start..boundary.end()];
        if boundary.end() < text.len() && ends_with_abbreviation(candidate) {
            continue;
        }
        push_trimmed(&mut sentences, candidate);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

/// Split a sentence into word and punctuation tokens.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(sentence).map(|m| m.as_str()).collect()
}

fn ends_with_abbreviation(candidate: &str) -> bool {
    candidate
        .split_whitespace()
        .last()
        .map(|word| ABBREVIATIONS.contains(&word.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn push_trimmed(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
