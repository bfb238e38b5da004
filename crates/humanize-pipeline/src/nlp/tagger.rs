//! Lexicon and suffix based POS tagging with a light lemmatizer.

use super::PosTag;

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no",
    "another", "either", "neither", "such",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "he", "him", "his",
    "himself", "she", "her", "hers", "herself", "it", "its", "itself", "we", "us", "our", "ours",
    "ourselves", "they", "them", "their", "theirs", "themselves", "who", "whom", "whose", "what",
    "which", "something", "anything", "everything", "nothing", "someone", "anyone", "everyone",
    "nobody", "all", "both",
];

const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];

const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "from", "up", "down", "of", "off", "over",
    "under", "around", "among", "across", "toward", "towards", "upon", "within", "without", "via",
    "like", "per", "despite", "behind", "beyond", "near",
];

const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet"];

const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "while", "if", "unless", "since", "whereas", "whether",
    "until", "once",
];

const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];

const MODALS: &[&str] = &[
    "will", "would", "shall", "should", "can", "could", "may", "might", "must", "do", "does",
    "did",
];

const PARTICLES: &[&str] = &["not", "n't"];

const ADVERBS: &[&str] = &[
    "very", "really", "also", "just", "too", "quite", "rather", "often", "never", "always",
    "sometimes", "here", "there", "now", "then", "so", "however", "still", "even", "already",
    "soon", "again", "almost", "maybe", "perhaps", "well", "only", "instead", "thus", "hence",
    "therefore", "furthermore", "moreover", "nevertheless", "consequently", "yesterday", "today",
    "tomorrow", "when", "where", "why", "how",
];

const INTERJECTIONS: &[&str] = &["oh", "wow", "hey", "yes", "ok", "okay", "hello", "hi", "please"];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "hundred", "thousand", "million", "billion",
];

const SYMBOLS: &[char] = &[
    '$', '%', '&', '+', '=', '<', '>', '@', '#', '^', '~', '|', '*', '/', '\\', '\u{20AC}',
    '\u{00A3}',
];

const VERB_SUFFIXES: &[&str] = &["ing", "ed", "ize", "ise", "ify", "ate"];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ness", "ment", "ity", "ance", "ence", "ship", "ism", "ist", "hood",
];

const ADJ_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "al", "ic", "less", "ish", "ary",
];

const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("is", "be"),
    ("am", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("said", "say"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("people", "person"),
    ("n't", "not"),
];

/// Tag the tokens of one sentence.
pub fn tag_tokens(tokens: &[&str]) -> Vec<PosTag> {
    let mut tags: Vec<PosTag> = Vec::with_capacity(tokens.len());

    for (index, token) in tokens.iter().enumerate() {
        let lower = token.to_lowercase();
        let mut tag = lexical_tag(token, &lower, index == 0);

        if lower == "to" {
            let next = tokens.get(index + 1).map(|t| t.to_lowercase());
            tag = match next.as_deref() {
                Some(next) if is_nominal_start(next) => PosTag::Adp,
                Some(_) => PosTag::Part,
                None => PosTag::Adp,
            };
        }

        if tag.is_open_class() && tag != PosTag::Propn && index > 0 {
            let prev = tokens[index - 1].to_lowercase();
            let prev_tag = tags[index - 1];
            let after_infinitive = prev == "to" && prev_tag == PosTag::Part;
            let after_modal = MODALS.contains(&prev.as_str());
            let after_subject = SUBJECT_PRONOUNS.contains(&prev.as_str());
            if (after_infinitive || after_modal || after_subject) && tag != PosTag::Adv {
                tag = PosTag::Verb;
            }
        }

        tags.push(tag);
    }

    tags
}

/// Lowercased base form of a token.
pub fn lemmatize(token: &str, pos: PosTag) -> String {
    let lower = token.to_lowercase();
    if let Some((_, lemma)) = IRREGULAR_LEMMAS.iter().find(|(form, _)| *form == lower) {
        return lemma.to_string();
    }
    if !lower.chars().all(char::is_alphabetic) {
        return lower;
    }

    match pos {
        PosTag::Noun | PosTag::Propn => strip_plural(&lower),
        PosTag::Verb | PosTag::Aux => strip_verb_inflection(&lower),
        _ => lower,
    }
}

fn lexical_tag(token: &str, lower: &str, sentence_initial: bool) -> PosTag {
    let mut chars = token.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return PosTag::X,
    };

    if !token.chars().any(char::is_alphanumeric) {
        let is_symbol = token.chars().count() == 1 && SYMBOLS.contains(&first);
        return if is_symbol { PosTag::Sym } else { PosTag::Punct };
    }
    if token.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
        || NUMBER_WORDS.contains(&lower)
    {
        return PosTag::Num;
    }

    let lexicons: [(&[&str], PosTag); 9] = [
        (PARTICLES, PosTag::Part),
        (AUXILIARIES, PosTag::Aux),
        (DETERMINERS, PosTag::Det),
        (PRONOUNS, PosTag::Pron),
        (ADPOSITIONS, PosTag::Adp),
        (COORDINATORS, PosTag::Cconj),
        (SUBORDINATORS, PosTag::Sconj),
        (INTERJECTIONS, PosTag::Intj),
        (ADVERBS, PosTag::Adv),
    ];
    for (lexicon, tag) in lexicons {
        if lexicon.contains(&lower) {
            return tag;
        }
    }

    if first.is_uppercase() && !sentence_initial {
        return PosTag::Propn;
    }
    if lower.len() > 4 && lower.ends_with("ly") {
        return PosTag::Adv;
    }
    if has_suffix(lower, NOUN_SUFFIXES) {
        return PosTag::Noun;
    }
    if has_suffix(lower, VERB_SUFFIXES) {
        return PosTag::Verb;
    }
    if has_suffix(lower, ADJ_SUFFIXES) {
        return PosTag::Adj;
    }
    PosTag::Noun
}

fn has_suffix(word: &str, suffixes: &[&str]) -> bool {
    suffixes
        .iter()
        .any(|suffix| word.len() > suffix.len() + 2 && word.ends_with(suffix))
}

fn is_nominal_start(word: &str) -> bool {
    DETERMINERS.contains(&word)
        || PRONOUNS.contains(&word)
        || NUMBER_WORDS.contains(&word)
        || word.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false)
}

fn strip_plural(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if word.ends_with("sses") {
        return word[..word.len() - 2].to_string();
    }
    if word.len() > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn strip_verb_inflection(word: &str) -> String {
    if word.len() > 4 && word.ends_with("ied") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    let stem = if word.len() > 5 && word.ends_with("ing") {
        &word[..word.len() - 3]
    } else if word.len() > 4 && word.ends_with("ed") {
        &word[..word.len() - 2]
    } else if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    } else {
        return word.to_string();
    };
    undouble(stem)
}

/// Drop a doubled final consonant (`runn` -> `run`); compares chars, not bytes.
fn undouble(stem: &str) -> String {
    let mut tail = stem.char_indices().rev();
    if let (Some((cut, last)), Some((_, prev))) = (tail.next(), tail.next()) {
        if stem.chars().count() >= 3 && last == prev && !matches!(last, 'l' | 's' | 'z') {
            return stem[..cut].to_string();
        }
    }
    stem.to_string()
}
