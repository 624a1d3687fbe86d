//! Text normalization and shared matching primitives

use crate::processing::document::ResumeRecord;
use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Closed stop-word list: articles, auxiliary and modal verbs, pronouns,
/// conjunctions and the common prepositions
const STOP_WORDS: &[&str] = &[
    // articles
    "a", "an", "the",
    // auxiliary and modal verbs
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must",
    // pronouns and determiners
    "i", "me", "my", "mine", "we", "us", "our", "ours", "you", "your", "yours", "he", "him",
    "his", "she", "her", "hers", "it", "its", "they", "them", "their", "theirs", "this",
    "that", "these", "those", "who", "whom", "whose", "which", "what", "any", "all", "each",
    "other", "some", "such",
    // conjunctions
    "and", "or", "but", "nor", "so", "yet", "if", "then", "than", "because", "while",
    "although", "though", "also", "either", "neither", "both", "whether",
    // prepositions
    "of", "in", "on", "at", "to", "for", "from", "by", "with", "about", "into", "onto",
    "over", "under", "within", "without", "across", "through", "during", "including",
    "per", "via", "as", "not", "no",
];

/// Shared tokenization and sentence handling
pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Tokens worth keeping as keywords: longer than 2 characters and not a stop word
    pub fn is_eligible(&self, token: &str) -> bool {
        token.chars().count() > 2 && !self.is_stop_word(token)
    }

    /// Lower-case and split into whitespace tokens, replacing punctuation
    /// with spaces. `+` and `#` survive so `c++` and `c#` stay intact.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || c == '+' || c == '#' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        cleaned.split_whitespace().map(str::to_string).collect()
    }

    /// Split text into clauses at punctuation that ends a phrase
    pub fn split_clauses<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(|c: char| {
            matches!(c, ',' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '\n' | '\r' | '•')
        })
        .flat_map(split_on_sentence_periods)
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect()
    }

    /// Split text into sentences
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| s.unicode_words().next().is_some())
            .collect()
    }

    pub fn word_count(&self, text: &str) -> usize {
        text.unicode_words().count()
    }
}

/// Periods end a clause only when followed by whitespace or the end of the
/// text, so `node.js` and `3.5` stay whole
fn split_on_sentence_periods(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    for (idx, _) in text.match_indices('.') {
        let next = bytes.get(idx + 1).copied();
        if next.map_or(true, |b| b.is_ascii_whitespace()) {
            parts.push(&text[start..idx]);
            start = idx + 1;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Build the single flattened search corpus for a resume.
///
/// Empty fields are skipped so no placeholder tokens leak into matching.
pub fn build_corpus(resume: &ResumeRecord) -> String {
    let info = &resume.personal_info;
    let mut parts: Vec<&str> = vec![
        &info.full_name,
        &info.email,
        &info.phone,
        &info.location,
        &info.linked_in,
        &info.portfolio,
    ];

    for exp in &resume.experience {
        parts.extend([exp.position.as_str(), &exp.company, &exp.description]);
    }
    for edu in &resume.education {
        parts.extend([edu.degree.as_str(), &edu.field, &edu.institution]);
    }
    for skill in &resume.skills {
        parts.push(&skill.name);
    }
    for project in &resume.projects {
        parts.extend([project.name.as_str(), &project.description, &project.technologies]);
    }

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive pattern for a literal term.
///
/// Words of a phrase may be separated by spaces, hyphens or slashes in the
/// text, so `full stack` also finds `Full-stack`. Tokenization drops those
/// separators when phrases are extracted.
pub fn literal_pattern(term: &str) -> std::result::Result<Regex, regex::Error> {
    let words: Vec<String> = term.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return Regex::new(&format!("(?i){}", regex::escape(term)));
    }
    Regex::new(&format!("(?i){}", words.join(r"[\s\-/]+")))
}

/// Whether `text[start..end]` stands as a whole word.
///
/// The regex crate has no look-around, so boundaries are checked on the
/// characters either side of the span. This keeps terms that begin or
/// end in symbols (`c++`, `c#`, `.net`) matchable.
pub fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let span = &text[start..end];
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    let left_ok = match (before, span.chars().next()) {
        (Some(b), Some(f)) => !(is_word_char(b) && is_word_char(f)),
        _ => true,
    };
    let right_ok = match (after, span.chars().next_back()) {
        (Some(a), Some(l)) => !(is_word_char(a) && is_word_char(l)),
        _ => true,
    };
    left_ok && right_ok
}

/// Byte ranges of non-overlapping matches that stand as whole words
pub fn whole_word_matches(pattern: &Regex, text: &str) -> Vec<(usize, usize)> {
    pattern
        .find_iter(text)
        .filter(|m| is_whole_word(text, m.start(), m.end()))
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Convert ascending byte offsets into character offsets
pub fn char_offsets(text: &str, byte_offsets: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(byte_offsets.len());
    let mut chars_seen = 0;
    let mut last_byte = 0;

    for &offset in byte_offsets {
        chars_seen += text[last_byte..offset].chars().count();
        last_byte = offset;
        result.push(chars_seen);
    }
    result
}
