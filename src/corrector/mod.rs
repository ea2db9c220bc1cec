pub mod dictionary;

pub use dictionary::{Dictionary, DictionaryError};

use regex::Regex;
use std::collections::BTreeMap;

/// Per-word occurrence counts accumulated over one correction run, keyed by
/// the lowercase American spelling.
pub type Tally = BTreeMap<String, usize>;

/// The casing shape of a matched word, reapplied to its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePattern {
    Upper,
    Lower,
    Title,
    Mixed,
}

impl CasePattern {
    /// Detect the case pattern of a word (checked in order: upper, lower,
    /// title; anything else is mixed).
    pub fn detect(word: &str) -> Self {
        let mut chars = word.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return CasePattern::Mixed,
        };

        if word.chars().all(char::is_uppercase) {
            CasePattern::Upper
        } else if word.chars().all(char::is_lowercase) {
            CasePattern::Lower
        } else if first.is_uppercase() && chars.all(char::is_lowercase) {
            CasePattern::Title
        } else {
            CasePattern::Mixed
        }
    }

    /// Apply this pattern to a replacement word. Mixed copies the stored
    /// spelling unchanged.
    pub fn apply(self, word: &str) -> String {
        match self {
            CasePattern::Upper => word.to_uppercase(),
            CasePattern::Lower => word.to_lowercase(),
            CasePattern::Title => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            }
            CasePattern::Mixed => word.to_string(),
        }
    }
}

/// A single pending replacement over one input buffer. `replacement` always
/// differs from `original`; no-op matches are never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub replacement: String,
}

/// Case-insensitive whole-word corrector compiled once from a dictionary.
/// The compiled matcher is read-only and safe to share across threads.
pub struct Corrector {
    dictionary: Dictionary,
    pattern: Option<Regex>,
}

impl Corrector {
    pub fn new(dictionary: Dictionary) -> Self {
        let pattern = Self::compile(&dictionary);
        Self {
            dictionary,
            pattern,
        }
    }

    /// One alternation over every dictionary key, whole-word and
    /// case-insensitive. An empty dictionary compiles to no matcher at all,
    /// making the corrector an identity transform.
    fn compile(dictionary: &Dictionary) -> Option<Regex> {
        if dictionary.is_empty() {
            return None;
        }

        let mut keys: Vec<&str> = dictionary.keys().collect();
        keys.sort_unstable();

        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");

        // Keys are escaped fixed words, so this can only fail on an empty
        // dictionary, which is handled above.
        Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).ok()
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Rewrite all dictionary words in `text`, preserving each match's case
    /// pattern. Returns the corrected text and per-word change counts.
    pub fn correct(&self, text: &str) -> (String, Tally) {
        let pattern = match &self.pattern {
            Some(p) => p,
            None => return (text.to_string(), Tally::new()),
        };

        let mut result = String::with_capacity(text.len());
        let mut tally = Tally::new();
        let mut last_end = 0;

        for m in pattern.find_iter(text) {
            result.push_str(&text[last_end..m.start()]);

            match self.replacement_for(m.as_str()) {
                Some(replacement) => {
                    *tally.entry(m.as_str().to_lowercase()).or_insert(0) += 1;
                    result.push_str(&replacement);
                }
                None => result.push_str(m.as_str()),
            }

            last_end = m.end();
        }

        result.push_str(&text[last_end..]);
        (result, tally)
    }

    /// Find all replacements without applying them, ordered by start offset.
    /// Used by callers that need positions, e.g. the interactive reviewer.
    pub fn find_matches(&self, text: &str) -> Vec<Match> {
        let pattern = match &self.pattern {
            Some(p) => p,
            None => return Vec::new(),
        };

        pattern
            .find_iter(text)
            .filter_map(|m| {
                self.replacement_for(m.as_str()).map(|replacement| Match {
                    start: m.start(),
                    end: m.end(),
                    original: m.as_str().to_string(),
                    replacement,
                })
            })
            .collect()
    }

    /// The case-adjusted replacement for a matched word, or None when the
    /// replacement would be identical to the original.
    fn replacement_for(&self, word: &str) -> Option<String> {
        let british = self.dictionary.get(&word.to_lowercase())?;
        let replacement = CasePattern::detect(word).apply(british);
        if replacement == word {
            None
        } else {
            Some(replacement)
        }
    }
}

/// Apply matches to `text` left-to-right with a running length offset.
/// Matches are merged by start offset; overlapping or duplicate matches are
/// applied at most once.
pub fn apply_matches(text: &str, matches: &[Match]) -> (String, Tally) {
    let mut sorted: Vec<&Match> = matches.iter().collect();
    sorted.sort_by_key(|m| (m.start, m.end));

    let mut result = String::with_capacity(text.len());
    let mut tally = Tally::new();
    let mut last_end = 0;

    for m in sorted {
        if m.start < last_end {
            continue;
        }
        result.push_str(&text[last_end..m.start]);
        result.push_str(&m.replacement);
        *tally.entry(m.original.to_lowercase()).or_insert(0) += 1;
        last_end = m.end;
    }

    result.push_str(&text[last_end..]);
    (result, tally)
}
