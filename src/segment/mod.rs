pub mod code;
pub mod css;
pub mod html;
pub mod json;
pub mod latex;
pub mod markdown;
pub mod plaintext;

use crate::config::Config;
use crate::corrector::{Corrector, Tally};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Eligible for dictionary-based spelling correction.
    Prose,
    /// Reproduced verbatim, never inspected for spelling.
    Protected,
}

/// A contiguous region of one input buffer. Spans from one scanner run are
/// ordered, non-overlapping, and cover the input exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

/// Builds an ordered span cover while a scanner walks the input. Adjacent
/// spans of the same kind are coalesced.
pub(crate) struct SpanBuilder {
    spans: Vec<Span>,
    cursor: usize,
}

impl SpanBuilder {
    pub(crate) fn new() -> Self {
        Self {
            spans: Vec::new(),
            cursor: 0,
        }
    }

    pub(crate) fn prose_to(&mut self, end: usize) {
        self.push(end, SpanKind::Prose);
    }

    pub(crate) fn protect_to(&mut self, end: usize) {
        self.push(end, SpanKind::Protected);
    }

    fn push(&mut self, end: usize, kind: SpanKind) {
        if end <= self.cursor {
            return;
        }
        if let Some(last) = self.spans.last_mut() {
            if last.kind == kind && last.end == self.cursor {
                last.end = end;
                self.cursor = end;
                return;
            }
        }
        self.spans.push(Span {
            start: self.cursor,
            end,
            kind,
        });
        self.cursor = end;
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn into_spans(self) -> Vec<Span> {
        self.spans
    }
}

/// Per-format scanner. The set of formats is closed and static, so this is
/// an enum rather than a trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segmenter {
    PlainText,
    Markdown,
    Latex,
    Html,
    Json,
    Css,
    Code,
}

impl Segmenter {
    /// Map a strategy name from the config to a segmenter. Unknown names
    /// are skipped when building the dispatch table.
    pub fn from_strategy_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Segmenter::PlainText),
            "markdown" => Some(Segmenter::Markdown),
            "latex" => Some(Segmenter::Latex),
            "html" => Some(Segmenter::Html),
            "json" => Some(Segmenter::Json),
            "css" => Some(Segmenter::Css),
            "code" => Some(Segmenter::Code),
            _ => None,
        }
    }

    /// Partition `text` into an ordered prose/protected cover. JSON has no
    /// span model of its own; its plain-text fallback cover is returned.
    pub fn scan(&self, text: &str) -> Vec<Span> {
        match self {
            Segmenter::PlainText | Segmenter::Json => plaintext::scan(text),
            Segmenter::Markdown => markdown::scan(text),
            Segmenter::Latex => latex::scan(text),
            Segmenter::Html => html::scan(text),
            Segmenter::Css => css::scan(text),
            Segmenter::Code => code::scan(text),
        }
    }

    /// Correct all prose in `text`, reproducing protected regions verbatim.
    pub fn process(&self, text: &str, corrector: &Corrector) -> (String, Tally) {
        match self {
            Segmenter::Json => json::process(text, corrector),
            _ => rewrite(text, &self.scan(text), corrector),
        }
    }
}

/// Reassemble a scanned input, correcting prose spans and copying protected
/// spans byte-for-byte. Lengths are span-local; replacement lengths may
/// differ from the original.
pub(crate) fn rewrite(text: &str, spans: &[Span], corrector: &Corrector) -> (String, Tally) {
    let mut result = String::with_capacity(text.len());
    let mut total = Tally::new();

    for span in spans {
        let slice = &text[span.start..span.end];
        match span.kind {
            SpanKind::Prose => {
                let (corrected, tally) = corrector.correct(slice);
                result.push_str(&corrected);
                merge_tallies(&mut total, tally);
            }
            SpanKind::Protected => result.push_str(slice),
        }
    }

    (result, total)
}

pub(crate) fn merge_tallies(total: &mut Tally, part: Tally) {
    for (word, count) in part {
        *total.entry(word).or_insert(0) += count;
    }
}

/// Extension-to-segmenter table, built once from the strategies config.
pub struct Dispatcher {
    by_extension: HashMap<String, Segmenter>,
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> Self {
        let mut by_extension = HashMap::new();
        for (name, strategy) in &config.strategies {
            if let Some(segmenter) = Segmenter::from_strategy_name(name) {
                for ext in &strategy.extensions {
                    by_extension.insert(normalize_extension(ext), segmenter);
                }
            }
        }
        Self { by_extension }
    }

    /// Case-insensitive extension lookup; unknown extensions fall back to
    /// plain text.
    pub fn segmenter_for(&self, extension: &str) -> Segmenter {
        self.by_extension
            .get(&normalize_extension(extension))
            .copied()
            .unwrap_or(Segmenter::PlainText)
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.by_extension
            .contains_key(&normalize_extension(extension))
    }
}

fn normalize_extension(extension: &str) -> String {
    let ext = extension.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}
