use crate::segment::{Span, SpanBuilder};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Backslash commands (with or without a brace argument) and math
    // segments are preserved; display math is tried before inline math so
    // `$$...$$` is not split into two empty inline matches.
    static ref PRESERVED: Regex = Regex::new(
        r"\\[a-zA-Z]+\{[^}]*\}|\\[a-zA-Z]+|\$\$[^$]+\$\$|\$[^$]+\$"
    )
    .unwrap();
}

/// LaTeX scanner: commands and math are protected, everything between them
/// is prose.
pub(crate) fn scan(text: &str) -> Vec<Span> {
    let mut spans = SpanBuilder::new();
    for m in PRESERVED.find_iter(text) {
        spans.prose_to(m.start());
        spans.protect_to(m.end());
    }
    spans.prose_to(text.len());
    spans.into_spans()
}
