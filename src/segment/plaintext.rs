use crate::segment::{Span, SpanKind};

/// Plain text has no protected regions; the whole input is one prose span.
pub(crate) fn scan(text: &str) -> Vec<Span> {
    if text.is_empty() {
        return Vec::new();
    }
    vec![Span {
        start: 0,
        end: text.len(),
        kind: SpanKind::Prose,
    }]
}
