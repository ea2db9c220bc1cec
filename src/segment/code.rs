use crate::segment::{Span, SpanBuilder};

/// Source-code scanner: comments and docstrings carry prose, everything
/// else (string literals, plain code) is protected. Quote characters are
/// consumed ahead of comment markers, so a `#` or `//` inside an open
/// string never starts a comment.
pub(crate) fn scan(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut spans = SpanBuilder::new();
    let mut i = 0;

    while i < len {
        if starts_with(bytes, i, b"\"\"\"") || starts_with(bytes, i, b"'''") {
            let delim = &text[i..i + 3];
            let close = match text[i + 3..].find(delim) {
                Some(p) => i + 3 + p + 3,
                None => len,
            };
            spans.protect_to(i);
            if preceded_by_literal_marker(text, i) {
                // String literal (e.g. `payload = """..."""` or r'''...''').
                spans.protect_to(close);
            } else {
                extract_prose(text, i, close, &mut spans);
            }
            i = close;
            continue;
        }

        if starts_with(bytes, i, b"/*") {
            let close = match text[i + 2..].find("*/") {
                Some(p) => i + 2 + p + 2,
                None => len,
            };
            spans.protect_to(i);
            extract_prose(text, i, close, &mut spans);
            i = close;
            continue;
        }

        if bytes[i] == b'#' || starts_with(bytes, i, b"//") {
            let close = line_end(bytes, i);
            spans.protect_to(i);
            extract_prose(text, i, close, &mut spans);
            i = close;
            continue;
        }

        if bytes[i] == b'"' || bytes[i] == b'\'' {
            let close = skip_string(bytes, i);
            spans.protect_to(close);
            i = close;
            continue;
        }

        i += 1;
    }

    spans.protect_to(len);
    spans.into_spans()
}

/// Docstring-vs-literal heuristic: a triple-quoted region is a string
/// literal when the last non-whitespace character before it is `=` or a
/// string-prefix letter (r/f/b, which also covers rf/br/etc.).
fn preceded_by_literal_marker(text: &str, pos: usize) -> bool {
    matches!(
        text[..pos].trim_end().chars().next_back(),
        Some('=') | Some('r') | Some('f') | Some('b')
    )
}

/// Quote-preserving prose extraction over a comment or docstring region
/// `[start, end)`. Protects triple-quote delimiters, quoted substrings
/// (API references like 'colorScheme'), and backtick code spans; an
/// apostrophe between two letters is a contraction and stays prose.
pub(crate) fn extract_prose(text: &str, start: usize, end: usize, spans: &mut SpanBuilder) {
    let bytes = text.as_bytes();
    let mut i = start;

    while i < end {
        if starts_with(&bytes[..end], i, b"\"\"\"") || starts_with(&bytes[..end], i, b"'''") {
            spans.prose_to(i);
            spans.protect_to(i + 3);
            i += 3;
            continue;
        }

        match bytes[i] {
            b'\'' if is_contraction(text, i, start, end) => {
                i += 1;
            }
            b'"' | b'\'' => {
                let quote = bytes[i];
                let mut j = i + 1;
                while j < end && bytes[j] != quote {
                    if bytes[j] == b'\\' {
                        j += 2;
                    } else {
                        j += 1;
                    }
                }
                let close = if j < end { j + 1 } else { end };
                spans.prose_to(i);
                spans.protect_to(close);
                i = close;
            }
            b'`' => {
                let mut j = i + 1;
                while j < end && bytes[j] != b'`' {
                    j += 1;
                }
                let close = if j < end { j + 1 } else { end };
                spans.prose_to(i);
                spans.protect_to(close);
                i = close;
            }
            _ => {
                i += 1;
            }
        }
    }

    spans.prose_to(end);
}

fn is_contraction(text: &str, pos: usize, start: usize, end: usize) -> bool {
    let prev_is_letter = pos > start
        && text[..pos]
            .chars()
            .next_back()
            .is_some_and(char::is_alphabetic);
    let next_is_letter = pos + 1 < end
        && text[pos + 1..end]
            .chars()
            .next()
            .is_some_and(char::is_alphabetic);
    prev_is_letter && next_is_letter
}

/// Skip a quoted string literal starting at `pos`, honouring backslash
/// escapes. An unterminated string runs to end of input.
fn skip_string(bytes: &[u8], pos: usize) -> usize {
    let quote = bytes[pos];
    let mut j = pos + 1;
    while j < bytes.len() {
        if bytes[j] == b'\\' {
            j += 2;
        } else if bytes[j] == quote {
            return j + 1;
        } else {
            j += 1;
        }
    }
    bytes.len()
}

fn starts_with(bytes: &[u8], pos: usize, prefix: &[u8]) -> bool {
    bytes[pos..].starts_with(prefix)
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| from + p)
}
