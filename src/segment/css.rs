use crate::segment::code::extract_prose;
use crate::segment::{Span, SpanBuilder};

/// CSS/SCSS/LESS scanner. Prose only ever comes out of comments; selectors,
/// properties, variables, and values are all protected, so keyword values
/// like `text-align: center` can never be rewritten. A `//` is a comment
/// opener only when it is not part of a URL: not immediately after a scheme
/// `:`, not inside a `url(...)` argument, and not inside a quoted string.
pub(crate) fn scan(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut spans = SpanBuilder::new();
    let mut in_url = false;
    let mut i = 0;

    while i < len {
        match bytes[i] {
            // Strings are consumed wholesale so that // inside them is
            // never mistaken for a comment.
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
            }
            b'/' if bytes[i..].starts_with(b"/*") => {
                let close = match text[i + 2..].find("*/") {
                    Some(p) => i + 2 + p + 2,
                    None => len,
                };
                spans.protect_to(i);
                extract_prose(text, i, close, &mut spans);
                i = close;
            }
            b'/' if bytes[i..].starts_with(b"//") => {
                if in_url || preceded_by_scheme(bytes, i) {
                    i += 2;
                } else {
                    let close = line_end(bytes, i);
                    spans.protect_to(i);
                    extract_prose(text, i, close, &mut spans);
                    i = close;
                }
            }
            b')' => {
                in_url = false;
                i += 1;
            }
            _ if starts_with_ci(bytes, i, b"url(") => {
                in_url = true;
                i += 4;
            }
            _ => {
                i += 1;
            }
        }
    }

    spans.protect_to(len);
    spans.into_spans()
}

/// True when the `//` at `pos` completes a recognized scheme (`http://`,
/// `https://`). A `//` written flush against any other `:` is a comment.
fn preceded_by_scheme(bytes: &[u8], pos: usize) -> bool {
    if pos == 0 || bytes[pos - 1] != b':' {
        return false;
    }
    let end = pos - 1;
    let mut start = end;
    while start > 0 && bytes[start - 1].is_ascii_alphabetic() {
        start -= 1;
    }
    let scheme = &bytes[start..end];
    scheme.eq_ignore_ascii_case(b"http") || scheme.eq_ignore_ascii_case(b"https")
}

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

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| from + p)
}

fn starts_with_ci(bytes: &[u8], pos: usize, prefix: &[u8]) -> bool {
    bytes.len() - pos >= prefix.len()
        && bytes[pos..pos + prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corrector::{Corrector, Dictionary};
    use crate::segment::rewrite;

    fn process(text: &str) -> (String, usize) {
        let corrector = Corrector::new(Dictionary::embedded());
        let (result, tally) = rewrite(text, &scan(text), &corrector);
        (result, tally.values().sum())
    }

    // Properties and values must never convert.

    #[test]
    fn test_color_property_not_converted() {
        let (result, changes) = process("body { color: #666; }");
        assert!(result.contains("color:"));
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_text_align_center_not_converted() {
        let (result, _) = process(".box { text-align: center; }");
        assert!(result.contains("center"));
        assert!(!result.contains("centre"));
    }

    #[test]
    fn test_justify_content_center_not_converted() {
        let (result, _) = process(".flex { justify-content: center; }");
        assert!(!result.contains("centre"));
    }

    #[test]
    fn test_scss_variable_not_converted() {
        let (result, _) = process("$favorite-color: red;");
        assert!(result.contains("$favorite-color"));
    }

    #[test]
    fn test_css_custom_property_not_converted() {
        let (result, _) = process(":root { --favorite-color: red; }");
        assert!(result.contains("--favorite-color"));
    }

    #[test]
    fn test_selector_not_converted() {
        let (result, _) = process(".organization-panel { display: flex; }");
        assert!(result.contains(".organization-panel"));
    }

    #[test]
    fn test_string_content_property_not_converted() {
        let (result, _) = process(".icon::before { content: \"favorite color\"; }");
        assert!(result.contains("\"favorite color\""));
    }

    // Comments convert.

    #[test]
    fn test_block_comment_converted() {
        let (result, _) = process("/* This color is gray */");
        assert!(result.contains("colour"));
        assert!(result.contains("grey"));
    }

    #[test]
    fn test_line_comment_converted() {
        let (result, _) = process("// This color is for the organization");
        assert!(result.contains("colour"));
        assert!(result.contains("organisation"));
    }

    #[test]
    fn test_multiline_block_comment_converted() {
        let css = "/*\n * The color scheme favors organization.\n * This behavior is favorable.\n */";
        let (result, _) = process(css);
        assert!(result.contains("colour"));
        assert!(result.contains("favours"));
        assert!(result.contains("organisation"));
        assert!(result.contains("behaviour"));
        assert!(result.contains("favourable"));
    }

    #[test]
    fn test_mixed_css_and_comments() {
        let css = "/* Set the favorite color */\n.panel {\n    color: blue;  /* The color value */\n    text-align: center;\n}";
        let (result, _) = process(css);
        assert!(result.contains("favourite colour"));
        assert!(result.contains("colour value"));
        assert!(result.contains("color: blue"));
        assert!(result.contains("text-align: center"));
        assert!(!result.contains("centre"));
    }

    #[test]
    fn test_quoted_in_comment_not_converted() {
        let (result, _) = process("/* The 'colorScheme' variable controls color */");
        assert!(result.contains("'colorScheme'"));
        assert!(result.contains("colour"));
    }

    // URL handling: // inside URLs is never a comment.

    #[test]
    fn test_protocol_relative_url_not_converted() {
        let (result, changes) =
            process(".bg { background: url(//cdn.example.com/color-picker.png); }");
        assert!(result.contains("//cdn.example.com/color-picker.png"));
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_http_url_not_converted() {
        let (result, _) = process("@import url(http://fonts.example.com/css?family=ColorFont);");
        assert!(result.contains("http://fonts.example.com"));
        assert!(result.contains("ColorFont"));
    }

    #[test]
    fn test_https_url_not_converted() {
        let (result, _) =
            process(".icon { background-image: url(https://example.com/organization/logo.png); }");
        assert!(result.contains("https://example.com/organization/logo.png"));
        assert!(!result.contains("organisation"));
    }

    #[test]
    fn test_quoted_url_with_protocol_not_converted() {
        let (result, _) = process(".bg { background: url(\"https://example.com/color.png\"); }");
        assert!(result.contains("\"https://example.com/color.png\""));
    }

    #[test]
    fn test_real_line_comment_after_semicolon() {
        let (result, _) = process(".box { color: red; } // This is a real color comment");
        assert!(result.contains("colour comment"));
        assert!(result.contains("color: red"));
    }

    #[test]
    fn test_comment_flush_against_colon_still_converts() {
        // Only http:/https: exempt a following //; any other colon does not.
        let (result, _) = process(".box { margin:// favorite color note\n}");
        assert!(result.contains("favourite colour"));
    }

    #[test]
    fn test_bare_https_value_not_treated_as_comment() {
        let (result, changes) = process("@font-url: https://fonts.example.com/color.woff;");
        assert!(result.contains("https://fonts.example.com/color.woff"));
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_real_line_comment_at_start_of_line() {
        let (result, _) = process("// The favorite color\n.box { color: red; }");
        assert!(result.contains("favourite colour"));
        assert!(result.contains("color: red"));
    }
}
