use crate::segment::{Span, SpanBuilder};

/// HTML/XML scanner: text between tags is prose, tags are protected.
/// `<style>` and `<script>` elements are protected in full by locating the
/// matching closing tag by name, so markup-looking strings inside a script
/// cannot end the region early.
pub(crate) fn scan(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut spans = SpanBuilder::new();
    let mut i = 0;

    while i < len {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        if let Some(name) = container_tag_at(bytes, i) {
            spans.prose_to(i);
            spans.protect_to(container_end(bytes, i, name));
            i = spans.cursor();
            continue;
        }

        // Generic tag: from `<` to the next `>`. A `<` with nothing before
        // the `>` (or no `>` at all) is ordinary text.
        match next_byte(bytes, i + 1, b'>') {
            Some(gt) if gt > i + 1 => {
                spans.prose_to(i);
                spans.protect_to(gt + 1);
                i = gt + 1;
            }
            _ => {
                i += 1;
            }
        }
    }

    spans.prose_to(len);
    spans.into_spans()
}

/// Tag names whose entire content is protected verbatim.
const CONTAINER_TAGS: [&[u8]; 2] = [b"style", b"script"];

/// If position `pos` opens a `<style` or `<script` tag (case-insensitive,
/// name followed by whitespace, `>`, or `/`), return the tag name.
fn container_tag_at(bytes: &[u8], pos: usize) -> Option<&'static [u8]> {
    for name in CONTAINER_TAGS {
        let after = pos + 1 + name.len();
        if bytes.len() > pos + 1
            && bytes[pos + 1..].len() >= name.len()
            && bytes[pos + 1..after].eq_ignore_ascii_case(name)
        {
            let boundary = match bytes.get(after) {
                Some(b'>') | Some(b'/') => true,
                Some(b) => b.is_ascii_whitespace(),
                None => true,
            };
            if boundary {
                return Some(name);
            }
        }
    }
    None
}

/// End of a container element opened at `open`: just past the `>` of the
/// matching `</name ...>` closing tag. Unterminated containers run to end
/// of input.
fn container_end(bytes: &[u8], open: usize, name: &[u8]) -> usize {
    let mut probe = open + 1;
    while let Some(close_start) = find_ci(bytes, probe, name) {
        // Want `</name` with the name immediately after the slash.
        if close_start >= 2 && &bytes[close_start - 2..close_start] == b"</" {
            let after = close_start + name.len();
            let boundary = match bytes.get(after) {
                Some(b'>') => true,
                Some(b) => b.is_ascii_whitespace(),
                None => true,
            };
            if boundary {
                return match next_byte(bytes, after, b'>') {
                    Some(gt) => gt + 1,
                    None => bytes.len(),
                };
            }
        }
        probe = close_start + 1;
    }
    bytes.len()
}

fn find_ci(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if bytes.len() < needle.len() {
        return None;
    }
    (from..=bytes.len() - needle.len())
        .find(|&i| bytes[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

fn next_byte(bytes: &[u8], from: usize, target: u8) -> Option<usize> {
    bytes[from..]
        .iter()
        .position(|&b| b == target)
        .map(|p| from + p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corrector::{Corrector, Dictionary};
    use crate::segment::rewrite;

    fn process(text: &str) -> String {
        let corrector = Corrector::new(Dictionary::embedded());
        rewrite(text, &scan(text), &corrector).0
    }

    #[test]
    fn test_text_content_converted() {
        let result = process("<p>The color of the organization is favorable.</p>");
        assert!(result.contains("colour"));
        assert!(result.contains("organisation"));
        assert!(result.contains("favourable"));
    }

    #[test]
    fn test_tags_preserved() {
        let result = process("<div class=\"color-box\">color</div>");
        assert!(result.contains("<div class=\"color-box\">"));
        assert!(result.contains(">colour<"));
    }

    #[test]
    fn test_style_tag_content_preserved() {
        let result = process("<style>.box { color: red; text-align: center; }</style>");
        assert!(result.contains("color: red"));
        assert!(result.contains("text-align: center"));
        assert!(!result.contains("centre"));
    }

    #[test]
    fn test_style_tag_with_attributes_preserved() {
        let result = process("<style type=\"text/css\">.box { color: blue; }</style>");
        assert!(result.contains("color: blue"));
    }

    #[test]
    fn test_multiple_style_tags_preserved() {
        let html = "<style>.a { color: red; }</style>\n<p>The color is nice</p>\n<style>.b { text-align: center; }</style>";
        let result = process(html);
        assert!(result.contains("color: red"));
        assert!(result.contains("text-align: center"));
        assert!(!result.contains("centre"));
        assert!(result.contains("colour is nice"));
    }

    #[test]
    fn test_script_tag_content_preserved() {
        let result = process("<script>var color = 'favorite';</script>");
        assert!(result.contains("var color = 'favorite'"));
        assert!(!result.contains("colour"));
    }

    #[test]
    fn test_script_tag_with_attributes_preserved() {
        let result = process("<script type=\"text/javascript\">let organization = true;</script>");
        assert!(result.contains("let organization = true"));
    }

    #[test]
    fn test_multiple_script_tags_preserved() {
        let html = "<script>var a = 'color';</script>\n<p>The color is nice</p>\n<script>var b = 'organization';</script>";
        let result = process(html);
        assert!(result.contains("var a = 'color'"));
        assert!(result.contains("var b = 'organization'"));
        assert!(result.contains("colour is nice"));
    }

    #[test]
    fn test_mixed_style_script_and_text() {
        let html = "<!DOCTYPE html>\n<html>\n<head>\n    <style>\n        .container { color: blue; text-align: center; }\n    </style>\n    <script>\n        var favoriteColor = 'red';\n        function colorize() { return true; }\n    </script>\n</head>\n<body>\n    <p>The color of the organization is nice.</p>\n</body>\n</html>";
        let result = process(html);
        assert!(result.contains("color: blue"));
        assert!(result.contains("text-align: center"));
        assert!(result.contains("favoriteColor"));
        assert!(result.contains("colorize"));
        assert!(result.contains("colour of the organisation"));
    }

    #[test]
    fn test_uppercase_style_tag_preserved() {
        let result = process("<STYLE>.box { color: red; }</STYLE>");
        assert!(result.contains("color: red"));
    }

    #[test]
    fn test_mixed_case_script_tag_preserved() {
        let result = process("<Script>var color = true;</Script>");
        assert!(result.contains("var color = true"));
    }

    #[test]
    fn test_script_with_inline_style_string_preserved() {
        let html = "<script>\ndocument.write(\"<style>.box { color: blue; }</style>\");\nvar favoriteColor = \"red\";\n</script>\n<p>The color is nice.</p>";
        let result = process(html);
        assert!(result.contains("<style>.box { color: blue; }</style>"));
        assert!(result.contains("favoriteColor"));
        assert!(!result.contains('\u{0}'));
        assert!(result.contains("colour is nice"));
    }

    #[test]
    fn test_script_with_style_tag_in_template_literal() {
        let html = "<script>\nconst template = `<style>.color-box { text-align: center; }</style>`;\n</script>";
        let result = process(html);
        assert!(result.contains("<style>.color-box { text-align: center; }</style>"));
    }

    #[test]
    fn test_unclosed_script_protected_to_end() {
        let result = process("<script>var color = 1;");
        assert_eq!(result, "<script>var color = 1;");
    }

    #[test]
    fn test_lone_angle_bracket_is_prose() {
        let result = process("3 < 4 and the color is nice");
        assert!(result.contains("colour"));
    }
}
