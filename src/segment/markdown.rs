use crate::segment::{Span, SpanBuilder};

/// Markdown scanner: protects fenced code blocks, indented code blocks, and
/// inline code spans; everything else is prose. The only context carried
/// across the scan is whether the cursor sits at the start of a line.
pub(crate) fn scan(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut spans = SpanBuilder::new();
    let mut i = 0;
    let mut at_line_start = true;

    while i < len {
        if at_line_start {
            // Fence opener: >=3 backticks or tildes at column 0. A tilde
            // anywhere else (e.g. "~7 days") is ordinary prose.
            if bytes[i] == b'`' || bytes[i] == b'~' {
                let fence = bytes[i];
                let n = run_len(bytes, i, fence);
                if n >= 3 {
                    spans.prose_to(i);
                    let end = fenced_block_end(bytes, i, fence, n);
                    spans.protect_to(end);
                    i = end;
                    continue;
                }
            }

            if is_indented_code_line(bytes, i) {
                spans.prose_to(i);
                let end = indented_block_end(bytes, i);
                spans.protect_to(end);
                i = end;
                continue;
            }
        }

        match bytes[i] {
            b'\n' => {
                i += 1;
                at_line_start = true;
            }
            b'`' => {
                // Inline code span: a backtick run of length k closes at the
                // next run of exactly k backticks. Shorter runs inside stay
                // protected. Unmatched runs are ordinary prose.
                let k = run_len(bytes, i, b'`');
                match closing_run(bytes, i + k, k) {
                    Some(close_end) => {
                        spans.prose_to(i);
                        spans.protect_to(close_end);
                        i = close_end;
                    }
                    None => i += k,
                }
                at_line_start = false;
            }
            _ => {
                i += 1;
                at_line_start = false;
            }
        }
    }

    spans.prose_to(len);
    spans.into_spans()
}

fn run_len(bytes: &[u8], start: usize, ch: u8) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end] == ch {
        end += 1;
    }
    end - start
}

/// End of a fenced block opened at `open` with `n` fence characters: the
/// first subsequent line whose content, after up to 3 leading spaces, starts
/// with >=n of the fence character. That line is consumed as the closing
/// delimiter. With no closing fence the block runs to end of input.
fn fenced_block_end(bytes: &[u8], open: usize, fence: u8, n: usize) -> usize {
    let mut line_start = match line_end(bytes, open) {
        Some(end) => end + 1,
        None => return bytes.len(),
    };

    while line_start < bytes.len() {
        let mut pos = line_start;
        let mut indent = 0;
        while pos < bytes.len() && bytes[pos] == b' ' && indent < 3 {
            pos += 1;
            indent += 1;
        }
        if run_len(bytes, pos, fence) >= n {
            return match line_end(bytes, line_start) {
                Some(end) => end + 1,
                None => bytes.len(),
            };
        }
        line_start = match line_end(bytes, line_start) {
            Some(end) => end + 1,
            None => return bytes.len(),
        };
    }

    bytes.len()
}

fn line_end(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == b'\n').map(|p| from + p)
}

/// An indented code line starts with 4 literal spaces or one tab and has
/// content beyond the indent.
fn is_indented_code_line(bytes: &[u8], line_start: usize) -> bool {
    let rest = &bytes[line_start..];
    let indent = if rest.starts_with(b"    ") {
        4
    } else if rest.starts_with(b"\t") {
        1
    } else {
        return false;
    };
    !is_blank_line(bytes, line_start + indent)
}

fn is_blank_line(bytes: &[u8], from: usize) -> bool {
    let end = line_end(bytes, from).unwrap_or(bytes.len());
    bytes[from..end].iter().all(|&b| b == b' ' || b == b'\t')
}

/// An indented block extends through similarly indented or blank lines,
/// stopping at the first non-indented, non-blank line.
fn indented_block_end(bytes: &[u8], block_start: usize) -> usize {
    let mut line_start = block_start;
    let mut end = block_start;

    while line_start < bytes.len() {
        let indented = is_indented_code_line(bytes, line_start);
        let blank = is_blank_line(bytes, line_start);
        if !indented && !blank {
            break;
        }
        end = match line_end(bytes, line_start) {
            Some(e) => e + 1,
            None => bytes.len(),
        };
        line_start = end;
    }

    end
}

/// Next run of exactly `k` backticks at or after `from`; returns the index
/// just past the run. Runs of other lengths are stepped over.
fn closing_run(bytes: &[u8], from: usize, k: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'`' {
            let m = run_len(bytes, j, b'`');
            if m == k {
                return Some(j + m);
            }
            j += m;
        } else {
            j += 1;
        }
    }
    None
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
    fn test_inline_code_not_converted() {
        let result = process("Use the `colorize` function for color.");
        assert!(result.contains("`colorize`"));
        assert!(result.contains("colour"));
    }

    #[test]
    fn test_double_backtick_code_not_converted() {
        let result = process("Use ``organization.color`` for the color.");
        assert!(result.contains("``organization.color``"));
        assert!(result.contains("colour"));
    }

    #[test]
    fn test_inline_code_with_backtick_inside() {
        let result = process("Use `` `behavior` `` for color.");
        assert!(result.contains("behavior"));
        assert!(result.contains("colour"));
    }

    #[test]
    fn test_fenced_code_block_not_converted() {
        let text = "Here is some color:\n\n```python\ncolor = \"favorite\"\norganization = True\n```\n\nThe color is nice.";
        let result = process(text);
        assert!(result.contains("color = \"favorite\""));
        assert!(result.contains("organization = True"));
        assert!(result.starts_with("Here is some colour:"));
        assert!(result.ends_with("The colour is nice."));
    }

    #[test]
    fn test_fenced_code_block_with_tilde() {
        let text = "Example:\n\n~~~\ncolorize(behavior)\n~~~\n\nThe color works.";
        let result = process(text);
        assert!(result.contains("colorize(behavior)"));
        assert!(result.contains("colour works"));
    }

    #[test]
    fn test_code_block_without_language() {
        let result = process("```\ncolor = behavior\n```");
        assert!(result.contains("color = behavior"));
    }

    #[test]
    fn test_prose_converted() {
        let result = process("The color of the organization was analyzed.");
        assert_eq!(result, "The colour of the organisation was analysed.");
    }

    #[test]
    fn test_headings_converted() {
        let result = process("# Color Organization\n\nThe behavior is favorable.");
        assert!(result.contains("# Colour Organisation"));
        assert!(result.contains("behaviour"));
        assert!(result.contains("favourable"));
    }

    #[test]
    fn test_unclosed_inline_code() {
        let result = process("The `color has no closing and behavior.");
        assert!(result.contains("behaviour"));
    }

    #[test]
    fn test_unclosed_code_block() {
        let result = process("Text before\n\n```python\ncolor = behavior\n");
        assert!(result.contains("color = behavior"));
    }

    #[test]
    fn test_empty_code_span() {
        let result = process("The `` empty and color.");
        assert!(result.contains("colour"));
    }

    #[test]
    fn test_mixed_content() {
        let text = "# Color Guide\n\nThe `colorize` function handles color.\n\n```python\ndef colorize(text):\n    return text.upper()\n```\n\nUse `organize` for organization.";
        let result = process(text);
        assert!(result.contains("# Colour Guide"));
        assert!(result.contains("`colorize`"));
        assert!(result.contains("handles colour"));
        assert!(result.contains("def colorize(text):"));
        assert!(result.contains("`organize`"));
        assert!(result.contains("for organisation"));
    }

    #[test]
    fn test_inline_triple_backticks_not_mistaken_for_fence() {
        let result = process("Use ```colorize``` for the color value.");
        assert!(result.contains("colorize"));
        assert!(result.contains("colour value"));
    }

    #[test]
    fn test_inline_triple_backticks_mid_line() {
        let result = process("The function ```organization.color``` returns color.");
        assert!(result.contains("organization.color"));
        assert!(result.contains("returns colour"));
    }

    #[test]
    fn test_four_backtick_fence() {
        let text = "````markdown\nHere is ```color``` in a code block\n````\n\nThe color is nice.";
        let result = process(text);
        assert!(result.contains("```color```"));
        assert!(result.contains("colour is nice"));
    }

    #[test]
    fn test_five_tilde_fence() {
        let text = "~~~~~\ncolorize(behavior)\n~~~~~\n\nThe color works.";
        let result = process(text);
        assert!(result.contains("colorize(behavior)"));
        assert!(result.contains("colour works"));
    }

    #[test]
    fn test_indented_closing_fence() {
        let text = "```\ncolor = behavior\n   ```\n\nThe color is nice.";
        let result = process(text);
        assert!(result.contains("color = behavior"));
        assert!(result.contains("colour is nice"));
    }

    #[test]
    fn test_indented_code_block_four_spaces() {
        let text = "Here is code:\n\n    color = \"favorite\"\n    organization = True\n\nThe color is nice.";
        let result = process(text);
        assert!(result.contains("    color = \"favorite\""));
        assert!(result.contains("    organization = True"));
        assert!(result.contains("colour is nice"));
    }

    #[test]
    fn test_indented_code_block_tab() {
        let result = process("Here is code:\n\n\tcolor = behavior\n\nThe color works.");
        assert!(result.contains("\tcolor = behavior"));
        assert!(result.contains("colour works"));
    }

    #[test]
    fn test_indented_block_with_blank_lines() {
        let text =
            "Code example:\n\n    first_color = True\n\n    second_color = False\n\nNormal color text.";
        let result = process(text);
        assert!(result.contains("first_color = True"));
        assert!(result.contains("second_color = False"));
        assert!(result.contains("Normal colour text"));
    }

    #[test]
    fn test_tilde_not_at_line_start_is_prose() {
        let text = "Delta links expire after ~7 days.";
        assert_eq!(process(text), text);
    }

    #[test]
    fn test_tilde_in_prose_converts_surrounding_text() {
        let result = process("The color is ~7 hours or analyzed.");
        assert!(result.contains("colour"));
        assert!(result.contains("~7"));
        assert!(result.contains("analysed"));
    }
}
