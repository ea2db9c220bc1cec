use crate::corrector::{apply_matches, Corrector, Match, Tally};
use anyhow::Result;
use colored::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

/// Walk the user through every pending change, grouped by word, and apply
/// the approved groups. Quitting discards everything; end of input applies
/// the decisions made so far. All review UI goes to `ui`, which callers in
/// filter mode point at stderr so stdout stays corrected text only.
pub fn review(
    content: &str,
    corrector: &Corrector,
    label: &str,
    colored: bool,
    ui: &mut dyn Write,
) -> Result<(String, Tally)> {
    let mut input = decision_source();
    review_with(content, corrector, label, colored, &mut input, ui)
}

/// Where y/n decisions are read from. When stdin is piped it carries the
/// document, not the user, so the controlling terminal is opened directly;
/// without one, reads hit end of input and the review applies whatever was
/// decided up to that point.
fn decision_source() -> Box<dyn BufRead> {
    if !io::stdin().is_terminal() {
        if let Ok(tty) = File::open("/dev/tty") {
            return Box::new(BufReader::new(tty));
        }
    }
    Box::new(BufReader::new(io::stdin()))
}

fn review_with(
    content: &str,
    corrector: &Corrector,
    label: &str,
    colored: bool,
    input: &mut dyn BufRead,
    ui: &mut dyn Write,
) -> Result<(String, Tally)> {
    let matches = corrector.find_matches(content);
    let groups = group_by_word(matches);
    if groups.is_empty() {
        return Ok((content.to_string(), Tally::new()));
    }

    print_header(ui, label, groups.len(), colored)?;

    let mut decisions: Vec<Option<bool>> = vec![None; groups.len()];
    let mut index = 0;

    while index < groups.len() {
        let (word, group) = &groups[index];
        print_change(ui, content, index, groups.len(), group, decisions[index], colored)?;

        write!(ui, "\n[y]es  [n]o  [a]ll  [p]rev  [s]kip  [d]one  [q]uit  [u]ndo\n> ")?;
        ui.flush()?;

        let mut line = String::new();
        let choice = match input.read_line(&mut line) {
            // End of input or a read error: apply what was decided so far.
            Ok(0) | Err(_) => break,
            Ok(_) => line.trim().to_lowercase(),
        };

        match choice.as_str() {
            "y" | "yes" => {
                decisions[index] = Some(true);
                index += 1;
            }
            "n" | "no" => {
                decisions[index] = Some(false);
                index += 1;
            }
            "a" | "all" => {
                for decision in decisions.iter_mut().skip(index) {
                    *decision = Some(true);
                }
                break;
            }
            "p" | "prev" | "previous" => {
                index = index.saturating_sub(1);
            }
            "s" | "skip" => {
                index += 1;
            }
            "d" | "done" => break,
            "q" | "quit" => {
                writeln!(ui, "Quitting without changes.")?;
                return Ok((content.to_string(), Tally::new()));
            }
            "u" | "undo" => {
                if decisions[index].take().is_some() {
                    writeln!(ui, "Decision for '{}' undone.", word)?;
                }
            }
            other => {
                writeln!(ui, "Unknown command: '{}'. Try y, n, a, p, s, d, q, or u.", other)?;
            }
        }
        writeln!(ui)?;
    }

    let approved: Vec<Match> = groups
        .iter()
        .zip(&decisions)
        .filter(|(_, d)| **d == Some(true))
        .flat_map(|((_, group), _)| group.iter().cloned())
        .collect();

    Ok(apply_matches(content, &approved))
}

/// Group matches by lowercase word, preserving first-seen order so the
/// review walks the document top to bottom.
fn group_by_word(matches: Vec<Match>) -> Vec<(String, Vec<Match>)> {
    let mut groups: Vec<(String, Vec<Match>)> = Vec::new();
    for m in matches {
        let key = m.original.to_lowercase();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(m),
            None => groups.push((key, vec![m])),
        }
    }
    groups
}

fn print_header(ui: &mut dyn Write, label: &str, group_count: usize, colored: bool) -> io::Result<()> {
    let title = format!("Spelling corrections - {}", label);
    if colored {
        writeln!(ui, "\n{}", title.cyan().bold())?;
    } else {
        writeln!(ui, "\n{}", title)?;
    }
    writeln!(ui, "Found {} potential change(s)", group_count)?;
    writeln!(ui, "{}\n", "=".repeat(50))
}

fn print_change(
    ui: &mut dyn Write,
    content: &str,
    index: usize,
    total: usize,
    group: &[Match],
    decision: Option<bool>,
    colored: bool,
) -> io::Result<()> {
    let first = &group[0];
    writeln!(ui, "Change {} of {}:", index + 1, total)?;

    if colored {
        writeln!(
            ui,
            "'{}' -> '{}' ({} occurrence(s))",
            first.original.red(),
            first.replacement.green(),
            group.len()
        )?;
    } else {
        writeln!(
            ui,
            "'{}' -> '{}' ({} occurrence(s))",
            first.original,
            first.replacement,
            group.len()
        )?;
    }

    let (before, after) = context_around(content, first.start, first.end);
    if colored {
        writeln!(
            ui,
            "Context: ...{}{}{}...",
            before,
            format!("[{}]", first.original).black().on_yellow(),
            after
        )?;
    } else {
        writeln!(ui, "Context: ...{}[{}]{}...", before, first.original, after)?;
    }

    if let Some(approved) = decision {
        writeln!(
            ui,
            "Status: {}",
            if approved { "✓ Approved" } else { "✗ Rejected" }
        )?;
    }
    Ok(())
}

/// Up to 30 bytes of context either side of the match, clamped to char
/// boundaries.
fn context_around(content: &str, start: usize, end: usize) -> (&str, &str) {
    let mut from = start.saturating_sub(30);
    while !content.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + 30).min(content.len());
    while !content.is_char_boundary(to) {
        to += 1;
    }
    (&content[from..start], &content[end..to])
}
