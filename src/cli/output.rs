use crate::corrector::{Dictionary, Tally};
use crate::fixer::FileReport;
use colored::*;

/// One report line per corrected word: `word -> replacement: N occurrence(s)`.
fn change_lines(tally: &Tally, dictionary: &Dictionary) -> Vec<String> {
    tally
        .iter()
        .map(|(word, count)| {
            let replacement = dictionary.get(word).unwrap_or(word);
            format!(
                "{} -> {}: {} occurrence{}",
                word,
                replacement,
                count,
                if *count == 1 { "" } else { "s" }
            )
        })
        .collect()
}

pub fn print_dry_run_banner(colored: bool) {
    if colored {
        println!("{}", "Dry run: no files will be modified.".yellow().bold());
    } else {
        println!("Dry run: no files will be modified.");
    }
}

pub fn print_file_report(report: &FileReport, dictionary: &Dictionary, colored: bool) {
    if report.changes.is_empty() {
        return;
    }

    let file_name = report.path.display().to_string();
    if colored {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for line in change_lines(&report.changes, dictionary) {
        if colored {
            println!("  {}", line.green());
        } else {
            println!("  {}", line);
        }
    }

    if let Some(backup) = &report.backup {
        if colored {
            println!("  {} {}", "backup:".dimmed(), backup.display());
        } else {
            println!("  backup: {}", backup.display());
        }
    }
}

/// Run totals printed after every file has been processed.
pub fn print_summary(
    total: &Tally,
    dictionary: &Dictionary,
    files_changed: usize,
    files_total: usize,
    dry_run: bool,
    colored: bool,
) {
    println!();
    let total_changes: usize = total.values().sum();

    if total_changes == 0 {
        if colored {
            println!("{}", "✓ No American spellings found!".green().bold());
        } else {
            println!("✓ No American spellings found!");
        }
        return;
    }

    let verb = if dry_run { "found" } else { "fixed" };
    let change_word = if total_changes == 1 { "spelling" } else { "spellings" };
    let file_word = if files_changed == 1 { "file" } else { "files" };

    if colored {
        println!(
            "{} {} {} {} in {} of {} {}",
            "✓".green().bold(),
            total_changes.to_string().green().bold(),
            change_word,
            verb,
            files_changed,
            files_total,
            file_word
        );
    } else {
        println!(
            "✓ {} {} {} in {} of {} {}",
            total_changes, change_word, verb, files_changed, files_total, file_word
        );
    }

    for line in change_lines(total, dictionary) {
        println!("  {}", line);
    }
}

/// Change report for stdin mode, sent to stderr so stdout stays a clean
/// stream of corrected text.
pub fn print_stream_changes(tally: &Tally, dictionary: &Dictionary, colored: bool) {
    for line in change_lines(tally, dictionary) {
        if colored {
            eprintln!("{}", line.green());
        } else {
            eprintln!("{}", line);
        }
    }
}
