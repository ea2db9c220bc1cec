//! Editor-hook mode: reads a PostToolUse event as JSON on stdin, fixes the
//! file the event names in place, echoes the event back on stdout, and
//! always succeeds so a broken hook never blocks the caller's pipeline.

use crate::fixer::{Fixer, WriteOptions};
use anyhow::Result;
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;

const HANDLED_TOOLS: [&str; 3] = ["Write", "Edit", "MultiEdit"];

pub fn run(fixer: &Fixer) -> Result<()> {
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        log("[britfix] failed to read hook input");
        println!("{{}}");
        return Ok(());
    }

    let event: Value = match serde_json::from_str(&input) {
        Ok(event) => event,
        Err(err) => {
            log(&format!("[britfix] invalid hook input: {err}"));
            println!("{{}}");
            return Ok(());
        }
    };

    if event["hook_event_name"].as_str() == Some("PostToolUse") {
        process_post_tool_use(&event, fixer);
    }

    // The event is passed through unmodified.
    println!("{event}");
    Ok(())
}

fn process_post_tool_use(event: &Value, fixer: &Fixer) {
    let tool_name = event["tool_name"].as_str().unwrap_or_default();
    if !HANDLED_TOOLS.contains(&tool_name) {
        return;
    }

    let file_path = match event["tool_input"]["file_path"].as_str() {
        Some(p) if !p.is_empty() => Path::new(p),
        _ => return,
    };
    if !file_path.exists() {
        return;
    }

    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !fixer.supports_extension(ext) {
        return;
    }

    // In hook mode the write is already done, so no backup is taken.
    match fixer.fix_file(file_path, WriteOptions { dry_run: false, backup: false }) {
        Ok(report) if !report.changes.is_empty() => {
            let total: usize = report.changes.values().sum();
            let details = report
                .changes
                .iter()
                .map(|(word, _)| {
                    let replacement = fixer
                        .corrector()
                        .dictionary()
                        .get(word)
                        .unwrap_or(word);
                    format!("{word}->{replacement}")
                })
                .collect::<Vec<_>>()
                .join(", ");
            log(&format!(
                "[britfix] {}: Fixed {total}: {details}",
                file_name(file_path)
            ));
        }
        Ok(_) => {}
        Err(err) => {
            log(&format!("[britfix] {}: {err:#}", file_name(file_path)));
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Log to stderr, and to the file named by $BRITFIX_LOG when set.
fn log(message: &str) {
    eprintln!("{message}");
    if let Ok(log_file) = std::env::var("BRITFIX_LOG") {
        if log_file.is_empty() {
            return;
        }
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_file) {
            let _ = writeln!(file, "{message}");
        }
    }
}
