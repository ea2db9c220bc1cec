use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand the command-line inputs into a flat, deduplicated file list.
/// Plain files pass through untouched. Directories yield their immediate
/// files, or every file beneath them when `recursive` is set; hidden
/// entries are skipped during recursion. Anything else is treated as a
/// quoted glob pattern such as `"*.md"`; under `recursive` a bare pattern
/// searches subdirectories too.
pub fn find_files(inputs: &[PathBuf], recursive: bool) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    let mut push = |path: PathBuf| {
        if seen.insert(path.clone()) {
            found.push(path);
        }
    };

    for input in inputs {
        if input.is_dir() {
            if recursive {
                let walker = WalkDir::new(input)
                    .into_iter()
                    .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
                for entry in walker.filter_map(|e| e.ok()) {
                    if entry.file_type().is_file() {
                        push(entry.into_path());
                    }
                }
            } else if let Ok(entries) = fs::read_dir(input) {
                let mut direct: Vec<PathBuf> = entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| p.is_file())
                    .collect();
                direct.sort();
                for path in direct {
                    push(path);
                }
            }
        } else if input.is_file() {
            push(input.clone());
        } else if let Some(pattern) = input.to_str() {
            for path in expand_pattern(pattern, recursive) {
                push(path);
            }
        }
    }

    found
}

fn expand_pattern(pattern: &str, recursive: bool) -> Vec<PathBuf> {
    let pattern = if recursive && !pattern.contains('/') {
        format!("**/{pattern}")
    } else {
        pattern.to_string()
    };

    match glob::glob(&pattern) {
        Ok(paths) => paths
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Copy `path` aside before modification. The backup lands next to the
/// original as `<stem>-pre-spelling-fixes<ext>.bak`, with a numeric suffix
/// appended if that name is already taken.
pub fn create_backup(path: &Path) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut candidate = dir.join(format!("{stem}-pre-spelling-fixes{ext}.bak"));
    let mut counter = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{stem}-pre-spelling-fixes-{counter}{ext}.bak"));
        counter += 1;
    }

    fs::copy(path, &candidate)
        .with_context(|| format!("Failed to create backup: {}", candidate.display()))?;
    Ok(candidate)
}
