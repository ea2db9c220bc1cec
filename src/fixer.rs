use crate::config::Config;
use crate::corrector::{Corrector, Dictionary, Tally};
use crate::files;
use crate::segment::Dispatcher;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// How `fix_file` is allowed to touch the filesystem.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Report changes without writing anything.
    pub dry_run: bool,
    /// Copy the original aside before overwriting it.
    pub backup: bool,
}

/// Outcome of processing a single file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub changes: Tally,
    pub backup: Option<PathBuf>,
}

/// Ties the corrector and the format dispatcher together: picks a segmenter
/// by file extension, runs the correction, and writes the result back.
pub struct Fixer {
    corrector: Corrector,
    dispatcher: Dispatcher,
}

impl Fixer {
    pub fn new(dictionary: Dictionary, config: &Config) -> Self {
        Self {
            corrector: Corrector::new(dictionary),
            dispatcher: Dispatcher::from_config(config),
        }
    }

    pub fn corrector(&self) -> &Corrector {
        &self.corrector
    }

    pub fn supports_extension(&self, ext: &str) -> bool {
        self.dispatcher.supports(ext)
    }

    /// Correct a string using the segmenter registered for `ext`.
    /// Unknown extensions are treated as plain text.
    pub fn process_text(&self, text: &str, ext: &str) -> (String, Tally) {
        self.dispatcher.segmenter_for(ext).process(text, &self.corrector)
    }

    /// Correct one file on disk. The file is rewritten only when at least
    /// one word actually changed, so files whose only difference would be
    /// re-serialization (e.g. JSON formatting) are left alone.
    pub fn fix_file(&self, path: &Path, options: WriteOptions) -> Result<FileReport> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let (corrected, changes) = self.process_text(&content, ext);

        let mut backup = None;
        if !changes.is_empty() && !options.dry_run {
            if options.backup {
                backup = Some(files::create_backup(path)?);
            }
            fs::write(path, &corrected)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }

        Ok(FileReport {
            path: path.to_path_buf(),
            changes,
            backup,
        })
    }
}
