use anyhow::Result;
use britfix::{cli, files, hook, Config, Dictionary, Fixer, Tally, WriteOptions};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use rayon::prelude::*;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "britfix")]
#[command(version, about = "Convert American spellings to British", long_about = None)]
struct Cli {
    /// Files or directories to fix (reads stdin when omitted)
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Report changes without modifying any files
    #[arg(long)]
    dry_run: bool,

    /// Do not create .bak backups before rewriting files
    #[arg(long)]
    no_backup: bool,

    /// Descend into subdirectories of directory arguments
    #[arg(short, long)]
    recursive: bool,

    /// Review each change before it is applied
    #[arg(short, long)]
    interactive: bool,

    /// Spelling dictionary file (JSON object of american: british pairs)
    #[arg(long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Configuration file mapping strategies to extensions
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as a PostToolUse hook: read event JSON on stdin, fix the named
    /// file in place, echo the event back
    Hook,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "britfix", &mut io::stdout());
        return Ok(());
    }

    // Hook mode must never fail the caller, even on a bad config.
    if let Some(Commands::Hook) = cli.command {
        match build_fixer(&cli) {
            Ok(fixer) => return hook::run(&fixer),
            Err(err) => {
                eprintln!("[britfix] {err:#}");
                println!("{{}}");
                return Ok(());
            }
        }
    }

    let fixer = build_fixer(&cli)?;

    let colored = !cli.no_color;

    if cli.paths.is_empty() {
        return run_stdin(&fixer, &cli, colored);
    }

    let found = files::find_files(&cli.paths, cli.recursive);
    if found.is_empty() {
        anyhow::bail!("No files found for the given paths.");
    }

    if cli.dry_run && !cli.quiet {
        cli::output::print_dry_run_banner(colored);
    }

    let options = WriteOptions {
        dry_run: cli.dry_run,
        backup: !cli.no_backup,
    };

    let reports = if cli.interactive {
        // Interactive review reads from stdin, so files go one at a time.
        let mut reports = Vec::with_capacity(found.len());
        for path in &found {
            reports.push(fix_interactive(&fixer, path, options, colored));
        }
        reports
    } else {
        found
            .par_iter()
            .map(|path| fixer.fix_file(path, options))
            .collect()
    };

    let mut total = Tally::new();
    let mut files_changed = 0;
    let mut failures = 0;

    for (path, result) in found.iter().zip(reports) {
        match result {
            Ok(report) => {
                if !report.changes.is_empty() {
                    files_changed += 1;
                    for (word, count) in &report.changes {
                        *total.entry(word.clone()).or_insert(0) += count;
                    }
                }
                if !cli.quiet {
                    cli::output::print_file_report(
                        &report,
                        fixer.corrector().dictionary(),
                        colored,
                    );
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("Error: {}: {err:#}", path.display());
            }
        }
    }

    cli::output::print_summary(
        &total,
        fixer.corrector().dictionary(),
        files_changed,
        found.len(),
        cli.dry_run,
        colored,
    );

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn build_fixer(cli: &Cli) -> Result<Fixer> {
    let config = Config::load(cli.config.as_deref())?;
    let dictionary = match &cli.dictionary {
        Some(path) => Dictionary::load_from_path(path)?,
        None => Dictionary::embedded(),
    };
    if dictionary.is_empty() {
        anyhow::bail!("Dictionary is empty, nothing to fix.");
    }
    Ok(Fixer::new(dictionary, &config))
}

/// Filter mode: corrected text goes to stdout, the change report to stderr.
fn run_stdin(fixer: &Fixer, cli: &Cli, colored: bool) -> Result<()> {
    if io::stdin().is_terminal() {
        anyhow::bail!("No input files specified. Use --help for usage information.");
    }

    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;

    let (corrected, changes) = if cli.interactive {
        // Review UI goes to stderr; stdout carries only corrected text.
        cli::interactive::review(
            &content,
            fixer.corrector(),
            "stdin",
            colored,
            &mut io::stderr(),
        )?
    } else {
        fixer.process_text(&content, "txt")
    };

    if !cli.dry_run {
        io::stdout().write_all(corrected.as_bytes())?;
    }
    if !cli.quiet {
        cli::output::print_stream_changes(&changes, fixer.corrector().dictionary(), colored);
    }
    Ok(())
}

/// Interactive per-file flow: review the whole file as one document, then
/// write it back with the usual backup handling.
fn fix_interactive(
    fixer: &Fixer,
    path: &PathBuf,
    options: WriteOptions,
    colored: bool,
) -> Result<britfix::FileReport> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file: {}: {e}", path.display()))?;

    let (corrected, changes) = cli::interactive::review(
        &content,
        fixer.corrector(),
        &path.display().to_string(),
        colored,
        &mut io::stdout(),
    )?;

    let mut backup = None;
    if !changes.is_empty() && !options.dry_run {
        if options.backup {
            backup = Some(files::create_backup(path)?);
        }
        std::fs::write(path, &corrected)
            .map_err(|e| anyhow::anyhow!("Failed to write file: {}: {e}", path.display()))?;
    }

    Ok(britfix::FileReport {
        path: path.clone(),
        changes,
        backup,
    })
}
