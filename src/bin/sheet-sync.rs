//! sheet-sync - Sync content between spreadsheet sheets and JSON documents.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sheet_sync::config::load_config;
use sheet_sync::logging;
use sheet_sync::sync::{
    self, DiffOptions, DirSheetStore, DocumentStore, JsonFileStore, PullOptions, PushOptions,
    SyncResult, TargetValidationErrors,
};
use sheet_sync::validate::validate;

/// Changes listed per target by `pull` before the rest are summarised.
const MAX_LISTED_CHANGES: usize = 5;
const MAX_VALUE_WIDTH: usize = 80;

#[derive(Debug, Parser)]
#[command(name = "sheet-sync", version, about = "Sync content between spreadsheet sheets and JSON documents")]
struct Cli {
    /// Path to the config file (default: sheet-sync.yaml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding one JSON rows file per sheet
    #[arg(long, global = true, default_value = "sheets")]
    sheets_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pull sheet contents into the JSON documents
    Pull {
        /// Show changes without writing documents
        #[arg(long)]
        dry_run: bool,
        /// Sync only this target
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Push the JSON documents to their sheets
    Push {
        /// Push only this target
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Show differences between sheets and documents
    Diff {
        /// Diff only this target
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Check the documents against the validation rules
    Validate {
        /// Validate only this target
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Show the blacklisted paths of each target
    Blacklist {
        /// Target name (shows all if omitted)
        file: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init("warn") {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    let compiled = config.compile()?;
    let mut docs = JsonFileStore::new(&config.data_dir);
    let mut sheets = DirSheetStore::new(&cli.sheets_dir);
    let mut output = io::stdout().lock();

    match cli.command {
        Command::Pull { dry_run, file } => {
            writeln!(output, "\nPulling from sheets...\n")?;
            let results = sync::pull(&compiled, &sheets, &mut docs, &PullOptions { dry_run, file })?;
            for result in &results {
                print_changes(&mut output, result, Some(MAX_LISTED_CHANGES))?;
            }
            if dry_run {
                writeln!(output, "\n(Dry run - no files written)")?;
            }
        }
        Command::Push { file } => {
            writeln!(output, "\nPushing to sheets...\n")?;
            let result = sync::push(&compiled, &mut sheets, &docs, &PushOptions { file })?;
            if result.is_rejected() {
                print_validation_errors(&mut output, &result.validation_errors)?;
                writeln!(output, "\nPush aborted due to validation errors.")?;
                return Ok(ExitCode::FAILURE);
            }
            for pushed in &result.results {
                writeln!(output, "  {}: pushed", pushed.target)?;
            }
            writeln!(output, "\nDone!")?;
        }
        Command::Diff { file } => {
            writeln!(output, "\nComparing sheets with local JSON...\n")?;
            let results = sync::diff(&compiled, &sheets, &docs, &DiffOptions { file })?;
            for result in &results {
                print_changes(&mut output, result, None)?;
            }
        }
        Command::Validate { file } => {
            let targets: Vec<String> = match file {
                Some(file) => vec![file],
                None => compiled.files.keys().cloned().collect(),
            };
            let mut failures = Vec::new();
            for target in targets {
                let Some(document) = docs.read(&target)? else {
                    writeln!(output, "  {}: no document", target)?;
                    continue;
                };
                let errors = validate(&document, &compiled.rules);
                if errors.is_empty() {
                    writeln!(output, "  {}: ok", target)?;
                } else {
                    failures.push(TargetValidationErrors { target, errors });
                }
            }
            if !failures.is_empty() {
                print_validation_errors(&mut output, &failures)?;
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Blacklist { file } => {
            let targets: Vec<String> = match file {
                Some(file) => vec![file],
                None => compiled.files.keys().cloned().collect(),
            };
            for target in targets {
                writeln!(output, "\n{}:", target)?;
                let mut patterns = compiled.blacklist.patterns_for(&target).peekable();
                if patterns.peek().is_none() {
                    writeln!(output, "  (no blacklisted paths)")?;
                }
                for pattern in patterns {
                    writeln!(output, "  - {}", pattern)?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_changes(output: &mut dyn Write, result: &SyncResult, limit: Option<usize>) -> io::Result<()> {
    if !result.has_changes {
        return writeln!(output, "  {}: No changes", result.target);
    }
    writeln!(output, "  {}: {} change(s)", result.target, result.changes.len())?;
    let shown = limit.unwrap_or(result.changes.len());
    for change in result.changes.iter().take(shown) {
        writeln!(output, "{}", change)?;
    }
    if result.changes.len() > shown {
        writeln!(output, "    ... and {} more", result.changes.len() - shown)?;
    }
    Ok(())
}

fn print_validation_errors(output: &mut dyn Write, failures: &[TargetValidationErrors]) -> io::Result<()> {
    for failure in failures {
        writeln!(output, "  {}: {} validation error(s)", failure.target, failure.errors.len())?;
        for err in failure.errors.iter() {
            writeln!(output, "    {}: {}", err.path, err.reason)?;
            writeln!(output, "      got: {}", truncate(&err.value, MAX_VALUE_WIDTH))?;
        }
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
