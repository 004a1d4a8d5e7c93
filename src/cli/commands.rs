//! Command implementations for the CLI.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use descent_core::{CompileError, Diagnostics, Scanner, Strategy};
use miette::Diagnostic;

use super::{CliError, CliResult, ExitCode};
use crate::simple::{self, CheckOutcome, Kind, Lexer, Type};

/// Extension of Simple source files.
pub const SOURCE_EXTENSION: &str = "sim";

/// Check every Simple source under `paths` and print its diagnostics.
///
/// Fails if any path is missing, no source was found, or any file has errors.
pub fn check_paths(paths: &[PathBuf], strategy: Strategy) -> CliResult<ExitCode> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            return Err(CliError::failure(format!("Cannot access '{}': no such file or directory", path.display())));
        }
        files.extend(collect_sim_files(path));
    }

    if files.is_empty() {
        return Err(CliError::failure("No .sim files found"));
    }

    let mut error_count = 0;
    let mut failed_files = 0;
    for file_path in &files {
        let outcome = match check_file(file_path, strategy) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{}", e);
                failed_files += 1;
                continue;
            }
        };
        if !outcome.succeeded() {
            failed_files += 1;
            error_count += outcome.errors().len();
        }
        for line in render_diagnostics(file_path, outcome.errors()) {
            println!("{}", line);
        }
    }

    if failed_files > 0 {
        return Err(CliError::failure(format!(
            "\n{} error(s) in {} of {} file(s)",
            error_count,
            failed_files,
            files.len()
        )));
    }

    println!("✓ {} file(s) checked", files.len());
    Ok(ExitCode::SUCCESS)
}

/// Check one file, reading it line by line.
pub fn check_file(path: &Path, strategy: Strategy) -> CliResult<CheckOutcome> {
    let file = File::open(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))?;
    tracing::debug!(path = %path.display(), ?strategy, "checking");
    Ok(simple::check_reader(BufReader::new(file), strategy))
}

/// One `<file>: (line,column): message` line per error, each followed by its help text if it has one.
pub fn render_diagnostics(path: &Path, errors: &[CompileError<Kind, Type>]) -> Vec<String> {
    let mut lines = Vec::new();
    for error in errors {
        lines.push(format!("{}: {}", path.display(), error));
        if let Some(help) = error.help() {
            lines.push(format!("    help: {}", help));
        }
    }
    lines
}

/// Lex and display tokens.
pub fn lex_file(path: &Path) -> CliResult<ExitCode> {
    let file = File::open(path).map_err(|e| CliError::failure(format!("Error reading file '{}': {}", path.display(), e)))?;
    let mut scanner = Scanner::<Lexer, Type>::new(Lexer);
    scanner.init(Box::new(BufReader::new(file).lines()), Diagnostics::new());

    while let Some(token) = scanner.next_token() {
        println!("{:>4}:{:<4} {:<16} {}", token.line, token.column, format!("{:?}", token.kind), token.text);
        if token.is_eof() {
            break;
        }
    }

    let errors = scanner.finish().map(Diagnostics::into_sorted).unwrap_or_default();
    if errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    let msg = render_diagnostics(path, &errors).join("\n");
    Err(CliError::failure(msg))
}

/// Collect `.sim` files under `path`.
///
/// A path naming a file is taken as-is; directories are walked recursively, skipping hidden directories and
/// `target`.
pub fn collect_sim_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            let mut entries: Vec<_> = entries.flatten().map(|entry| entry.path()).collect();
            entries.sort();
            for entry_path in entries {
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') && name != "target" {
                        files.extend(collect_sim_files(&entry_path));
                    }
                } else if entry_path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
                    files.push(entry_path);
                }
            }
        }
    }

    files
}
