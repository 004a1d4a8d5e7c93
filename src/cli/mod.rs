//! CLI for checking Simple programs.
//!
//! ```text
//! descent [--fail-fast] <PATH>...     check every .sim file under the given paths
//! descent --lex <FILE>                dump the token stream of one file (debug)
//! ```
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use descent_core::Strategy;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Checker for the Simple language
#[derive(Parser, Debug)]
#[command(name = "descent")]
#[command(version = VERSION)]
#[command(about = "Check Simple programs for lexical, syntax, and semantic errors", long_about = None)]
pub struct Cli {
    /// Files or directories to check (directories are searched for .sim files)
    #[arg(value_name = "PATH", required_unless_present = "lex_file")]
    pub paths: Vec<PathBuf>,

    /// Stop each file at its first error instead of recovering
    #[arg(long)]
    pub fail_fast: bool,

    /// Tokenize only (debug)
    #[arg(long = "lex", value_name = "FILE", conflicts_with_all = ["paths", "fail_fast"])]
    pub lex_file: Option<PathBuf>,
}

impl Cli {
    pub fn strategy(&self) -> Strategy {
        if self.fail_fast {
            Strategy::FailFast
        } else {
            Strategy::Recovering
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if let Some(file) = &cli.lex_file {
        return commands::lex_file(file);
    }
    commands::check_paths(&cli.paths, cli.strategy())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_paths() {
        let cli = Cli::try_parse_from(["descent", "a.sim", "programs/"]).unwrap();
        assert_eq!(cli.paths, [PathBuf::from("a.sim"), PathBuf::from("programs/")]);
        assert_eq!(cli.strategy(), Strategy::Recovering);
    }

    #[test]
    fn test_cli_parse_fail_fast() {
        let cli = Cli::try_parse_from(["descent", "--fail-fast", "a.sim"]).unwrap();
        assert_eq!(cli.strategy(), Strategy::FailFast);
    }

    #[test]
    fn test_cli_requires_a_path() {
        assert!(Cli::try_parse_from(["descent"]).is_err());
        assert!(Cli::try_parse_from(["descent", "--fail-fast"]).is_err());
    }

    #[test]
    fn test_cli_parse_lex_flag() {
        let cli = Cli::try_parse_from(["descent", "--lex", "a.sim"]).unwrap();
        assert_eq!(cli.lex_file, Some(PathBuf::from("a.sim")));
        assert!(cli.paths.is_empty());

        assert!(Cli::try_parse_from(["descent", "--lex", "a.sim", "b.sim"]).is_err());
    }
}
