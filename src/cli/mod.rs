//! CLI module for the Tarn front end
//!
//! This module provides the command-line interface.
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream
//! - `parse <file>` / `parse -c <code>` - Print the canonical rendering (or debug tree) of a parse
//! - `check <file>...` - Parse files and report the first syntax error of each
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

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// Bad invocation: unreadable input, conflicting options
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
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

    /// Create a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Tarn language front end: tokenize, parse and check Python-grammar sources
#[derive(Parser, Debug)]
#[command(name = "tarn")]
#[command(version = VERSION)]
#[command(about = "Tarn language front end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a file
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse a file or an inline snippet and print the result
    Parse {
        /// Source file to parse
        #[arg(value_name = "FILE", conflicts_with = "command", required_unless_present = "command")]
        file: Option<PathBuf>,
        /// Parse inline source code
        #[arg(short = 'c', long = "command", value_name = "CODE")]
        command: Option<String>,
        /// Grammar entry point to parse with
        #[arg(long, value_enum, default_value_t = Mode::Module)]
        mode: Mode,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },

    /// Parse files and report syntax errors
    Check {
        /// Files to check
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,
        /// Plain-text diagnostics instead of graphical reports
        #[arg(long)]
        plain: bool,
    },
}

/// Grammar entry point used by `parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// A whole source file
    Module,
    /// An expression list such as `a, *b`
    Expression,
    /// One logical statement
    Statement,
    /// A `case` pattern
    Pattern,
    /// The inside of a call's parentheses
    Arguments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Canonical, fully parenthesized source rendering
    Tree,
    /// Rust debug dump of the AST, spans included
    Debug,
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
            if exit_code != ExitCode::SUCCESS {
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
    match cli.command {
        Some(Command::Lex { file }) => commands::lex_file(&file.to_string_lossy()),
        Some(Command::Parse {
            file,
            command,
            mode,
            format,
        }) => match (file, command) {
            (_, Some(code)) => commands::parse_snippet(&code, mode, format),
            (Some(file), None) => commands::parse_file(&file.to_string_lossy(), mode, format),
            (None, None) => Err(CliError::usage("Error: parse requires a file path or -c \"code\"")),
        },
        Some(Command::Check { files, plain }) => {
            let paths: Vec<String> = files.iter().map(|p| p.to_string_lossy().into_owned()).collect();
            commands::check_files(&paths, plain)
        }
        None => {
            // Default: check the file if provided
            if let Some(file) = cli.file {
                commands::check_files(&[file.to_string_lossy().into_owned()], false)
            } else {
                // No command and no file - show help
                Err(CliError::usage("Error: no input file (see `tarn --help`)"))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["tarn", "lex", "demo.tn"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Lex { .. })));
    }

    #[test]
    fn test_cli_parse_with_mode_and_format() {
        let cli = Cli::try_parse_from(["tarn", "parse", "--mode", "pattern", "--format", "debug", "-c", "a, *b"]).unwrap();
        if let Some(Command::Parse {
            file,
            command,
            mode,
            format,
        }) = cli.command
        {
            assert!(file.is_none());
            assert_eq!(command.as_deref(), Some("a, *b"));
            assert_eq!(mode, Mode::Pattern);
            assert_eq!(format, OutputFormat::Debug);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_cli_parse_requires_input() {
        assert!(Cli::try_parse_from(["tarn", "parse"]).is_err());
        assert!(Cli::try_parse_from(["tarn", "parse", "a.tn", "-c", "x"]).is_err());
    }

    #[test]
    fn test_cli_check_many_files() {
        let cli = Cli::try_parse_from(["tarn", "check", "a.tn", "b.tn", "--plain"]).unwrap();
        if let Some(Command::Check { files, plain }) = cli.command {
            assert_eq!(files.len(), 2);
            assert!(plain);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_default_file() {
        let cli = Cli::try_parse_from(["tarn", "demo.tn"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.file, Some(PathBuf::from("demo.tn")));
    }
}
