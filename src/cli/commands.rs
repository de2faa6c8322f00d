//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Display;
use std::fs;

use tarn_syntax::diagnostics::{self, CompileError};
use tarn_syntax::{lexer, parser};

use super::{CliError, CliResult, ExitCode, Mode, OutputFormat};

/// Maximum source file size (100 MB) - prevents memory exhaustion attacks
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Name shown in diagnostics for `parse -c` input.
const INLINE_SOURCE_NAME: &str = "<command>";

/// Read a source file with size validation.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be accessed
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    // Check file size before reading
    let metadata =
        fs::metadata(file_path).map_err(|e| CliError::usage(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::usage(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path).map_err(|e| CliError::usage(format!("Error reading file '{}': {}", file_path, e)))
}

/// Render errors as plain text, one block per error.
pub fn render_plain(file_name: &str, source: &str, errors: &[CompileError]) -> String {
    let mut msg = String::new();
    for err in errors {
        msg.push_str(&diagnostics::format_error(file_name, source, err));
    }
    msg.trim_end().to_string()
}

/// Render errors as graphical miette reports with the offending source line.
pub fn render_report(file_name: &str, source: &str, errors: &[CompileError]) -> String {
    errors
        .iter()
        .map(|err| {
            let report = miette::Report::new(err.clone())
                .with_source_code(miette::NamedSource::new(file_name, source.to_string()));
            format!("{:?}", report)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn show<T: Display + std::fmt::Debug>(node: &T, format: OutputFormat) -> String {
    match format {
        OutputFormat::Tree => node.to_string(),
        OutputFormat::Debug => format!("{:#?}", node),
    }
}

/// Lex and parse `source` with the grammar entry point named by `mode`, then render the result.
///
/// Tree output of non-module modes gets a trailing newline so every rendering ends the same way.
pub fn render_parse(source: &str, mode: Mode, format: OutputFormat) -> Result<String, Vec<CompileError>> {
    let tokens = lexer::lex(source)?;
    tracing::debug!(token_count = tokens.len(), ?mode, "lexed source");

    let mut out = match mode {
        Mode::Module => show(&parser::parse(&tokens)?, format),
        Mode::Expression => show(&parser::parse_expression(&tokens)?, format),
        Mode::Pattern => show(&parser::parse_pattern(&tokens)?, format),
        Mode::Statement => {
            let stmts = parser::parse_statement(&tokens)?;
            match format {
                OutputFormat::Tree => stmts.iter().map(|s| s.to_string()).collect(),
                OutputFormat::Debug => format!("{:#?}", stmts),
            }
        }
        Mode::Arguments => {
            let args = parser::parse_arguments(&tokens)?;
            match format {
                OutputFormat::Tree => args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", "),
                OutputFormat::Debug => format!("{:#?}", args),
            }
        }
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

/// Lex a file and print one token per line.
pub fn lex_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|errs| CliError::failure(render_report(file_path, &source, &errs)))?;

    for tok in &tokens {
        println!("{:?}", tok);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse a file and print the rendered tree.
pub fn parse_file(file_path: &str, mode: Mode, format: OutputFormat) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    print_parse(file_path, &source, mode, format)
}

/// Parse inline source given with `-c`.
pub fn parse_snippet(code: &str, mode: Mode, format: OutputFormat) -> CliResult<ExitCode> {
    // A one-liner from the shell usually has no final newline; the grammar wants one.
    let source = if code.ends_with('\n') {
        code.to_string()
    } else {
        format!("{}\n", code)
    };
    print_parse(INLINE_SOURCE_NAME, &source, mode, format)
}

fn print_parse(name: &str, source: &str, mode: Mode, format: OutputFormat) -> CliResult<ExitCode> {
    match render_parse(source, mode, format) {
        Ok(out) => {
            print!("{}", out);
            Ok(ExitCode::SUCCESS)
        }
        Err(errs) => Err(CliError::failure(render_report(name, source, &errs))),
    }
}

/// Check that a source string parses, returning its diagnostics rendered for display.
pub fn check_source(file_name: &str, source: &str, plain: bool) -> Result<(), String> {
    match tarn_syntax::parse_source(source) {
        Ok(module) => {
            tracing::debug!(file = file_name, statements = module.body.len(), "parsed");
            Ok(())
        }
        Err(errs) if plain => Err(render_plain(file_name, source, &errs)),
        Err(errs) => Err(render_report(file_name, source, &errs)),
    }
}

/// Check every file, reporting each failure; exits with failure if any file did not parse.
pub fn check_files(paths: &[String], plain: bool) -> CliResult<ExitCode> {
    let mut failed = 0usize;
    for path in paths {
        let source = read_source(path)?;
        if let Err(rendered) = check_source(path, &source, plain) {
            eprintln!("{}", rendered);
            failed += 1;
        }
    }

    if failed == 0 {
        println!("✓ {} file(s) OK", paths.len());
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(failed, total = paths.len(), "check found syntax errors");
        Err(CliError::failure(format!("{} of {} file(s) failed to parse", failed, paths.len())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_parse_module_tree() {
        let out = render_parse("x = a + b * c\n", Mode::Module, OutputFormat::Tree).unwrap();
        assert_eq!(out, "x = (a + (b * c))\n");
    }

    #[test]
    fn test_render_parse_modes() {
        let expr = render_parse("a, *b\n", Mode::Expression, OutputFormat::Tree).unwrap();
        assert_eq!(expr, "(a, *b)\n");

        let args = render_parse("x, *rest, key=1, **kw\n", Mode::Arguments, OutputFormat::Tree).unwrap();
        assert_eq!(args, "x, *rest, key=1, **kw\n");

        let stmts = render_parse("a = b = 0\n", Mode::Statement, OutputFormat::Tree).unwrap();
        assert_eq!(stmts.lines().count(), 2);
    }

    #[test]
    fn test_render_parse_debug_has_spans() {
        let out = render_parse("pass\n", Mode::Module, OutputFormat::Debug).unwrap();
        assert!(out.contains("Pass"));
        assert!(out.contains("span"));
    }

    #[test]
    fn test_check_source_plain_diagnostic() {
        let err = check_source("bad.tn", "if x\n    pass\n", true).unwrap_err();
        assert!(err.starts_with("syntax error:"), "{err}");
        assert!(err.contains("--> bad.tn:1:5"), "{err}");
    }

    #[test]
    fn test_check_source_ok() {
        assert!(check_source("ok.tn", "def f(a, /, b=1, *, c):\n    return a\n", false).is_ok());
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source("/definitely/not/here.tn").unwrap_err();
        assert_eq!(err.exit_code, ExitCode::USAGE);
        assert!(err.message.contains("Cannot access file"));
    }
}
