//! Diagnostics and error reporting for Tarn
//!
//! A [`CompileError`] carries a message, the offending span, and its [`ErrorKind`]. It renders two ways: as a
//! `miette` diagnostic (the CLI default, see the [`miette::Diagnostic`] impl) and as plain text through
//! [`format_error`] for logs and tests.

use std::fmt::{self, Write};

use thiserror::Error;

use crate::ast::Span;

/// A front-end error with location information
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
    pub kind: ErrorKind,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    pub fn new(message: String, span: Span) -> Self {
        Self {
            message,
            span,
            kind: ErrorKind::Error,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn syntax(message: String, span: Span) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            ..Self::new(message, span)
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }
}

/// `Error` for lexical problems, `Syntax` for grammar violations found by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    Syntax,
}

impl ErrorKind {
    /// Stable diagnostic code shown by miette.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Error => "tarn::error",
            ErrorKind::Syntax => "tarn::syntax",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Error => write!(f, "error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() && self.notes.is_empty() {
            return None;
        }
        let lines: Vec<&str> = self.notes.iter().chain(&self.hints).map(String::as_str).collect();
        Some(Box::new(lines.join("\n")))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let len = self.span.end.saturating_sub(self.span.start);
        Some(Box::new(std::iter::once(miette::LabeledSpan::new(
            Some("here".to_string()),
            self.span.start,
            len,
        ))))
    }
}

/// Render an error with source context as plain text.
///
/// ```text
/// syntax error: Expected ':' after if condition, found newline
///   --> demo.tn:1:5
///   |
/// 1 | if x
///   |     ^
/// ```
pub fn format_error(file_name: &str, source: &str, error: &CompileError) -> String {
    let (line_num, col_num, line_text) = line_info(source, error.span.start);
    let width = line_num.to_string().len();
    let underline_len = if error.span.end > error.span.start {
        let remaining = line_text.len().saturating_sub(col_num - 1);
        (error.span.end - error.span.start).min(remaining).max(1)
    } else {
        1
    };

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}: {}", error.kind, error.message);
    let _ = writeln!(out, "  --> {}:{}:{}", file_name, line_num, col_num);
    let _ = writeln!(out, "  {:>width$} |", "", width = width);
    let _ = writeln!(out, "  {:>width$} | {}", line_num, line_text, width = width);
    let _ = writeln!(
        out,
        "  {:>width$} | {}{}",
        "",
        " ".repeat(col_num - 1),
        "^".repeat(underline_len),
        width = width
    );
    for note in &error.notes {
        let _ = writeln!(out, "  = note: {}", note);
    }
    for hint in &error.hints {
        let _ = writeln!(out, "  = hint: {}", hint);
    }
    out
}

/// One-based line and column for a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let (line, col, _) = line_info(source, offset);
    (line, col)
}

/// Get line number, column number, and line text for a byte offset
fn line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_num = source[..line_start].matches('\n').count() + 1;
    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());

    (line_num, offset - line_start + 1, &source[line_start..line_end])
}
