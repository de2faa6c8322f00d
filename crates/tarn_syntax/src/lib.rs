//! Syntax frontend for the Tarn language: lexer, parser, AST, diagnostics.
//!
//! Tarn uses the Python grammar. This crate turns source text into a [`ast::Module`] with a span on every node, or
//! into [`diagnostics::CompileError`]s.
//!
//! ## Notes
//! - This crate is syntax-only: it does not resolve names, check types, or evaluate constants.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `tarn_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use tarn_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("x = y = 0\n").unwrap();
//! let module = parser::parse(&tokens).unwrap();
//! assert_eq!(module.body.len(), 2);
//! ```
//!
//! ## See also
//! - `tarn_core::lang` for registry-backed language vocabulary.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;

use diagnostics::CompileError;

/// Lex and parse a source string in one step.
///
/// Lexical errors are returned as-is; the parser only runs on a clean token stream.
pub fn parse_source(source: &str) -> Result<ast::Module, Vec<CompileError>> {
    let tokens = lexer::lex(source)?;
    parser::parse(&tokens)
}
