#![forbid(unsafe_code)]
//! Tarn language front end
//!
//! Tarn uses the Python grammar. This crate bundles the syntax frontend (lexer, parser, AST, diagnostics) with the
//! `tarn` command-line tool that tokenizes, parses and checks source files.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//!
//! ```rust
//! let module = tarn::parse_source("total = sum(x for x in xs)\n").unwrap();
//! assert_eq!(module.to_string(), "total = sum((x for x in xs))\n");
//! ```

pub mod cli;

pub use tarn_core::lang;
pub use tarn_syntax::{ast, diagnostics, lexer, parse_source, parser};
