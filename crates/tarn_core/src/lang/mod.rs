//! Tarn language vocabulary registries.
//!
//! This module is the "front door" for language-level vocabulary: reserved keywords, soft keywords, operators and
//! punctuation.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings/metadata via registry
//! tables instead of scattering string comparisons across the lexer and parser.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics, docs,
//!   highlighting).
//!
//! ## Examples
//! ```rust
//! use tarn_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("lambda"), Some(KeywordId::Lambda));
//! assert_eq!(keywords::as_str(KeywordId::Lambda), "lambda");
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
