//! Parser for the Tarn programming language
//!
//! Converts a token stream into an AST. Tarn follows the Python grammar, so the parser has to settle several
//! ambiguous constructs: assignment forms, tuple vs. group, dict vs. set, comprehensions, chained comparisons,
//! `match` patterns and f-string replacement fields. Ambiguity is resolved by trial parses that restore the cursor
//! to an absolute snapshot (see `Parser::attempt` and `Parser::speculate`).
//!
//! ## Examples
//!
//! ```rust
//! use tarn_syntax::{lexer, parser};
//!
//! let source = "def add(a, b):\n    return a + b\n";
//! let tokens = lexer::lex(source).unwrap();
//! let module = parser::parse(&tokens).unwrap();
//! assert_eq!(module.body.len(), 1);
//! ```

use std::sync::Arc;

use crate::ast::*;
use crate::diagnostics::CompileError;
use crate::lexer::{Token, TokenKind};
use tarn_core::lang::keywords::KeywordId;
use tarn_core::lang::operators::{self, OperatorId};
use tarn_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/expr.rs");
include!("parser/atoms.rs");
include!("parser/collections.rs");
include!("parser/args.rs");
include!("parser/fstrings.rs");
include!("parser/assign.rs");
include!("parser/stmts.rs");
include!("parser/decl.rs");
include!("parser/patterns.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
