//! Canonical language vocabulary for the Tarn front end.
//!
//! Tarn speaks a Python-grammar dialect. This crate owns the reserved words, operator spellings and punctuation
//! as stable IDs with const metadata tables, so the lexer, parser and tooling never compare raw strings.
//!
//! ## Notes
//!
//! - No IO, no global state, no dependency on syntax types.

pub mod lang;
