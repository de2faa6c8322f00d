//! Token types for the Tarn lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for hard reserved words (soft keywords stay `Ident`)
//! - `Operator(OperatorId)` for operators (word operators such as `and` lex as keywords)
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! F-strings are not a single token: they lex into a bracketed stream
//! (`FStringStart`, `FStringMiddle`, `FStringFieldStart` ... `FStringFieldEnd`, `FStringEnd`) with ordinary
//! expression tokens between the field markers.
//!
//! ## Notes
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use tarn_core::lang::keywords::{self, KeywordId};
use tarn_core::lang::operators::OperatorId;
use tarn_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(i64),
    Float(f64),
    /// `2j`, `1.5J`
    Imaginary(f64),
    String(String),
    Bytes(Vec<u8>),

    // ========== F-strings ==========
    /// `f"` (any prefix/quote combination)
    FStringStart,
    /// Literal text with escapes resolved and `{{`/`}}` collapsed
    FStringMiddle(String),
    FStringEnd,
    /// `{` opening a replacement field
    FStringFieldStart,
    /// `}` closing a replacement field
    FStringFieldEnd,
    /// `=` ending a self-documenting field expression
    FStringDebug,
    /// `!` introducing a conversion character
    FStringConversion,

    // ========== Indentation ==========
    Newline,
    Indent,
    Dedent,

    // ========== Special ==========
    Eof,
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Resolve an identifier spelling to a keyword id, if always reserved.
///
/// Soft keywords (`match`, `case`, `type`, `_`) return `None` here and lex as identifiers.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str_hard(name)
}
