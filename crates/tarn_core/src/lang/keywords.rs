//! Define the reserved keyword vocabulary for Tarn.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, categories, provenance, and whether the word is
//! a *soft* keyword.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Soft keywords (`match`, `case`, `type`, `_`) are reserved only in specific positions. The lexer emits them as
//!   identifiers; the parser recognises them by comparing an identifier against [`as_str`].
//! - Some reserved words are also word operators (e.g. `and`). For precedence, use [`crate::lang::operators`].
//! - [`KEYWORDS`] is ordered exactly like [`KeywordId`]; [`info_for`] relies on that.
//!
//! ## Examples
//! ```rust
//! use tarn_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("if"), Some(KeywordId::If));
//! assert!(keywords::is_soft(KeywordId::Match));
//! assert!(!keywords::is_soft(KeywordId::While));
//! ```

use super::registry::{Example, PEP, PepId, Since, Stability};

/// Stable identifier for every reserved or soft keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Control flow / statements
    If,
    Elif,
    Else,
    While,
    For,
    Break,
    Continue,
    Return,
    Yield,
    Pass,
    Raise,
    Try,
    Except,
    Finally,
    With,
    Assert,
    Del,

    // Definitions / declarations
    Def,
    Class,
    Lambda,
    Async,
    Await,
    Global,
    Nonlocal,

    // Imports
    Import,
    From,
    As,

    // Literals
    True,
    False,
    None,

    // Word operators
    And,
    Or,
    Not,
    In,
    Is,

    // Soft keywords
    Match,
    Case,
    Type,
    Underscore,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    ControlFlow,
    Definition,
    Import,
    Literal,
    Operator,
    Pattern,
}

/// Usage context hints (not enforced here; parser/lexer own context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordUsage {
    Statement,
    Expression,
    Modifier,
    Operator,
    Pattern,
}

/// Metadata for a keyword.
///
/// ## Notes
/// - `soft` keywords stay usable as ordinary identifiers outside their reserved positions.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub usage: &'static [KeywordUsage],
    pub soft: bool,
    pub introduced_in: PepId,
    pub since: Since,
    pub stability: Stability,
    pub examples: &'static [Example],
}

use KeywordCategory as C;
use KeywordUsage as U;

/// Registry of all keywords, in [`KeywordId`] order.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Control flow / statements
    info(KeywordId::If, "if", C::ControlFlow, &[U::Statement, U::Expression], PEP::CORE, Since(1, 0)),
    info(KeywordId::Elif, "elif", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Else, "else", C::ControlFlow, &[U::Statement, U::Expression], PEP::_308, Since(1, 0)),
    info(KeywordId::While, "while", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::For, "for", C::ControlFlow, &[U::Statement, U::Expression], PEP::CORE, Since(1, 0)),
    info(KeywordId::Break, "break", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Continue, "continue", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Return, "return", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Yield, "yield", C::ControlFlow, &[U::Statement, U::Expression], PEP::CORE, Since(2, 2)),
    info(KeywordId::Pass, "pass", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Raise, "raise", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Try, "try", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Except, "except", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Finally, "finally", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::With, "with", C::ControlFlow, &[U::Statement], PEP::CORE, Since(2, 5)),
    info(KeywordId::Assert, "assert", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Del, "del", C::ControlFlow, &[U::Statement], PEP::CORE, Since(1, 0)),
    // Definitions / declarations
    info(KeywordId::Def, "def", C::Definition, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Class, "class", C::Definition, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Lambda, "lambda", C::Definition, &[U::Expression], PEP::CORE, Since(1, 0)),
    info(KeywordId::Async, "async", C::Definition, &[U::Modifier], PEP::_492, Since(3, 5)),
    info(KeywordId::Await, "await", C::Definition, &[U::Expression], PEP::_492, Since(3, 5)),
    info(KeywordId::Global, "global", C::Definition, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Nonlocal, "nonlocal", C::Definition, &[U::Statement], PEP::_3104, Since(3, 0)),
    // Imports
    info(KeywordId::Import, "import", C::Import, &[U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::From, "from", C::Import, &[U::Statement, U::Expression], PEP::CORE, Since(1, 0)),
    info(KeywordId::As, "as", C::Import, &[U::Modifier, U::Pattern], PEP::CORE, Since(1, 0)),
    // Literals
    info(KeywordId::True, "True", C::Literal, &[U::Expression, U::Pattern], PEP::CORE, Since(3, 0)),
    info(KeywordId::False, "False", C::Literal, &[U::Expression, U::Pattern], PEP::CORE, Since(3, 0)),
    info(KeywordId::None, "None", C::Literal, &[U::Expression, U::Pattern], PEP::CORE, Since(3, 0)),
    // Word operators
    info(KeywordId::And, "and", C::Operator, &[U::Operator], PEP::CORE, Since(1, 0)),
    info(KeywordId::Or, "or", C::Operator, &[U::Operator], PEP::CORE, Since(1, 0)),
    info(KeywordId::Not, "not", C::Operator, &[U::Operator], PEP::CORE, Since(1, 0)),
    info(KeywordId::In, "in", C::Operator, &[U::Operator, U::Statement], PEP::CORE, Since(1, 0)),
    info(KeywordId::Is, "is", C::Operator, &[U::Operator], PEP::CORE, Since(1, 0)),
    // Soft keywords
    soft(KeywordId::Match, "match", C::Pattern, &[U::Statement], PEP::_634, Since(3, 10)),
    soft(KeywordId::Case, "case", C::Pattern, &[U::Statement], PEP::_634, Since(3, 10)),
    soft(KeywordId::Type, "type", C::Definition, &[U::Statement], PEP::_695, Since(3, 12)),
    soft(KeywordId::Underscore, "_", C::Pattern, &[U::Pattern], PEP::_634, Since(3, 10)),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The canonical spelling for `id`.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The keyword's [`KeywordCategory`].
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Usage hints.
pub fn usage(id: KeywordId) -> &'static [KeywordUsage] {
    info_for(id).usage
}

/// Whether `id` is only reserved in specific syntactic positions.
pub fn is_soft(id: KeywordId) -> bool {
    info_for(id).soft
}

/// Full metadata.
///
/// ## Parameters
/// - `id`: Keyword identifier.
///
/// ## Returns
/// - The associated [`KeywordInfo`] from [`KEYWORDS`].
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling, soft keywords included.
///
/// ## Parameters
/// - `s`: Candidate keyword spelling.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling matches this registry.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// Lookup by spelling, hard (always reserved) keywords only.
///
/// ## Notes
/// - This is the lookup the lexer uses: soft keywords lex as identifiers.
pub fn from_str_hard(s: &str) -> Option<KeywordId> {
    from_str(s).filter(|id| !is_soft(*id))
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    usage: &'static [KeywordUsage],
    introduced_in: PepId,
    since: Since,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        usage,
        soft: false,
        introduced_in,
        since,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn soft(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    usage: &'static [KeywordUsage],
    introduced_in: PepId,
    since: Since,
) -> KeywordInfo {
    KeywordInfo {
        soft: true,
        ..info(id, canonical, category, usage, introduced_in, since)
    }
}
