//! Shareable metadata for `tarn_core::lang` registries.
//!
//! Every registry (keywords, operators, punctuation) records where an item comes from and since which grammar
//! version it exists. This submodule holds those small, dependency-free metadata types.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.
//! - Metadata is for tooling/docs/diagnostics; enforcement of syntax rules lives in the lexer/parser.

/// Identify the enhancement proposal that introduced a vocabulary item.
///
/// ## Notes
/// - The canonical format is `"PEP 634"`; items from the base grammar use [`PEP::CORE`].
///
/// ## Examples
/// ```rust
/// use tarn_core::lang::registry::{PEP, PepId};
///
/// let pep: PepId = PEP::_634;
/// assert!(pep.starts_with("PEP "));
/// ```
pub type PepId = &'static str;

/// Namespace-style access to proposal ids.
///
/// ## Notes
/// - Rust identifiers cannot start with digits, so the style is `PEP::_634` (not `PEP::634`).
pub struct PEP;

impl PEP {
    /// Base grammar, present since the language began.
    pub const CORE: PepId = "core";
    /// Conditional expressions (`a if c else b`).
    pub const _308: PepId = "PEP 308";
    /// `nonlocal` declarations.
    pub const _3104: PepId = "PEP 3104";
    /// Matrix multiplication operator `@`.
    pub const _465: PepId = "PEP 465";
    /// Coroutines with `async`/`await`.
    pub const _492: PepId = "PEP 492";
    /// Literal string interpolation (f-strings).
    pub const _498: PepId = "PEP 498";
    /// Assignment expressions (`:=`).
    pub const _572: PepId = "PEP 572";
    /// Structural pattern matching.
    pub const _634: PepId = "PEP 634";
    /// Type parameter syntax and `type` aliases.
    pub const _695: PepId = "PEP 695";
}

/// Grammar version (major, minor) an item is available since.
///
/// ## Examples
/// ```rust
/// use tarn_core::lang::registry::Since;
///
/// assert!(Since(3, 10) > Since(3, 8));
/// assert_eq!(Since(3, 12).to_string(), "3.12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Since(pub u8, pub u8);

impl std::fmt::Display for Since {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Describe the lifecycle status of a language vocabulary item.
///
/// ## Notes
/// - Intended for docs/tooling (e.g. to warn on deprecated spellings), not for feature-gating by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Draft,
    Deprecated,
}

/// Represent a small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use tarn_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "if cond:\n    pass",
///     note: Some("Minimal conditional."),
/// };
/// assert!(ex.code.contains("if"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
