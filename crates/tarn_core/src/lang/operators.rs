//! Operator vocabulary.
//!
//! This module defines the canonical operator set (symbol operators like `+` and word operators like `and`) along
//! with precedence, associativity, and fixity.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators (`and`, `or`, `not`, `in`, `is`) have [`OperatorInfo::is_keyword_spelling`] set; the lexer emits
//!   them as keywords.
//! - `+`, `-` are recorded as infix; the parser also accepts them (and `~`) as prefix operators at the unary level.
//! - Assignment-like operators (`=`, augmented forms, `:=`) sit at the bottom of the precedence scale.
//!
//! ## Examples
//! ```rust
//! use tarn_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("//="), Some(OperatorId::SlashSlashEq));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

use super::registry::{Example, PEP, PepId, Since, Stability};

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    /// Comparison chains: `a < b < c` is neither left- nor right-nested.
    Chain,
    None,
}

/// Define whether an operator is infix (binary) or prefix (unary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
}

/// Stable identifier for every operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    At,

    // Bitwise
    Pipe,
    Caret,
    Amp,
    Tilde,
    LtLt,
    GtGt,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    StarStarEq,
    SlashEq,
    SlashSlashEq,
    PercentEq,
    AtEq,
    PipeEq,
    CaretEq,
    AmpEq,
    LtLtEq,
    GtGtEq,
    Walrus,

    // Word operators
    And,
    Or,
    Not,
    In,
    Is,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is a relative ordering where higher binds tighter.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spellings: &'static [&'static str],
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
    pub is_keyword_spelling: bool,
    pub introduced_in: PepId,
    pub since: Since,
    pub stability: Stability,
    pub examples: &'static [Example],
}

// Precedence levels, loosest first.
const ASSIGN: u8 = 5;
const WALRUS: u8 = 10;
const OR: u8 = 20;
const AND: u8 = 25;
const NOT: u8 = 30;
const COMPARE: u8 = 35;
const BIT_OR: u8 = 40;
const BIT_XOR: u8 = 45;
const BIT_AND: u8 = 50;
const SHIFT: u8 = 55;
const ADDITIVE: u8 = 60;
const MULTIPLICATIVE: u8 = 65;
const UNARY: u8 = 70;
const POWER: u8 = 75;

use Associativity as A;
use Fixity as F;

/// Registry of all operators, in [`OperatorId`] order.
pub const OPERATORS: &[OperatorInfo] = &[
    // Arithmetic
    op(OperatorId::Plus, &["+"], ADDITIVE, A::Left, F::Infix),
    op(OperatorId::Minus, &["-"], ADDITIVE, A::Left, F::Infix),
    op(OperatorId::Star, &["*"], MULTIPLICATIVE, A::Left, F::Infix),
    op(OperatorId::StarStar, &["**"], POWER, A::Right, F::Infix),
    op(OperatorId::Slash, &["/"], MULTIPLICATIVE, A::Left, F::Infix),
    op(OperatorId::SlashSlash, &["//"], MULTIPLICATIVE, A::Left, F::Infix),
    op(OperatorId::Percent, &["%"], MULTIPLICATIVE, A::Left, F::Infix),
    OperatorInfo {
        introduced_in: PEP::_465,
        since: Since(3, 5),
        ..op(OperatorId::At, &["@"], MULTIPLICATIVE, A::Left, F::Infix)
    },
    // Bitwise
    op(OperatorId::Pipe, &["|"], BIT_OR, A::Left, F::Infix),
    op(OperatorId::Caret, &["^"], BIT_XOR, A::Left, F::Infix),
    op(OperatorId::Amp, &["&"], BIT_AND, A::Left, F::Infix),
    op(OperatorId::Tilde, &["~"], UNARY, A::None, F::Prefix),
    op(OperatorId::LtLt, &["<<"], SHIFT, A::Left, F::Infix),
    op(OperatorId::GtGt, &[">>"], SHIFT, A::Left, F::Infix),
    // Comparison
    op(OperatorId::EqEq, &["=="], COMPARE, A::Chain, F::Infix),
    op(OperatorId::NotEq, &["!="], COMPARE, A::Chain, F::Infix),
    op(OperatorId::Lt, &["<"], COMPARE, A::Chain, F::Infix),
    op(OperatorId::LtEq, &["<="], COMPARE, A::Chain, F::Infix),
    op(OperatorId::Gt, &[">"], COMPARE, A::Chain, F::Infix),
    op(OperatorId::GtEq, &[">="], COMPARE, A::Chain, F::Infix),
    // Assignment
    op(OperatorId::Eq, &["="], ASSIGN, A::Right, F::Infix),
    op(OperatorId::PlusEq, &["+="], ASSIGN, A::None, F::Infix),
    op(OperatorId::MinusEq, &["-="], ASSIGN, A::None, F::Infix),
    op(OperatorId::StarEq, &["*="], ASSIGN, A::None, F::Infix),
    op(OperatorId::StarStarEq, &["**="], ASSIGN, A::None, F::Infix),
    op(OperatorId::SlashEq, &["/="], ASSIGN, A::None, F::Infix),
    op(OperatorId::SlashSlashEq, &["//="], ASSIGN, A::None, F::Infix),
    op(OperatorId::PercentEq, &["%="], ASSIGN, A::None, F::Infix),
    OperatorInfo {
        introduced_in: PEP::_465,
        since: Since(3, 5),
        ..op(OperatorId::AtEq, &["@="], ASSIGN, A::None, F::Infix)
    },
    op(OperatorId::PipeEq, &["|="], ASSIGN, A::None, F::Infix),
    op(OperatorId::CaretEq, &["^="], ASSIGN, A::None, F::Infix),
    op(OperatorId::AmpEq, &["&="], ASSIGN, A::None, F::Infix),
    op(OperatorId::LtLtEq, &["<<="], ASSIGN, A::None, F::Infix),
    op(OperatorId::GtGtEq, &[">>="], ASSIGN, A::None, F::Infix),
    OperatorInfo {
        introduced_in: PEP::_572,
        since: Since(3, 8),
        ..op(OperatorId::Walrus, &[":="], WALRUS, A::None, F::Infix)
    },
    // Word operators
    word(OperatorId::And, &["and"], AND, A::Left, F::Infix),
    word(OperatorId::Or, &["or"], OR, A::Left, F::Infix),
    word(OperatorId::Not, &["not"], NOT, A::None, F::Prefix),
    word(OperatorId::In, &["in"], COMPARE, A::Chain, F::Infix),
    word(OperatorId::Is, &["is"], COMPARE, A::Chain, F::Infix),
];

/// Return the full metadata entry for an operator.
///
/// ## Parameters
/// - `id`: Operator identifier.
///
/// ## Returns
/// - The associated [`OperatorInfo`] from [`OPERATORS`].
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Canonical spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spellings.first().copied().unwrap_or("")
}

/// Resolve an operator spelling to its identifier.
///
/// ## Parameters
/// - `spelling`: Candidate operator token (symbol or word operator).
///
/// ## Returns
/// - `Some(OperatorId)` if the spelling exists in [`OPERATORS`].
/// - `None` otherwise.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS
        .iter()
        .find(|o| {
            let spellings: &[&str] = o.spellings;
            spellings.contains(&spelling)
        })
        .map(|o| o.id)
}

/// The in-place operators `x op= y` desugar to, e.g. `+=` to `+`.
///
/// ## Returns
/// - `None` for anything that is not an augmented assignment operator (plain `=` included).
pub fn augmented_base(id: OperatorId) -> Option<OperatorId> {
    Some(match id {
        OperatorId::PlusEq => OperatorId::Plus,
        OperatorId::MinusEq => OperatorId::Minus,
        OperatorId::StarEq => OperatorId::Star,
        OperatorId::StarStarEq => OperatorId::StarStar,
        OperatorId::SlashEq => OperatorId::Slash,
        OperatorId::SlashSlashEq => OperatorId::SlashSlash,
        OperatorId::PercentEq => OperatorId::Percent,
        OperatorId::AtEq => OperatorId::At,
        OperatorId::PipeEq => OperatorId::Pipe,
        OperatorId::CaretEq => OperatorId::Caret,
        OperatorId::AmpEq => OperatorId::Amp,
        OperatorId::LtLtEq => OperatorId::LtLt,
        OperatorId::GtGtEq => OperatorId::GtGt,
        _ => return None,
    })
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spellings: &'static [&'static str],
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spellings,
        precedence,
        associativity,
        fixity,
        is_keyword_spelling: false,
        introduced_in: PEP::CORE,
        since: Since(1, 0),
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn word(
    id: OperatorId,
    spellings: &'static [&'static str],
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        is_keyword_spelling: true,
        ..op(id, spellings, precedence, associativity, fixity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_matches_enum() {
        for (index, info) in OPERATORS.iter().enumerate() {
            assert_eq!(info.id as usize, index, "{:?} is out of order", info.id);
        }
    }

    #[test]
    fn ladder_is_monotonic() {
        let ladder = [
            OperatorId::Or,
            OperatorId::And,
            OperatorId::Not,
            OperatorId::Lt,
            OperatorId::Pipe,
            OperatorId::Caret,
            OperatorId::Amp,
            OperatorId::LtLt,
            OperatorId::Plus,
            OperatorId::Star,
            OperatorId::Tilde,
            OperatorId::StarStar,
        ];
        for pair in ladder.windows(2) {
            assert!(
                info_for(pair[0]).precedence < info_for(pair[1]).precedence,
                "{:?} should bind looser than {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn augmented_operators_have_a_base() {
        for info in OPERATORS {
            let spelling = info.spellings[0];
            let augmented = spelling.len() > 1 && spelling.ends_with('=') && !matches!(spelling, "==" | "!=" | "<=" | ">=" | ":=");
            assert_eq!(augmented_base(info.id).is_some(), augmented, "{spelling}");
        }
    }
}
