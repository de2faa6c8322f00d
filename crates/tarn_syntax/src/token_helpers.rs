//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers keep `matches!(...)` noise out of the parser and give error messages one consistent way to
//! name a token.

use crate::lexer::{Token, TokenKind};
use tarn_core::lang::keywords::{self, KeywordId};
use tarn_core::lang::operators::{self, OperatorId};
use tarn_core::lang::punctuation::{self, PunctuationId};

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return `true` if this is an identifier spelled like the given soft keyword.
    pub fn is_soft_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Ident(name) if keywords::from_str(name) == Some(id))
    }

    /// Return the operator id, if this is an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` if this token is trivia/control flow in the token stream.
    pub fn is_layout(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
    }

    /// Human-readable name used in "found ..." parts of diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(id) => format!("'{}'", keywords::as_str(*id)),
            TokenKind::Operator(id) => format!("'{}'", operators::as_str(*id)),
            TokenKind::Punctuation(id) => format!("'{}'", punctuation::as_str(*id)),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Int(v) => format!("integer {}", v),
            TokenKind::Float(v) => format!("float {}", v),
            TokenKind::Imaginary(v) => format!("imaginary {}j", v),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Bytes(_) => "bytes literal".to_string(),
            TokenKind::FStringStart => "f-string".to_string(),
            TokenKind::FStringMiddle(_) => "f-string text".to_string(),
            TokenKind::FStringEnd => "end of f-string".to_string(),
            TokenKind::FStringFieldStart => "'{'".to_string(),
            TokenKind::FStringFieldEnd => "'}'".to_string(),
            TokenKind::FStringDebug => "'='".to_string(),
            TokenKind::FStringConversion => "'!'".to_string(),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Indent => "indent".to_string(),
            TokenKind::Dedent => "dedent".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.operator_id()`.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind.is_keyword(id)
    }

    pub fn is_operator(&self, id: OperatorId) -> bool {
        self.kind.is_operator(id)
    }

    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        self.kind.is_punctuation(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_uses_registry_spellings() {
        assert_eq!(TokenKind::Keyword(KeywordId::Elif).describe(), "'elif'");
        assert_eq!(TokenKind::Operator(OperatorId::SlashSlashEq).describe(), "'//='");
        assert_eq!(TokenKind::Punctuation(PunctuationId::Arrow).describe(), "'->'");
        assert_eq!(TokenKind::Ident("spam".to_string()).describe(), "identifier 'spam'");
        assert_eq!(TokenKind::Eof.describe(), "end of input");
    }

    #[test]
    fn soft_keywords_are_identifiers() {
        let kind = TokenKind::Ident("match".to_string());
        assert!(kind.is_soft_keyword(KeywordId::Match));
        assert!(!kind.is_soft_keyword(KeywordId::Case));
        assert!(!kind.is_keyword(KeywordId::Match));
    }
}
