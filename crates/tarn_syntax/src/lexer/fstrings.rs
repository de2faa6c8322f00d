//! F-string scanning for the Tarn lexer
//!
//! An f-string becomes a token stream rather than one token:
//!
//! ```text
//! f"a{x!r:>{w}}b"  →  FStringStart  FStringMiddle("a")
//!                     FStringFieldStart  Ident(x)  FStringConversion  Ident(r)
//!                     Colon  FStringMiddle(">")  FStringFieldStart Ident(w) FStringFieldEnd
//!                     FStringFieldEnd  FStringMiddle("b")  FStringEnd
//! ```
//!
//! Inside a field the ordinary scanner runs. At the bracket depth where the field opened, `=` (not `==`) marks a
//! debug field, `!` (not `!=`) a conversion, `:` starts the format spec, and `}` closes the field.

use super::Lexer;
use super::strings::EscapeResult;
use super::tokens::TokenKind;
use crate::ast::Span;
use tarn_core::lang::punctuation::PunctuationId;

/// Where a run of f-string text stops.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TextMode {
    /// Top-level text, ended by the closing quote
    Body,
    /// Format spec, ended by the `}` of its field
    Spec,
}

/// Quote style of the f-string being scanned.
#[derive(Clone, Copy)]
struct Quoting {
    /// Offset of the prefix, for error spans
    start: usize,
    quote: char,
    triple: bool,
    raw: bool,
}

impl<'a> Lexer<'a> {
    /// Scan an f-string body after its opening quote(s).
    pub(super) fn scan_fstring(&mut self, start: usize, quote: char, triple: bool, raw: bool) {
        self.add_token(TokenKind::FStringStart, start);
        let quoting = Quoting {
            start,
            quote,
            triple,
            raw,
        };
        self.scan_fstring_text(quoting, TextMode::Body);
    }

    /// Scan literal text and nested fields. Returns `false` after reporting an error.
    fn scan_fstring_text(&mut self, q: Quoting, mode: TextMode) -> bool {
        let mut text = String::new();
        let mut text_start = self.current_pos;

        loop {
            if self.at_closing_quote(q.quote, q.triple) {
                self.flush_fstring_text(&mut text, text_start);
                if mode == TextMode::Spec {
                    self.error("f-string: expecting '}'", q.start);
                    return false;
                }
                let end_start = self.current_pos;
                self.consume_closing_quote(q.triple);
                self.add_token(TokenKind::FStringEnd, end_start);
                return true;
            }

            match self.peek() {
                None => {
                    self.error("Unterminated f-string", q.start);
                    return false;
                }
                Some('\n') if !q.triple => {
                    self.error("Unterminated f-string (newline in single-quoted string)", q.start);
                    return false;
                }
                Some('{') if mode == TextMode::Body && self.peek_next() == Some('{') => {
                    self.advance();
                    self.advance();
                    text.push('{');
                }
                Some('}') if mode == TextMode::Body && self.peek_next() == Some('}') => {
                    self.advance();
                    self.advance();
                    text.push('}');
                }
                Some('{') => {
                    self.flush_fstring_text(&mut text, text_start);
                    let field_start = self.current_pos;
                    self.advance();
                    self.add_token(TokenKind::FStringFieldStart, field_start);
                    if !self.scan_fstring_field(q) {
                        return false;
                    }
                    text_start = self.current_pos;
                }
                Some('}') if mode == TextMode::Spec => {
                    self.flush_fstring_text(&mut text, text_start);
                    return true;
                }
                Some('}') => {
                    let brace = self.current_pos;
                    self.advance();
                    self.error("f-string: single '}' is not allowed", brace);
                }
                Some('\\') if q.raw => {
                    text.push('\\');
                    self.advance();
                    if let Some(c) = self.advance() {
                        text.push(c);
                    }
                }
                Some('\\') => {
                    let escape_start = self.current_pos;
                    self.advance();
                    match self.scan_text_escape() {
                        EscapeResult::Char(c) => text.push(c),
                        EscapeResult::Unknown(c) => {
                            text.push('\\');
                            text.push(c);
                        }
                        EscapeResult::Continuation => {}
                        EscapeResult::Invalid(seq) => {
                            self.error(format!("Invalid escape sequence: {}", seq), escape_start);
                        }
                        EscapeResult::Eof => {
                            self.error("Unterminated escape in f-string", q.start);
                            return false;
                        }
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }

    fn flush_fstring_text(&mut self, text: &mut String, text_start: usize) {
        if !text.is_empty() {
            let value = std::mem::take(text);
            self.tokens.push(super::Token::new(
                TokenKind::FStringMiddle(value),
                Span::new(text_start, self.current_pos),
            ));
        }
    }

    /// Scan the expression tokens of a replacement field, through its closing `}`.
    fn scan_fstring_field(&mut self, q: Quoting) -> bool {
        let base_depth = self.bracket_depth;

        loop {
            while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
                self.advance();
            }
            if self.peek() == Some('\n') {
                if q.triple {
                    self.advance();
                    continue;
                }
                self.error("Unterminated f-string (newline in replacement field)", q.start);
                return false;
            }
            if self.at_closing_quote(q.quote, q.triple) {
                self.error("f-string: expecting '}'", q.start);
                return false;
            }

            let start = self.current_pos;
            let Some(c) = self.peek() else {
                self.error("Unterminated f-string", q.start);
                return false;
            };
            let at_base = self.bracket_depth == base_depth;

            match c {
                '}' if at_base => {
                    self.advance();
                    self.add_token(TokenKind::FStringFieldEnd, start);
                    return true;
                }
                ')' | ']' if at_base => {
                    self.advance();
                    self.error(format!("f-string: unmatched '{}'", c), start);
                    return false;
                }
                '=' if at_base && self.peek_next() != Some('=') => {
                    self.advance();
                    self.add_token(TokenKind::FStringDebug, start);
                }
                '!' if at_base && self.peek_next() != Some('=') => {
                    self.advance();
                    self.add_token(TokenKind::FStringConversion, start);
                }
                ':' if at_base => {
                    self.advance();
                    self.add_punct(PunctuationId::Colon, start);
                    if !self.scan_fstring_text(q, TextMode::Spec) {
                        return false;
                    }
                }
                '#' => {
                    self.advance();
                    self.error("f-string expression part cannot include '#'", start);
                    return false;
                }
                '\\' => {
                    self.advance();
                    self.error("f-string expression part cannot include a backslash", start);
                    return false;
                }
                _ => {
                    self.advance();
                    self.scan_lexeme(start, c);
                }
            }
        }
    }
}
