//! Number scanning for the Tarn lexer
//!
//! Handles integer literals (decimal, `0x`, `0o`, `0b`), floating-point literals, and imaginary literals with a
//! `j` suffix. An underscore may sit between two digits, or right after a radix prefix, and is dropped.

use super::tokens::TokenKind;
use super::{Lexer, is_ident_start};

impl<'a> Lexer<'a> {
    /// Scan a number whose first character (a digit, or `.` for `.5`) was just consumed.
    pub(super) fn scan_number(&mut self, start: usize, first: char) {
        if first == '0' {
            let radix = match self.peek() {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.advance();
                self.scan_radix_int(start, radix);
                return;
            }
        }

        let mut value = String::new();
        let mut is_float = false;

        if first == '.' {
            value.push_str("0.");
            is_float = true;
        } else {
            value.push(first);
        }
        if !self.scan_digits(&mut value, first != '.') {
            self.error("Invalid decimal literal", start);
            return;
        }

        // A `.` after the integer part always starts a fraction: `1..x` is `1.` then `.x`
        if !is_float && self.peek() == Some('.') {
            is_float = true;
            value.push('.');
            self.advance();
            if !self.scan_digits(&mut value, false) {
                self.error("Invalid decimal literal", start);
                return;
            }
        }

        // Exponent part, only when digits follow
        if matches!(self.peek(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_next(), Some('+' | '-')) { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                value.push('e');
                self.advance();
                if digit_at == 2 {
                    if let Some(sign) = self.advance() {
                        value.push(sign);
                    }
                }
                if !self.scan_digits(&mut value, false) {
                    self.error("Invalid decimal literal", start);
                    return;
                }
            }
        }

        if matches!(self.peek(), Some('j' | 'J')) {
            self.advance();
            match value.parse::<f64>() {
                Ok(f) => self.add_token(TokenKind::Imaginary(f), start),
                Err(_) => self.error(format!("Invalid imaginary literal: {}j", value), start),
            }
            return;
        }

        if self.peek().is_some_and(is_ident_start) {
            self.advance();
            self.error("Invalid decimal literal", start);
            return;
        }

        if is_float {
            match value.parse::<f64>() {
                Ok(f) => self.add_token(TokenKind::Float(f), start),
                Err(_) => self.error(format!("Invalid float literal: {}", value), start),
            }
        } else if value.len() > 1 && value.starts_with('0') && value.bytes().any(|b| b != b'0') {
            self.error(
                "Leading zeros in decimal integer literals are not permitted; use an 0o prefix for octal",
                start,
            );
        } else {
            match value.parse::<i64>() {
                Ok(i) => self.add_token(TokenKind::Int(i), start),
                Err(_) => self.error(format!("Integer literal too large: {}", value), start),
            }
        }
    }

    /// Digits with single underscores between them. Returns false after consuming a stray underscore.
    fn scan_digits(&mut self, value: &mut String, mut after_digit: bool) -> bool {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                value.push(c);
                self.advance();
                after_digit = true;
            } else if c == '_' {
                self.advance();
                if !after_digit || !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return false;
                }
                after_digit = false;
            } else {
                break;
            }
        }
        true
    }

    fn scan_radix_int(&mut self, start: usize, radix: u32) {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c == '_' {
                self.advance();
                if !self.peek().is_some_and(|c| c.is_digit(radix)) {
                    self.error(format!("Invalid integer literal: {}", &self.source[start..self.current_pos]), start);
                    return;
                }
            } else if c.is_ascii_alphanumeric() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            self.error(format!("Invalid integer literal: {}", &self.source[start..self.current_pos]), start);
            return;
        }
        match i64::from_str_radix(&digits, radix) {
            Ok(i) => self.add_token(TokenKind::Int(i), start),
            Err(_) => self.error(
                format!("Integer literal too large: {}", &self.source[start..self.current_pos]),
                start,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use tarn_core::lang::punctuation::PunctuationId;

    use crate::lexer::{TokenKind, lex};

    fn first(source: &str) -> TokenKind {
        lex(source).unwrap()[0].kind.clone()
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn test_numbers() {
        assert_eq!(first("42"), TokenKind::Int(42));
        assert!(matches!(first("3.14"), TokenKind::Float(f) if (f - 3.14).abs() < 0.001));
        assert_eq!(first("1_000_000"), TokenKind::Int(1_000_000));
        assert_eq!(first("1e10"), TokenKind::Float(1e10));
        assert_eq!(first("2.5E-3"), TokenKind::Float(2.5e-3));
        assert_eq!(first(".5"), TokenKind::Float(0.5));
        assert_eq!(first("1."), TokenKind::Float(1.0));
        assert_eq!(first("0"), TokenKind::Int(0));
        assert_eq!(first("00"), TokenKind::Int(0));
    }

    #[test]
    fn test_radix_prefixes() {
        assert_eq!(first("0xff"), TokenKind::Int(255));
        assert_eq!(first("0o17"), TokenKind::Int(15));
        assert_eq!(first("0b1010_1010"), TokenKind::Int(170));
        assert!(lex("0b102").is_err());
        assert!(lex("0x").is_err());
    }

    #[test]
    fn test_imaginary() {
        assert_eq!(first("2j"), TokenKind::Imaginary(2.0));
        assert_eq!(first("1.5J"), TokenKind::Imaginary(1.5));
    }

    #[test]
    fn test_dot_after_digits_is_fraction() {
        let kinds: Vec<_> = lex("1..real").unwrap().into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::Float(1.0));
        assert_eq!(kinds[1], TokenKind::Punctuation(PunctuationId::Dot));
        assert_eq!(kinds[2], TokenKind::Ident("real".to_string()));

        let errors = lex("1.real").unwrap_err();
        assert_eq!(errors[0].message, "Invalid decimal literal");
    }

    #[test]
    fn test_underscore_separators() {
        assert_eq!(first("0x_ff"), TokenKind::Int(255));
        assert_eq!(first("1_0.0_1"), TokenKind::Float(10.01));
        assert_eq!(first("1e1_0"), TokenKind::Float(1e10));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(lex("007").is_err());
        assert!(lex("99999999999999999999").is_err());
        assert!(lex("12abc").is_err());
        for source in ["1_", "1__0", "1_.5", "1._5", "1e5_"] {
            let errors = lex(source).unwrap_err();
            assert_eq!(errors[0].message, "Invalid decimal literal", "{source}");
        }
        assert!(lex("0x_").is_err());
        assert!(lex("0xf_").is_err());
        assert!(lex("0b1__0").is_err());
    }
}
