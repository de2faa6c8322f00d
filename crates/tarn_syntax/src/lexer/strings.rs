//! String scanning for the Tarn lexer
//!
//! Handles string prefixes (`r`, `b`, `f`, `u` and their two-letter combinations), single- and triple-quoted
//! strings, byte strings, and escape sequences. F-string bodies live in `fstrings`.

use super::Lexer;
use super::tokens::TokenKind;

/// Flags parsed from a string prefix such as `rb` or `F`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct StringPrefix {
    pub raw: bool,
    pub bytes: bool,
    pub format: bool,
    /// Number of prefix characters
    pub len: usize,
}

// ============================================================================
// Escape sequence handling
// ============================================================================

/// Result of processing an escape sequence
pub(super) enum EscapeResult {
    /// Successfully parsed escape character
    Char(char),
    /// Unknown escape - preserve as-is (backslash + char)
    Unknown(char),
    /// Backslash-newline: the line continues, nothing is produced
    Continuation,
    /// Malformed numeric escape
    Invalid(String),
    /// End of input during escape
    Eof,
}

impl<'a> Lexer<'a> {
    /// Process a text escape sequence. Called after consuming the backslash.
    pub(super) fn scan_text_escape(&mut self) -> EscapeResult {
        let Some(c) = self.advance() else {
            return EscapeResult::Eof;
        };
        match c {
            'n' => EscapeResult::Char('\n'),
            't' => EscapeResult::Char('\t'),
            'r' => EscapeResult::Char('\r'),
            'a' => EscapeResult::Char('\x07'),
            'b' => EscapeResult::Char('\x08'),
            'f' => EscapeResult::Char('\x0c'),
            'v' => EscapeResult::Char('\x0b'),
            '\\' | '\'' | '"' => EscapeResult::Char(c),
            '\n' => EscapeResult::Continuation,
            '0'..='7' => {
                let code = self.scan_octal_escape(c);
                EscapeResult::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            'x' => self.scan_hex_escape('x', 2),
            'u' => self.scan_hex_escape('u', 4),
            'U' => self.scan_hex_escape('U', 8),
            c => EscapeResult::Unknown(c),
        }
    }

    /// Process a byte escape sequence. Called after consuming the backslash.
    ///
    /// `\u`, `\U` and `\N` have no meaning in bytes and are preserved verbatim.
    fn scan_byte_escape(&mut self) -> EscapeResult {
        match self.peek() {
            Some('u' | 'U' | 'N') => {
                let c = self.advance().unwrap_or('u');
                EscapeResult::Unknown(c)
            }
            _ => self.scan_text_escape(),
        }
    }

    /// Up to three octal digits, the first already consumed.
    fn scan_octal_escape(&mut self, first: char) -> u32 {
        let mut code = first.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    code = code * 8 + d;
                    self.advance();
                }
                None => break,
            }
        }
        code
    }

    fn scan_hex_escape(&mut self, marker: char, digits: usize) -> EscapeResult {
        let mut hex = String::with_capacity(digits);
        for _ in 0..digits {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.advance();
                }
                _ => break,
            }
        }
        if hex.len() != digits {
            return EscapeResult::Invalid(format!("\\{}{}", marker, hex));
        }
        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            Some(c) => EscapeResult::Char(c),
            None => EscapeResult::Invalid(format!("\\{}{}", marker, hex)),
        }
    }
}

// ============================================================================
// String scanning
// ============================================================================

impl<'a> Lexer<'a> {
    /// Recognise a string prefix starting with `first` (already consumed) and followed by a quote.
    ///
    /// Nothing is consumed; the caller advances past the remaining prefix letters.
    pub(super) fn string_prefix(&self, first: char) -> Option<StringPrefix> {
        let rest = &self.source[self.current_pos..];
        let mut chars = rest.chars();
        let second = chars.next()?;
        let (letters, quote) = if second == '"' || second == '\'' {
            (vec![first], second)
        } else {
            (vec![first, second], chars.next()?)
        };
        if quote != '"' && quote != '\'' {
            return None;
        }
        let lowered: String = letters.iter().map(|c| c.to_ascii_lowercase()).collect();
        let prefix = StringPrefix {
            raw: lowered.contains('r'),
            bytes: lowered.contains('b'),
            format: lowered.contains('f'),
            len: letters.len(),
        };
        match lowered.as_str() {
            "r" | "u" | "b" | "f" | "rb" | "br" | "rf" | "fr" => Some(prefix),
            _ => None,
        }
    }

    /// Scan a quoted literal whose opening quote was just consumed.
    pub(super) fn scan_quoted(&mut self, start: usize, quote: char, prefix: StringPrefix) {
        let triple = self.peek() == Some(quote) && self.peek_next() == Some(quote);
        if triple {
            self.advance();
            self.advance();
        }

        if prefix.format {
            self.scan_fstring(start, quote, triple, prefix.raw);
        } else if prefix.bytes {
            self.scan_byte_string(start, quote, triple, prefix.raw);
        } else {
            self.scan_string(start, quote, triple, prefix.raw);
        }
    }

    /// Whether the closing delimiter (`quote`, or three of them) starts at the cursor.
    pub(super) fn at_closing_quote(&self, quote: char, triple: bool) -> bool {
        let needed = if triple { 3 } else { 1 };
        let mut chars = self.source[self.current_pos..].chars();
        (0..needed).all(|_| chars.next() == Some(quote))
    }

    pub(super) fn consume_closing_quote(&mut self, triple: bool) {
        let count = if triple { 3 } else { 1 };
        for _ in 0..count {
            self.advance();
        }
    }

    fn scan_string(&mut self, start: usize, quote: char, triple: bool, raw: bool) {
        let mut value = String::new();

        loop {
            if self.at_closing_quote(quote, triple) {
                self.consume_closing_quote(triple);
                break;
            }
            match self.peek() {
                None => {
                    self.error("Unterminated string", start);
                    return;
                }
                Some('\n') if !triple => {
                    self.error("Unterminated string (newline in single-quoted string)", start);
                    return;
                }
                Some('\\') if raw => {
                    // A raw backslash still keeps the next character from closing the string.
                    value.push('\\');
                    self.advance();
                    if let Some(c) = self.advance() {
                        value.push(c);
                    }
                }
                Some('\\') => {
                    self.advance();
                    match self.scan_text_escape() {
                        EscapeResult::Char(c) => value.push(c),
                        EscapeResult::Unknown(c) => {
                            value.push('\\');
                            value.push(c);
                        }
                        EscapeResult::Continuation => {}
                        EscapeResult::Invalid(seq) => {
                            self.error(format!("Invalid escape sequence: {}", seq), start);
                        }
                        EscapeResult::Eof => {
                            self.error("Unterminated escape sequence", start);
                            return;
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        self.add_token(TokenKind::String(value), start);
    }

    fn scan_byte_string(&mut self, start: usize, quote: char, triple: bool, raw: bool) {
        let mut value = Vec::new();

        loop {
            if self.at_closing_quote(quote, triple) {
                self.consume_closing_quote(triple);
                break;
            }
            match self.peek() {
                None => {
                    self.error("Unterminated byte string", start);
                    return;
                }
                Some('\n') if !triple => {
                    self.error("Unterminated byte string (newline in string)", start);
                    return;
                }
                Some('\\') if raw => {
                    value.push(b'\\');
                    self.advance();
                    if let Some(c) = self.advance() {
                        self.push_byte(&mut value, c, start);
                    }
                }
                Some('\\') => {
                    self.advance();
                    match self.scan_byte_escape() {
                        EscapeResult::Char(c) => match u8::try_from(u32::from(c)) {
                            Ok(b) => value.push(b),
                            Err(_) => self.error(format!("Byte escape out of range: {:?}", c), start),
                        },
                        EscapeResult::Unknown(c) => {
                            value.push(b'\\');
                            self.push_byte(&mut value, c, start);
                        }
                        EscapeResult::Continuation => {}
                        EscapeResult::Invalid(seq) => {
                            self.error(format!("Invalid hex escape: {}", seq), start);
                        }
                        EscapeResult::Eof => {
                            self.error("Unterminated escape sequence", start);
                            return;
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    self.push_byte(&mut value, c, start);
                }
            }
        }

        self.add_token(TokenKind::Bytes(value), start);
    }

    /// Byte strings only hold ASCII source characters.
    fn push_byte(&mut self, value: &mut Vec<u8>, c: char, start: usize) {
        if c.is_ascii() {
            value.push(c as u8);
        } else {
            self.error(format!("Non-ASCII character in byte string: '{}'", c), start);
        }
    }
}
