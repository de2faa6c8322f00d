//! Lexer for the Tarn language
//!
//! Turns source text into the token stream the parser reads. Hard keywords become `Keyword` tokens while soft
//! keywords (`match`, `case`, `type`, `_`) stay identifiers. Number, string, bytes and f-string literals are
//! decoded here; layout is reported as `Newline`, `Indent` and `Dedent` tokens.
//!
//! Submodules: `tokens` (token types), `strings` (quotes, prefixes, escapes), `fstrings` (literal text,
//! replacement fields, format specs), `numbers` (radix, float, imaginary) and `indent` (column tracking).

mod fstrings;
mod indent;
mod numbers;
mod strings;
pub mod tokens;

pub use indent::TAB_WIDTH;
pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::Span;
use crate::diagnostics::CompileError;
use tarn_core::lang::operators::OperatorId;
use tarn_core::lang::punctuation::PunctuationId;

// Layout: at the start of each physical line the indent is measured and compared with the stack. Inside
// brackets (`bracket_depth > 0`) line breaks are dropped. F-strings re-enter the code scanner for each `{...}`
// field and leave it at the `}` closing that field at its opening depth.

/// Source-to-token scanner. Errors are collected so one run reports every lexical problem.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    indent_stack: Vec<usize>,
    pending_dedents: usize,
    at_line_start: bool,
    /// Open `(`, `[` and `{` count; newlines inside are not significant
    bracket_depth: usize,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            indent_stack: vec![0],
            pending_dedents: 0,
            at_line_start: true,
            bracket_depth: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Run the scanner to the end of the source.
    ///
    /// A non-empty logical line is always closed by `Newline`, and the stream always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<CompileError>> {
        while !self.is_at_end() {
            self.scan_token();
        }

        let end = Span::new(self.current_pos, self.current_pos);

        if self.bracket_depth > 0 {
            self.errors
                .push(CompileError::new("Unclosed bracket at end of input".to_string(), end));
        }

        if self
            .tokens
            .last()
            .is_some_and(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent))
        {
            self.tokens.push(Token::new(TokenKind::Newline, end));
        }

        // Close every open block
        for _ in 0..self.pending_dedents {
            self.tokens.push(Token::new(TokenKind::Dedent, end));
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, end));
        }

        self.tokens.push(Token::new(TokenKind::Eof, end));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.current_pos..].chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn error(&mut self, message: impl Into<String>, start: usize) {
        self.errors
            .push(CompileError::new(message.into(), Span::new(start, self.current_pos)));
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        // Handle pending dedents first
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            self.tokens.push(Token::new(
                TokenKind::Dedent,
                Span::new(self.current_pos, self.current_pos),
            ));
            return;
        }

        // Handle indentation at line start
        if self.at_line_start {
            self.handle_indentation();
            return;
        }

        // Skip whitespace (but not newlines)
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\x0c' {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return;
        };

        self.scan_lexeme(start, c);
    }

    /// Scan one lexeme whose first character `c` (at `start`) was just consumed.
    ///
    /// Shared by the line-oriented scanner and by f-string replacement fields.
    fn scan_lexeme(&mut self, start: usize, c: char) {
        match c {
            // Comments
            '#' => {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            }

            // Newlines
            '\n' => {
                // Implicit line continuation: skip newlines inside brackets
                if self.bracket_depth > 0 {
                    return;
                }
                if !self.at_line_start {
                    self.tokens
                        .push(Token::new(TokenKind::Newline, Span::new(start, self.current_pos)));
                }
                self.at_line_start = true;
            }

            '\r' => {}

            // Explicit line continuation
            '\\' => {
                self.match_char('\r');
                if !self.match_char('\n') {
                    self.error("Unexpected character after line continuation character", start);
                }
            }

            // Operators and punctuation
            '+' => self.operator(start, OperatorId::Plus, &[('=', OperatorId::PlusEq)]),
            '-' => {
                if self.match_char('>') {
                    self.add_punct(PunctuationId::Arrow, start);
                } else if self.match_char('=') {
                    self.add_op(OperatorId::MinusEq, start);
                } else {
                    self.add_op(OperatorId::Minus, start);
                }
            }
            '*' => {
                if self.match_char('*') {
                    self.operator(start, OperatorId::StarStar, &[('=', OperatorId::StarStarEq)]);
                } else {
                    self.operator(start, OperatorId::Star, &[('=', OperatorId::StarEq)]);
                }
            }
            '/' => self.scan_slash(start),
            '%' => self.operator(start, OperatorId::Percent, &[('=', OperatorId::PercentEq)]),
            '@' => self.operator(start, OperatorId::At, &[('=', OperatorId::AtEq)]),
            '|' => self.operator(start, OperatorId::Pipe, &[('=', OperatorId::PipeEq)]),
            '^' => self.operator(start, OperatorId::Caret, &[('=', OperatorId::CaretEq)]),
            '&' => self.operator(start, OperatorId::Amp, &[('=', OperatorId::AmpEq)]),
            '~' => self.add_op(OperatorId::Tilde, start),
            '<' => {
                if self.match_char('<') {
                    self.operator(start, OperatorId::LtLt, &[('=', OperatorId::LtLtEq)]);
                } else {
                    self.operator(start, OperatorId::Lt, &[('=', OperatorId::LtEq)]);
                }
            }
            '>' => {
                if self.match_char('>') {
                    self.operator(start, OperatorId::GtGt, &[('=', OperatorId::GtGtEq)]);
                } else {
                    self.operator(start, OperatorId::Gt, &[('=', OperatorId::GtEq)]);
                }
            }
            '=' => self.operator(start, OperatorId::Eq, &[('=', OperatorId::EqEq)]),
            '!' => {
                if self.match_char('=') {
                    self.add_op(OperatorId::NotEq, start);
                } else {
                    self.error("Unexpected character '!'", start);
                }
            }
            ':' => {
                if self.match_char('=') {
                    self.add_op(OperatorId::Walrus, start);
                } else {
                    self.add_punct(PunctuationId::Colon, start);
                }
            }
            ',' => self.add_punct(PunctuationId::Comma, start),
            ';' => self.add_punct(PunctuationId::Semicolon, start),
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number(start, c);
                } else if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    self.add_punct(PunctuationId::Ellipsis, start);
                } else {
                    self.add_punct(PunctuationId::Dot, start);
                }
            }
            '(' => self.open_bracket(PunctuationId::LParen, start),
            ')' => self.close_bracket(PunctuationId::RParen, start),
            '[' => self.open_bracket(PunctuationId::LBracket, start),
            ']' => self.close_bracket(PunctuationId::RBracket, start),
            '{' => self.open_bracket(PunctuationId::LBrace, start),
            '}' => self.close_bracket(PunctuationId::RBrace, start),

            // Strings
            '"' | '\'' => self.scan_quoted(start, c, strings::StringPrefix::default()),

            // Numbers
            '0'..='9' => self.scan_number(start, c),

            // Identifiers, keywords, and prefixed strings (r"", b"", f"", rb"", ...)
            _ if is_ident_start(c) => match self.string_prefix(c) {
                Some(prefix) => {
                    // Consume the remaining prefix letters; the quote comes next.
                    for _ in 1..prefix.len {
                        self.advance();
                    }
                    match self.advance() {
                        Some(quote) => self.scan_quoted(start, quote, prefix),
                        None => self.error("Unterminated string", start),
                    }
                }
                None => self.scan_identifier(start),
            },

            _ => self.error(format!("Unexpected character '{}'", c), start),
        }
    }

    // ========================================================================
    // Operator helpers
    // ========================================================================

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos)));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    /// Try to match compound operator, fallback to simple.
    fn operator(&mut self, start: usize, simple: OperatorId, compounds: &[(char, OperatorId)]) {
        for (c, id) in compounds {
            if self.match_char(*c) {
                self.add_op(*id, start);
                return;
            }
        }
        self.add_op(simple, start);
    }

    /// Scan slash operators: `/`, `/=`, `//`, `//=`.
    fn scan_slash(&mut self, start: usize) {
        if self.match_char('/') {
            self.operator(start, OperatorId::SlashSlash, &[('=', OperatorId::SlashSlashEq)]);
        } else {
            self.operator(start, OperatorId::Slash, &[('=', OperatorId::SlashEq)]);
        }
    }

    /// Emit a bracket token and track bracket depth.
    fn open_bracket(&mut self, kind: PunctuationId, start: usize) {
        self.bracket_depth += 1;
        self.add_punct(kind, start);
    }

    /// Emit a closing bracket token and decrement bracket depth.
    /// Produces an error if there's no matching opening bracket.
    fn close_bracket(&mut self, kind: PunctuationId, start: usize) {
        if self.bracket_depth == 0 {
            self.error("Unmatched closing bracket", start);
        } else {
            self.bracket_depth -= 1;
        }
        self.add_punct(kind, start);
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        if let Some(id) = keyword_id(spelling) {
            self.add_token(TokenKind::Keyword(id), start);
        } else {
            self.add_token(TokenKind::Ident(spelling.to_string()), start);
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<CompileError>> {
    let result = Lexer::new(source).tokenize();
    if let Err(errors) = &result {
        tracing::debug!(error_count = errors.len(), "lexing failed");
    }
    result
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::lang::keywords::KeywordId;

    /// Token kinds without the trailing layout tokens and `Eof`.
    fn kinds(source: &str) -> Vec<TokenKind> {
        let tokens = lex(source).unwrap_or_else(|errs| panic!("lex({:?}) failed: {:?}", source, errs));
        tokens
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !matches!(k, TokenKind::Newline | TokenKind::Eof))
            .collect()
    }

    #[test]
    fn test_punctuation_registry_parity() {
        use tarn_core::lang::punctuation;

        for p in punctuation::PUNCTUATION {
            let source = match p.id {
                // Closing delimiters error when unmatched; use a matching pair.
                PunctuationId::LParen | PunctuationId::RParen => "()",
                PunctuationId::LBracket | PunctuationId::RBracket => "[]",
                PunctuationId::LBrace | PunctuationId::RBrace => "{}",
                _ => p.canonical,
            };
            let tokens = kinds(source);
            assert!(
                tokens.iter().any(|k| k.is_punctuation(p.id)),
                "expected {:?} in {:?}",
                p.id,
                tokens
            );
            if source == p.canonical {
                assert_eq!(tokens.len(), 1, "expected single token for {:?}", p.canonical);
            }
        }
    }

    #[test]
    fn test_keyword_registry_parity() {
        use tarn_core::lang::keywords;

        for k in keywords::KEYWORDS {
            let tokens = kinds(k.canonical);
            assert_eq!(tokens.len(), 1, "expected single token for keyword {:?}, got {:?}", k.id, tokens);
            if k.soft {
                assert_eq!(tokens[0], TokenKind::Ident(k.canonical.to_string()));
            } else {
                assert!(tokens[0].is_keyword(k.id));
            }
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        use tarn_core::lang::operators;

        for o in operators::OPERATORS {
            for &sp in o.spellings {
                let tokens = kinds(sp);
                assert_eq!(tokens.len(), 1, "expected single token for operator {:?}, got {:?}", sp, tokens);

                if o.is_keyword_spelling {
                    let expected_kw = match o.id {
                        OperatorId::And => KeywordId::And,
                        OperatorId::Or => KeywordId::Or,
                        OperatorId::Not => KeywordId::Not,
                        OperatorId::In => KeywordId::In,
                        OperatorId::Is => KeywordId::Is,
                        _ => panic!("unexpected keyword-spelling operator {:?}", o.id),
                    };
                    assert!(tokens[0].is_keyword(expected_kw));
                } else {
                    assert!(tokens[0].is_operator(o.id), "{:?} lexed as {:?}", sp, tokens[0]);
                }
            }
        }
    }

    #[test]
    fn test_longest_match_operators() {
        let tokens = kinds("a **= b //= c >>= d := e -> f ... g");
        assert!(tokens[1].is_operator(OperatorId::StarStarEq));
        assert!(tokens[3].is_operator(OperatorId::SlashSlashEq));
        assert!(tokens[5].is_operator(OperatorId::GtGtEq));
        assert!(tokens[7].is_operator(OperatorId::Walrus));
        assert!(tokens[9].is_punctuation(PunctuationId::Arrow));
        assert!(tokens[11].is_punctuation(PunctuationId::Ellipsis));
    }

    #[test]
    fn test_soft_keywords_lex_as_identifiers() {
        let tokens = kinds("match case type _ lambda");
        assert_eq!(tokens[0], TokenKind::Ident("match".to_string()));
        assert_eq!(tokens[3], TokenKind::Ident("_".to_string()));
        assert!(tokens[4].is_keyword(KeywordId::Lambda));
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(kinds("π"), vec![TokenKind::Ident("π".to_string())]);
    }

    #[test]
    fn test_newlines_inside_brackets() {
        let tokens = lex("x = (1,\n     2)\ny = 3\n").unwrap();
        let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
        assert_eq!(newlines, 2);
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Indent));
    }

    #[test]
    fn test_explicit_line_continuation() {
        let tokens = lex("x = 1 + \\\n    2\n").unwrap();
        let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Indent));
    }

    #[test]
    fn test_trailing_newline_is_synthesized() {
        let tokens = lex("pass").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::Eof);
        assert_eq!(lex("").unwrap().len(), 1);
    }

    #[test]
    fn test_semicolons() {
        let tokens = kinds("a = 1; b = 2");
        assert!(tokens[3].is_punctuation(PunctuationId::Semicolon));
    }

    #[test]
    fn test_unmatched_closing_bracket() {
        let errors = lex("x)").unwrap_err();
        assert!(errors[0].message.contains("Unmatched closing bracket"));
    }

    #[test]
    fn test_unclosed_bracket() {
        let errors = lex("x = (1,\n").unwrap_err();
        assert!(errors[0].message.contains("Unclosed bracket"));
    }

    #[test]
    fn test_unexpected_character() {
        let errors = lex("a $ b").unwrap_err();
        assert_eq!(errors[0].message, "Unexpected character '$'");
        assert_eq!(errors[0].span, Span::new(2, 3));
    }
}
