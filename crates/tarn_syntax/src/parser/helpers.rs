/// Token-stream helpers and backtracking.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `peek_next`, `peek_nth`, `advance`)
/// - Matching / expecting keywords, soft keywords, operators, and punctuation
/// - Layout handling (`skip_newlines`, `at_statement_end`)
/// - Snapshot/restore for alternative productions (`attempt`, `speculate`)
///
/// No other chunk touches `self.pos` except through `snapshot`/`restore`.
impl<'a> Parser<'a> {
    // ========================================================================
    // Cursor
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &'a Token {
        self.peek_nth(0)
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &'a Token {
        self.peek_nth(1)
    }

    /// Return the token `n` positions ahead, or `Eof` past the end of the stream.
    fn peek_nth(&self, n: usize) -> &'a Token {
        self.tokens.get(self.pos + n).unwrap_or(&EOF_TOKEN)
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &'a Token {
        let index = self.pos;
        if index < self.tokens.len() {
            self.pos += 1;
        }
        self.tokens.get(index).unwrap_or(&EOF_TOKEN)
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Start offset of the current token.
    fn current_start(&self) -> usize {
        self.peek().span.start
    }

    /// End offset of the last consumed token that is not layout.
    ///
    /// Node spans end here, so a block never swallows the `Newline`/`Dedent` that closed it.
    fn prev_end(&self) -> usize {
        self.tokens[..self.pos.min(self.tokens.len())]
            .iter()
            .rev()
            .find(|t| !t.kind.is_layout())
            .map_or(0, |t| t.span.end)
    }

    // ========================================================================
    // Predicates and conditional consumption
    // ========================================================================

    /// Return `true` if the current token “matches” `kind`.
    ///
    /// ## Notes
    /// - For ID-carrying tokens (keywords/operators/punctuation), the IDs must match.
    /// - For data-bearing tokens (identifiers/literals), the variant is compared and the
    ///   payload value is ignored.
    fn check(&self, kind: &TokenKind) -> bool {
        match (kind, &self.peek().kind) {
            (TokenKind::Keyword(k1), TokenKind::Keyword(k2)) => k1 == k2,
            (TokenKind::Operator(o1), TokenKind::Operator(o2)) => o1 == o2,
            (TokenKind::Punctuation(p1), TokenKind::Punctuation(p2)) => p1 == p2,
            _ => std::mem::discriminant(kind) == std::mem::discriminant(&self.peek().kind),
        }
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is an identifier spelled like the soft keyword `id`.
    fn check_soft_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_soft_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn check_next_punct(&self, id: PunctuationId) -> bool {
        self.peek_next().kind.is_punctuation(id)
    }

    fn check_next_op(&self, id: OperatorId) -> bool {
        self.peek_next().kind.is_operator(id)
    }

    fn check_ident(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_))
    }

    /// If the current token matches `kind`, consume it and return `true`.
    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Expectations
    // ========================================================================

    /// Build a syntax error at the current token: `"<msg>, found <token>"`.
    fn error_at_current(&self, msg: &str) -> CompileError {
        CompileError::syntax(
            format!("{}, found {}", msg, self.peek().kind.describe()),
            self.current_span(),
        )
    }

    fn expect(&mut self, kind: &TokenKind, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(msg))
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(msg))
        }
    }

    fn expect_op(&mut self, id: OperatorId, msg: &str) -> Result<&'a Token, CompileError> {
        if self.check_op(id) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(msg))
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    fn skip_newlines(&mut self) {
        while self.match_token(&TokenKind::Newline) {}
    }

    /// Return `true` where a simple statement may end.
    fn at_statement_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent)
            || self.check_punct(PunctuationId::Semicolon)
    }

    // ========================================================================
    // Backtracking
    // ========================================================================

    /// Absolute cursor position, to be handed back to [`Parser::restore`].
    fn snapshot(&self) -> usize {
        self.pos
    }

    fn restore(&mut self, snapshot: usize) {
        if snapshot != self.pos {
            tracing::trace!(from = self.pos, to = snapshot, "restore cursor");
        }
        self.pos = snapshot;
    }

    /// Try one alternative production.
    ///
    /// `Ok(None)` means the input is not this form; the cursor is restored so the next alternative starts from the
    /// same place. An `Err` means the form was recognized but is malformed, and it propagates.
    fn attempt<T>(
        &mut self,
        alternative: impl FnOnce(&mut Self) -> Result<Option<T>, CompileError>,
    ) -> Result<Option<T>, CompileError> {
        let start = self.snapshot();
        let result = alternative(self);
        if matches!(result, Ok(None)) {
            self.restore(start);
        }
        result
    }

    /// Trial-parse `rule`, restoring the cursor and discarding the error if it fails.
    fn speculate<T>(&mut self, rule: impl FnOnce(&mut Self) -> Result<T, CompileError>) -> Option<T> {
        let start = self.snapshot();
        match rule(self) {
            Ok(node) => Some(node),
            Err(e) => {
                tracing::trace!(message = %e.message, "speculative parse failed");
                self.restore(start);
                None
            }
        }
    }
}
