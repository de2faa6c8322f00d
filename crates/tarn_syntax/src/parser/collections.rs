/// Bracketed displays and comprehensions.
///
/// Classification rules:
/// - `()` is an empty tuple; `(x)` a group; `(x,)` and `(x, y)` tuples; `(x for ...)` a generator.
/// - `[...]` is a list or a list comprehension.
/// - `{}` is an empty dict; `{**m, ...}` a dict; otherwise one entry is trial-parsed and a following `:` picks dict
///   over set, after which the cursor is restored and the display is parsed with the chosen grammar.
impl<'a> Parser<'a> {
    // ========================================================================
    // Parentheses
    // ========================================================================

    fn paren_display(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.advance().span.start; // (

        if self.match_punct(PunctuationId::RParen) {
            return Ok(Spanned::new(Expr::Tuple(Vec::new()), Span::new(start, self.prev_end())));
        }

        if self.check_keyword(KeywordId::Yield) {
            let value = self.yield_expression()?;
            self.expect_punct(PunctuationId::RParen, "Expected ')' after yield expression")?;
            return Ok(Spanned::new(Expr::Group(Box::new(value)), Span::new(start, self.prev_end())));
        }

        let first = self.star_named_expression()?;

        if self.at_comprehension_start() {
            self.reject_starred_element(&first)?;
            let clauses = self.comprehension_clauses()?;
            self.expect_punct(PunctuationId::RParen, "Expected ')' after generator expression")?;
            let span = Span::new(start, self.prev_end());
            return Ok(Spanned::new(
                Expr::GenExpr(Box::new(Comprehension {
                    element: first,
                    clauses,
                })),
                span,
            ));
        }

        if self.check_punct(PunctuationId::Comma) {
            let elements = self.display_elements(first, PunctuationId::RParen)?;
            self.expect_punct(PunctuationId::RParen, "Expected ')' after tuple elements")?;
            return Ok(Spanned::new(Expr::Tuple(elements), Span::new(start, self.prev_end())));
        }

        self.expect_punct(PunctuationId::RParen, "Expected ')'")?;
        if matches!(first.node, Expr::Starred(_)) {
            return Err(CompileError::syntax(
                "cannot use starred expression here".to_string(),
                first.span,
            ));
        }
        Ok(Spanned::new(Expr::Group(Box::new(first)), Span::new(start, self.prev_end())))
    }

    // ========================================================================
    // Lists
    // ========================================================================

    fn list_display(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.advance().span.start; // [

        if self.match_punct(PunctuationId::RBracket) {
            return Ok(Spanned::new(Expr::List(Vec::new()), Span::new(start, self.prev_end())));
        }

        let first = self.star_named_expression()?;

        if self.at_comprehension_start() {
            self.reject_starred_element(&first)?;
            let clauses = self.comprehension_clauses()?;
            self.expect_punct(PunctuationId::RBracket, "Expected ']' after list comprehension")?;
            let span = Span::new(start, self.prev_end());
            return Ok(Spanned::new(
                Expr::ListComp(Box::new(Comprehension {
                    element: first,
                    clauses,
                })),
                span,
            ));
        }

        let elements = self.display_elements(first, PunctuationId::RBracket)?;
        self.expect_punct(PunctuationId::RBracket, "Expected ']' after list elements")?;
        Ok(Spanned::new(Expr::List(elements), Span::new(start, self.prev_end())))
    }

    /// Remaining comma-separated elements after `first`, up to (not including) `close`.
    fn display_elements(
        &mut self,
        first: Spanned<Expr>,
        close: PunctuationId,
    ) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let mut elements = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_punct(close) {
                break;
            }
            elements.push(self.star_named_expression()?);
        }
        Ok(elements)
    }

    // ========================================================================
    // Braces: dict or set
    // ========================================================================

    fn brace_display(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.advance().span.start; // {

        if self.match_punct(PunctuationId::RBrace) {
            return Ok(Spanned::new(Expr::Dict(Vec::new()), Span::new(start, self.prev_end())));
        }

        let is_dict = self.check_op(OperatorId::StarStar) || self.brace_entry_is_pair();
        tracing::debug!(is_dict, "brace display classified");

        if is_dict {
            self.dict_display(start)
        } else {
            self.set_display(start)
        }
    }

    /// Trial-parse one expression and report whether a `:` follows. The cursor is always restored.
    fn brace_entry_is_pair(&mut self) -> bool {
        let snapshot = self.snapshot();
        let is_pair = self.speculate(|p| p.expression()).is_some() && self.check_punct(PunctuationId::Colon);
        self.restore(snapshot);
        is_pair
    }

    fn dict_display(&mut self, start: usize) -> Result<Spanned<Expr>, CompileError> {
        let first = self.dict_entry()?;

        if self.at_comprehension_start() {
            let DictEntry::Pair(key, value) = first.node else {
                return Err(CompileError::syntax(
                    "dict unpacking cannot be used in dict comprehension".to_string(),
                    first.span,
                ));
            };
            let clauses = self.comprehension_clauses()?;
            self.expect_punct(PunctuationId::RBrace, "Expected '}' after dict comprehension")?;
            let span = Span::new(start, self.prev_end());
            return Ok(Spanned::new(
                Expr::DictComp(Box::new(DictComprehension { key, value, clauses })),
                span,
            ));
        }

        let mut entries = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_punct(PunctuationId::RBrace) {
                break;
            }
            entries.push(self.dict_entry()?);
        }
        self.expect_punct(PunctuationId::RBrace, "Expected '}' after dict entries")?;
        Ok(Spanned::new(Expr::Dict(entries), Span::new(start, self.prev_end())))
    }

    /// `'**' bitwise_or | expression ':' expression`
    fn dict_entry(&mut self) -> Result<Spanned<DictEntry>, CompileError> {
        if self.check_op(OperatorId::StarStar) {
            let start = self.advance().span.start;
            let value = self.bitwise_or()?;
            let span = Span::new(start, value.span.end);
            return Ok(Spanned::new(DictEntry::Unpack(value), span));
        }

        let key = self.expression()?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' after dict key")?;
        let value = self.expression()?;
        let span = key.span.merge(value.span);
        Ok(Spanned::new(DictEntry::Pair(key, value), span))
    }

    fn set_display(&mut self, start: usize) -> Result<Spanned<Expr>, CompileError> {
        let first = self.star_named_expression()?;

        if self.at_comprehension_start() {
            self.reject_starred_element(&first)?;
            let clauses = self.comprehension_clauses()?;
            self.expect_punct(PunctuationId::RBrace, "Expected '}' after set comprehension")?;
            let span = Span::new(start, self.prev_end());
            return Ok(Spanned::new(
                Expr::SetComp(Box::new(Comprehension {
                    element: first,
                    clauses,
                })),
                span,
            ));
        }

        let elements = self.display_elements(first, PunctuationId::RBrace)?;
        self.expect_punct(PunctuationId::RBrace, "Expected '}' after set elements")?;
        Ok(Spanned::new(Expr::Set(elements), Span::new(start, self.prev_end())))
    }

    // ========================================================================
    // Comprehension clauses
    // ========================================================================

    /// `for` or `async for` ahead.
    fn at_comprehension_start(&self) -> bool {
        self.check_keyword(KeywordId::For)
            || (self.check_keyword(KeywordId::Async) && self.peek_next().kind.is_keyword(KeywordId::For))
    }

    fn reject_starred_element(&self, element: &Spanned<Expr>) -> Result<(), CompileError> {
        if matches!(element.node, Expr::Starred(_)) {
            return Err(CompileError::syntax(
                "iterable unpacking cannot be used in comprehension".to_string(),
                element.span,
            ));
        }
        Ok(())
    }

    /// One or more `[async] for targets in disjunction ('if' disjunction)*` clauses.
    fn comprehension_clauses(&mut self) -> Result<Vec<Spanned<ComprehensionClause>>, CompileError> {
        let mut clauses = Vec::new();

        while self.at_comprehension_start() {
            let start = self.current_start();
            let is_async = self.match_keyword(KeywordId::Async);
            self.expect_keyword(KeywordId::For, "Expected 'for'")?;
            let target = self.star_targets()?;
            self.expect_keyword(KeywordId::In, "Expected 'in' after comprehension target")?;
            let iter = self.disjunction()?;

            let mut ifs = Vec::new();
            while self.match_keyword(KeywordId::If) {
                ifs.push(self.disjunction()?);
            }

            let span = Span::new(start, self.prev_end());
            clauses.push(Spanned::new(
                ComprehensionClause {
                    is_async,
                    target,
                    iter,
                    ifs,
                },
                span,
            ));
        }

        Ok(clauses)
    }
}
