/// Structural pattern parsing for `case` clauses.
///
/// ## Notes
/// - `case a, *rest:` is an open sequence and becomes a tuple sequence pattern.
/// - `_` is the wildcard, never a capture; `*_` and `**_` are rejected where a name would be bound.
/// - Literal patterns keep their expression form (`-1`, `1 + 2j`, `"a" "b"`) so they render like source.
impl<'a> Parser<'a> {
    // ========================================================================
    // Entry and combinators
    // ========================================================================

    /// `open_sequence_pattern | pattern`
    fn patterns(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let first = self.maybe_star_pattern()?;
        if !self.check_punct(PunctuationId::Comma) {
            if matches!(first.node, Pattern::Star(_)) {
                return Err(CompileError::syntax(
                    "star pattern must be inside a sequence pattern".to_string(),
                    first.span,
                ));
            }
            return Ok(first);
        }

        let start = first.span.start;
        let mut elements = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_punct(PunctuationId::Colon) || self.check_keyword(KeywordId::If) || self.is_at_end() {
                break;
            }
            elements.push(self.maybe_star_pattern()?);
        }
        self.sequence(SequenceKind::Tuple, elements, Span::new(start, self.prev_end()))
    }

    /// `or_pattern ['as' NAME]`
    fn pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let pattern = self.or_pattern()?;
        if !self.match_keyword(KeywordId::As) {
            return Ok(pattern);
        }

        if self.check_soft_keyword(KeywordId::Underscore) {
            return Err(self.error_at_current("cannot use '_' as a target"));
        }
        let name = self.identifier_after("invalid pattern target")?;
        let span = Span::new(pattern.span.start, self.prev_end());
        Ok(Spanned::new(Pattern::As(Box::new(pattern), name), span))
    }

    /// `closed_pattern ('|' closed_pattern)*`; a single alternative is returned as is.
    fn or_pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let first = self.closed_pattern()?;
        if !self.check_op(OperatorId::Pipe) {
            return Ok(first);
        }

        let start = first.span.start;
        let mut alternatives = vec![first];
        while self.match_op(OperatorId::Pipe) {
            alternatives.push(self.closed_pattern()?);
        }
        Ok(Spanned::new(Pattern::Or(alternatives), Span::new(start, self.prev_end())))
    }

    /// `'*' NAME | pattern`
    fn maybe_star_pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        if !self.check_op(OperatorId::Star) {
            return self.pattern();
        }

        let start = self.advance().span.start;
        let name = if self.check_soft_keyword(KeywordId::Underscore) {
            self.advance();
            None
        } else {
            Some(self.identifier_after("Expected name after '*' in pattern")?)
        };
        Ok(Spanned::new(Pattern::Star(name), Span::new(start, self.prev_end())))
    }

    /// Build a sequence pattern, rejecting more than one star.
    fn sequence(
        &self,
        kind: SequenceKind,
        elements: Vec<Spanned<Pattern>>,
        span: Span,
    ) -> Result<Spanned<Pattern>, CompileError> {
        let stars = elements.iter().filter(|p| matches!(p.node, Pattern::Star(_))).count();
        if stars > 1 {
            return Err(CompileError::syntax(
                "multiple starred names in sequence pattern".to_string(),
                span,
            ));
        }
        Ok(Spanned::new(Pattern::Sequence(kind, elements), span))
    }

    // ========================================================================
    // Closed patterns
    // ========================================================================

    fn closed_pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let start = self.current_start();

        if self.at_pattern_literal() {
            let value = self.pattern_literal()?;
            let span = value.span;
            return Ok(Spanned::new(Pattern::Literal(Box::new(value)), span));
        }

        match &self.peek().kind {
            TokenKind::Ident(_) => self.name_pattern(),
            TokenKind::Punctuation(PunctuationId::LParen) => self.paren_pattern(),
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                let elements = self.pattern_elements(PunctuationId::RBracket)?;
                self.expect_punct(PunctuationId::RBracket, "Expected ']' after sequence pattern")?;
                self.sequence(SequenceKind::List, elements, Span::new(start, self.prev_end()))
            }
            TokenKind::Punctuation(PunctuationId::LBrace) => self.mapping_pattern(),
            TokenKind::Operator(OperatorId::Star) => Err(self.error_at_current("star pattern not allowed here")),
            _ => Err(self.error_at_current("Expected pattern")),
        }
    }

    /// Wildcard, capture, dotted value, or class pattern.
    fn name_pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let start = self.current_start();
        let is_wildcard = self.check_soft_keyword(KeywordId::Underscore);
        let name = self.identifier()?;

        let mut value = Spanned::new(Expr::Name(name.clone()), Span::new(start, self.prev_end()));
        let mut dotted = false;
        while self.match_punct(PunctuationId::Dot) {
            let attr = self.identifier_after("Expected attribute name after '.'")?;
            value = Spanned::new(
                Expr::Attribute(Box::new(value), attr),
                Span::new(start, self.prev_end()),
            );
            dotted = true;
        }

        if self.check_punct(PunctuationId::LParen) {
            return self.class_pattern(value);
        }

        let span = Span::new(start, self.prev_end());
        let pattern = if dotted {
            Pattern::Value(Box::new(value))
        } else if is_wildcard {
            Pattern::Wildcard
        } else {
            Pattern::Capture(name)
        };
        Ok(Spanned::new(pattern, span))
    }

    /// `class '(' [positional patterns] [NAME '=' pattern ...] [','] ')'`
    fn class_pattern(&mut self, class: Spanned<Expr>) -> Result<Spanned<Pattern>, CompileError> {
        let start = class.span.start;
        self.advance(); // (

        let mut patterns = Vec::new();
        let mut keywords: Vec<Spanned<KeywordPattern>> = Vec::new();
        while !self.check_punct(PunctuationId::RParen) && !self.is_at_end() {
            if self.check_ident() && self.check_next_op(OperatorId::Eq) {
                let kw_start = self.current_start();
                let name = self.identifier()?;
                self.advance(); // =
                let pattern = self.pattern()?;
                keywords.push(Spanned::new(
                    KeywordPattern { name, pattern },
                    Span::new(kw_start, self.prev_end()),
                ));
            } else {
                let pattern = self.pattern()?;
                if !keywords.is_empty() {
                    return Err(CompileError::syntax(
                        "positional patterns follow keyword patterns".to_string(),
                        pattern.span,
                    ));
                }
                patterns.push(pattern);
            }

            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after class pattern arguments")?;

        Ok(Spanned::new(
            Pattern::Class(ClassPattern {
                class,
                patterns,
                keywords,
            }),
            Span::new(start, self.prev_end()),
        ))
    }

    /// `()` empty sequence, `(p)` group, `(p,)` / `(p, q)` tuple sequence.
    fn paren_pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let start = self.advance().span.start; // (

        if self.match_punct(PunctuationId::RParen) {
            return Ok(Spanned::new(
                Pattern::Sequence(SequenceKind::Tuple, Vec::new()),
                Span::new(start, self.prev_end()),
            ));
        }

        let first = self.maybe_star_pattern()?;
        if self.check_punct(PunctuationId::Comma) {
            let mut elements = vec![first];
            while self.match_punct(PunctuationId::Comma) {
                if self.check_punct(PunctuationId::RParen) {
                    break;
                }
                elements.push(self.maybe_star_pattern()?);
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' after sequence pattern")?;
            return self.sequence(SequenceKind::Tuple, elements, Span::new(start, self.prev_end()));
        }

        self.expect_punct(PunctuationId::RParen, "Expected ')' after pattern")?;
        if matches!(first.node, Pattern::Star(_)) {
            return Err(CompileError::syntax(
                "star pattern must be inside a sequence pattern".to_string(),
                first.span,
            ));
        }
        Ok(Spanned::new(Pattern::Group(Box::new(first)), Span::new(start, self.prev_end())))
    }

    /// Comma-separated sequence elements up to (not including) `close`.
    fn pattern_elements(&mut self, close: PunctuationId) -> Result<Vec<Spanned<Pattern>>, CompileError> {
        let mut elements = Vec::new();
        while !self.check_punct(close) && !self.is_at_end() {
            elements.push(self.maybe_star_pattern()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        Ok(elements)
    }

    // ========================================================================
    // Mapping patterns
    // ========================================================================

    /// `'{' [key ':' pattern (',' key ':' pattern)*] [',' '**' NAME] [','] '}'`
    fn mapping_pattern(&mut self) -> Result<Spanned<Pattern>, CompileError> {
        let start = self.advance().span.start; // {

        let mut entries = Vec::new();
        let mut rest: Option<Ident> = None;
        while !self.check_punct(PunctuationId::RBrace) && !self.is_at_end() {
            if rest.is_some() {
                return Err(self.error_at_current("double star pattern must be last in a mapping pattern"));
            }

            if self.match_op(OperatorId::StarStar) {
                if self.check_soft_keyword(KeywordId::Underscore) {
                    return Err(self.error_at_current("cannot use '_' as a target"));
                }
                rest = Some(self.identifier_after("Expected name after '**' in mapping pattern")?);
            } else {
                let key = self.mapping_key()?;
                self.expect_punct(PunctuationId::Colon, "Expected ':' after mapping pattern key")?;
                let pattern = self.pattern()?;
                let span = Span::new(key.span.start, self.prev_end());
                entries.push(Spanned::new(MappingEntry { key, pattern }, span));
            }

            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBrace, "Expected '}' after mapping pattern")?;

        Ok(Spanned::new(
            Pattern::Mapping(MappingPattern { entries, rest }),
            Span::new(start, self.prev_end()),
        ))
    }

    /// A literal or a dotted value; bare names are not keys.
    fn mapping_key(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.at_pattern_literal() {
            return self.pattern_literal();
        }

        if self.check_ident() && self.check_next_punct(PunctuationId::Dot) {
            let start = self.current_start();
            let mut value = Spanned::new(Expr::Name(self.identifier()?), Span::new(start, self.prev_end()));
            while self.match_punct(PunctuationId::Dot) {
                let attr = self.identifier_after("Expected attribute name after '.'")?;
                value = Spanned::new(
                    Expr::Attribute(Box::new(value), attr),
                    Span::new(start, self.prev_end()),
                );
            }
            return Ok(value);
        }

        Err(self.error_at_current("mapping pattern keys may only match literals and attribute lookups"))
    }

    // ========================================================================
    // Literal patterns
    // ========================================================================

    fn at_pattern_literal(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Imaginary(_)
                | TokenKind::String(_)
                | TokenKind::Bytes(_)
                | TokenKind::FStringStart
                | TokenKind::Keyword(KeywordId::None)
                | TokenKind::Keyword(KeywordId::True)
                | TokenKind::Keyword(KeywordId::False)
                | TokenKind::Operator(OperatorId::Minus)
        )
    }

    /// Signed number, complex number, string run, `None`, `True` or `False`.
    fn pattern_literal(&mut self) -> Result<Spanned<Expr>, CompileError> {
        match &self.peek().kind {
            TokenKind::String(_) | TokenKind::Bytes(_) | TokenKind::FStringStart => {
                let value = self.string_run()?;
                if matches!(value.node, Expr::FString(_)) {
                    return Err(CompileError::syntax(
                        "patterns may only match literals and attribute lookups".to_string(),
                        value.span,
                    ));
                }
                Ok(value)
            }
            TokenKind::Keyword(KeywordId::None | KeywordId::True | KeywordId::False) => self.atom(),
            _ => self.complex_number(),
        }
    }

    /// `signed_number [('+' | '-') imaginary]`
    fn complex_number(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let real = self.signed_number()?;

        let op = if self.check_op(OperatorId::Plus) {
            BinaryOp::Add
        } else if self.check_op(OperatorId::Minus) {
            BinaryOp::Sub
        } else {
            return Ok(real);
        };
        if matches!(real_literal(&real.node), Some(Literal::Imaginary(_))) {
            return Err(self.error_at_current("real number required in complex literal"));
        }
        self.advance(); // + / -

        let token = self.peek();
        let TokenKind::Imaginary(value) = token.kind else {
            return Err(self.error_at_current("imaginary number required in complex literal"));
        };
        self.advance();

        let imag = Spanned::new(Expr::Literal(Literal::Imaginary(value)), token.span);
        let span = real.span.merge(imag.span);
        Ok(Spanned::new(Expr::Binary(Box::new(real), op, Box::new(imag)), span))
    }

    /// `['-'] NUMBER`
    fn signed_number(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_start();
        let negative = self.match_op(OperatorId::Minus);

        let token = self.peek();
        let literal = match token.kind {
            TokenKind::Int(value) => Literal::Int(value),
            TokenKind::Float(value) => Literal::Float(value),
            TokenKind::Imaginary(value) => Literal::Imaginary(value),
            _ => return Err(self.error_at_current("Expected number in pattern")),
        };
        self.advance();

        let number = Spanned::new(Expr::Literal(literal), token.span);
        if negative {
            Ok(Spanned::new(
                Expr::Unary(UnaryOp::Neg, Box::new(number)),
                Span::new(start, self.prev_end()),
            ))
        } else {
            Ok(number)
        }
    }
}

/// The number literal under an optional leading `-`.
fn real_literal(expr: &Expr) -> Option<&Literal> {
    match expr {
        Expr::Literal(literal) => Some(literal),
        Expr::Unary(UnaryOp::Neg, inner) => real_literal(&inner.node),
        _ => None,
    }
}
