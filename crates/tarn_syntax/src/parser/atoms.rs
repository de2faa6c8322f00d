/// Atoms and postfix suffixes.
///
/// This chunk parses one atom (literal, name, string run, bracketed display) and threads `.name`, `(...)` and
/// `[...]` suffixes onto it. Bracketed displays are delegated to the collections chunk, f-strings to the f-string
/// chunk.
impl<'a> Parser<'a> {
    // ========================================================================
    // Postfix
    // ========================================================================

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut expr = self.atom()?;

        loop {
            if self.match_punct(PunctuationId::Dot) {
                let name = self.identifier_after("Expected attribute name after '.'")?;
                let span = Span::new(expr.span.start, self.prev_end());
                expr = Spanned::new(Expr::Attribute(Box::new(expr), name), span);
            } else if self.match_punct(PunctuationId::LParen) {
                let args = self.call_arguments()?;
                self.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
                let span = Span::new(expr.span.start, self.prev_end());
                expr = Spanned::new(Expr::Call(Box::new(expr), args), span);
            } else if self.match_punct(PunctuationId::LBracket) {
                let entries = self.subscript_entries()?;
                self.expect_punct(PunctuationId::RBracket, "Expected ']' after subscript")?;
                let span = Span::new(expr.span.start, self.prev_end());
                expr = Spanned::new(Expr::Subscript(Box::new(expr), entries), span);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Comma-separated subscript entries: expressions, starred expressions, or slices.
    ///
    /// A lone slice is still a one-entry list; `a[1,]` has the same entries as `a[1]`.
    fn subscript_entries(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        if self.check_punct(PunctuationId::RBracket) {
            return Err(self.error_at_current("Expected subscript"));
        }

        let mut entries = vec![self.subscript_entry()?];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_punct(PunctuationId::RBracket) {
                break;
            }
            entries.push(self.subscript_entry()?);
        }
        Ok(entries)
    }

    /// `[expression] ':' [expression] [':' [expression]] | star_named_expression`
    fn subscript_entry(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_start();

        let lower = if self.check_punct(PunctuationId::Colon) {
            None
        } else {
            let expr = self.star_named_expression()?;
            if !self.check_punct(PunctuationId::Colon) {
                return Ok(expr);
            }
            if matches!(expr.node, Expr::Starred(_) | Expr::NamedExpr(..)) {
                return Err(CompileError::syntax(
                    format!("cannot use {} as a slice bound", describe_expr(&expr.node)),
                    expr.span,
                ));
            }
            Some(Box::new(expr))
        };

        self.expect_punct(PunctuationId::Colon, "Expected ':' in slice")?;
        let upper = self.slice_bound()?;
        let step = if self.match_punct(PunctuationId::Colon) {
            self.slice_bound()?
        } else {
            None
        };

        let span = Span::new(start, self.prev_end());
        Ok(Spanned::new(
            Expr::Slice(SliceExpr {
                start: lower,
                end: upper,
                step,
            }),
            span,
        ))
    }

    fn slice_bound(&mut self) -> Result<Option<Box<Spanned<Expr>>>, CompileError> {
        if self.check_punct(PunctuationId::Colon)
            || self.check_punct(PunctuationId::Comma)
            || self.check_punct(PunctuationId::RBracket)
        {
            Ok(None)
        } else {
            Ok(Some(Box::new(self.expression()?)))
        }
    }

    // ========================================================================
    // Atoms
    // ========================================================================

    fn atom(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let token = self.peek();
        let span = token.span;

        let literal = match &token.kind {
            TokenKind::Ident(name) => {
                self.advance();
                return Ok(Spanned::new(Expr::Name(name.clone()), span));
            }
            TokenKind::String(_) | TokenKind::Bytes(_) | TokenKind::FStringStart => {
                return self.string_run();
            }
            TokenKind::Punctuation(PunctuationId::LParen) => return self.paren_display(),
            TokenKind::Punctuation(PunctuationId::LBracket) => return self.list_display(),
            TokenKind::Punctuation(PunctuationId::LBrace) => return self.brace_display(),
            TokenKind::Int(v) => Literal::Int(*v),
            TokenKind::Float(v) => Literal::Float(*v),
            TokenKind::Imaginary(v) => Literal::Imaginary(*v),
            TokenKind::Keyword(KeywordId::True) => Literal::Bool(true),
            TokenKind::Keyword(KeywordId::False) => Literal::Bool(false),
            TokenKind::Keyword(KeywordId::None) => Literal::None,
            TokenKind::Punctuation(PunctuationId::Ellipsis) => Literal::Ellipsis,
            TokenKind::Keyword(KeywordId::Yield) => {
                return Err(self.error_at_current("'yield' expression must be parenthesized here"));
            }
            _ => return Err(self.error_at_current("Expected expression")),
        };

        self.advance();
        Ok(Spanned::new(Expr::Literal(literal), span))
    }

    /// Adjacent string, bytes and f-string literals concatenate into one node.
    ///
    /// Plain strings give a string literal; any f-string in the run turns the whole run into an f-string whose
    /// literal parts absorb the plain pieces. Bytes only concatenate with bytes.
    fn string_run(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.current_start();
        let mut text = String::new();
        let mut bytes: Option<Vec<u8>> = None;
        let mut parts: Option<Vec<Spanned<FStringPart>>> = None;
        let mut saw_text = false;

        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::String(s) => {
                    if bytes.is_some() {
                        return Err(mixed_literals(token.span));
                    }
                    self.advance();
                    saw_text = true;
                    match parts.as_mut() {
                        Some(parts) => push_literal_part(parts, s, token.span),
                        None => text.push_str(s),
                    }
                }
                TokenKind::Bytes(b) => {
                    if saw_text {
                        return Err(mixed_literals(token.span));
                    }
                    self.advance();
                    bytes.get_or_insert_with(Vec::new).extend_from_slice(b);
                }
                TokenKind::FStringStart => {
                    if bytes.is_some() {
                        return Err(mixed_literals(token.span));
                    }
                    let fstring = self.fstring()?;
                    let parts = parts.get_or_insert_with(|| {
                        let mut initial = Vec::new();
                        if !text.is_empty() {
                            push_literal_part(&mut initial, &text, Span::new(start, fstring.span.start));
                        }
                        initial
                    });
                    saw_text = true;
                    for part in fstring.node {
                        match part.node {
                            FStringPart::Literal(s) => push_literal_part(parts, &s, part.span),
                            field => parts.push(Spanned::new(field, part.span)),
                        }
                    }
                }
                _ => break,
            }
        }

        let span = Span::new(start, self.prev_end());
        let expr = match (parts, bytes) {
            (Some(parts), _) => Expr::FString(parts),
            (None, Some(bytes)) => Expr::Literal(Literal::Bytes(bytes)),
            (None, None) => Expr::Literal(Literal::String(text)),
        };
        Ok(Spanned::new(expr, span))
    }
}

/// Append literal text, merging with a preceding literal part.
fn push_literal_part(parts: &mut Vec<Spanned<FStringPart>>, text: &str, span: Span) {
    if text.is_empty() {
        return;
    }
    if let Some(last) = parts.last_mut() {
        if let FStringPart::Literal(existing) = &mut last.node {
            existing.push_str(text);
            last.span = last.span.merge(span);
            return;
        }
    }
    parts.push(Spanned::new(FStringPart::Literal(text.to_string()), span));
}

fn mixed_literals(span: Span) -> CompileError {
    CompileError::syntax("cannot mix bytes and nonbytes literals".to_string(), span)
}
