/// Call-site argument lists.
///
/// Arguments are a discriminated sequence ([`CallArg`]). Ordering: positional and `*iterable` arguments first,
/// then `name=value` and `*iterable`, then `name=value` and `**mapping`. A positional argument after a keyword
/// argument or after `**` is a syntax error, as is `*iterable` after `**`.
impl<'a> Parser<'a> {
    /// Parse arguments up to (not including) the closing `)` or end of input.
    fn call_arguments(&mut self) -> Result<Vec<Spanned<CallArg>>, CompileError> {
        let mut args: Vec<Spanned<CallArg>> = Vec::new();
        let mut seen_keyword = false;
        let mut seen_double_star = false;

        while !self.at_arguments_end() {
            let start = self.current_start();

            if self.match_op(OperatorId::Star) {
                if self.at_arguments_end() || self.check_punct(PunctuationId::Comma) {
                    return Err(self.error_at_current("Expected expression after '*'"));
                }
                let value = self.expression()?;
                let span = Span::new(start, self.prev_end());
                if seen_double_star {
                    return Err(CompileError::syntax(
                        "iterable argument unpacking follows keyword argument unpacking".to_string(),
                        span,
                    ));
                }
                args.push(Spanned::new(CallArg::Starred(value), span));
            } else if self.match_op(OperatorId::StarStar) {
                if self.at_arguments_end() || self.check_punct(PunctuationId::Comma) {
                    return Err(self.error_at_current("Expected expression after '**'"));
                }
                let value = self.expression()?;
                seen_double_star = true;
                args.push(Spanned::new(CallArg::DoubleStarred(value), Span::new(start, self.prev_end())));
            } else if self.check_ident() && self.check_next_op(OperatorId::Eq) {
                let name = self.identifier()?;
                self.advance(); // =
                let value = self.expression()?;
                seen_keyword = true;
                args.push(Spanned::new(CallArg::Keyword(name, value), Span::new(start, self.prev_end())));
            } else {
                let value = self.named_expression()?;

                if self.check_op(OperatorId::Eq) {
                    return Err(CompileError::syntax(
                        "expression cannot contain assignment, perhaps you meant \"==\"?".to_string(),
                        value.span.merge(self.current_span()),
                    ));
                }

                if self.at_comprehension_start() {
                    let genexp = self.bare_generator_argument(value, args.is_empty())?;
                    let span = genexp.span;
                    args.push(Spanned::new(CallArg::Positional(genexp), span));
                } else if seen_double_star {
                    return Err(CompileError::syntax(
                        "positional argument follows keyword argument unpacking".to_string(),
                        value.span,
                    ));
                } else if seen_keyword {
                    return Err(CompileError::syntax(
                        "positional argument follows keyword argument".to_string(),
                        value.span,
                    ));
                } else {
                    let span = value.span;
                    args.push(Spanned::new(CallArg::Positional(value), span));
                }
            }

            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// `f(x for x in xs)`: a generator expression is allowed unparenthesized only as the sole argument.
    fn bare_generator_argument(
        &mut self,
        element: Spanned<Expr>,
        is_first: bool,
    ) -> Result<Spanned<Expr>, CompileError> {
        self.reject_starred_element(&element)?;
        let clauses = self.comprehension_clauses()?;
        let span = Span::new(element.span.start, self.prev_end());
        if !is_first || !self.at_arguments_end() {
            return Err(CompileError::syntax(
                "Generator expression must be parenthesized".to_string(),
                span,
            ));
        }
        Ok(Spanned::new(
            Expr::GenExpr(Box::new(Comprehension { element, clauses })),
            span,
        ))
    }

    fn at_arguments_end(&self) -> bool {
        self.check_punct(PunctuationId::RParen) || self.is_at_end()
    }
}
