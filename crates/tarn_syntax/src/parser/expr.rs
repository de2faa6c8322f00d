/// Expression parsing methods.
///
/// This chunk implements the expression grammar as a precedence ladder:
/// ternary/lambda → `or` → `and` → `not` → comparison chain → `|` → `^` → `&` → shifts → additive →
/// multiplicative → unary → power → `await` → postfix → atom.
///
/// ## Notes
/// - Operator identities are carried by [`TokenKind::Operator`] / [`OperatorId`] rather than string spellings.
/// - Word operators (`and`, `or`, `not`, `in`, `is`) arrive as keyword tokens.
/// - `**` is right-associative; a comparison chain of two or more operators desugars to a conjunction.
impl<'a> Parser<'a> {
    // ========================================================================
    // Expression lists
    // ========================================================================

    /// `star_expression (',' star_expression)* [',']`; a comma makes a tuple.
    fn star_expressions(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let first = self.star_expression()?;
        if !self.check_punct(PunctuationId::Comma) {
            return Ok(first);
        }

        let start = first.span.start;
        let mut elements = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            if !self.at_expression_start() {
                break;
            }
            elements.push(self.star_expression()?);
        }
        Ok(Spanned::new(Expr::Tuple(elements), Span::new(start, self.prev_end())))
    }

    /// `'*' bitwise_or | expression`
    fn star_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.check_op(OperatorId::Star) {
            return self.starred(|p| p.bitwise_or());
        }
        self.expression()
    }

    /// `'*' bitwise_or | named_expression`, the element form of list, set and tuple displays.
    fn star_named_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.check_op(OperatorId::Star) {
            return self.starred(|p| p.bitwise_or());
        }
        self.named_expression()
    }

    /// Parse `*operand` with the star as the current token.
    fn starred(
        &mut self,
        operand: impl FnOnce(&mut Self) -> Result<Spanned<Expr>, CompileError>,
    ) -> Result<Spanned<Expr>, CompileError> {
        let start = self.advance().span.start;
        if !self.at_expression_start() {
            return Err(self.error_at_current("Expected expression after '*'"));
        }
        let value = operand(self)?;
        let span = Span::new(start, value.span.end);
        Ok(Spanned::new(Expr::Starred(Box::new(value)), span))
    }

    /// `NAME ':=' expression | expression`
    fn named_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            if self.check_next_op(OperatorId::Walrus) {
                let target = Spanned::new(name.clone(), self.current_span());
                self.advance(); // name
                self.advance(); // :=
                let value = self.expression()?;
                let span = target.span.merge(value.span);
                return Ok(Spanned::new(Expr::NamedExpr(target, Box::new(value)), span));
            }
        }

        let expr = self.expression()?;
        if self.check_op(OperatorId::Walrus) {
            return Err(CompileError::syntax(
                format!("cannot use assignment expressions with {}", describe_expr(&expr.node)),
                expr.span,
            ));
        }
        Ok(expr)
    }

    /// `'yield' 'from' expression | 'yield' [star_expressions]`
    fn yield_expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self
            .expect_keyword(KeywordId::Yield, "Expected 'yield'")?
            .span
            .start;

        if self.match_keyword(KeywordId::From) {
            let value = self.expression()?;
            let span = Span::new(start, value.span.end);
            return Ok(Spanned::new(Expr::YieldFrom(Box::new(value)), span));
        }

        if self.at_expression_start() {
            let value = self.star_expressions()?;
            let span = Span::new(start, value.span.end);
            Ok(Spanned::new(Expr::Yield(Some(Box::new(value))), span))
        } else {
            Ok(Spanned::new(Expr::Yield(None), Span::new(start, self.prev_end())))
        }
    }

    /// The right-hand side of an assignment: a yield expression or star-expressions.
    fn assignment_value(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.check_keyword(KeywordId::Yield) {
            self.yield_expression()
        } else {
            self.star_expressions()
        }
    }

    // ========================================================================
    // Ternary and lambda
    // ========================================================================

    /// `lambda | disjunction ['if' disjunction 'else' expression]`
    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.check_keyword(KeywordId::Lambda) {
            return self.lambda();
        }

        let body = self.disjunction()?;
        if !self.match_keyword(KeywordId::If) {
            return Ok(body);
        }

        let condition = self.disjunction()?;
        self.expect_keyword(KeywordId::Else, "Expected 'else' after conditional expression")?;
        // Right-recursive: `a if x else b if y else c` nests on the false branch.
        let orelse = self.expression()?;
        let span = body.span.merge(orelse.span);
        Ok(Spanned::new(
            Expr::Ternary(Box::new(TernaryExpr {
                condition,
                body,
                orelse,
            })),
            span,
        ))
    }

    // ========================================================================
    // Boolean operators
    // ========================================================================

    fn disjunction(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.conjunction()?;
        while self.match_keyword(KeywordId::Or) {
            let right = self.conjunction()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), BinaryOp::Or, Box::new(right)), span);
        }
        Ok(left)
    }

    fn conjunction(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.inversion()?;
        while self.match_keyword(KeywordId::And) {
            let right = self.inversion()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), BinaryOp::And, Box::new(right)), span);
        }
        Ok(left)
    }

    fn inversion(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.match_keyword(KeywordId::Not) {
            let start = self.tokens[self.pos - 1].span.start;
            let expr = self.inversion()?;
            let span = Span::new(start, expr.span.end);
            Ok(Spanned::new(Expr::Unary(UnaryOp::Not, Box::new(expr)), span))
        } else {
            self.comparison()
        }
    }

    // ========================================================================
    // Comparison chains
    // ========================================================================

    /// Consume a comparison operator, including the two-token `not in` and `is not`.
    fn comparison_op(&mut self) -> Option<BinaryOp> {
        let op = match &self.peek().kind {
            TokenKind::Operator(OperatorId::EqEq) => BinaryOp::Eq,
            TokenKind::Operator(OperatorId::NotEq) => BinaryOp::NotEq,
            TokenKind::Operator(OperatorId::Lt) => BinaryOp::Lt,
            TokenKind::Operator(OperatorId::LtEq) => BinaryOp::LtEq,
            TokenKind::Operator(OperatorId::Gt) => BinaryOp::Gt,
            TokenKind::Operator(OperatorId::GtEq) => BinaryOp::GtEq,
            TokenKind::Keyword(KeywordId::In) => BinaryOp::In,
            TokenKind::Keyword(KeywordId::Not) if self.peek_next().kind.is_keyword(KeywordId::In) => {
                self.advance(); // not
                BinaryOp::NotIn
            }
            TokenKind::Keyword(KeywordId::Is) => {
                if self.peek_next().kind.is_keyword(KeywordId::Not) {
                    self.advance(); // is
                    BinaryOp::IsNot
                } else {
                    BinaryOp::Is
                }
            }
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    /// Parse `a op b op c ...` in one left-to-right scan.
    ///
    /// One comparison yields a plain binary node. Two or more yield a left-associated `and` of pairwise
    /// comparisons, `(a < b) and (b < c)`, where each middle operand appears in both neighbours.
    fn comparison(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.bitwise_or()?;
        let mut chain: Option<Spanned<Expr>> = None;

        while let Some(op) = self.comparison_op() {
            let right = self.bitwise_or()?;
            let span = left.span.merge(right.span);
            let pair = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right.clone())), span);
            chain = Some(match chain {
                None => pair,
                Some(acc) => {
                    let span = acc.span.merge(pair.span);
                    Spanned::new(Expr::Binary(Box::new(acc), BinaryOp::And, Box::new(pair)), span)
                }
            });
            left = right;
        }

        Ok(chain.unwrap_or(left))
    }

    // ========================================================================
    // Bitwise and arithmetic levels
    // ========================================================================

    fn bitwise_or(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.bitwise_xor()?;
        while self.match_op(OperatorId::Pipe) {
            let right = self.bitwise_xor()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), BinaryOp::BitOr, Box::new(right)), span);
        }
        Ok(left)
    }

    fn bitwise_xor(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.bitwise_and()?;
        while self.match_op(OperatorId::Caret) {
            let right = self.bitwise_and()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), BinaryOp::BitXor, Box::new(right)), span);
        }
        Ok(left)
    }

    fn bitwise_and(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.shift()?;
        while self.match_op(OperatorId::Amp) {
            let right = self.shift()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), BinaryOp::BitAnd, Box::new(right)), span);
        }
        Ok(left)
    }

    fn shift(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.additive()?;

        loop {
            let op = if self.match_op(OperatorId::LtLt) {
                BinaryOp::LShift
            } else if self.match_op(OperatorId::GtGt) {
                BinaryOp::RShift
            } else {
                break;
            };

            let right = self.additive()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }

        Ok(left)
    }

    fn additive(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.multiplicative()?;

        loop {
            let op = if self.match_op(OperatorId::Plus) {
                BinaryOp::Add
            } else if self.match_op(OperatorId::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };

            let right = self.multiplicative()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }

        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.unary()?;

        loop {
            let op = if self.match_op(OperatorId::Star) {
                BinaryOp::Mul
            } else if self.match_op(OperatorId::SlashSlash) {
                BinaryOp::FloorDiv
            } else if self.match_op(OperatorId::Slash) {
                BinaryOp::Div
            } else if self.match_op(OperatorId::Percent) {
                BinaryOp::Mod
            } else if self.match_op(OperatorId::At) {
                BinaryOp::MatMul
            } else {
                break;
            };

            let right = self.unary()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }

        Ok(left)
    }

    /// `('+' | '-' | '~') unary | power`
    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let op = if self.check_op(OperatorId::Plus) {
            UnaryOp::Pos
        } else if self.check_op(OperatorId::Minus) {
            UnaryOp::Neg
        } else if self.check_op(OperatorId::Tilde) {
            UnaryOp::Invert
        } else {
            return self.power();
        };

        let start = self.advance().span.start;
        let expr = self.unary()?;
        let span = Span::new(start, expr.span.end);
        Ok(Spanned::new(Expr::Unary(op, Box::new(expr)), span))
    }

    /// `await_primary ['**' unary]`
    fn power(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let left = self.await_primary()?;

        // Right-associative: 2**3**2 = 2**(3**2). The exponent re-enters through `unary` so `2**-1` parses.
        if self.match_op(OperatorId::StarStar) {
            let right = self.unary()?;
            let span = left.span.merge(right.span);
            return Ok(Spanned::new(
                Expr::Binary(Box::new(left), BinaryOp::Pow, Box::new(right)),
                span,
            ));
        }

        Ok(left)
    }

    fn await_primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.match_keyword(KeywordId::Await) {
            let start = self.tokens[self.pos - 1].span.start;
            let expr = self.primary()?;
            let span = Span::new(start, expr.span.end);
            Ok(Spanned::new(Expr::Await(Box::new(expr)), span))
        } else {
            self.primary()
        }
    }

    // ========================================================================
    // Lookahead predicates
    // ========================================================================

    /// Check if the current token can start an expression
    fn at_expression_start(&self) -> bool {
        match &self.peek().kind {
            TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Imaginary(_)
            | TokenKind::String(_)
            | TokenKind::Bytes(_)
            | TokenKind::FStringStart => true,
            TokenKind::Keyword(id) => matches!(
                id,
                KeywordId::True
                    | KeywordId::False
                    | KeywordId::None
                    | KeywordId::Not
                    | KeywordId::Await
                    | KeywordId::Lambda
            ),
            TokenKind::Operator(id) => matches!(
                id,
                OperatorId::Minus | OperatorId::Plus | OperatorId::Tilde | OperatorId::Star
            ),
            TokenKind::Punctuation(id) => matches!(
                id,
                PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace | PunctuationId::Ellipsis
            ),
            _ => false,
        }
    }
}
