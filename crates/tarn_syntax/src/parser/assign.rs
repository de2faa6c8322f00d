/// Assignment disambiguation and assignment targets.
///
/// A simple statement that starts with a name, `(`, `[` or `*` may be an annotated assignment, a (chained)
/// assignment, an augmented assignment, or an expression statement. The forms are tried in that order as
/// independent attempts; each one either claims the statement, declines (cursor restored to the statement start),
/// or reports a malformed statement of its own form.
type AssignmentAttempt<'a> = fn(&mut Parser<'a>) -> Result<Option<Vec<Spanned<Statement>>>, CompileError>;

impl<'a> Parser<'a> {
    // ========================================================================
    // Disambiguator
    // ========================================================================

    fn assignment_or_expression(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        let attempts: [(&str, AssignmentAttempt<'a>); 3] = [
            ("annotated", Self::annotated_assignment),
            ("chained", Self::chained_assignment),
            ("augmented", Self::augmented_assignment),
        ];

        for (form, alternative) in attempts {
            if let Some(stmts) = self.attempt(alternative)? {
                tracing::debug!(form, count = stmts.len(), "assignment form chosen");
                return Ok(stmts);
            }
        }

        Ok(vec![self.expression_statement()?])
    }

    /// `target ':' expression ['=' (yield_expr | star_expressions)]`
    fn annotated_assignment(&mut self) -> Result<Option<Vec<Spanned<Statement>>>, CompileError> {
        let Some(target) = self.speculate(|p| p.primary()) else {
            return Ok(None);
        };
        if !self.check_punct(PunctuationId::Colon) {
            return Ok(None);
        }

        let simple = matches!(target.node, Expr::Name(_));
        let target = annotation_target(target)?;
        self.advance(); // :

        let annotation = self.expression()?;
        let value = if self.match_op(OperatorId::Eq) {
            Some(self.assignment_value()?)
        } else {
            None
        };

        let span = Span::new(target.span.start, self.prev_end());
        Ok(Some(vec![Spanned::new(
            Statement::AnnAssign(AnnAssignStmt {
                target,
                annotation,
                value,
                simple,
            }),
            span,
        )]))
    }

    /// `(star_targets '=')+ (yield_expr | star_expressions)`, flattened into sibling assignments.
    fn chained_assignment(&mut self) -> Result<Option<Vec<Spanned<Statement>>>, CompileError> {
        let Some(first) = self.speculate(|p| p.star_expressions()) else {
            return Ok(None);
        };
        if !self.check_op(OperatorId::Eq) {
            return Ok(None);
        }

        let mut targets = vec![first];
        let value = loop {
            let eq_span = self.advance().span; // =
            if self.at_statement_end() {
                return Err(CompileError::syntax("unexpected '=' in assignment".to_string(), eq_span));
            }
            let expr = self.assignment_value()?;
            if self.check_op(OperatorId::Eq) {
                targets.push(expr);
            } else {
                break expr;
            }
        };

        for target in &targets {
            validate_target(target, TargetUse::Store)?;
        }

        let value = Arc::new(value);
        Ok(Some(
            targets
                .into_iter()
                .map(|target| {
                    let span = Span::new(target.span.start, value.span.end);
                    Spanned::new(
                        Statement::Assign(AssignStmt {
                            target,
                            value: Arc::clone(&value),
                        }),
                        span,
                    )
                })
                .collect(),
        ))
    }

    /// `single_target augop (yield_expr | star_expressions)`, desugared to `target = target op value`.
    fn augmented_assignment(&mut self) -> Result<Option<Vec<Spanned<Statement>>>, CompileError> {
        let Some(target) = self.speculate(|p| p.primary()) else {
            return Ok(None);
        };
        let Some(base) = self.peek().operator_id().and_then(operators::augmented_base) else {
            return Ok(None);
        };
        let Some(op) = binary_op_for(base) else {
            return Ok(None);
        };

        let target = single_target(target).map_err(|bad| {
            CompileError::syntax(
                format!("'{}' is an illegal expression for augmented assignment", describe_expr(&bad.node)),
                bad.span,
            )
        })?;
        self.advance(); // augop

        let rhs = self.assignment_value()?;
        let span = target.span.merge(rhs.span);
        let value = Spanned::new(Expr::Binary(Box::new(target.clone()), op, Box::new(rhs)), span);
        Ok(Some(vec![Spanned::new(
            Statement::Assign(AssignStmt {
                target,
                value: Arc::new(value),
            }),
            span,
        )]))
    }

    fn expression_statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let expr = self.assignment_value()?;
        let span = expr.span;
        Ok(Spanned::new(Statement::Expr(expr), span))
    }

    // ========================================================================
    // Target lists
    // ========================================================================

    /// Comma-separated targets of `for` and comprehension clauses; a comma makes a tuple target.
    fn star_targets(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let first = self.star_target()?;
        if !self.check_punct(PunctuationId::Comma) {
            validate_target(&first, TargetUse::Store)?;
            return Ok(first);
        }

        let start = first.span.start;
        let mut elements = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_keyword(KeywordId::In) || self.check_op(OperatorId::Eq) || self.at_statement_end() {
                break;
            }
            elements.push(self.star_target()?);
        }

        let target = Spanned::new(Expr::Tuple(elements), Span::new(start, self.prev_end()));
        validate_target(&target, TargetUse::Store)?;
        Ok(target)
    }

    /// `'*' bitwise_or | bitwise_or`; validation happens on the whole target list.
    fn star_target(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.check_op(OperatorId::Star) {
            return self.starred(|p| p.bitwise_or());
        }
        self.bitwise_or()
    }

    /// Targets of `del`: a comma-separated list, trailing comma allowed.
    fn del_targets(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let mut targets = Vec::new();
        loop {
            let target = self.bitwise_or()?;
            validate_target(&target, TargetUse::Delete)?;
            targets.push(target);
            if !self.match_punct(PunctuationId::Comma) || self.at_statement_end() {
                break;
            }
        }
        Ok(targets)
    }
}

// ============================================================================
// Target validation
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum TargetUse {
    Store,
    Delete,
}

/// Check that `target` can be assigned to (or deleted).
fn validate_target(target: &Spanned<Expr>, usage: TargetUse) -> Result<(), CompileError> {
    match &target.node {
        Expr::Name(_) | Expr::Attribute(..) | Expr::Subscript(..) => Ok(()),
        Expr::Group(inner) => validate_target(inner, usage),
        Expr::Tuple(elements) | Expr::List(elements) => {
            let starred = elements.iter().filter(|e| matches!(e.node, Expr::Starred(_))).count();
            if starred > 1 && usage == TargetUse::Store {
                return Err(CompileError::syntax(
                    "multiple starred expressions in assignment".to_string(),
                    target.span,
                ));
            }
            for element in elements {
                match &element.node {
                    Expr::Starred(inner) if usage == TargetUse::Store => validate_target(inner, usage)?,
                    _ => validate_target(element, usage)?,
                }
            }
            Ok(())
        }
        Expr::Starred(_) if usage == TargetUse::Store => Err(CompileError::syntax(
            "starred assignment target must be in a list or tuple".to_string(),
            target.span,
        )),
        other => {
            let verb = match usage {
                TargetUse::Store => "assign to",
                TargetUse::Delete => "delete",
            };
            Err(CompileError::syntax(
                format!("cannot {} {}", verb, describe_expr(other)),
                target.span,
            ))
        }
    }
}

/// Strip parentheses from a name, attribute or subscript target. Anything else is handed back as the error.
fn single_target(target: Spanned<Expr>) -> Result<Spanned<Expr>, Spanned<Expr>> {
    match target.node {
        Expr::Name(_) | Expr::Attribute(..) | Expr::Subscript(..) => Ok(target),
        Expr::Group(inner) => single_target(*inner),
        _ => Err(target),
    }
}

fn annotation_target(target: Spanned<Expr>) -> Result<Spanned<Expr>, CompileError> {
    single_target(target).map_err(|bad| {
        let message = match &bad.node {
            Expr::Tuple(_) => "only single target (not tuple) can be annotated".to_string(),
            Expr::List(_) => "only single target (not list) can be annotated".to_string(),
            other => format!("illegal target for annotation: {}", describe_expr(other)),
        };
        CompileError::syntax(message, bad.span)
    })
}
