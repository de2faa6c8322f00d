/// Declaration parsing methods.
///
/// This chunk covers decorators, `def` / `async def`, `class`, type parameter lists, and the parameter lists shared
/// by functions and lambdas.
///
/// ## Notes
/// - A decorated definition's span starts at its first `@`.
/// - Lambda parameters use the same list grammar as `def`, minus annotations.
impl<'a> Parser<'a> {
    // ========================================================================
    // Decorators
    // ========================================================================

    /// `('@' named_expression NEWLINE)+ (def | async def | class)`
    fn decorated(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_start();
        let mut decorators = Vec::new();

        while self.match_op(OperatorId::At) {
            decorators.push(self.named_expression()?);
            self.expect(&TokenKind::Newline, "Expected newline after decorator")?;
            self.skip_newlines();
        }

        let is_definition = self.check_keyword(KeywordId::Def)
            || self.check_keyword(KeywordId::Class)
            || (self.check_keyword(KeywordId::Async) && self.peek_next().kind.is_keyword(KeywordId::Def));
        if !is_definition {
            return Err(self.error_at_current("Expected 'def' or 'class' after decorator"));
        }

        self.definition(decorators, start)
    }

    fn definition(
        &mut self,
        decorators: Vec<Spanned<Expr>>,
        start: usize,
    ) -> Result<Spanned<Statement>, CompileError> {
        if self.check_keyword(KeywordId::Class) {
            self.class_def(decorators, start)
        } else {
            self.function_def(decorators, start)
        }
    }

    // ========================================================================
    // Functions and classes
    // ========================================================================

    /// `['async'] 'def' NAME [type_params] '(' [params] ')' ['->' expression] ':' block`
    fn function_def(
        &mut self,
        decorators: Vec<Spanned<Expr>>,
        start: usize,
    ) -> Result<Spanned<Statement>, CompileError> {
        let is_async = self.match_keyword(KeywordId::Async);
        self.expect_keyword(KeywordId::Def, "Expected 'def'")?;
        let name = self.identifier_after("Expected function name after 'def'")?;
        tracing::trace!(%name, is_async, "function definition");

        let type_params = if self.check_punct(PunctuationId::LBracket) {
            self.type_params()?
        } else {
            Vec::new()
        };

        self.expect_punct(PunctuationId::LParen, "Expected '(' after function name")?;
        let params = self.parameters(PunctuationId::RParen, true)?;
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;

        let returns = if self.match_punct(PunctuationId::Arrow) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect_punct(PunctuationId::Colon, "Expected ':' after function signature")?;
        let body = self.block()?;

        Ok(Spanned::new(
            Statement::FunctionDef(Box::new(FunctionDef {
                decorators,
                is_async,
                name,
                type_params,
                params,
                returns,
                body,
            })),
            Span::new(start, self.prev_end()),
        ))
    }

    /// `'class' NAME [type_params] ['(' [arguments] ')'] ':' block`
    fn class_def(
        &mut self,
        decorators: Vec<Spanned<Expr>>,
        start: usize,
    ) -> Result<Spanned<Statement>, CompileError> {
        self.advance(); // class
        let name = self.identifier_after("Expected class name after 'class'")?;

        let type_params = if self.check_punct(PunctuationId::LBracket) {
            self.type_params()?
        } else {
            Vec::new()
        };

        let arguments = if self.match_punct(PunctuationId::LParen) {
            let arguments = self.call_arguments()?;
            self.expect_punct(PunctuationId::RParen, "Expected ')' after class arguments")?;
            arguments
        } else {
            Vec::new()
        };

        self.expect_punct(PunctuationId::Colon, "Expected ':' after class header")?;
        let body = self.block()?;

        Ok(Spanned::new(
            Statement::ClassDef(Box::new(ClassDef {
                decorators,
                name,
                type_params,
                arguments,
                body,
            })),
            Span::new(start, self.prev_end()),
        ))
    }

    // ========================================================================
    // Type parameters
    // ========================================================================

    /// `'[' type_param (',' type_param)* [','] ']'`
    fn type_params(&mut self) -> Result<Vec<Spanned<TypeParam>>, CompileError> {
        self.expect_punct(PunctuationId::LBracket, "Expected '['")?;
        if self.check_punct(PunctuationId::RBracket) {
            return Err(self.error_at_current("Type parameter list cannot be empty"));
        }

        let mut params = Vec::new();
        loop {
            params.push(self.type_param()?);
            if !self.match_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::RBracket) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBracket, "Expected ']' after type parameters")?;
        Ok(params)
    }

    /// `NAME [':' expression]`, `'*' NAME` or `'**' NAME`
    fn type_param(&mut self) -> Result<Spanned<TypeParam>, CompileError> {
        let start = self.current_start();
        let kind = if self.match_op(OperatorId::Star) {
            TypeParamKind::TypeVarTuple
        } else if self.match_op(OperatorId::StarStar) {
            TypeParamKind::ParamSpec
        } else {
            TypeParamKind::TypeVar
        };
        let name = self.identifier_after("Expected type parameter name")?;

        let bound = if self.check_punct(PunctuationId::Colon) {
            match kind {
                TypeParamKind::TypeVar => {
                    self.advance();
                    Some(self.expression()?)
                }
                TypeParamKind::TypeVarTuple => {
                    return Err(self.error_at_current("cannot use bound with TypeVarTuple"));
                }
                TypeParamKind::ParamSpec => return Err(self.error_at_current("cannot use bound with ParamSpec")),
            }
        } else {
            None
        };

        Ok(Spanned::new(TypeParam { name, kind, bound }, Span::new(start, self.prev_end())))
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// Parameter list up to (not including) `close`.
    ///
    /// Handles the `/` marker, bare `*`, `*args`, `**kwargs`, defaults and (for `def` only) annotations.
    fn parameters(&mut self, close: PunctuationId, annotated: bool) -> Result<Vec<Spanned<Param>>, CompileError> {
        let mut params: Vec<Spanned<Param>> = Vec::new();
        let mut seen_slash = false;
        let mut seen_star = false;
        let mut bare_star: Option<Span> = None;
        let mut seen_default = false;

        while !self.check_punct(close) && !self.is_at_end() {
            if params.last().is_some_and(|p| p.node.kind == ParamKind::VarKeyword) {
                return Err(self.error_at_current("arguments cannot follow var-keyword argument"));
            }

            if self.check_op(OperatorId::Slash) {
                let slash = self.advance().span;
                if seen_slash {
                    return Err(CompileError::syntax("/ may appear only once".to_string(), slash));
                }
                if seen_star {
                    return Err(CompileError::syntax("/ must be ahead of *".to_string(), slash));
                }
                if params.is_empty() {
                    return Err(CompileError::syntax(
                        "at least one argument must precede /".to_string(),
                        slash,
                    ));
                }
                for param in &mut params {
                    param.node.kind = ParamKind::PositionalOnly;
                }
                seen_slash = true;
            } else if self.check_op(OperatorId::Star) {
                let star = self.advance().span;
                if seen_star {
                    return Err(CompileError::syntax("* argument may appear only once".to_string(), star));
                }
                seen_star = true;

                if self.check_punct(PunctuationId::Comma) || self.check_punct(close) {
                    bare_star = Some(star);
                } else {
                    let param = self.parameter(ParamKind::VarPositional, annotated, star.start)?;
                    if param.node.default.is_some() {
                        return Err(CompileError::syntax(
                            "var-positional argument cannot have default value".to_string(),
                            param.span,
                        ));
                    }
                    params.push(param);
                }
            } else if self.check_op(OperatorId::StarStar) {
                let start = self.advance().span.start;
                let param = self.parameter(ParamKind::VarKeyword, annotated, start)?;
                if param.node.default.is_some() {
                    return Err(CompileError::syntax(
                        "var-keyword argument cannot have default value".to_string(),
                        param.span,
                    ));
                }
                params.push(param);
            } else {
                let kind = if seen_star {
                    ParamKind::KeywordOnly
                } else {
                    ParamKind::Regular
                };
                let param = self.parameter(kind, annotated, self.current_start())?;
                if kind == ParamKind::Regular {
                    if param.node.default.is_some() {
                        seen_default = true;
                    } else if seen_default {
                        return Err(CompileError::syntax(
                            "non-default parameter follows default parameter".to_string(),
                            param.span,
                        ));
                    }
                }
                params.push(param);
            }

            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }

        if let Some(star) = bare_star {
            if !params.iter().any(|p| p.node.kind == ParamKind::KeywordOnly) {
                return Err(CompileError::syntax("named arguments must follow bare *".to_string(), star));
            }
        }

        Ok(params)
    }

    /// `NAME [':' annotation] ['=' default]`, starting at `start` (which includes any `*` / `**` prefix).
    fn parameter(&mut self, kind: ParamKind, annotated: bool, start: usize) -> Result<Spanned<Param>, CompileError> {
        let name = self.identifier_after("Expected parameter name")?;

        let annotation = if annotated && self.match_punct(PunctuationId::Colon) {
            if kind == ParamKind::VarPositional {
                Some(self.star_expression()?)
            } else {
                Some(self.expression()?)
            }
        } else {
            None
        };

        let default = if self.match_op(OperatorId::Eq) {
            Some(self.expression()?)
        } else {
            None
        };

        Ok(Spanned::new(
            Param {
                name,
                kind,
                annotation,
                default,
            },
            Span::new(start, self.prev_end()),
        ))
    }

    // ========================================================================
    // Lambda
    // ========================================================================

    /// `'lambda' [params] ':' expression`
    fn lambda(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let start = self.advance().span.start; // lambda
        let params = self.parameters(PunctuationId::Colon, false)?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' after lambda parameters")?;
        let body = self.expression()?;

        Ok(Spanned::new(
            Expr::Lambda(Box::new(LambdaExpr { params, body })),
            Span::new(start, self.prev_end()),
        ))
    }
}
