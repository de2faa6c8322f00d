/// Statement parsing methods.
///
/// This chunk contains the statement dispatcher, blocks, simple statements, and the compound statements other
/// than definitions (`if`/`while`/`for`/`with`/`try`/`match`).
///
/// ## Notes
/// - A statement may expand to several sibling statements: `a; b` and `x = y = 0` both do.
/// - `match` and `type` are soft keywords and only start a statement when the rest of the header fits.
impl<'a> Parser<'a> {
    // ========================================================================
    // Dispatch
    // ========================================================================

    fn statement(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        match &self.peek().kind {
            TokenKind::Indent => return Err(self.error_at_current("Unexpected indent")),
            TokenKind::Keyword(KeywordId::If) => return Ok(vec![self.if_statement()?]),
            TokenKind::Keyword(KeywordId::While) => return Ok(vec![self.while_statement()?]),
            TokenKind::Keyword(KeywordId::For) => return Ok(vec![self.for_statement(false)?]),
            TokenKind::Keyword(KeywordId::With) => return Ok(vec![self.with_statement(false)?]),
            TokenKind::Keyword(KeywordId::Try) => return Ok(vec![self.try_statement()?]),
            TokenKind::Keyword(KeywordId::Def) | TokenKind::Keyword(KeywordId::Class) => {
                return Ok(vec![self.definition(Vec::new(), self.current_start())?]);
            }
            TokenKind::Keyword(KeywordId::Async) => return Ok(vec![self.async_statement()?]),
            TokenKind::Operator(OperatorId::At) => return Ok(vec![self.decorated()?]),
            TokenKind::Keyword(KeywordId::Elif) | TokenKind::Keyword(KeywordId::Else) => {
                return Err(self.error_at_current("Expected statement"));
            }
            _ => {}
        }

        if self.check_soft_keyword(KeywordId::Match) {
            if let Some(stmt) = self.attempt(|p| p.match_statement())? {
                return Ok(vec![stmt]);
            }
        }
        if self.check_soft_keyword(KeywordId::Type) && self.at_type_alias() {
            let stmt = self.type_alias()?;
            self.end_simple_line()?;
            return Ok(vec![stmt]);
        }

        self.simple_statement_line()
    }

    /// `async def`, `async for`, `async with`
    fn async_statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        match self.peek_next().keyword_id() {
            Some(KeywordId::Def) => self.definition(Vec::new(), self.current_start()),
            Some(KeywordId::For) => self.for_statement(true),
            Some(KeywordId::With) => self.with_statement(true),
            _ => {
                self.advance();
                Err(self.error_at_current("Expected 'def', 'for' or 'with' after 'async'"))
            }
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// A block after `:`: either simple statements on the same line, or an indented suite.
    fn block(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        if !self.match_token(&TokenKind::Newline) {
            return self.simple_statement_line();
        }

        self.skip_newlines();
        self.expect(&TokenKind::Indent, "Expected an indented block")?;

        let mut body = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            body.extend(self.statement()?);
            self.skip_newlines();
        }
        self.match_token(&TokenKind::Dedent);

        Ok(body)
    }

    /// `simple_stmt (';' simple_stmt)* [';'] NEWLINE`
    fn simple_statement_line(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        let mut stmts = Vec::new();
        loop {
            stmts.extend(self.simple_statement()?);
            if !self.match_punct(PunctuationId::Semicolon) {
                break;
            }
            if matches!(self.peek().kind, TokenKind::Newline | TokenKind::Eof) {
                break;
            }
        }
        self.end_simple_line()?;
        Ok(stmts)
    }

    fn end_simple_line(&mut self) -> Result<(), CompileError> {
        if self.match_token(&TokenKind::Newline) || self.is_at_end() || self.check(&TokenKind::Dedent) {
            Ok(())
        } else {
            Err(self.error_at_current("Expected newline after statement"))
        }
    }

    // ========================================================================
    // Simple statements
    // ========================================================================

    fn simple_statement(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        let start = self.current_start();

        let stmt = match self.peek().keyword_id() {
            Some(KeywordId::Pass) => {
                self.advance();
                Statement::Pass
            }
            Some(KeywordId::Break) => {
                self.advance();
                Statement::Break
            }
            Some(KeywordId::Continue) => {
                self.advance();
                Statement::Continue
            }
            Some(KeywordId::Return) => {
                self.advance();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.star_expressions()?)
                };
                Statement::Return(value)
            }
            Some(KeywordId::Raise) => {
                self.advance();
                Statement::Raise(self.raise_body()?)
            }
            Some(KeywordId::Global) => {
                self.advance();
                Statement::Global(self.identifier_list_spanned()?)
            }
            Some(KeywordId::Nonlocal) => {
                self.advance();
                Statement::Nonlocal(self.identifier_list_spanned()?)
            }
            Some(KeywordId::Del) => {
                self.advance();
                Statement::Del(self.del_targets()?)
            }
            Some(KeywordId::Assert) => {
                self.advance();
                let test = self.expression()?;
                let message = if self.match_punct(PunctuationId::Comma) {
                    Some(self.expression()?)
                } else {
                    None
                };
                Statement::Assert(AssertStmt { test, message })
            }
            Some(KeywordId::Import) => {
                self.advance();
                Statement::Import(self.import_names()?)
            }
            Some(KeywordId::From) => {
                self.advance();
                Statement::ImportFrom(self.import_from()?)
            }
            _ if self.at_assignment_candidate() => return self.assignment_or_expression(),
            _ => return Ok(vec![self.expression_statement()?]),
        };

        Ok(vec![Spanned::new(stmt, Span::new(start, self.prev_end()))])
    }

    /// Statements starting with a name, `(`, `[` or `*` go through the assignment disambiguator.
    fn at_assignment_candidate(&self) -> bool {
        self.check_ident()
            || self.check_punct(PunctuationId::LParen)
            || self.check_punct(PunctuationId::LBracket)
            || self.check_op(OperatorId::Star)
    }

    /// `raise [expression ['from' expression]]`
    fn raise_body(&mut self) -> Result<RaiseStmt, CompileError> {
        if self.at_statement_end() {
            return Ok(RaiseStmt {
                exception: None,
                cause: None,
            });
        }
        let exception = Some(self.expression()?);
        let cause = if self.match_keyword(KeywordId::From) {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(RaiseStmt { exception, cause })
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// `dotted_name ['as' NAME] (',' dotted_name ['as' NAME])*`
    fn import_names(&mut self) -> Result<Vec<Spanned<ImportAlias>>, CompileError> {
        let mut names = Vec::new();
        loop {
            let start = self.current_start();
            let path = self.dotted_name()?;
            let alias = self.import_alias()?;
            names.push(Spanned::new(ImportAlias { path, alias }, Span::new(start, self.prev_end())));
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        Ok(names)
    }

    /// `from ('.' | '...')* [dotted_name] import ('*' | '(' names [','] ')' | names)`
    fn import_from(&mut self) -> Result<ImportFromStmt, CompileError> {
        let mut level = 0;
        loop {
            if self.match_punct(PunctuationId::Dot) {
                level += 1;
            } else if self.match_punct(PunctuationId::Ellipsis) {
                level += 3;
            } else {
                break;
            }
        }

        let module = if self.check_keyword(KeywordId::Import) {
            if level == 0 {
                return Err(self.error_at_current("Expected module name after 'from'"));
            }
            None
        } else {
            Some(self.dotted_name()?)
        };

        self.expect_keyword(KeywordId::Import, "Expected 'import' after module name")?;

        if self.match_op(OperatorId::Star) {
            return Ok(ImportFromStmt {
                module,
                level,
                names: ImportNames::Wildcard,
            });
        }

        let parenthesized = self.match_punct(PunctuationId::LParen);
        let mut names = Vec::new();
        loop {
            let start = self.current_start();
            let name = self.identifier_after("Expected name to import")?;
            let alias = self.import_alias()?;
            names.push(Spanned::new(
                ImportAlias {
                    path: vec![name],
                    alias,
                },
                Span::new(start, self.prev_end()),
            ));
            let comma = self.current_span();
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
            if parenthesized && self.check_punct(PunctuationId::RParen) {
                break;
            }
            if !parenthesized && self.at_statement_end() {
                return Err(CompileError::syntax(
                    "trailing comma not allowed without surrounding parentheses".to_string(),
                    comma,
                ));
            }
        }
        if parenthesized {
            self.expect_punct(PunctuationId::RParen, "Expected ')' after imported names")?;
        }

        Ok(ImportFromStmt {
            module,
            level,
            names: ImportNames::Names(names),
        })
    }

    fn import_alias(&mut self) -> Result<Option<Ident>, CompileError> {
        if self.match_keyword(KeywordId::As) {
            Ok(Some(self.identifier_after("Expected name after 'as'")?))
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // Compound statements
    // ========================================================================

    /// `if` / `elif` chain; each `elif` becomes a nested `If` as the only statement of the else branch.
    fn if_statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.advance().span.start; // if / elif
        let condition = self.named_expression()?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' after if condition")?;
        let body = self.block()?;

        let orelse = if self.check_keyword(KeywordId::Elif) {
            vec![self.if_statement()?]
        } else {
            self.else_block()?
        };

        Ok(Spanned::new(
            Statement::If(IfStmt {
                condition,
                body,
                orelse,
            }),
            Span::new(start, self.prev_end()),
        ))
    }

    /// Optional `else: block`.
    fn else_block(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        if self.match_keyword(KeywordId::Else) {
            self.expect_punct(PunctuationId::Colon, "Expected ':' after 'else'")?;
            self.block()
        } else {
            Ok(Vec::new())
        }
    }

    fn while_statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.advance().span.start; // while
        let condition = self.named_expression()?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' after while condition")?;
        let body = self.block()?;
        let orelse = self.else_block()?;

        Ok(Spanned::new(
            Statement::While(WhileStmt {
                condition,
                body,
                orelse,
            }),
            Span::new(start, self.prev_end()),
        ))
    }

    /// `['async'] 'for' star_targets 'in' star_expressions ':' block ['else' ':' block]`
    fn for_statement(&mut self, is_async: bool) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_start();
        if is_async {
            self.advance(); // async
        }
        self.expect_keyword(KeywordId::For, "Expected 'for'")?;

        let target = self.star_targets()?;
        self.expect_keyword(KeywordId::In, "Expected 'in' after for target")?;
        let iter = self.star_expressions()?;
        self.expect_punct(PunctuationId::Colon, "Expected ':' after for iterable")?;
        let body = self.block()?;
        let orelse = self.else_block()?;

        Ok(Spanned::new(
            Statement::For(ForStmt {
                is_async,
                target,
                iter,
                body,
                orelse,
            }),
            Span::new(start, self.prev_end()),
        ))
    }

    /// `['async'] 'with' items ':' block`, where the items may be wrapped in one pair of parentheses.
    fn with_statement(&mut self, is_async: bool) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_start();
        if is_async {
            self.advance(); // async
        }
        self.expect_keyword(KeywordId::With, "Expected 'with'")?;

        let items = match self.speculate(|p| p.parenthesized_with_items()) {
            Some(items) => items,
            None => self.with_items()?,
        };
        self.expect_punct(PunctuationId::Colon, "Expected ':' after with items")?;
        let body = self.block()?;

        Ok(Spanned::new(
            Statement::With(WithStmt { is_async, items, body }),
            Span::new(start, self.prev_end()),
        ))
    }

    /// `'(' with_item (',' with_item)* [','] ')'` directly followed by `:`.
    fn parenthesized_with_items(&mut self) -> Result<Vec<Spanned<WithItem>>, CompileError> {
        self.expect_punct(PunctuationId::LParen, "Expected '('")?;
        let mut items = Vec::new();
        loop {
            items.push(self.with_item()?);
            if !self.match_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::RParen) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after with items")?;
        if !self.check_punct(PunctuationId::Colon) {
            return Err(self.error_at_current("Expected ':' after with items"));
        }
        Ok(items)
    }

    fn with_items(&mut self) -> Result<Vec<Spanned<WithItem>>, CompileError> {
        let mut items = vec![self.with_item()?];
        while self.match_punct(PunctuationId::Comma) {
            items.push(self.with_item()?);
        }
        Ok(items)
    }

    /// `expression ['as' star_target]`
    fn with_item(&mut self) -> Result<Spanned<WithItem>, CompileError> {
        let context = self.expression()?;
        let target = if self.match_keyword(KeywordId::As) {
            let target = self.star_target()?;
            validate_target(&target, TargetUse::Store)?;
            Some(target)
        } else {
            None
        };
        let span = Span::new(context.span.start, self.prev_end());
        Ok(Spanned::new(WithItem { context, target }, span))
    }

    /// `try` with `except` / `except*` handlers, `else` and `finally`.
    fn try_statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.advance().span.start; // try
        self.expect_punct(PunctuationId::Colon, "Expected ':' after 'try'")?;
        let body = self.block()?;

        let mut handlers = Vec::new();
        let mut is_star: Option<bool> = None;
        while self.check_keyword(KeywordId::Except) {
            let handler_start = self.advance().span.start;
            let star = self.match_op(OperatorId::Star);
            if *is_star.get_or_insert(star) != star {
                return Err(CompileError::syntax(
                    "cannot have both 'except' and 'except*' on the same 'try'".to_string(),
                    Span::new(handler_start, self.prev_end()),
                ));
            }

            let (kind, name) = if self.check_punct(PunctuationId::Colon) {
                if star {
                    return Err(self.error_at_current("expected exception type after 'except*'"));
                }
                (None, None)
            } else {
                let kind = self.expression()?;
                let name = if self.match_keyword(KeywordId::As) {
                    Some(self.identifier_after("Expected name after 'as'")?)
                } else {
                    None
                };
                (Some(kind), name)
            };

            self.expect_punct(PunctuationId::Colon, "Expected ':' after except clause")?;
            let handler_body = self.block()?;
            handlers.push(Spanned::new(
                ExceptHandler {
                    kind,
                    name,
                    body: handler_body,
                },
                Span::new(handler_start, self.prev_end()),
            ));
        }

        if self.check_keyword(KeywordId::Else) && handlers.is_empty() {
            return Err(self.error_at_current("Expected 'except' before 'else' in try statement"));
        }
        let orelse = self.else_block()?;

        let finalbody = if self.match_keyword(KeywordId::Finally) {
            self.expect_punct(PunctuationId::Colon, "Expected ':' after 'finally'")?;
            self.block()?
        } else {
            Vec::new()
        };

        if handlers.is_empty() && finalbody.is_empty() {
            return Err(self.error_at_current("Expected 'except' or 'finally' block"));
        }

        Ok(Spanned::new(
            Statement::Try(TryStmt {
                body,
                handlers,
                orelse,
                finalbody,
                is_star: is_star.unwrap_or(false),
            }),
            Span::new(start, self.prev_end()),
        ))
    }

    // ========================================================================
    // match
    // ========================================================================

    /// `match subject ':' NEWLINE INDENT case+ DEDENT`
    ///
    /// Declines (`Ok(None)`) unless the header up to the newline fits, so `match = 1` and `match(x)` stay ordinary
    /// statements.
    fn match_statement(&mut self) -> Result<Option<Spanned<Statement>>, CompileError> {
        let start = self.advance().span.start; // match
        let Some(subject) = self.speculate(|p| p.match_subject()) else {
            return Ok(None);
        };
        if !self.check_punct(PunctuationId::Colon) || !self.peek_next().kind.is_layout() {
            return Ok(None);
        }
        self.advance(); // :

        self.expect(&TokenKind::Newline, "Expected newline after match subject")?;
        self.skip_newlines();
        self.expect(&TokenKind::Indent, "Expected an indented block of 'case' clauses")?;

        let mut cases = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            cases.push(self.case_block()?);
            self.skip_newlines();
        }
        self.match_token(&TokenKind::Dedent);

        if cases.is_empty() {
            return Err(self.error_at_current("Expected 'case' in match block"));
        }

        Ok(Some(Spanned::new(
            Statement::Match(MatchStmt { subject, cases }),
            Span::new(start, self.prev_end()),
        )))
    }

    /// `star_named_expression (',' star_named_expression)* [',']`; a comma makes a tuple.
    fn match_subject(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let first = self.star_named_expression()?;
        if !self.check_punct(PunctuationId::Comma) {
            if matches!(first.node, Expr::Starred(_)) {
                return Err(self.error_at_current("Expected ',' after starred match subject"));
            }
            return Ok(first);
        }

        let start = first.span.start;
        let mut elements = vec![first];
        while self.match_punct(PunctuationId::Comma) {
            if self.check_punct(PunctuationId::Colon) {
                break;
            }
            elements.push(self.star_named_expression()?);
        }
        Ok(Spanned::new(Expr::Tuple(elements), Span::new(start, self.prev_end())))
    }

    /// `'case' patterns ['if' named_expression] ':' block`
    fn case_block(&mut self) -> Result<Spanned<MatchCase>, CompileError> {
        if !self.check_soft_keyword(KeywordId::Case) {
            return Err(self.error_at_current("Expected 'case' in match block"));
        }
        let start = self.advance().span.start;

        let pattern = self.patterns()?;
        let guard = if self.match_keyword(KeywordId::If) {
            Some(self.named_expression()?)
        } else {
            None
        };
        self.expect_punct(PunctuationId::Colon, "Expected ':' after case pattern")?;
        let body = self.block()?;

        Ok(Spanned::new(
            MatchCase { pattern, guard, body },
            Span::new(start, self.prev_end()),
        ))
    }

    // ========================================================================
    // type aliases
    // ========================================================================

    /// `type NAME [` or `type NAME =` ahead.
    fn at_type_alias(&self) -> bool {
        matches!(self.peek_next().kind, TokenKind::Ident(_))
            && (self.peek_nth(2).kind.is_punctuation(PunctuationId::LBracket)
                || self.peek_nth(2).kind.is_operator(OperatorId::Eq))
    }

    /// `'type' NAME [type_params] '=' expression`
    fn type_alias(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.advance().span.start; // type
        let name = self.identifier_spanned()?;
        let type_params = if self.check_punct(PunctuationId::LBracket) {
            self.type_params()?
        } else {
            Vec::new()
        };
        self.expect_op(OperatorId::Eq, "Expected '=' in type alias")?;
        let value = self.expression()?;

        Ok(Spanned::new(
            Statement::TypeAlias(TypeAliasStmt {
                name,
                type_params,
                value,
            }),
            Span::new(start, self.prev_end()),
        ))
    }
}
