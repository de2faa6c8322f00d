/// Identifier helpers.
impl<'a> Parser<'a> {
    fn identifier(&mut self) -> Result<Ident, CompileError> {
        self.identifier_after("Expected identifier")
    }

    /// Consume an identifier, or fail with `msg`.
    fn identifier_after(&mut self, msg: &str) -> Result<Ident, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name.clone())
            }
            _ => Err(self.error_at_current(msg)),
        }
    }

    fn identifier_spanned(&mut self) -> Result<Spanned<Ident>, CompileError> {
        let span = self.current_span();
        let name = self.identifier()?;
        Ok(Spanned::new(name, span))
    }

    /// `NAME (',' NAME)*` for `global` and `nonlocal`.
    fn identifier_list_spanned(&mut self) -> Result<Vec<Spanned<Ident>>, CompileError> {
        let mut names = vec![self.identifier_spanned()?];
        while self.match_punct(PunctuationId::Comma) {
            names.push(self.identifier_spanned()?);
        }
        Ok(names)
    }

    /// `NAME ('.' NAME)*`
    fn dotted_name(&mut self) -> Result<Vec<Ident>, CompileError> {
        let mut path = vec![self.identifier_after("Expected module name")?];
        while self.match_punct(PunctuationId::Dot) {
            path.push(self.identifier_after("Expected name after '.'")?);
        }
        Ok(path)
    }
}

// ============================================================================
// Free helpers
// ============================================================================

/// Short noun phrase for an expression, used in "cannot assign to ..." style messages.
fn describe_expr(expr: &Expr) -> String {
    let phrase = match expr {
        Expr::Name(_) => "name",
        Expr::Literal(Literal::Bool(true)) => "True",
        Expr::Literal(Literal::Bool(false)) => "False",
        Expr::Literal(Literal::None) => "None",
        Expr::Literal(Literal::Ellipsis) => "ellipsis",
        Expr::Literal(_) => "literal",
        Expr::Binary(_, op, _) if op.is_comparison() => "comparison",
        Expr::Unary(..) | Expr::Binary(..) => "expression",
        Expr::Ternary(_) => "conditional expression",
        Expr::Lambda(_) => "lambda",
        Expr::NamedExpr(..) => "named expression",
        Expr::Await(_) => "await expression",
        Expr::Yield(_) | Expr::YieldFrom(_) => "yield expression",
        Expr::Starred(_) => "starred",
        Expr::Call(..) => "function call",
        Expr::Attribute(..) => "attribute",
        Expr::Subscript(..) => "subscript",
        Expr::Slice(_) => "slice",
        Expr::Group(inner) => return describe_expr(&inner.node),
        Expr::Tuple(_) => "tuple",
        Expr::List(_) => "list",
        Expr::Set(_) => "set display",
        Expr::Dict(_) => "dict literal",
        Expr::ListComp(_) => "list comprehension",
        Expr::SetComp(_) => "set comprehension",
        Expr::GenExpr(_) => "generator expression",
        Expr::DictComp(_) => "dict comprehension",
        Expr::FString(_) => "f-string expression",
    };
    phrase.to_string()
}

/// The binary operator an arithmetic or bitwise operator token stands for.
fn binary_op_for(id: OperatorId) -> Option<BinaryOp> {
    Some(match id {
        OperatorId::Plus => BinaryOp::Add,
        OperatorId::Minus => BinaryOp::Sub,
        OperatorId::Star => BinaryOp::Mul,
        OperatorId::At => BinaryOp::MatMul,
        OperatorId::Slash => BinaryOp::Div,
        OperatorId::SlashSlash => BinaryOp::FloorDiv,
        OperatorId::Percent => BinaryOp::Mod,
        OperatorId::StarStar => BinaryOp::Pow,
        OperatorId::LtLt => BinaryOp::LShift,
        OperatorId::GtGt => BinaryOp::RShift,
        OperatorId::Pipe => BinaryOp::BitOr,
        OperatorId::Caret => BinaryOp::BitXor,
        OperatorId::Amp => BinaryOp::BitAnd,
        _ => return None,
    })
}
