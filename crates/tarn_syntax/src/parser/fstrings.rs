/// F-string sub-parser.
///
/// The lexer hands f-strings over as `FStringStart (FStringMiddle | field)* FStringEnd`, where a field is
/// `FStringFieldStart expr [FStringDebug] [FStringConversion NAME] [':' spec] FStringFieldEnd` and a spec is
/// again a run of `FStringMiddle` and nested fields. Field expressions go through the ordinary expression grammar.
impl<'a> Parser<'a> {
    /// Parse one f-string token run into its parts. The span covers prefix to closing quote.
    fn fstring(&mut self) -> Result<Spanned<Vec<Spanned<FStringPart>>>, CompileError> {
        let start = self.expect(&TokenKind::FStringStart, "Expected f-string")?.span.start;
        let parts = self.fstring_parts()?;
        self.expect(&TokenKind::FStringEnd, "f-string: expecting end of string")?;
        Ok(Spanned::new(parts, Span::new(start, self.prev_end())))
    }

    /// Literal text and replacement fields until a token that is neither.
    fn fstring_parts(&mut self) -> Result<Vec<Spanned<FStringPart>>, CompileError> {
        let mut parts = Vec::new();

        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::FStringMiddle(text) => {
                    self.advance();
                    parts.push(Spanned::new(FStringPart::Literal(text.clone()), token.span));
                }
                TokenKind::FStringFieldStart => {
                    let field = self.replacement_field()?;
                    let span = field.span;
                    parts.push(Spanned::new(FStringPart::Field(Box::new(field.node)), span));
                }
                _ => break,
            }
        }

        Ok(parts)
    }

    /// `{expr[=][!conv][:spec]}`
    fn replacement_field(&mut self) -> Result<Spanned<ReplacementField>, CompileError> {
        let start = self.advance().span.start; // {

        if matches!(
            self.peek().kind,
            TokenKind::FStringFieldEnd | TokenKind::FStringDebug | TokenKind::FStringConversion
        ) || self.check_punct(PunctuationId::Colon)
        {
            return Err(CompileError::syntax(
                "f-string: valid expression required before '}'".to_string(),
                Span::new(start, self.current_span().end),
            ));
        }

        let expr = self.assignment_value()?;
        let debug = self.match_token(&TokenKind::FStringDebug);

        let conversion = if self.match_token(&TokenKind::FStringConversion) {
            Some(self.conversion()?)
        } else {
            None
        };

        let format_spec = if self.match_punct(PunctuationId::Colon) {
            Some(self.fstring_parts()?)
        } else {
            None
        };

        self.expect(&TokenKind::FStringFieldEnd, "f-string: expecting '}'")?;
        Ok(Spanned::new(
            ReplacementField {
                expr,
                debug,
                conversion,
                format_spec,
            },
            Span::new(start, self.prev_end()),
        ))
    }

    /// The identifier after `!`, which must be exactly `r`, `s` or `a`.
    fn conversion(&mut self) -> Result<Conversion, CompileError> {
        let token = self.peek();
        let TokenKind::Ident(name) = &token.kind else {
            return Err(self.error_at_current("f-string: missing conversion character"));
        };

        let mut chars = name.chars();
        let conversion = match (chars.next(), chars.next()) {
            (Some(c), None) => Conversion::from_char(c),
            _ => None,
        };
        match conversion {
            Some(conversion) => {
                self.advance();
                Ok(conversion)
            }
            None => Err(CompileError::syntax(
                format!(
                    "f-string: invalid conversion character '{}': expected 's', 'r', or 'a'",
                    name
                ),
                token.span,
            )),
        }
    }
}
