/// Parser core types and entrypoints.
///
/// This chunk defines the [`Parser`] type, its module-level `parse()` loop, and the shared driver used by the
/// embedding entry points (expression, statement, pattern, argument list).
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
/// - Parsing stops at the first error. There is no statement-level resynchronization.

/// Returned by `peek` once the cursor has run past the token slice.
static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span { start: 0, end: 0 },
};

/// Parser state.
///
/// The only mutable state is the cursor. Alternatives are explored by saving `pos` and restoring it verbatim.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `tarn_syntax::lexer`, normally terminated by `Eof`.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the entire token stream into a [`Module`].
    ///
    /// ## Errors
    /// Returns a single-element error list for the first syntax error encountered.
    pub fn parse(mut self) -> Result<Module, Vec<CompileError>> {
        let mut body = Vec::new();

        self.skip_newlines();
        while !self.is_at_end() {
            match self.statement() {
                Ok(stmts) => body.extend(stmts),
                Err(e) => return Err(vec![e]),
            }
            self.skip_newlines();
        }

        Ok(Module { body })
    }

    /// Run one grammar rule over the whole token stream.
    ///
    /// Leading newlines are skipped; after the rule only layout tokens may remain before `Eof`.
    fn parse_entry<T>(
        mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, Vec<CompileError>> {
        self.skip_newlines();
        let result = rule(&mut self).and_then(|node| {
            while self.peek().kind.is_layout() {
                self.advance();
            }
            self.expect(&TokenKind::Eof, "Expected end of input")?;
            Ok(node)
        });
        result.map_err(|e| vec![e])
    }
}
