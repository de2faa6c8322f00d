/// Parse a token stream into an AST [`Module`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `tarn_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<CompileError>)` holding the first syntax error.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Module, Vec<CompileError>> {
    Parser::new(tokens).parse()
}

/// Parse a standalone expression list, as found on the right of `=` (`a, *b` yields a tuple).
///
/// Trailing newlines are allowed; any other leftover token is an error.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_expression(tokens: &[Token]) -> Result<Spanned<Expr>, Vec<CompileError>> {
    Parser::new(tokens).parse_entry(|p| p.star_expressions())
}

/// Parse exactly one logical statement.
///
/// Simple statements separated by `;` and chained assignments expand to several sibling statements.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_statement(tokens: &[Token]) -> Result<Vec<Spanned<Statement>>, Vec<CompileError>> {
    Parser::new(tokens).parse_entry(|p| p.statement())
}

/// Parse the pattern of a `case` clause, open sequences included.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_pattern(tokens: &[Token]) -> Result<Spanned<Pattern>, Vec<CompileError>> {
    Parser::new(tokens).parse_entry(|p| p.patterns())
}

/// Parse the inside of a call's parentheses, without the parentheses themselves.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_arguments(tokens: &[Token]) -> Result<Vec<Spanned<CallArg>>, Vec<CompileError>> {
    Parser::new(tokens).parse_entry(|p| p.call_arguments())
}
