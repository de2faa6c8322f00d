//! Canonical text rendering of the AST.
//!
//! Expressions render fully parenthesized (`a + b * c` becomes `(a + (b * c))`), so the rendering doubles as a
//! readable dump of the tree shape. Statements render as normalized source with four-space indentation.

use std::fmt::{self, Display, Formatter, Write};

use super::*;

const INDENT: &str = "    ";

impl<T: Display> Display for Spanned<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.node.fmt(f)
    }
}

fn comma_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

// ============================================================================
// Expressions
// ============================================================================

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{:?}", x),
            Literal::Imaginary(x) => write!(f, "{:?}j", x),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Literal::Bool(true) => f.write_str("True"),
            Literal::Bool(false) => f.write_str("False"),
            Literal::None => f.write_str("None"),
            Literal::Ellipsis => f.write_str("..."),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(name) => f.write_str(name),
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Unary(op, operand) => write!(f, "({}{})", op, operand),
            Expr::Binary(left, op, right) => write!(f, "({} {} {})", left, op, right),
            Expr::Ternary(t) => write!(f, "({} if {} else {})", t.body, t.condition, t.orelse),
            Expr::Lambda(l) => {
                f.write_str("(lambda")?;
                if !l.params.is_empty() {
                    f.write_char(' ')?;
                    write_params(f, &l.params)?;
                }
                write!(f, ": {})", l.body)
            }
            Expr::NamedExpr(target, value) => write!(f, "({} := {})", target, value),
            Expr::Await(e) => write!(f, "(await {})", e),
            Expr::Yield(None) => f.write_str("(yield)"),
            Expr::Yield(Some(e)) => write!(f, "(yield {})", e),
            Expr::YieldFrom(e) => write!(f, "(yield from {})", e),
            Expr::Starred(e) => write!(f, "*{}", e),
            Expr::Call(callee, args) => {
                write!(f, "{}(", callee)?;
                comma_separated(f, args)?;
                f.write_char(')')
            }
            Expr::Attribute(value, name) => write!(f, "{}.{}", value, name),
            Expr::Subscript(value, entries) => {
                write!(f, "{}[", value)?;
                comma_separated(f, entries)?;
                f.write_char(']')
            }
            Expr::Slice(s) => {
                if let Some(start) = &s.start {
                    write!(f, "{}", start)?;
                }
                f.write_char(':')?;
                if let Some(end) = &s.end {
                    write!(f, "{}", end)?;
                }
                if let Some(step) = &s.step {
                    write!(f, ":{}", step)?;
                }
                Ok(())
            }
            Expr::Group(e) => write!(f, "({})", e),
            Expr::Tuple(items) => {
                f.write_char('(')?;
                comma_separated(f, items)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Expr::List(items) => {
                f.write_char('[')?;
                comma_separated(f, items)?;
                f.write_char(']')
            }
            Expr::Set(items) => {
                f.write_char('{')?;
                comma_separated(f, items)?;
                f.write_char('}')
            }
            Expr::Dict(entries) => {
                f.write_char('{')?;
                comma_separated(f, entries)?;
                f.write_char('}')
            }
            Expr::ListComp(c) => write!(f, "[{}]", c),
            Expr::SetComp(c) => write!(f, "{{{}}}", c),
            Expr::GenExpr(c) => write!(f, "({})", c),
            Expr::DictComp(c) => {
                write!(f, "{{{}: {}", c.key, c.value)?;
                write_clauses(f, &c.clauses)?;
                f.write_char('}')
            }
            Expr::FString(parts) => {
                f.write_str("f\"")?;
                write_fstring_parts(f, parts)?;
                f.write_char('"')
            }
        }
    }
}

impl Display for CallArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CallArg::Positional(e) => write!(f, "{}", e),
            CallArg::Keyword(name, e) => write!(f, "{}={}", name, e),
            CallArg::Starred(e) => write!(f, "*{}", e),
            CallArg::DoubleStarred(e) => write!(f, "**{}", e),
        }
    }
}

impl Display for DictEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DictEntry::Pair(k, v) => write!(f, "{}: {}", k, v),
            DictEntry::Unpack(m) => write!(f, "**{}", m),
        }
    }
}

impl Display for Comprehension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element)?;
        write_clauses(f, &self.clauses)
    }
}

fn write_clauses(f: &mut Formatter<'_>, clauses: &[Spanned<ComprehensionClause>]) -> fmt::Result {
    for clause in clauses {
        let c = &clause.node;
        if c.is_async {
            f.write_str(" async")?;
        }
        write!(f, " for {} in {}", c.target, c.iter)?;
        for cond in &c.ifs {
            write!(f, " if {}", cond)?;
        }
    }
    Ok(())
}

fn write_fstring_parts(f: &mut Formatter<'_>, parts: &[Spanned<FStringPart>]) -> fmt::Result {
    for part in parts {
        match &part.node {
            FStringPart::Literal(text) => {
                for c in text.chars() {
                    match c {
                        '{' => f.write_str("{{")?,
                        '}' => f.write_str("}}")?,
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        c => f.write_char(c)?,
                    }
                }
            }
            FStringPart::Field(field) => {
                let expr = field.expr.to_string();
                // `{{` would read back as an escaped brace
                if expr.starts_with('{') {
                    write!(f, "{{ {}", expr)?;
                } else {
                    write!(f, "{{{}", expr)?;
                }
                if field.debug {
                    f.write_char('=')?;
                }
                if let Some(conversion) = field.conversion {
                    write!(f, "!{}", conversion.as_char())?;
                }
                if let Some(spec) = &field.format_spec {
                    f.write_char(':')?;
                    write_fstring_parts(f, spec)?;
                }
                f.write_char('}')?;
            }
        }
    }
    Ok(())
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::VarPositional => f.write_char('*')?,
            ParamKind::VarKeyword => f.write_str("**")?,
            _ => {}
        }
        f.write_str(&self.name)?;
        if let Some(annotation) = &self.annotation {
            write!(f, ": {}", annotation)?;
        }
        match (&self.default, &self.annotation) {
            (Some(default), Some(_)) => write!(f, " = {}", default),
            (Some(default), None) => write!(f, "={}", default),
            (None, _) => Ok(()),
        }
    }
}

/// Writes a parameter list, restoring the `/` and bare `*` markers the kinds imply.
fn write_params(f: &mut Formatter<'_>, params: &[Spanned<Param>]) -> fmt::Result {
    let has_var_positional = params.iter().any(|p| p.node.kind == ParamKind::VarPositional);
    let mut pieces: Vec<String> = Vec::with_capacity(params.len() + 2);
    let mut star_written = has_var_positional;
    for (i, param) in params.iter().enumerate() {
        if param.node.kind == ParamKind::KeywordOnly && !star_written {
            pieces.push("*".to_string());
            star_written = true;
        }
        pieces.push(param.node.to_string());
        let next_kind = params.get(i + 1).map(|p| p.node.kind);
        if param.node.kind == ParamKind::PositionalOnly && next_kind != Some(ParamKind::PositionalOnly) {
            pieces.push("/".to_string());
        }
    }
    f.write_str(&pieces.join(", "))
}

impl Display for TypeParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TypeParamKind::TypeVar => {}
            TypeParamKind::TypeVarTuple => f.write_char('*')?,
            TypeParamKind::ParamSpec => f.write_str("**")?,
        }
        f.write_str(&self.name)?;
        if let Some(bound) = &self.bound {
            write!(f, ": {}", bound)?;
        }
        Ok(())
    }
}

fn write_type_params(f: &mut Formatter<'_>, params: &[Spanned<TypeParam>]) -> fmt::Result {
    if params.is_empty() {
        return Ok(());
    }
    f.write_char('[')?;
    comma_separated(f, params)?;
    f.write_char(']')
}

// ============================================================================
// Patterns
// ============================================================================

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Wildcard => f.write_char('_'),
            Pattern::Capture(name) => f.write_str(name),
            Pattern::Literal(e) | Pattern::Value(e) => write!(f, "{}", e),
            Pattern::Group(p) => write!(f, "({})", p),
            Pattern::Sequence(SequenceKind::List, items) => {
                f.write_char('[')?;
                comma_separated(f, items)?;
                f.write_char(']')
            }
            Pattern::Sequence(SequenceKind::Tuple, items) => {
                f.write_char('(')?;
                comma_separated(f, items)?;
                if items.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Pattern::Star(Some(name)) => write!(f, "*{}", name),
            Pattern::Star(None) => f.write_str("*_"),
            Pattern::Mapping(m) => {
                f.write_char('{')?;
                for (i, entry) in m.entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", entry.node.key, entry.node.pattern)?;
                }
                if let Some(rest) = &m.rest {
                    if !m.entries.is_empty() {
                        f.write_str(", ")?;
                    }
                    write!(f, "**{}", rest)?;
                }
                f.write_char('}')
            }
            Pattern::Class(c) => {
                write!(f, "{}(", c.class)?;
                comma_separated(f, &c.patterns)?;
                for (i, kw) in c.keywords.iter().enumerate() {
                    if i > 0 || !c.patterns.is_empty() {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={}", kw.node.name, kw.node.pattern)?;
                }
                f.write_char(')')
            }
            Pattern::Or(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                Ok(())
            }
            Pattern::As(p, name) => write!(f, "{} as {}", p, name),
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Display for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.body {
            write_statement(f, &stmt.node, 0)?;
        }
        Ok(())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_statement(f, self, 0)
    }
}

impl Display for ImportAlias {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path.join("."))?;
        if let Some(alias) = &self.alias {
            write!(f, " as {}", alias)?;
        }
        Ok(())
    }
}

fn pad(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

fn write_block(f: &mut Formatter<'_>, body: &[Spanned<Statement>], depth: usize) -> fmt::Result {
    for stmt in body {
        write_statement(f, &stmt.node, depth)?;
    }
    Ok(())
}

fn write_statement(f: &mut Formatter<'_>, stmt: &Statement, depth: usize) -> fmt::Result {
    pad(f, depth)?;
    match stmt {
        Statement::Expr(e) => writeln!(f, "{}", e),
        Statement::Assign(a) => writeln!(f, "{} = {}", a.target, a.value),
        Statement::AnnAssign(a) => {
            write!(f, "{}: {}", a.target, a.annotation)?;
            if let Some(value) = &a.value {
                write!(f, " = {}", value)?;
            }
            writeln!(f)
        }
        Statement::Return(None) => writeln!(f, "return"),
        Statement::Return(Some(e)) => writeln!(f, "return {}", e),
        Statement::Raise(r) => {
            f.write_str("raise")?;
            if let Some(exc) = &r.exception {
                write!(f, " {}", exc)?;
            }
            if let Some(cause) = &r.cause {
                write!(f, " from {}", cause)?;
            }
            writeln!(f)
        }
        Statement::Pass => writeln!(f, "pass"),
        Statement::Break => writeln!(f, "break"),
        Statement::Continue => writeln!(f, "continue"),
        Statement::Del(targets) => {
            f.write_str("del ")?;
            comma_separated(f, targets)?;
            writeln!(f)
        }
        Statement::Global(names) => {
            f.write_str("global ")?;
            comma_separated(f, names)?;
            writeln!(f)
        }
        Statement::Nonlocal(names) => {
            f.write_str("nonlocal ")?;
            comma_separated(f, names)?;
            writeln!(f)
        }
        Statement::Assert(a) => {
            write!(f, "assert {}", a.test)?;
            if let Some(message) = &a.message {
                write!(f, ", {}", message)?;
            }
            writeln!(f)
        }
        Statement::Import(names) => {
            f.write_str("import ")?;
            comma_separated(f, names)?;
            writeln!(f)
        }
        Statement::ImportFrom(i) => {
            f.write_str("from ")?;
            for _ in 0..i.level {
                f.write_char('.')?;
            }
            if let Some(module) = &i.module {
                f.write_str(&module.join("."))?;
            }
            f.write_str(" import ")?;
            match &i.names {
                ImportNames::Wildcard => f.write_char('*')?,
                ImportNames::Names(names) => comma_separated(f, names)?,
            }
            writeln!(f)
        }
        Statement::FunctionDef(def) => {
            for decorator in &def.decorators {
                writeln!(f, "@{}", decorator)?;
                pad(f, depth)?;
            }
            if def.is_async {
                f.write_str("async ")?;
            }
            write!(f, "def {}", def.name)?;
            write_type_params(f, &def.type_params)?;
            f.write_char('(')?;
            write_params(f, &def.params)?;
            f.write_char(')')?;
            if let Some(returns) = &def.returns {
                write!(f, " -> {}", returns)?;
            }
            writeln!(f, ":")?;
            write_block(f, &def.body, depth + 1)
        }
        Statement::ClassDef(class) => {
            for decorator in &class.decorators {
                writeln!(f, "@{}", decorator)?;
                pad(f, depth)?;
            }
            write!(f, "class {}", class.name)?;
            write_type_params(f, &class.type_params)?;
            if !class.arguments.is_empty() {
                f.write_char('(')?;
                comma_separated(f, &class.arguments)?;
                f.write_char(')')?;
            }
            writeln!(f, ":")?;
            write_block(f, &class.body, depth + 1)
        }
        Statement::If(s) => write_if(f, s, depth, "if"),
        Statement::While(s) => {
            writeln!(f, "while {}:", s.condition)?;
            write_block(f, &s.body, depth + 1)?;
            write_else(f, &s.orelse, depth)
        }
        Statement::For(s) => {
            if s.is_async {
                f.write_str("async ")?;
            }
            writeln!(f, "for {} in {}:", s.target, s.iter)?;
            write_block(f, &s.body, depth + 1)?;
            write_else(f, &s.orelse, depth)
        }
        Statement::With(s) => {
            if s.is_async {
                f.write_str("async ")?;
            }
            f.write_str("with ")?;
            for (i, item) in s.items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", item.node.context)?;
                if let Some(target) = &item.node.target {
                    write!(f, " as {}", target)?;
                }
            }
            writeln!(f, ":")?;
            write_block(f, &s.body, depth + 1)
        }
        Statement::Try(s) => {
            writeln!(f, "try:")?;
            write_block(f, &s.body, depth + 1)?;
            for handler in &s.handlers {
                pad(f, depth)?;
                f.write_str(if s.is_star { "except*" } else { "except" })?;
                if let Some(kind) = &handler.node.kind {
                    write!(f, " {}", kind)?;
                }
                if let Some(name) = &handler.node.name {
                    write!(f, " as {}", name)?;
                }
                writeln!(f, ":")?;
                write_block(f, &handler.node.body, depth + 1)?;
            }
            write_else(f, &s.orelse, depth)?;
            if !s.finalbody.is_empty() {
                pad(f, depth)?;
                writeln!(f, "finally:")?;
                write_block(f, &s.finalbody, depth + 1)?;
            }
            Ok(())
        }
        Statement::Match(m) => {
            writeln!(f, "match {}:", m.subject)?;
            for case in &m.cases {
                pad(f, depth + 1)?;
                write!(f, "case {}", case.node.pattern)?;
                if let Some(guard) = &case.node.guard {
                    write!(f, " if {}", guard)?;
                }
                writeln!(f, ":")?;
                write_block(f, &case.node.body, depth + 2)?;
            }
            Ok(())
        }
        Statement::TypeAlias(t) => {
            write!(f, "type {}", t.name)?;
            write_type_params(f, &t.type_params)?;
            writeln!(f, " = {}", t.value)
        }
    }
}

fn write_if(f: &mut Formatter<'_>, s: &IfStmt, depth: usize, keyword: &str) -> fmt::Result {
    writeln!(f, "{} {}:", keyword, s.condition)?;
    write_block(f, &s.body, depth + 1)?;
    match s.orelse.as_slice() {
        [] => Ok(()),
        [Spanned { node: Statement::If(elif), .. }] => {
            pad(f, depth)?;
            write_if(f, elif, depth, "elif")
        }
        orelse => write_else(f, orelse, depth),
    }
}

fn write_else(f: &mut Formatter<'_>, orelse: &[Spanned<Statement>], depth: usize) -> fmt::Result {
    if orelse.is_empty() {
        return Ok(());
    }
    pad(f, depth)?;
    writeln!(f, "else:")?;
    write_block(f, orelse, depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Spanned<Expr> {
        Spanned::new(Expr::Name(n.to_string()), Span::default())
    }

    #[test]
    fn binary_renders_parenthesized() {
        let sum = Expr::Binary(Box::new(name("a")), BinaryOp::Add, Box::new(name("b")));
        assert_eq!(sum.to_string(), "(a + b)");
    }

    #[test]
    fn single_tuple_keeps_trailing_comma() {
        let tuple = Expr::Tuple(vec![name("x")]);
        assert_eq!(tuple.to_string(), "(x,)");
    }

    #[test]
    fn params_restore_markers() {
        let param = |n: &str, kind| {
            Spanned::new(
                Param {
                    name: n.to_string(),
                    kind,
                    annotation: None,
                    default: None,
                },
                Span::default(),
            )
        };
        let lambda = Expr::Lambda(Box::new(LambdaExpr {
            params: vec![
                param("a", ParamKind::PositionalOnly),
                param("b", ParamKind::Regular),
                param("c", ParamKind::KeywordOnly),
            ],
            body: name("a"),
        }));
        assert_eq!(lambda.to_string(), "(lambda a, /, b, *, c: a)");
    }
}
