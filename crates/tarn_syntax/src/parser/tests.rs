#[cfg(test)]
/// Parser unit tests.
///
/// These tests pin the tree shapes of the ambiguous constructs and the exact wording of the syntax errors.
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Module, Vec<CompileError>> {
        let tokens = lexer::lex(source)?;
        parse(&tokens)
    }

    /// Canonical rendering of a source that must parse.
    fn render(source: &str) -> String {
        match parse_str(source) {
            Ok(module) => module.to_string(),
            Err(errors) => panic!("parse failed for {:?}: {:?}", source, errors),
        }
    }

    /// The single error message of a source that must not parse.
    fn error_message(source: &str) -> String {
        let errors = parse_str(source).expect_err("source should be rejected");
        assert_eq!(errors.len(), 1, "parsing stops at the first error");
        errors[0].message.clone()
    }

    fn assert_error(source: &str, expected: &str) {
        let message = error_message(source);
        assert!(
            message.contains(expected),
            "expected error containing {:?} for {:?}; got: {}",
            expected,
            source,
            message
        );
    }

    // ------------------------------------------------------------------------
    // Assignment forms
    // ------------------------------------------------------------------------

    #[test]
    fn test_chained_assignment_shares_value() {
        let module = parse_str("x = y = f()\n").unwrap();
        assert_eq!(module.body.len(), 2);
        match (&module.body[0].node, &module.body[1].node) {
            (Statement::Assign(first), Statement::Assign(second)) => {
                assert_eq!(first.target.node, Expr::Name("x".to_string()));
                assert_eq!(second.target.node, Expr::Name("y".to_string()));
                assert!(Arc::ptr_eq(&first.value, &second.value));
                assert_eq!(first.value.to_string(), "f()");
            }
            other => panic!("Expected two assignments, got {:?}", other),
        }
    }

    #[test]
    fn test_augmented_assignment_desugars() {
        assert_eq!(render("x += 1\n"), "x = (x + 1)\n");
        assert_eq!(render("a.b[i] //= 2\n"), "a.b[i] = (a.b[i] // 2)\n");
    }

    #[test]
    fn test_annotated_assignment_simple_flag() {
        let module = parse_str("x: int = 5\n(y): str\n").unwrap();
        match &module.body[0].node {
            Statement::AnnAssign(a) => {
                assert!(a.simple);
                assert!(a.value.is_some());
            }
            other => panic!("Expected annotated assignment, got {:?}", other),
        }
        match &module.body[1].node {
            Statement::AnnAssign(a) => {
                assert!(!a.simple);
                assert_eq!(a.target.node, Expr::Name("y".to_string()));
                assert!(a.value.is_none());
            }
            other => panic!("Expected annotated assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_tuple_unpacking_assignment() {
        assert_eq!(render("a, *b = c\n"), "(a, *b) = c\n");
        assert_eq!(render("[a, b] = x, y\n"), "[a, b] = (x, y)\n");
    }

    #[test]
    fn test_invalid_assignment_targets() {
        assert_error("f() = 1\n", "cannot assign to function call");
        assert_error("a, *b, *c = d\n", "multiple starred expressions in assignment");
        assert_error("del f()\n", "cannot delete function call");
        assert_error("f() += 1\n", "'function call' is an illegal expression for augmented assignment");
        assert_error("(a, b): int = 1\n", "only single target (not tuple) can be annotated");
        assert_error("x = \n", "unexpected '=' in assignment");
        assert_error("(a.b := 1)\n", "cannot use assignment expressions with attribute");
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    #[test]
    fn test_operator_precedence() {
        assert_eq!(render("a + b * c - d\n"), "((a + (b * c)) - d)\n");
        assert_eq!(render("a or b and not c\n"), "(a or (b and (not c)))\n");
        assert_eq!(render("a | b ^ c & d << 1\n"), "(a | (b ^ (c & (d << 1))))\n");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(render("2 ** 3 ** 2\n"), "(2 ** (3 ** 2))\n");
        assert_eq!(render("-2 ** 2\n"), "(-(2 ** 2))\n");
        assert_eq!(render("2 ** -1\n"), "(2 ** (-1))\n");
    }

    #[test]
    fn test_chained_comparison_desugars() {
        assert_eq!(render("a < b < c\n"), "((a < b) and (b < c))\n");
        assert_eq!(render("a is not b not in c\n"), "((a is not b) and (b not in c))\n");

        let module = parse_str("a < b\n").unwrap();
        match &module.body[0].node {
            Statement::Expr(e) => assert!(matches!(e.node, Expr::Binary(_, BinaryOp::Lt, _))),
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_ternary_nests_on_false_branch() {
        assert_eq!(render("a if b else c if d else e\n"), "(a if b else (c if d else e))\n");
    }

    #[test]
    fn test_paren_classification() {
        let module = parse_str("(x)\n(x,)\n()\n(x for x in y)\n").unwrap();
        let kinds: Vec<_> = module
            .body
            .iter()
            .map(|s| match &s.node {
                Statement::Expr(e) => match &e.node {
                    Expr::Group(_) => "group",
                    Expr::Tuple(items) if items.is_empty() => "empty tuple",
                    Expr::Tuple(_) => "tuple",
                    Expr::GenExpr(_) => "generator",
                    _ => "other",
                },
                _ => "statement",
            })
            .collect();
        assert_eq!(kinds, vec!["group", "tuple", "empty tuple", "generator"]);
    }

    #[test]
    fn test_brace_classification() {
        let module = parse_str("{}\n{1: 2}\n{1, 2}\n{**a, 'b': 1}\n{k: v for k, v in xs}\n{x for x in y}\n").unwrap();
        let kinds: Vec<_> = module
            .body
            .iter()
            .map(|s| match &s.node {
                Statement::Expr(e) => match &e.node {
                    Expr::Dict(_) => "dict",
                    Expr::Set(_) => "set",
                    Expr::DictComp(_) => "dictcomp",
                    Expr::SetComp(_) => "setcomp",
                    _ => "other",
                },
                _ => "statement",
            })
            .collect();
        assert_eq!(kinds, vec!["dict", "dict", "set", "dict", "dictcomp", "setcomp"]);
    }

    #[test]
    fn test_comprehension_clauses() {
        assert_eq!(
            render("[x * y for x in xs if x for y in ys]\n"),
            "[(x * y) for x in xs if x for y in ys]\n"
        );
        assert_error("[*x for x in y]\n", "iterable unpacking cannot be used in comprehension");
        assert_error("(*x)\n", "cannot use starred expression here");
    }

    #[test]
    fn test_subscripts_and_slices() {
        assert_eq!(render("a[1:2, ::3]\n"), "a[1:2, ::3]\n");
        let module = parse_str("a[1,]\n").unwrap();
        match &module.body[0].node {
            Statement::Expr(Spanned {
                node: Expr::Subscript(_, entries),
                ..
            }) => assert_eq!(entries.len(), 1),
            other => panic!("Expected subscript, got {:?}", other),
        }
    }

    #[test]
    fn test_lambda_parameters() {
        assert_eq!(render("lambda x, *a, k=1, **kw: x\n"), "(lambda x, *a, k=1, **kw: x)\n");
        assert_eq!(render("lambda: 0\n"), "(lambda: 0)\n");
    }

    #[test]
    fn test_walrus_and_yield() {
        assert_eq!(
            render("if (n := len(a)) > 10:\n    pass\n"),
            "if (((n := len(a))) > 10):\n    pass\n"
        );
        assert_eq!(render("x = yield a, b\n"), "x = (yield (a, b))\n");
        assert_eq!(render("yield from g()\n"), "(yield from g())\n");
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(render("\"a\" 'b'\n"), "\"ab\"\n");
        assert_eq!(render("\"x\" f\"{y}\"\n"), "f\"x{y}\"\n");
        assert_error("\"a\" b\"b\"\n", "cannot mix bytes and nonbytes literals");
    }

    // ------------------------------------------------------------------------
    // Call arguments
    // ------------------------------------------------------------------------

    #[test]
    fn test_call_argument_kinds() {
        let module = parse_str("f(a, *b, c=1, **d)\n").unwrap();
        let Statement::Expr(Spanned {
            node: Expr::Call(_, args),
            ..
        }) = &module.body[0].node
        else {
            panic!("Expected call");
        };
        assert!(matches!(args[0].node, CallArg::Positional(_)));
        assert!(matches!(args[1].node, CallArg::Starred(_)));
        assert!(matches!(&args[2].node, CallArg::Keyword(name, _) if name == "c"));
        assert!(matches!(args[3].node, CallArg::DoubleStarred(_)));
    }

    #[test]
    fn test_call_argument_ordering_errors() {
        assert_error("f(a=1, b)\n", "positional argument follows keyword argument");
        assert_error("f(**a, b)\n", "positional argument follows keyword argument unpacking");
        assert_error("f(**a, *b)\n", "iterable argument unpacking follows keyword argument unpacking");
        assert_error("f(x for x in y, 1)\n", "Generator expression must be parenthesized");
        assert_error("f(a + 1 = 2)\n", "expression cannot contain assignment");
    }

    #[test]
    fn test_bare_generator_argument() {
        assert_eq!(render("sum(x for x in xs)\n"), "sum((x for x in xs))\n");
    }

    // ------------------------------------------------------------------------
    // F-strings
    // ------------------------------------------------------------------------

    #[test]
    fn test_fstring_fields() {
        let module = parse_str("f\"a{b!r:>{w}}c{d=}\"\n").unwrap();
        let Statement::Expr(Spanned {
            node: Expr::FString(parts),
            ..
        }) = &module.body[0].node
        else {
            panic!("Expected f-string");
        };
        assert_eq!(parts.len(), 4);
        match &parts[1].node {
            FStringPart::Field(field) => {
                assert_eq!(field.conversion, Some(Conversion::Repr));
                assert_eq!(field.format_spec.as_ref().map(Vec::len), Some(2));
                assert!(!field.debug);
            }
            other => panic!("Expected field, got {:?}", other),
        }
        match &parts[3].node {
            FStringPart::Field(field) => assert!(field.debug),
            other => panic!("Expected field, got {:?}", other),
        }
        assert_eq!(module.to_string(), "f\"a{b!r:>{w}}c{d=}\"\n");
    }

    #[test]
    fn test_fstring_literal_and_formatted_field() {
        let module = parse_str("f\"Hello {name!r:>10}\"\n").unwrap();
        let Statement::Expr(Spanned {
            node: Expr::FString(parts),
            ..
        }) = &module.body[0].node
        else {
            panic!("Expected f-string");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].node, FStringPart::Literal("Hello ".to_string()));
        match &parts[1].node {
            FStringPart::Field(field) => {
                assert_eq!(field.expr.node, Expr::Name("name".to_string()));
                assert_eq!(field.conversion, Some(Conversion::Repr));
                let spec = field.format_spec.as_ref().unwrap();
                assert_eq!(spec.len(), 1);
                assert_eq!(spec[0].node, FStringPart::Literal(">10".to_string()));
            }
            other => panic!("Expected field, got {:?}", other),
        }
    }

    #[test]
    fn test_fstring_errors() {
        assert_error("f\"{!r}\"\n", "f-string: valid expression required before '}'");
        assert_error(
            "f\"{x!z}\"\n",
            "f-string: invalid conversion character 'z': expected 's', 'r', or 'a'",
        );
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    #[test]
    fn test_elif_nests_in_orelse() {
        let source = "if a:\n    x\nelif b:\n    y\nelse:\n    z\n";
        let module = parse_str(source).unwrap();
        match &module.body[0].node {
            Statement::If(outer) => {
                assert_eq!(outer.orelse.len(), 1);
                match &outer.orelse[0].node {
                    Statement::If(inner) => assert_eq!(inner.orelse.len(), 1),
                    other => panic!("Expected nested if, got {:?}", other),
                }
            }
            other => panic!("Expected if, got {:?}", other),
        }
        assert_eq!(module.to_string(), source);
    }

    #[test]
    fn test_simple_statements_on_one_line() {
        let module = parse_str("a = 1; b = 2; pass\n").unwrap();
        assert_eq!(module.body.len(), 3);
        assert_eq!(render("if x: y = 1; z()\n"), "if x:\n    y = 1\n    z()\n");
    }

    #[test]
    fn test_imports() {
        assert_eq!(render("import a.b as c, d\n"), "import a.b as c, d\n");
        assert_eq!(render("from ..pkg import (a as b, c,)\n"), "from ..pkg import a as b, c\n");
        assert_eq!(render("from . import x\n"), "from . import x\n");
        assert_eq!(render("from m import *\n"), "from m import *\n");

        let module = parse_str("from ...x import y\n").unwrap();
        match &module.body[0].node {
            Statement::ImportFrom(i) => assert_eq!(i.level, 3),
            other => panic!("Expected from-import, got {:?}", other),
        }
        assert_error("from m import a,\n", "trailing comma not allowed without surrounding parentheses");
    }

    #[test]
    fn test_with_items() {
        assert_eq!(
            render("with (open(a) as f, open(b) as g):\n    pass\n"),
            "with open(a) as f, open(b) as g:\n    pass\n"
        );
        let source = "async def f():\n    async with a as (b, c):\n        pass\n";
        assert_eq!(render(source), source);
    }

    #[test]
    fn test_try_statement() {
        let module = parse_str("try:\n    pass\nexcept* ValueError as e:\n    pass\nfinally:\n    pass\n").unwrap();
        match &module.body[0].node {
            Statement::Try(t) => {
                assert!(t.is_star);
                assert_eq!(t.handlers.len(), 1);
                assert_eq!(t.handlers[0].node.name.as_deref(), Some("e"));
                assert_eq!(t.finalbody.len(), 1);
            }
            other => panic!("Expected try, got {:?}", other),
        }

        assert_error("try:\n    pass\n", "Expected 'except' or 'finally' block");
        assert_error(
            "try:\n    pass\nexcept A:\n    pass\nexcept* B:\n    pass\n",
            "cannot have both 'except' and 'except*' on the same 'try'",
        );
        assert_error(
            "try:\n    pass\nelse:\n    pass\nfinally:\n    pass\n",
            "Expected 'except' before 'else' in try statement",
        );
    }

    #[test]
    fn test_loops_with_else() {
        assert_eq!(
            render("for i, x in enumerate(xs):\n    break\nelse:\n    continue\n"),
            "for (i, x) in enumerate(xs):\n    break\nelse:\n    continue\n"
        );
        assert_eq!(render("while x:\n    x -= 1\n"), "while x:\n    x = (x - 1)\n");
    }

    #[test]
    fn test_unexpected_indent_is_single_clear_error() {
        assert_error("  x = 1\n", "Unexpected indent");
    }

    #[test]
    fn test_first_error_aborts() {
        let message = error_message("f(,)\ng(,)\n");
        assert!(message.starts_with("Expected expression"), "got: {}", message);
    }

    // ------------------------------------------------------------------------
    // Definitions
    // ------------------------------------------------------------------------

    #[test]
    fn test_function_definition() {
        let source = "@cache\nasync def f[T: int, *Ts, **P](a, /, b: int = 1, *args, c, **kw) -> T:\n    return a\n";
        let module = parse_str(source).unwrap();
        match &module.body[0].node {
            Statement::FunctionDef(def) => {
                assert!(def.is_async);
                assert_eq!(def.decorators.len(), 1);
                assert_eq!(def.type_params.len(), 3);
                let kinds: Vec<_> = def.params.iter().map(|p| p.node.kind).collect();
                assert_eq!(
                    kinds,
                    vec![
                        ParamKind::PositionalOnly,
                        ParamKind::Regular,
                        ParamKind::VarPositional,
                        ParamKind::KeywordOnly,
                        ParamKind::VarKeyword,
                    ]
                );
            }
            other => panic!("Expected function, got {:?}", other),
        }
        assert_eq!(module.body[0].span.start, 0, "decorated definitions start at '@'");
        assert_eq!(module.to_string(), source);
    }

    #[test]
    fn test_parameter_errors() {
        assert_error("def f(a=1, b): pass\n", "non-default parameter follows default parameter");
        assert_error("def f(*): pass\n", "named arguments must follow bare *");
        assert_error("def f(**k, a): pass\n", "arguments cannot follow var-keyword argument");
        assert_error("def f(/, a): pass\n", "at least one argument must precede /");
        assert_error("def f(*a, /): pass\n", "/ must be ahead of *");
    }

    #[test]
    fn test_class_definition() {
        assert_eq!(
            render("class C[T](Base, metaclass=M):\n    x: int\n"),
            "class C[T](Base, metaclass=M):\n    x: int\n"
        );
        assert_error("@dec\nx = 1\n", "Expected 'def' or 'class' after decorator");
    }

    // ------------------------------------------------------------------------
    // Soft keywords and match
    // ------------------------------------------------------------------------

    #[test]
    fn test_soft_keywords_as_names() {
        let module = parse_str("match = 1\ncase = 2\ntype = 3\nmatch(x)\n_ = 4\n").unwrap();
        assert_eq!(module.body.len(), 5);
        assert!(matches!(module.body[0].node, Statement::Assign(_)));
        assert!(matches!(
            &module.body[3].node,
            Statement::Expr(Spanned { node: Expr::Call(..), .. })
        ));
    }

    #[test]
    fn test_type_alias() {
        let module = parse_str("type Pair[T] = tuple[T, T]\n").unwrap();
        match &module.body[0].node {
            Statement::TypeAlias(t) => {
                assert_eq!(t.name.node, "Pair");
                assert_eq!(t.type_params.len(), 1);
            }
            other => panic!("Expected type alias, got {:?}", other),
        }
    }

    #[test]
    fn test_match_statement_rendering() {
        let source = "match p:\n    case Point(x=0, y=0) | None:\n        pass\n    case [1, *rest]:\n        pass\n    case {\"k\": v, **others}:\n        pass\n    case -1 + 2j:\n        pass\n    case (a, b) if a > b:\n        pass\n    case _:\n        pass\n";
        let expected = "match p:\n    case Point(x=0, y=0) | None:\n        pass\n    case [1, *rest]:\n        pass\n    case {\"k\": v, **others}:\n        pass\n    case ((-1) + 2.0j):\n        pass\n    case (a, b) if (a > b):\n        pass\n    case _:\n        pass\n";
        assert_eq!(render(source), expected);
    }

    #[test]
    fn test_pattern_shapes() {
        let module = parse_str("match x:\n    case a, *rest:\n        pass\n    case Color.RED as c:\n        pass\n").unwrap();
        let Statement::Match(m) = &module.body[0].node else {
            panic!("Expected match");
        };
        assert!(matches!(m.cases[0].node.pattern.node, Pattern::Sequence(SequenceKind::Tuple, _)));
        match &m.cases[1].node.pattern.node {
            Pattern::As(inner, name) => {
                assert_eq!(name, "c");
                assert!(matches!(inner.node, Pattern::Value(_)));
            }
            other => panic!("Expected as-pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_pattern_errors() {
        let case = |pattern: &str| format!("match x:\n    case {}:\n        pass\n", pattern);
        assert_error(&case("Point(x=1, 2)"), "positional patterns follow keyword patterns");
        assert_error(&case("{**_}"), "cannot use '_' as a target");
        assert_error(&case("x as _"), "cannot use '_' as a target");
        assert_error(&case("1 + 2"), "imaginary number required in complex literal");
        assert_error(&case("[*a, *b]"), "multiple starred names in sequence pattern");
        assert_error(&case("f\"{y}\""), "patterns may only match literals and attribute lookups");
        assert_error(&case("{k: 1}"), "mapping pattern keys may only match literals and attribute lookups");
    }

    // ------------------------------------------------------------------------
    // Entry points and spans
    // ------------------------------------------------------------------------

    #[test]
    fn test_embedding_entry_points() {
        let tokens = lexer::lex("a, *b").unwrap();
        let expr = parse_expression(&tokens).unwrap();
        assert!(matches!(&expr.node, Expr::Tuple(items) if items.len() == 2));

        let tokens = lexer::lex("x = y = 1").unwrap();
        assert_eq!(parse_statement(&tokens).unwrap().len(), 2);

        let tokens = lexer::lex("a, *rest").unwrap();
        let pattern = parse_pattern(&tokens).unwrap();
        assert!(matches!(pattern.node, Pattern::Sequence(SequenceKind::Tuple, _)));

        let tokens = lexer::lex("a, b=1, *c, **d").unwrap();
        assert_eq!(parse_arguments(&tokens).unwrap().len(), 4);

        let tokens = lexer::lex("a b").unwrap();
        let errors = parse_expression(&tokens).unwrap_err();
        assert!(errors[0].message.starts_with("Expected end of input"));
    }

    /// Checks that every node's span lies inside its parent's span, and that composites
    /// start and end on their children.
    struct SpanNesting {
        stack: Vec<Span>,
        checked: usize,
        composites: usize,
    }

    impl SpanNesting {
        fn enter(&mut self, span: Span) {
            if let Some(parent) = self.stack.last() {
                assert!(parent.contains(span), "{:?} escapes parent {:?}", span, parent);
            }
            assert!(span.start <= span.end);
            self.checked += 1;
            self.stack.push(span);
        }

        /// A composite without its own closing token starts at its first child and ends at its last.
        fn bounded_by(&mut self, span: Span, first: Span, last: Option<Span>) {
            assert_eq!(span.start, first.start, "{:?} does not start at {:?}", span, first);
            if let Some(last) = last {
                assert_eq!(span.end, last.end, "{:?} does not end at {:?}", span, last);
            }
            self.composites += 1;
        }
    }

    impl Visitor for SpanNesting {
        fn visit_statement(&mut self, stmt: &Spanned<Statement>) {
            if let Statement::Assign(assign) = &stmt.node {
                self.bounded_by(stmt.span, assign.target.span, Some(assign.value.span));
            }
            self.enter(stmt.span);
            walk_statement(self, stmt);
            self.stack.pop();
        }

        fn visit_expr(&mut self, expr: &Spanned<Expr>) {
            match &expr.node {
                Expr::Binary(left, _, right) => self.bounded_by(expr.span, left.span, Some(right.span)),
                Expr::Ternary(t) => self.bounded_by(expr.span, t.body.span, Some(t.orelse.span)),
                // Both end on a token the node owns: the attribute name or `)`
                Expr::Attribute(value, _) | Expr::Call(value, _) => self.bounded_by(expr.span, value.span, None),
                _ => {}
            }
            self.enter(expr.span);
            walk_expr(self, expr);
            self.stack.pop();
        }

        fn visit_pattern(&mut self, pattern: &Spanned<Pattern>) {
            match &pattern.node {
                Pattern::Or(alternatives) => {
                    if let (Some(first), Some(last)) = (alternatives.first(), alternatives.last()) {
                        self.bounded_by(pattern.span, first.span, Some(last.span));
                    }
                }
                Pattern::As(inner, _) => self.bounded_by(pattern.span, inner.span, None),
                _ => {}
            }
            self.enter(pattern.span);
            walk_pattern(self, pattern);
            self.stack.pop();
        }
    }

    #[test]
    fn test_child_spans_nest_in_parents() {
        let source = r#"
@decorator(arg)
def f(a, b=2, *args, c: int = 3, **kw) -> list[int]:
    x = y = [i * 2 for i in range(a) if i]
    x += {k: v for k, v in kw.items()}
    return f"{x!r:>{b}}" if x else (yield)

class C(Base, metaclass=M):
    z: int = a < b < c
    def g(self): return self.z[1:2, ::3]

match point:
    case Point(x=0) | [1, *rest]:
        pass
    case [x] | (x,) as pair:
        pass
"#;
        let module = parse_str(source).unwrap();
        let mut checker = SpanNesting {
            stack: Vec::new(),
            checked: 0,
            composites: 0,
        };
        checker.visit_module(&module);
        assert!(checker.checked > 40, "visited {} nodes", checker.checked);
        assert!(checker.composites > 10, "checked {} composites", checker.composites);
    }
}
