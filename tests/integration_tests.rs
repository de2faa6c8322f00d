//! Integration tests for the Tarn front end

use std::fs;
use std::path::Path;

use tarn::{lexer, parser};

/// Helper to run the full front end on a source file
fn parse_file(path: &Path) -> Result<(), Vec<String>> {
    let source = fs::read_to_string(path).map_err(|e| vec![e.to_string()])?;

    let tokens = lexer::lex(&source).map_err(|errs| errs.iter().map(|e| e.message.clone()).collect::<Vec<_>>())?;

    parser::parse(&tokens).map_err(|errs| errs.iter().map(|e| e.message.clone()).collect::<Vec<_>>())?;

    Ok(())
}

fn fixtures(dir: &str) -> Vec<std::path::PathBuf> {
    let fixtures_dir = Path::new("tests/fixtures").join(dir);
    let mut paths: Vec<_> = fs::read_dir(&fixtures_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map(|e| e == "tn").unwrap_or(false))
        .collect();
    paths.sort();
    paths
}

/// Test that all valid fixtures parse successfully
#[test]
fn test_valid_fixtures() {
    let paths = fixtures("valid");
    assert!(!paths.is_empty());

    for path in paths {
        let result = parse_file(&path);
        assert!(
            result.is_ok(),
            "Expected {} to parse successfully, got errors: {:?}",
            path.display(),
            result.unwrap_err()
        );
    }
}

/// Test that invalid fixtures produce the error named on their first line (`# expect: ...`)
#[test]
fn test_invalid_fixtures() {
    let paths = fixtures("invalid");
    assert!(!paths.is_empty());

    for path in paths {
        let source = fs::read_to_string(&path).unwrap();
        let expected = source
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("# expect: "))
            .unwrap_or_else(|| panic!("{} has no `# expect:` header", path.display()));

        let errors = parse_file(&path).expect_err(&format!("Expected {} to fail", path.display()));
        assert_eq!(errors.len(), 1, "{}: {:?}", path.display(), errors);
        assert!(
            errors[0].starts_with(expected),
            "{}: expected `{}`, got `{}`",
            path.display(),
            expected,
            errors[0]
        );
    }
}

/// Test specific lexer behavior
mod lexer_tests {
    use tarn::lang::keywords::KeywordId;
    use tarn::lang::punctuation::PunctuationId;
    use tarn::lexer::{TokenKind, lex};

    #[test]
    fn test_soft_keywords_lex_as_identifiers() {
        let tokens = lex("match case type _\n").unwrap();
        for tok in &tokens[..4] {
            assert!(matches!(tok.kind, TokenKind::Ident(_)), "{:?}", tok.kind);
        }
    }

    #[test]
    fn test_hard_keyword() {
        let tokens = lex("yield value\n").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword(KeywordId::Yield));
        assert!(matches!(&tokens[1].kind, TokenKind::Ident(s) if s == "value"));
    }

    #[test]
    fn test_relative_import_dots() {
        let tokens = lex("from ... import x\n").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Punctuation(PunctuationId::Ellipsis));
    }

    #[test]
    fn test_block_layout_tokens() {
        let tokens = lex("if x:\n    pass\n").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        assert!(kinds.contains(&&TokenKind::Indent));
        assert!(kinds.contains(&&TokenKind::Dedent));
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_brackets_suppress_newlines() {
        let tokens = lex("x = (1,\n     2)\n").unwrap();
        let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
        assert_eq!(newlines, 1);
    }
}

/// End-to-end checks through the public API
mod api_tests {
    use tarn::ast::{Expr, Statement};
    use tarn::diagnostics::format_error;

    #[test]
    fn test_missing_final_newline_is_accepted() {
        let module = tarn::parse_source("x = 1").unwrap();
        assert_eq!(module.to_string(), "x = 1\n");
    }

    #[test]
    fn test_empty_source() {
        let module = tarn::parse_source("").unwrap();
        assert!(module.body.is_empty());
        let module = tarn::parse_source("\n\n# only a comment\n").unwrap();
        assert!(module.body.is_empty());
    }

    #[test]
    fn test_module_span_covers_statements() {
        let source = "a = 1\nb = 2\n";
        let module = tarn::parse_source(source).unwrap();
        let last = module.body.last().unwrap();
        assert_eq!(&source[last.span.start..last.span.end], "b = 2");
    }

    #[test]
    fn test_parse_error_renders_with_location() {
        let source = "def f(:\n    pass\n";
        let errors = tarn::parse_source(source).unwrap_err();
        assert_eq!(errors.len(), 1);
        let rendered = format_error("demo.tn", source, &errors[0]);
        assert!(rendered.contains("demo.tn:1:7"), "{rendered}");
        assert!(rendered.contains("def f(:"), "{rendered}");
    }

    #[test]
    fn test_lex_error_stops_before_parsing() {
        let errors = tarn::parse_source("x = 'unterminated\n").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_expression_entry_rejects_trailing_tokens() {
        let tokens = tarn::lexer::lex("a b\n").unwrap();
        let errors = tarn::parser::parse_expression(&tokens).unwrap_err();
        assert!(errors[0].message.starts_with("Expected end of input"));
    }

    #[test]
    fn test_statement_entry_returns_expression_statement() {
        let tokens = tarn::lexer::lex("f(x)\n").unwrap();
        let stmts = tarn::parser::parse_statement(&tokens).unwrap();
        assert_eq!(stmts.len(), 1);
        assert!(matches!(&stmts[0].node, Statement::Expr(e) if matches!(e.node, Expr::Call(..))));
    }
}

/// CLI command behavior (without spawning a process)
mod cli_tests {
    use std::fs;

    use tarn::cli::commands::{check_files, check_source, read_source, render_parse};
    use tarn::cli::{ExitCode, Mode, OutputFormat};

    #[test]
    fn test_check_fixture_files() {
        let ok = check_files(&["tests/fixtures/valid/comprehensions.tn".to_string()], true).unwrap();
        assert_eq!(ok, ExitCode::SUCCESS);

        let err = check_files(
            &[
                "tests/fixtures/valid/comprehensions.tn".to_string(),
                "tests/fixtures/invalid/missing_colon.tn".to_string(),
            ],
            true,
        )
        .unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert_eq!(err.message, "1 of 2 file(s) failed to parse");
    }

    #[test]
    fn test_check_report_mentions_file_name() {
        let source = read_source("tests/fixtures/invalid/default_order.tn").unwrap();
        let report = check_source("default_order.tn", &source, false).unwrap_err();
        assert!(report.contains("non-default parameter follows default parameter"), "{report}");
        assert!(report.contains("default_order.tn"), "{report}");
    }

    #[test]
    fn test_pattern_mode_renders_open_sequence() {
        let out = render_parse("Point(x=0) | None, *rest\n", Mode::Pattern, OutputFormat::Tree).unwrap();
        assert_eq!(out, "(Point(x=0) | None, *rest)\n");
    }

    #[test]
    fn test_render_parse_file_contents() {
        let source = fs::read_to_string("tests/render_snapshots/expressions.tn").unwrap();
        let out = render_parse(&source, Mode::Module, OutputFormat::Tree).unwrap();
        assert_eq!(out.lines().count(), source.lines().count());
    }
}
