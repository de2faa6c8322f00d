//! Property-based tests for the Tarn parser
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;

use tarn::ast::{Expr, Spanned, Statement};
use tarn::lang::keywords;

// =============================================================================
// Strategies
// =============================================================================

/// Identifiers that are never reserved words.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,4}".prop_filter("Not a keyword", |s| keywords::from_str(s).is_none())
}

/// A binary arithmetic tree, rendered two ways: as minimal source and as the canonical parenthesized form.
#[derive(Debug, Clone)]
enum Arith {
    Leaf(String),
    Bin(Box<Arith>, &'static str, Box<Arith>),
}

fn precedence(op: &str) -> u8 {
    match op {
        "+" | "-" => 1,
        _ => 2,
    }
}

impl Arith {
    fn precedence(&self) -> u8 {
        match self {
            Arith::Leaf(_) => u8::MAX,
            Arith::Bin(_, op, _) => precedence(op),
        }
    }

    /// Source text with only the parentheses precedence requires, plus whether each operand needed them.
    fn source(&self) -> String {
        match self {
            Arith::Leaf(name) => name.clone(),
            Arith::Bin(left, op, right) => {
                let (l, r) = self.operand_grouping();
                format!("{} {} {}", wrap(left.source(), l), op, wrap(right.source(), r))
            }
        }
    }

    /// Rendering expected from the parser: every binary node parenthesized, and explicit groups kept.
    fn canonical(&self) -> String {
        match self {
            Arith::Leaf(name) => name.clone(),
            Arith::Bin(left, op, right) => {
                let (l, r) = self.operand_grouping();
                format!("({} {} {})", wrap(left.canonical(), l), op, wrap(right.canonical(), r))
            }
        }
    }

    /// Left-associative operators: a right operand of equal precedence needs grouping.
    fn operand_grouping(&self) -> (bool, bool) {
        match self {
            Arith::Leaf(_) => (false, false),
            Arith::Bin(left, op, right) => {
                let p = precedence(op);
                (left.precedence() < p, right.precedence() <= p)
            }
        }
    }
}

fn wrap(text: String, grouped: bool) -> String {
    if grouped { format!("({})", text) } else { text }
}

fn arith_strategy() -> impl Strategy<Value = Arith> {
    let leaf = ident_strategy().prop_map(Arith::Leaf);
    leaf.prop_recursive(4, 32, 2, |inner| {
        (inner.clone(), prop::sample::select(vec!["+", "-", "*", "//", "%"]), inner)
            .prop_map(|(l, op, r)| Arith::Bin(Box::new(l), op, Box::new(r)))
    })
}

/// Every operand span lies inside its parent's span, and a binary node spans exactly its operands.
fn assert_spans_nest(expr: &Spanned<Expr>) {
    match &expr.node {
        Expr::Binary(left, _, right) => {
            assert_eq!(expr.span.start, left.span.start);
            assert_eq!(expr.span.end, right.span.end);
            assert_spans_nest(left);
            assert_spans_nest(right);
        }
        Expr::Group(inner) | Expr::Unary(_, inner) => {
            assert!(expr.span.start <= inner.span.start && inner.span.end <= expr.span.end);
            assert_spans_nest(inner);
        }
        _ => {}
    }
}

fn comparison_op_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["<", "<=", ">", ">=", "==", "!=", "in", "not in", "is", "is not"])
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Property: precedence and left associativity produce the expected tree shape
    #[test]
    fn arithmetic_parses_with_expected_shape(tree in arith_strategy()) {
        let source = format!("{}\n", tree.source());
        let module = tarn::parse_source(&source).expect("parse failed");
        prop_assert_eq!(module.to_string(), format!("{}\n", tree.canonical()));
    }

    /// Property: composite spans are the union of their children
    #[test]
    fn arithmetic_spans_nest(tree in arith_strategy()) {
        let source = format!("{}\n", tree.source());
        let module = tarn::parse_source(&source).expect("parse failed");
        let Statement::Expr(expr) = &module.body[0].node else {
            panic!("Expected expression statement");
        };
        prop_assert_eq!(&source[expr.span.start..expr.span.end], tree.source());
        assert_spans_nest(expr);
    }

    /// Property: n comparison operands become n - 1 pairwise comparisons joined by `and`
    #[test]
    fn comparison_chains_expand_pairwise(
        operands in prop::collection::vec(ident_strategy(), 2..6),
        ops in prop::collection::vec(comparison_op_strategy(), 5),
    ) {
        let mut source = operands[0].clone();
        for (i, operand) in operands.iter().enumerate().skip(1) {
            source.push_str(&format!(" {} {}", ops[i - 1], operand));
        }

        let mut expected = format!("({} {} {})", operands[0], ops[0], operands[1]);
        for i in 1..operands.len() - 1 {
            expected = format!("({} and ({} {} {}))", expected, operands[i], ops[i], operands[i + 1]);
        }

        let module = tarn::parse_source(&format!("{}\n", source)).expect("parse failed");
        prop_assert_eq!(module.to_string(), format!("{}\n", expected));
    }

    /// Property: chained assignment yields one statement per target
    #[test]
    fn chained_assignment_fans_out(targets in prop::collection::vec(ident_strategy(), 1..5)) {
        let source = format!("{} = 0\n", targets.join(" = "));
        let module = tarn::parse_source(&source).expect("parse failed");
        prop_assert_eq!(module.body.len(), targets.len());
        for (stmt, name) in module.body.iter().zip(&targets) {
            prop_assert_eq!(stmt.to_string(), format!("{} = 0\n", name));
        }
    }

    /// Property: the front end never panics, whatever the input
    #[test]
    fn arbitrary_input_does_not_panic(source in "\\PC*") {
        let _ = tarn::parse_source(&source);
    }

    /// Property: nested blocks always balance their indentation
    #[test]
    fn nested_blocks_parse(depth in 1usize..8) {
        let mut source = String::new();
        for level in 0..depth {
            source.push_str(&"    ".repeat(level));
            source.push_str("if x:\n");
        }
        source.push_str(&"    ".repeat(depth));
        source.push_str("pass\n");

        let module = tarn::parse_source(&source).expect("parse failed");
        prop_assert_eq!(module.to_string(), source);
    }
}
