//! Golden snapshot tests for the canonical rendering
//!
//! These tests parse `.tn` input files and compare the canonical rendering
//! against stored snapshots. Every expression in the rendering is fully
//! parenthesized, so a snapshot pins down the shape of the tree.
//!
//! Run with: `cargo test --test render_snapshot_tests`
//! Review changes: `cargo insta review`

use std::fs;

/// Parse Tarn source and render it canonically
fn render(source: &str) -> String {
    let module = tarn::parse_source(source).expect("parse failed");
    module.to_string()
}

/// Load a test file from the render_snapshots directory
fn load_test_file(name: &str) -> String {
    let path = format!("tests/render_snapshots/{}.tn", name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read test file: {}", path))
}

#[test]
fn test_control_flow_render() {
    let rendered = render(&load_test_file("control_flow"));
    insta::assert_snapshot!("control_flow", rendered);
}

#[test]
fn test_expressions_render() {
    let rendered = render(&load_test_file("expressions"));
    insta::assert_snapshot!("expressions", rendered);
}

#[test]
fn test_match_and_classes_render() {
    let rendered = render(&load_test_file("match_and_classes"));
    insta::assert_snapshot!("match_and_classes", rendered);
}

#[test]
fn test_async_and_try_render() {
    let rendered = render(&load_test_file("async_and_try"));
    insta::assert_snapshot!("async_and_try", rendered);
}

#[test]
fn test_inline_rendering_of_operators() {
    let rendered = render("x = a | b ^ c & d << 1 + 2 * -e ** f\n");
    insta::assert_snapshot!(rendered.trim_end(), @"x = (a | (b ^ (c & (d << (1 + (2 * (-(e ** f))))))))");
}
