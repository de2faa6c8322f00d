//! Layering guardrails for the workspace crates.
//!
//! `tarn_core` is a dependency-free vocabulary crate, and `tarn_syntax` is a library that must not pull in the CLI
//! stack (`clap`, `tracing-subscriber`). These tests scan the member manifests and fail if either rule breaks.

fn dependency_names(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_vocabulary_has_no_dependencies() {
    let manifest = include_str!("../crates/tarn_core/Cargo.toml");
    let deps = dependency_names(manifest);
    assert!(deps.is_empty(), "tarn_core must stay dependency-free, found {:?}", deps);
}

#[test]
fn syntax_crate_does_not_depend_on_cli_stack() {
    let manifest = include_str!("../crates/tarn_syntax/Cargo.toml");
    for dep in dependency_names(manifest) {
        assert!(
            !matches!(dep.as_str(), "clap" | "tracing-subscriber" | "tarn"),
            "`{}` must not appear in tarn_syntax [dependencies]",
            dep
        );
    }
}
