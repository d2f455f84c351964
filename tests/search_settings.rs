//! Integration tests for settings-driven search
//!
//! Settings files are written to a temp dir and layered over the built-in defaults; the
//! resulting preprocessor and pattern search run over scanned snippets.

use lexmatch::settings::{Loader, PreprocessorKind};
use lexmatch::testing::scan;
use std::fs;
use tempfile::TempDir;

fn write_settings(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexmatch.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_file_layers_over_defaults() {
    let (_dir, path) = write_settings(
        r#"
[preprocessor]
kind = "configured"
prefix = "c"

[preprocessor.rules]
collapse-macro = ["FUNC"]
mapped-identifier = ["STATIC:static:STATIC"]

[[search.patterns]]
expression = "<STATIC><IDENTIFIER=FUNC.*>"
group = "static-functions"
"#,
    );

    let settings = Loader::new().with_file(&path).build().unwrap();
    assert_eq!(settings.preprocessor.kind, PreprocessorKind::Configured);
    assert_eq!(settings.pattern.size_limit, 10 * (1 << 20));

    let preprocessor = settings.preprocessor.build().unwrap();
    let search = settings.build_search().unwrap();

    let tokens = preprocessor.preprocess(&scan("STATIC /* x */ FUNC(void, CODE) f(void);"));
    let hits = search.search(&tokens);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].group, "static-functions");
    assert_eq!(hits[0].token_range, 0..3);
    assert_eq!(hits[0].start_offset, 0);
    assert_eq!(hits[0].end_offset, 31);
}

#[test]
fn test_missing_required_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = Loader::new()
        .with_file(dir.path().join("absent.toml"))
        .build();

    assert!(result.is_err());
}

#[test]
fn test_missing_optional_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Loader::new()
        .with_optional_file(dir.path().join("absent.toml"))
        .build()
        .unwrap();

    assert_eq!(settings.preprocessor.kind, PreprocessorKind::None);
}

#[test]
fn test_unknown_rule_kind_is_reported() {
    let (_dir, path) = write_settings(
        r#"
[preprocessor]
kind = "configured"

[preprocessor.rules]
collapse-macros = ["FUNC"]
"#,
    );

    let settings = Loader::new().with_file(&path).build().unwrap();
    let error = settings.preprocessor.build().err().unwrap();

    assert!(error.to_string().contains("collapse-macros"));
}

#[test]
fn test_class_patterns() {
    let (_dir, path) = write_settings(
        r#"
[search]
by_class = true

[[search.patterns]]
expression = "<KEYWORD>{2}"
group = "keyword-runs"
"#,
    );

    let settings = Loader::new().with_file(&path).build().unwrap();
    let hits = settings
        .build_search()
        .unwrap()
        .search(&scan("unsigned long x; int y;"));

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].token_range, 0..2);
}
