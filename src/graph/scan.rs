// src/graph/scan.rs

//! Lightweight `@import` discovery.
//!
//! This is not a stylesheet parser. It finds the import references a
//! compiler would inline so the import graph can be kept current without
//! asking the compiler for its dependency list.

use std::sync::LazyLock;

use regex::Regex;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*//.*$").expect("valid line comment regex"));

static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"@import\s*(?:\((?P<opts>[^)]*)\)\s*)?(?:url\(\s*)?["'](?P<path>[^"']+)["']"#,
    )
    .expect("valid import regex")
});

/// Extract raw import references from stylesheet source, in source order.
///
/// Skipped: imports inside comments, remote URLs, references built from
/// variable interpolation (`@{var}`), and `(css)` imports, which the
/// compiler leaves as plain CSS `@import` rules.
pub fn scan_imports(source: &str) -> Vec<String> {
    let without_blocks = BLOCK_COMMENT.replace_all(source, "");
    let text = LINE_COMMENT.replace_all(&without_blocks, "");

    IMPORT
        .captures_iter(&text)
        .filter(|caps| {
            caps.name("opts")
                .map(|opts| !opts.as_str().split(',').any(|o| o.trim() == "css"))
                .unwrap_or(true)
        })
        .filter_map(|caps| caps.name("path").map(|m| m.as_str().trim().to_string()))
        .filter(|path| !is_remote(path) && !path.contains("@{") && !path.is_empty())
        .collect()
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("//")
}
