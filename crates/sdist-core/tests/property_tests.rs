//! Property-based tests for file selection.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use sdist_core::exclusion::BASELINE_PATTERNS;
use sdist_core::exclusion::ExclusionMatcher;
use sdist_core::exclusion::ExclusionSpec;
use std::path::PathBuf;

const BASELINE_DIRS: [&str; 6] = [
    ".git",
    ".tox",
    ".nox",
    "pkg.egg-info",
    "__pycache__",
    "__pypackages__",
];

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,11}"
}

fn ignore_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        "\\*\\.[a-z]{1,3}",
        "[a-z]{1,6}/",
        "/[a-z]{1,6}",
        "![a-z]{1,6}",
        "!\\*\\.[a-z]{1,3}",
        "!\\.git/",
        "![a-z./]{1,10}",
        "# [a-z ]{0,10}",
    ]
}

proptest! {
    /// Anything beneath a baseline directory is excluded, whatever the
    /// ignore file adds.
    #[test]
    fn prop_baseline_dirs_always_excluded(
        prefix in prop::collection::vec(segment(), 0..4),
        dir in prop::sample::select(BASELINE_DIRS.to_vec()),
        rest in prop::collection::vec(segment(), 1..4),
        extra in prop::collection::vec(ignore_line(), 0..8),
    ) {
        let mut spec = ExclusionSpec::baseline();
        spec.extend(extra);
        let matcher = spec.compile().unwrap();

        let mut path = PathBuf::new();
        for part in &prefix {
            path.push(part);
        }
        path.push(dir);
        for part in &rest {
            path.push(part);
        }

        prop_assert!(matcher.matches(&path), "{} should be excluded", path.display());
    }

    /// Selection depends only on the patterns and the path.
    #[test]
    fn prop_matching_is_deterministic(
        lines in prop::collection::vec(ignore_line(), 0..10),
        paths in prop::collection::vec(prop::collection::vec(segment(), 1..5), 1..20),
    ) {
        let first = ExclusionMatcher::from_lines(&lines).unwrap();
        let second = ExclusionMatcher::from_lines(&lines).unwrap();

        for parts in &paths {
            let path: PathBuf = parts.iter().collect();
            prop_assert_eq!(first.matches(&path), second.matches(&path));
            prop_assert_eq!(first.matches(&path), first.matches(&path));
        }
    }

    /// `*.ext` excludes files with that extension at any depth and nothing
    /// else.
    #[test]
    fn prop_extension_pattern_any_depth(
        dirs in prop::collection::vec("[a-z]{1,8}", 0..5),
        stem in "[a-z]{1,8}",
    ) {
        let matcher = ExclusionMatcher::from_lines(["*.log"]).unwrap();
        let mut excluded: PathBuf = dirs.iter().collect();
        excluded.push(format!("{stem}.log"));
        let mut kept: PathBuf = dirs.iter().collect();
        kept.push(format!("{stem}.txt"));

        prop_assert!(matcher.matches(&excluded));
        prop_assert!(!matcher.matches(&kept));
    }

    /// Appending a negation for a path always re-includes it when no
    /// baseline rule covers it.
    #[test]
    fn prop_trailing_negation_wins(
        lines in prop::collection::vec(ignore_line(), 0..8),
        parts in prop::collection::vec("[a-z]{1,8}", 1..4),
    ) {
        let path = parts.join("/");
        let mut spec = ExclusionSpec::from_lines(lines);
        spec.extend([format!("!/{path}")]);
        let matcher = spec.compile().unwrap();
        prop_assert!(!matcher.matches(std::path::Path::new(&path)));
    }
}

#[test]
fn test_baseline_list_is_complete() {
    assert_eq!(BASELINE_PATTERNS.len(), BASELINE_DIRS.len());
}
