//! Tests for gitignore-style file parsing.

use filters::{PatternError, PatternSet};

#[test]
fn comments_and_blank_lines_are_skipped() {
    let text = "# build output\n\n   \n*.o\n  # indented comment\n";
    let set = PatternSet::from_ignore_text(text).unwrap();

    assert_eq!(set.len(), 1);
    assert!(set.matches_path("main.o"));
}

#[test]
fn bang_negates() {
    let set = PatternSet::from_ignore_text("*.tmp\n!keep.tmp\n").unwrap();

    assert!(set.matches_path("a.tmp"));
    assert!(!set.matches_path("keep.tmp"));
}

#[test]
fn escaped_first_character_is_literal() {
    let set = PatternSet::from_ignore_text("\\#notes\n\\!bang\n").unwrap();

    assert!(set.matches_path("#notes"));
    assert!(set.matches_path("!bang"));
}

#[test]
fn trailing_slash_is_directory_only() {
    let set = PatternSet::from_ignore_text("out/\n").unwrap();

    assert!(!set.matches_path("out"));
    assert!(set.matches_path("out/x"));
    assert!(set.matches_path("a/out/x"));
}

#[test]
fn inner_slash_roots_the_pattern() {
    let set = PatternSet::from_ignore_text("doc/*.html\n").unwrap();

    assert!(set.matches_path("doc/index.html"));
    assert!(!set.matches_path("sub/doc/index.html"));
}

#[test]
fn leading_double_star_matches_anywhere() {
    let set = PatternSet::from_ignore_text("**/gen/*.c\n").unwrap();

    assert!(set.matches_path("gen/a.c"));
    assert!(set.matches_path("x/y/gen/a.c"));
}

#[test]
fn errors_report_line_numbers() {
    let err = PatternSet::from_ignore_text("# header\n*.o\n!\n").unwrap_err();

    assert_eq!(err.line(), 3);
    assert!(matches!(err.pattern_error(), PatternError::Empty { .. }));
    assert!(err.to_string().starts_with("line 3: "));
}

#[test]
fn crlf_line_endings() {
    let set = PatternSet::from_ignore_text("*.o\r\n*.a\r\n").unwrap();

    assert!(set.matches_path("x.o"));
    assert!(set.matches_path("x.a"));
}
