//! Parser Tests - Diagnostics
//!
//! Error codes, positions and messages produced by recovery. Every case
//! must still round-trip its source text.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use quill::parser::Severity;
use quill::{LineCol, LineIndex, ParseStatus, TextRange, TextSize};
use rstest::rstest;

use crate::helpers::source_fixtures::{MISSING_SEMICOLON, UNTERMINATED_STRING};
use crate::helpers::tree_assertions::{diagnostic_codes, parse};

#[rstest]
#[case(MISSING_SEMICOLON, &["E0201"])]
#[case("class { }", &["E0301"])]
#[case("class C {", &["E0201"])]
#[case("class C { void M() { x = ; } }", &["E0401"])]
#[case(") class C { }", &["E0901"])]
#[case(UNTERMINATED_STRING, &["E0102", "E0201", "E0201"])]
#[case("class C { char c = ''; }", &["E0104"])]
#[case("class C { } /* open", &["E0103"])]
#[case("public", &["E0302"])]
#[case("class C { void M( { } }", &["E0201"])]
fn test_diagnostic_codes(#[case] source: &str, #[case] expected: &[&str]) {
    let tree = parse(source);
    assert_eq!(diagnostic_codes(&tree), expected.to_vec());
    assert_eq!(tree.root().text(), source);
}

#[test]
fn test_missing_semicolon_position_and_message() {
    let tree = parse(MISSING_SEMICOLON);
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    // Zero width, right before the closing brace
    assert_eq!(diagnostic.range, TextRange::empty(TextSize::new(16)));
    assert_eq!(diagnostic.message, "';' expected");
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(tree.status(), ParseStatus::Complete);
}

#[test]
fn test_unexpected_end_of_input_status() {
    let tree = parse("namespace N { class C { void M() {");
    assert_eq!(tree.status(), ParseStatus::UnexpectedEndOfInput);
    assert_eq!(diagnostic_codes(&tree), vec!["E0201", "E0201", "E0201"]);
}

#[test]
fn test_skipped_token_range_excludes_trivia() {
    let source = "class C { }\n  )  \nclass D { }";
    let tree = parse(source);
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let start = source.find(')').unwrap() as u32;
    assert_eq!(
        diagnostics[0].range,
        TextRange::at(TextSize::new(start), TextSize::new(1))
    );
    assert_eq!(diagnostics[0].message, "unexpected token ')'");

    let index = LineIndex::new(source);
    assert_eq!(index.line_col(diagnostics[0].range.start()), LineCol { line: 1, col: 2 });
}

#[test]
fn test_invalid_character_message() {
    let tree = parse("class C { int x = 1; } §");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics[0].code.as_str(), "E0101");
    assert_eq!(diagnostics[0].message, "invalid character '§'");
    assert_eq!(diagnostics[0].range.len(), TextSize::of("§"));
}

#[test]
fn test_diagnostics_are_in_source_order() {
    let tree = parse("class { int x } ) class D { void M() { y = ; } }");
    let starts: Vec<TextSize> = tree.diagnostics().iter().map(|d| d.range.start()).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert!(starts.len() >= 4);
}

#[test]
fn test_valid_file_has_no_diagnostics() {
    let tree = parse(crate::helpers::source_fixtures::SMALL_FILE);
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());
    assert_eq!(tree.status(), ParseStatus::Complete);
}
