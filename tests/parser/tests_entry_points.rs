//! Parser Tests - Entry Points
//!
//! Fragments parsed as a single member, statement or expression.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use quill::{EntryPoint, ParseOptions, SyntaxKind, SyntaxTree};
use rstest::rstest;

fn child_kinds(tree: &SyntaxTree) -> Vec<SyntaxKind> {
    tree.root().children_with_tokens().map(|e| e.kind()).collect()
}

#[rstest]
#[case(EntryPoint::Member, "public void M() { }", SyntaxKind::METHOD_DECL)]
#[case(EntryPoint::Member, "int x = 1;", SyntaxKind::FIELD_DECL)]
#[case(EntryPoint::Member, "class C { }", SyntaxKind::CLASS_DECL)]
#[case(EntryPoint::Statement, "while (x) { }", SyntaxKind::WHILE_STMT)]
#[case(EntryPoint::Expression, "a.b(c)", SyntaxKind::CALL_EXPR)]
fn test_fragment_root(#[case] entry: EntryPoint, #[case] source: &str, #[case] kind: SyntaxKind) {
    let tree = SyntaxTree::parse_entry(source, ParseOptions::default(), entry);
    assert_eq!(tree.root().kind(), SyntaxKind::FRAGMENT);
    assert_eq!(tree.entry(), entry);
    assert_eq!(child_kinds(&tree), vec![kind, SyntaxKind::EOF]);
    assert!(tree.diagnostics().is_empty());
}

#[rstest]
#[case(EntryPoint::Member, "int x; int y;")]
#[case(EntryPoint::Statement, "a(); b();")]
#[case(EntryPoint::Expression, "a b")]
fn test_trailing_input_is_skipped(#[case] entry: EntryPoint, #[case] source: &str) {
    let tree = SyntaxTree::parse_entry(source, ParseOptions::default(), entry);
    let kinds = child_kinds(&tree);
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds[1], SyntaxKind::SKIPPED_TOKENS);
    assert_eq!(kinds[2], SyntaxKind::EOF);
    assert_eq!(tree.root().text(), source);
    let codes: Vec<&str> = tree.diagnostics().iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["E0901"]);
}

#[rstest]
#[case(EntryPoint::Member, ")")]
#[case(EntryPoint::Statement, "}")]
#[case(EntryPoint::Expression, ";")]
fn test_input_that_cannot_start_the_production(#[case] entry: EntryPoint, #[case] source: &str) {
    let tree = SyntaxTree::parse_entry(source, ParseOptions::default(), entry);
    assert_eq!(child_kinds(&tree), vec![SyntaxKind::SKIPPED_TOKENS, SyntaxKind::EOF]);
}

#[test]
fn test_empty_fragment() {
    let tree = SyntaxTree::parse_entry("", ParseOptions::default(), EntryPoint::Statement);
    assert_eq!(child_kinds(&tree), vec![SyntaxKind::EOF]);
    assert!(tree.diagnostics().is_empty());
}
