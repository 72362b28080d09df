//! Assertions comparing trees built different ways.

use pretty_assertions::assert_eq;
use quill::{ParseOptions, SyntaxKind, SyntaxTree, TextChange, TextChangeSet, TextRange, TextSize};

/// Parse with default options.
pub fn parse(text: &str) -> SyntaxTree {
    SyntaxTree::parse(text, ParseOptions::default())
}

/// Replace `start..end` of the tree's text with `text` and reparse incrementally.
pub fn edit(tree: &SyntaxTree, start: u32, end: u32, text: &str) -> SyntaxTree {
    let change = TextChange::new(TextRange::new(TextSize::new(start), TextSize::new(end)), text);
    tree.apply_edits(&TextChangeSet::single(change))
        .expect("edit should be in bounds")
}

/// Insert `text` at `offset`.
pub fn insert(tree: &SyntaxTree, offset: u32, text: &str) -> SyntaxTree {
    edit(tree, offset, offset, text)
}

/// Offset of the first occurrence of `needle`.
pub fn offset_of(text: &str, needle: &str) -> u32 {
    let offset = text
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in {text:?}"));
    offset as u32
}

/// Assert that an incrementally produced tree is exactly what a fresh parse
/// of the same text produces: same green tree, diagnostics and directives.
pub fn assert_incremental_matches_full(tree: &SyntaxTree) {
    let full = SyntaxTree::parse_entry(tree.text(), tree.options().clone(), tree.entry());
    assert_eq!(tree.root().text(), tree.text(), "tree text differs from snapshot");
    assert_eq!(
        tree.green().debug_dump(),
        full.green().debug_dump(),
        "incremental tree differs from full parse of {:?}",
        tree.text()
    );
    assert!(tree.green() == full.green());
    assert_eq!(tree.diagnostics(), full.diagnostics());
    assert_eq!(tree.directives(), full.directives());
    assert_eq!(tree.status(), full.status());
}

/// Kinds of the root's child nodes.
pub fn top_level_kinds(tree: &SyntaxTree) -> Vec<SyntaxKind> {
    tree.root().children().map(|n| n.kind()).collect()
}

/// Diagnostic codes in source order.
pub fn diagnostic_codes(tree: &SyntaxTree) -> Vec<&'static str> {
    tree.diagnostics().iter().map(|d| d.code.as_str()).collect()
}
