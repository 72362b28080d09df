//! Incremental Tests - Subtree Reuse
//!
//! What an edit leaves alone is shared with the old tree by reference.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use quill::syntax::{GreenElement, GreenNode};
use quill::{SyntaxAnnotation, SyntaxKind, SyntaxTree, TextChangeSet};

use crate::helpers::tree_assertions::{assert_incremental_matches_full, edit, offset_of, parse};

const METHODS: usize = 20;

/// `class Big` with METHODS methods `M0..` each holding `int a = <i>;`
fn big_class() -> String {
    let mut source = String::from("class Big\n{\n");
    for i in 0..METHODS {
        source.push_str(&format!("    void M{i}() {{ int a = {i}; a = a + 1; }}\n"));
    }
    source.push_str("}\n");
    source
}

fn methods(tree: &SyntaxTree) -> Vec<GreenNode> {
    let class = tree.green().child(0).and_then(GreenElement::as_node).cloned().unwrap();
    class
        .children()
        .filter_map(GreenElement::as_node)
        .filter(|n| n.kind() == SyntaxKind::METHOD_DECL)
        .cloned()
        .collect()
}

/// Replace the literal in `int a = 10;` inside M10
fn edit_m10(tree: &SyntaxTree) -> SyntaxTree {
    let at = offset_of(tree.text(), "int a = 10;") + "int a = ".len() as u32;
    edit(tree, at, at + 2, "99")
}

#[test]
fn test_untouched_methods_are_shared() {
    let tree = parse(&big_class());
    let edited = edit_m10(&tree);
    assert_incremental_matches_full(&edited);

    let before = methods(&tree);
    let after = methods(&edited);
    assert_eq!(after.len(), METHODS);
    for (i, (old, new)) in before.iter().zip(&after).enumerate() {
        assert_eq!(old.ptr_eq(new), i != 10, "method M{i}");
    }
    assert!(edited.reuse_stats().reused_nodes >= METHODS - 1);
}

#[test]
fn test_reused_subtrees_keep_their_place_after_a_shift() {
    let tree = parse(&big_class());
    // Grow M0 so everything after it moves
    let at = offset_of(tree.text(), "a = a + 1;");
    let edited = edit(&tree, at, at, "a = a * 2; ");
    assert_incremental_matches_full(&edited);

    let before = methods(&tree);
    let after = methods(&edited);
    assert!(!before[0].ptr_eq(&after[0]));
    assert!(before[1..].iter().zip(&after[1..]).all(|(a, b)| a.ptr_eq(b)));

    // Red nodes over shared green nodes get the new offsets
    let m5 = edited
        .root()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::METHOD_DECL)
        .nth(5)
        .unwrap();
    assert_eq!(
        u32::from(m5.text_range().start()),
        offset_of(edited.text(), "void M5(")
    );
}

#[test]
fn test_no_changes_reuses_every_member() {
    let source = "using A;\nclass B { }\nstruct C { }\n";
    let tree = parse(source);
    let same = tree.apply_edits(&TextChangeSet::default()).unwrap();
    assert_incremental_matches_full(&same);
    for (old, new) in tree.green().children().zip(same.green().children()) {
        assert!(old.ptr_eq(new), "{:?} was rebuilt", new);
    }
    let stats = same.reuse_stats();
    assert_eq!(stats.reused_nodes, 3);
    // Only the end-of-file token is ever rescanned
    assert_eq!(stats.scanned_tokens, 1);
}

#[test]
fn test_tokens_far_from_edit_are_reused() {
    let tree = parse(&big_class());
    let edited = edit_m10(&tree);
    let stats = edited.reuse_stats();
    assert!(stats.reused_tokens > 0);
    // Only a handful of tokens around the literal are scanned again
    assert!(stats.scanned_tokens < 12, "{:?}", stats);
    let fresh = parse(edited.text()).reuse_stats();
    assert!(fresh.reused_nodes == 0 && fresh.reused_tokens == 0);
}

#[test]
fn test_nodes_with_diagnostics_are_rebuilt() {
    let source = "class A { int x }\nclass B { int y; }\n";
    let tree = parse(source);
    let at = offset_of(source, "y;");
    let edited = edit(&tree, at, at + 1, "z");
    assert_incremental_matches_full(&edited);
    // A is far from the edit but carries a diagnostic
    let old_a = tree.green().child(0).unwrap();
    let new_a = edited.green().child(0).unwrap();
    assert!(!old_a.ptr_eq(new_a));
    assert_eq!(edited.diagnostics().len(), 1);
}

#[test]
fn test_annotated_nodes_are_not_reused() {
    let tree = parse(&big_class());
    let m3 = tree
        .root()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::METHOD_DECL)
        .nth(3)
        .unwrap();
    let annotated = tree.with_node_annotation(&m3, SyntaxAnnotation::new("marker")).unwrap();
    let edited = edit_m10(&annotated);
    assert_incremental_matches_full(&edited);

    let annotated_m3 = methods(&annotated)[3].clone();
    let new_m3 = methods(&edited)[3].clone();
    assert!(!annotated_m3.ptr_eq(&new_m3));
    assert!(new_m3.annotations().is_empty());
    // Its body carries no annotation and is still shared
    let body = |n: &GreenNode| n.children().filter_map(GreenElement::as_node).last().cloned().unwrap();
    assert!(body(&annotated_m3).ptr_eq(&body(&new_m3)));
}

#[test]
fn test_directive_context_change_prevents_reuse() {
    let source = "class A { }\nclass B { }\n";
    let tree = parse(source);
    let edited = edit(&tree, 0, 0, "#if false\n");
    assert_incremental_matches_full(&edited);
    // Everything after the new #if is disabled text now
    assert!(edited.root().children().next().is_none());
    assert_eq!(edited.reuse_stats().reused_nodes, 0);
}

fn statements(tree: &SyntaxTree) -> Vec<GreenNode> {
    tree.root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::BLOCK)
        .unwrap()
        .children()
        .map(|n| n.green().clone())
        .collect()
}

#[test]
fn test_statement_just_before_edit_is_shared() {
    let source = "class C { void M() { int a = 1; int b = 2; } }";
    let tree = parse(source);
    let two = offset_of(source, "2;");
    let edited = edit(&tree, two, two + 1, "3");
    assert_incremental_matches_full(&edited);

    let before = statements(&tree);
    let after = statements(&edited);
    assert!(before[0].ptr_eq(&after[0]));
    assert!(!before[1].ptr_eq(&after[1]));
}

#[test]
fn test_if_is_rebuilt_when_an_else_appears_after_it() {
    // Deleting the `x` turns the next statement into an else clause
    let source = "class C { void M() { if (a) b(); elsex c(); } }";
    let tree = parse(source);
    let at = offset_of(source, "x c();");
    let edited = edit(&tree, at, at + 1, "");
    assert_incremental_matches_full(&edited);

    let if_stmt = edited
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::IF_STMT)
        .unwrap();
    assert!(if_stmt.children().any(|n| n.kind() == SyntaxKind::ELSE_CLAUSE));
}
