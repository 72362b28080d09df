//! Syntax Tests - Green Tree
//!
//! Widths, flags, structural sharing and persistent updates.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use quill::syntax::{GreenElement, GreenFlags, GreenNode, GreenToken, TokenCache, Trivia};
use quill::{SyntaxAnnotation, SyntaxKind, TextSize};

use crate::helpers::tree_assertions::parse;

fn ws(text: &str) -> Trivia {
    Trivia::new(SyntaxKind::WHITESPACE, text)
}

#[test]
fn test_widths_include_trivia() {
    let token = GreenToken::new(SyntaxKind::IDENT, "name", vec![ws("  ")], vec![ws(" ")]);
    assert_eq!(token.leading_width(), TextSize::new(2));
    assert_eq!(token.text_width(), TextSize::new(4));
    assert_eq!(token.trailing_width(), TextSize::new(1));
    assert_eq!(token.full_width(), TextSize::new(7));
    assert_eq!(token.full_text(), "  name ");

    let node = GreenNode::new(
        SyntaxKind::NAME,
        vec![token.clone().into(), GreenToken::new(SyntaxKind::DOT, ".", vec![], vec![]).into()],
    );
    assert_eq!(node.full_width(), TextSize::new(8));
    assert_eq!(node.child_offset(1), Some(TextSize::new(7)));
    assert_eq!(node.text(), "  name .");
}

#[test]
fn test_flags_propagate_upwards() {
    let tree = parse("class C { ) }");
    let root = tree.green();
    assert!(root.flags().contains(GreenFlags::CONTAINS_DIAGNOSTICS));
    assert!(root.flags().contains(GreenFlags::CONTAINS_SKIPPED_TEXT));

    let clean = parse("class C { }");
    assert!(clean.green().flags().is_empty());

    let with_directive = parse("#region R\nclass C { }\n#endregion\n");
    assert!(with_directive.green().flags().contains(GreenFlags::CONTAINS_DIRECTIVES));
    assert!(!with_directive.green().flags().contains(GreenFlags::CONTAINS_DIAGNOSTICS));
}

#[test]
fn test_missing_token_flags() {
    let tree = parse("class C { int x }");
    let missing = tree.root().tokens().find(|t| t.is_missing()).unwrap();
    let flags = missing.green().flags();
    assert!(flags.contains(GreenFlags::IS_MISSING));
    assert!(flags.contains(GreenFlags::CONTAINS_DIAGNOSTICS));
}

#[test]
fn test_replace_child_shares_siblings() {
    let tree = parse("class A { } class B { }");
    let root = tree.green().clone();
    let replacement = parse("class Z { }").green().child(0).cloned().unwrap();
    let updated = root.replace_child(1, replacement.clone());

    assert_eq!(updated.text(), "class A { } class Z { }");
    assert!(updated.child(0).unwrap().ptr_eq(root.child(0).unwrap()));
    assert!(updated.child(1).unwrap().ptr_eq(&replacement));
    // The original is untouched
    assert_eq!(root.text(), "class A { } class B { }");
}

#[test]
fn test_annotation_marks_node_and_ancestors() {
    let tree = parse("class A { int x; }");
    let field = tree
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::FIELD_DECL)
        .unwrap();
    let annotation = SyntaxAnnotation::with_data("rename", "x");
    let annotated = tree.with_node_annotation(&field, annotation.clone()).unwrap();

    assert!(annotated.green().flags().contains(GreenFlags::CONTAINS_ANNOTATIONS));
    assert_eq!(annotated.root().kind(), SyntaxKind::COMPILATION_UNIT);
    let field = annotated
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::FIELD_DECL)
        .unwrap();
    assert_eq!(field.annotations(), &[annotation]);
    assert_eq!(field.annotations()[0].data(), Some("x"));
    // Unannotated trees are unaffected
    assert!(!tree.green().flags().contains(GreenFlags::CONTAINS_ANNOTATIONS));
    assert_eq!(annotated.text(), tree.text());
}

#[test]
fn test_token_annotation() {
    let tree = parse("class A { }");
    let name = tree.root().tokens().find(|t| t.kind() == SyntaxKind::IDENT).unwrap();
    let annotated = tree
        .with_token_annotation(&name, SyntaxAnnotation::new("highlight"))
        .unwrap();
    let name = annotated
        .root()
        .tokens()
        .find(|t| t.kind() == SyntaxKind::IDENT)
        .unwrap();
    assert_eq!(name.annotations().len(), 1);
    assert_eq!(name.annotations()[0].kind(), "highlight");
    assert_eq!(name.parent().unwrap().kind(), SyntaxKind::CLASS_DECL);
    assert_eq!(annotated.root().kind(), SyntaxKind::COMPILATION_UNIT);
    assert_eq!(annotated.text(), tree.text());
}

#[test]
fn test_annotations_have_distinct_ids() {
    let a = SyntaxAnnotation::new("k");
    let b = SyntaxAnnotation::new("k");
    assert_ne!(a, b);
    assert_ne!(a.id(), b.id());
}

#[test]
fn test_token_cache_pools_small_tokens() {
    let cache = TokenCache::new();
    let a = cache.token(SyntaxKind::IDENT, "x", vec![], vec![ws(" ")]);
    let b = cache.token(SyntaxKind::IDENT, "x", vec![], vec![ws(" ")]);
    assert!(a.ptr_eq(&b));
    assert_eq!(cache.len(), 1);

    // Comments are never pooled
    let comment = vec![Trivia::new(SyntaxKind::SINGLE_LINE_COMMENT, "// c")];
    let c = cache.token(SyntaxKind::IDENT, "x", comment.clone(), vec![]);
    let d = cache.token(SyntaxKind::IDENT, "x", comment, vec![]);
    assert!(!c.ptr_eq(&d));
    assert_eq!(c, d);

    let long = "a".repeat(64);
    let e = cache.token(SyntaxKind::IDENT, &long, vec![], vec![]);
    let f = cache.token(SyntaxKind::IDENT, &long, vec![], vec![]);
    assert!(!e.ptr_eq(&f));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_green_equality_is_structural() {
    let a = parse("class C { void M() { } }");
    let b = parse("class C { void M() { } }");
    assert!(!a.green().ptr_eq(b.green()));
    assert_eq!(a.green(), b.green());
    let element: GreenElement = a.green().clone().into();
    assert_eq!(element.kind(), SyntaxKind::COMPILATION_UNIT);
}
