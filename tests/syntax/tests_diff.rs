//! Syntax Tests - Tree Differencing
//!
//! The differencer reports exactly the elements an edit rebuilt.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use quill::{SyntaxElement, SyntaxKind, TextRange, TextSize, diff_trees};

use crate::helpers::tree_assertions::{edit, insert, offset_of, parse};

fn kinds(elements: &[SyntaxElement]) -> Vec<SyntaxKind> {
    elements.iter().map(SyntaxElement::kind).collect()
}

#[test]
fn test_identical_trees_have_no_differences() {
    let tree = parse("class C { }");
    assert!(diff_trees(&tree, &tree).is_empty());
}

#[test]
fn test_rename_reports_path_to_identifier() {
    let tree = parse("class goo { }");
    let edited = edit(&tree, 6, 9, "bar");
    let changed = diff_trees(&tree, &edited);
    assert_eq!(
        kinds(&changed),
        vec![SyntaxKind::COMPILATION_UNIT, SyntaxKind::CLASS_DECL, SyntaxKind::IDENT]
    );
    let ident = changed[2].as_token().unwrap();
    assert_eq!(ident.text(), "bar");
    assert_eq!(ident.text_range().start(), TextSize::new(6));
}

#[test]
fn test_inserted_member_reported_with_subtree() {
    let source = "class A { }\nclass C { }\n";
    let tree = parse(source);
    let edited = insert(&tree, offset_of(source, "class C"), "class B { }\n");
    let changed = diff_trees(&tree, &edited);
    // A ends with a line break before the insertion, so it is shared
    assert_eq!(
        kinds(&changed),
        vec![
            SyntaxKind::COMPILATION_UNIT,
            SyntaxKind::CLASS_DECL,
            SyntaxKind::CLASS_KW,
            SyntaxKind::IDENT,
            SyntaxKind::L_BRACE,
            SyntaxKind::R_BRACE
        ]
    );
    assert_eq!(changed[1].as_node().unwrap().text(), "class B { }\n");
    assert!(tree.green().child(0).unwrap().ptr_eq(edited.green().child(0).unwrap()));
}

#[test]
fn test_removed_member_is_not_reported() {
    let source = "class A { }\nclass B { }\nclass C { }\n";
    let tree = parse(source);
    let start = offset_of(source, "class B");
    let edited = edit(&tree, start, start + "class B { }\n".len() as u32, "");
    let changed = diff_trees(&tree, &edited);
    assert_eq!(kinds(&changed), vec![SyntaxKind::COMPILATION_UNIT]);
    assert!(edited.reuse_stats().reused_nodes >= 2);
}

#[test]
fn test_edit_in_method_body_is_local() {
    let source = "class A {\n  void M() {\n    x = 1;\n    y = 2;\n  }\n  int f;\n}\nclass B { }\n";
    let tree = parse(source);
    let one = offset_of(source, "1;");
    let edited = edit(&tree, one, one + 1, "42");
    let changed = diff_trees(&tree, &edited);
    let changed_kinds = kinds(&changed);
    assert_eq!(
        changed_kinds[..2].to_vec(),
        vec![SyntaxKind::COMPILATION_UNIT, SyntaxKind::CLASS_DECL]
    );
    assert!(changed_kinds.contains(&SyntaxKind::METHOD_DECL));
    assert!(!changed_kinds.contains(&SyntaxKind::FIELD_DECL));

    let literal = changed.last().unwrap().as_token().unwrap();
    assert_eq!(literal.kind(), SyntaxKind::INT_LITERAL);
    assert_eq!(literal.text(), "42");

    // Nothing from the second statement or from class B
    let second = offset_of(edited.text(), "y = 2;");
    let untouched = TextRange::new(TextSize::new(second), edited.green().full_width());
    for element in &changed[2..] {
        assert!(
            element.text_range().start() < untouched.start(),
            "{:?} should have been reused",
            element
        );
    }

    // Pre-order: every reported node comes before its reported descendants
    for window in changed.windows(2) {
        assert!(window[0].full_range().start() <= window[1].full_range().start());
    }
}

#[test]
fn test_member_before_edit_is_not_reported() {
    let source = "class C { void A() { int x = 1; } void B() { } }";
    let tree = parse(source);
    let b = offset_of(source, "B()");
    let edited = edit(&tree, b, b + 1, "Bz");
    let changed = diff_trees(&tree, &edited);

    let method_a = tree.root().descendants().find(|n| n.kind() == SyntaxKind::METHOD_DECL).unwrap();
    let a_range = method_a.full_range();
    let reported: Vec<&SyntaxElement> = changed
        .iter()
        .filter(|element| a_range.contains_range(element.full_range()))
        .collect();
    assert!(reported.is_empty(), "{:?}", reported);
    assert_eq!(
        kinds(&changed[..2]),
        vec![SyntaxKind::COMPILATION_UNIT, SyntaxKind::CLASS_DECL]
    );
    // Reported elements still know where they sit
    let ident = changed.iter().find_map(|e| e.as_token().filter(|t| t.text() == "Bz")).unwrap();
    assert_eq!(ident.parent().unwrap().kind(), SyntaxKind::METHOD_DECL);
}
