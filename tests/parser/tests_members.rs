//! Parser Tests - Member Declarations
//!
//! Using directives, namespaces, type declarations, methods and fields.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use quill::parser::ast::{CompilationUnit, Member, TypeDeclKind};
use quill::parser::AstNode;
use quill::{LanguageVersion, ParseOptions, SyntaxKind, SyntaxTree};
use rstest::rstest;

use crate::helpers::source_fixtures::*;
use crate::helpers::tree_assertions::{parse, top_level_kinds};

fn compilation_unit(tree: &SyntaxTree) -> CompilationUnit {
    CompilationUnit::cast(tree.root()).unwrap()
}

// ============================================================================
// Lossless round trip
// ============================================================================

#[rstest]
#[case(EMPTY_CLASS)]
#[case(USING_AND_CLASS)]
#[case(SMALL_FILE)]
#[case(CONDITIONAL_FILE)]
#[case(MISSING_SEMICOLON)]
#[case(UNTERMINATED_STRING)]
#[case("")]
#[case("   \n\t// only trivia\n")]
#[case(") ( } {")]
fn test_tree_text_equals_source(#[case] source: &str) {
    let tree = parse(source);
    assert_eq!(tree.root().text(), source);
    assert_eq!(u32::from(tree.green().full_width()), source.len() as u32);
}

// ============================================================================
// Member kinds
// ============================================================================

#[rstest]
#[case("using System;", SyntaxKind::USING_DIRECTIVE)]
#[case("using System.Collections.Generic;", SyntaxKind::USING_DIRECTIVE)]
#[case("namespace N { }", SyntaxKind::NAMESPACE_DECL)]
#[case("class C { }", SyntaxKind::CLASS_DECL)]
#[case("public sealed class C { }", SyntaxKind::CLASS_DECL)]
#[case("struct S { }", SyntaxKind::STRUCT_DECL)]
#[case("interface I { }", SyntaxKind::INTERFACE_DECL)]
#[case("record R { }", SyntaxKind::RECORD_DECL)]
#[case("void M() { }", SyntaxKind::METHOD_DECL)]
#[case("int x;", SyntaxKind::FIELD_DECL)]
#[case("static readonly string[] names = null;", SyntaxKind::FIELD_DECL)]
fn test_member_kind(#[case] source: &str, #[case] kind: SyntaxKind) {
    let tree = parse(source);
    assert_eq!(top_level_kinds(&tree), vec![kind]);
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());
}

#[test]
fn test_small_file_structure() {
    let tree = parse(SMALL_FILE);
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());

    let unit = compilation_unit(&tree);
    let members: Vec<Member> = unit.members().collect();
    assert_eq!(members.len(), 2);

    let Member::Using(using) = &members[0] else {
        panic!("expected using directive, got {:?}", members[0]);
    };
    assert_eq!(using.name().unwrap().qualified(), "System");

    let Member::Namespace(namespace) = &members[1] else {
        panic!("expected namespace, got {:?}", members[1]);
    };
    assert_eq!(namespace.name().unwrap().qualified(), "Demo.App");

    let types: Vec<_> = namespace
        .members()
        .filter_map(|m| match m {
            Member::Type(t) => Some((t.decl_kind(), t.name().unwrap().text().to_string())),
            _ => None,
        })
        .collect();
    assert_eq!(
        types,
        vec![
            (TypeDeclKind::Class, "Program".to_string()),
            (TypeDeclKind::Struct, "Point".to_string()),
            (TypeDeclKind::Interface, "IRunnable".to_string()),
        ]
    );
}

#[test]
fn test_class_members_and_base_list() {
    let tree = parse(SMALL_FILE);
    let program = tree
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::CLASS_DECL)
        .and_then(quill::parser::ast::TypeDecl::cast)
        .unwrap();

    assert_eq!(program.modifiers(), vec![SyntaxKind::PUBLIC_KW]);
    let bases: Vec<String> = program
        .base_list()
        .unwrap()
        .types()
        .map(|t| t.name().unwrap().qualified())
        .collect();
    assert_eq!(bases, vec!["Base", "IRunnable"]);

    let members: Vec<Member> = program.members().collect();
    assert_eq!(members.len(), 3);

    let Member::Field(count) = &members[0] else {
        panic!("expected field");
    };
    assert_eq!(count.modifiers(), vec![SyntaxKind::PRIVATE_KW]);
    assert_eq!(count.ty().unwrap().predefined(), Some(SyntaxKind::INT_KW));
    let declarator = count.declarators().next().unwrap();
    assert_eq!(declarator.name().unwrap().text(), "count");
    assert_eq!(declarator.initializer().unwrap().kind(), SyntaxKind::LITERAL_EXPR);

    let Member::Field(names) = &members[1] else {
        panic!("expected field");
    };
    let ty = names.ty().unwrap();
    assert!(ty.is_array());
    assert_eq!(ty.element_type().unwrap().predefined(), Some(SyntaxKind::STRING_KW));

    let Member::Method(run) = &members[2] else {
        panic!("expected method");
    };
    assert_eq!(run.name().unwrap().text(), "Run");
    assert_eq!(run.return_type().unwrap().predefined(), Some(SyntaxKind::VOID_KW));
    let params: Vec<String> = run
        .param_list()
        .unwrap()
        .params()
        .map(|p| p.name().unwrap().text().to_string())
        .collect();
    assert_eq!(params, vec!["times", "label"]);
    assert_eq!(run.body().unwrap().statements().count(), 4);
}

#[test]
fn test_interface_method_without_body() {
    let tree = parse("interface I { void Run(int times); }");
    assert!(tree.diagnostics().is_empty());
    let method = tree
        .root()
        .descendants()
        .find_map(quill::parser::ast::MethodDecl::cast)
        .unwrap();
    assert!(method.body().is_none());
}

#[test]
fn test_multiple_field_declarators() {
    let tree = parse("class C { int a = 1, b, c = a; }");
    let field = tree
        .root()
        .descendants()
        .find_map(quill::parser::ast::FieldDecl::cast)
        .unwrap();
    let names: Vec<String> = field
        .declarators()
        .map(|d| d.name().unwrap().text().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

// ============================================================================
// Records and language versions
// ============================================================================

#[rstest]
#[case(LanguageVersion::CSharp7, false)]
#[case(LanguageVersion::CSharp8, false)]
#[case(LanguageVersion::CSharp9, true)]
#[case(LanguageVersion::Latest, true)]
fn test_record_requires_csharp9(#[case] version: LanguageVersion, #[case] is_record: bool) {
    let options = ParseOptions::default().with_language_version(version);
    let tree = SyntaxTree::parse("record Person { }", options);
    let first = tree.root().children().next().unwrap();
    assert_eq!(first.kind() == SyntaxKind::RECORD_DECL, is_record);
    if is_record {
        let decl = quill::parser::ast::TypeDecl::cast(first).unwrap();
        assert_eq!(decl.decl_kind(), TypeDeclKind::Record);
        assert_eq!(decl.name().unwrap().text(), "Person");
    } else {
        assert!(!tree.diagnostics().is_empty());
    }
}

#[test]
fn test_record_as_type_name() {
    // `record` not followed by a name is an ordinary type
    let tree = parse("class C { record.Entry r; }");
    let field = tree
        .root()
        .descendants()
        .find_map(quill::parser::ast::FieldDecl::cast)
        .unwrap();
    assert_eq!(field.ty().unwrap().name().unwrap().qualified(), "record.Entry");
    assert!(tree.diagnostics().is_empty());
}

// ============================================================================
// Incomplete members
// ============================================================================

#[test]
fn test_modifiers_without_declaration() {
    let tree = parse("class C { public }");
    let kinds: Vec<SyntaxKind> = tree
        .root()
        .descendants()
        .map(|n| n.kind())
        .collect();
    assert!(kinds.contains(&SyntaxKind::INCOMPLETE_MEMBER));
    let codes: Vec<&str> = tree.diagnostics().iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["E0302"]);
}
