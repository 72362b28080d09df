//! Parser Tests - Preprocessor Directives
//!
//! Conditional compilation, regions and the directive table.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use quill::parser::Severity;
use quill::parser::ast::{CompilationUnit, Member};
use quill::parser::AstNode;
use quill::{ParseOptions, SyntaxKind, SyntaxTree, TextSize};
use rstest::rstest;

use crate::helpers::source_fixtures::{CONDITIONAL_FILE, UNCLOSED_REGION};
use crate::helpers::tree_assertions::{diagnostic_codes, parse};

fn class_names(tree: &SyntaxTree) -> Vec<String> {
    CompilationUnit::cast(tree.root())
        .unwrap()
        .members()
        .filter_map(|m| match m {
            Member::Type(t) => t.name().map(|n| n.text().to_string()),
            _ => None,
        })
        .collect()
}

fn directive_kinds(tree: &SyntaxTree) -> Vec<SyntaxKind> {
    tree.directives().entries().iter().map(|e| e.kind).collect()
}

#[rstest]
#[case(&[], &["Release", "Always"])]
#[case(&["DEBUG"], &["Debug", "Always"])]
#[case(&["TRACE"], &["Release", "Always"])]
fn test_conditional_branches(#[case] symbols: &[&str], #[case] expected: &[&str]) {
    let options = ParseOptions::default().with_preprocessor_symbols(symbols.iter().copied());
    let tree = SyntaxTree::parse(CONDITIONAL_FILE, options);
    assert_eq!(class_names(&tree), expected.to_vec());
    assert_eq!(tree.root().text(), CONDITIONAL_FILE);
    assert!(tree.diagnostics().is_empty());
    assert_eq!(
        directive_kinds(&tree),
        vec![SyntaxKind::IF_DIRECTIVE, SyntaxKind::ELSE_DIRECTIVE, SyntaxKind::ENDIF_DIRECTIVE]
    );
}

#[rstest]
#[case("#if A && !B\nclass Yes { }\n#endif\n", &["Yes"])]
#[case("#if A && B\nclass No { }\n#endif\n", &[])]
#[case("#if (A || B) == true\nclass Yes { }\n#endif\n", &["Yes"])]
#[case("#if B\nclass No { }\n#elif A\nclass Yes { }\n#else\nclass Else { }\n#endif\n", &["Yes"])]
#[case("#if false\n#if true\nclass Nested { }\n#endif\n#endif\nclass After { }\n", &["After"])]
#[case("#define B\n#if A && B\nclass Yes { }\n#endif\n", &["Yes"])]
#[case("#undef A\n#if A\nclass No { }\n#endif\n", &[])]
fn test_conditional_expressions(#[case] source: &str, #[case] expected: &[&str]) {
    let options = ParseOptions::default().with_preprocessor_symbols(["A"]);
    let tree = SyntaxTree::parse(source, options);
    assert_eq!(class_names(&tree), expected.to_vec());
    assert!(tree.diagnostics().is_empty(), "{:?}", tree.diagnostics());
    assert_eq!(tree.root().text(), source);
}

#[test]
fn test_inactive_text_is_disabled_trivia() {
    let tree = parse(CONDITIONAL_FILE);
    let disabled: Vec<String> = tree
        .root()
        .tokens()
        .flat_map(|t| t.leading_trivia().to_vec())
        .filter(|t| t.kind == SyntaxKind::DISABLED_TEXT)
        .map(|t| t.text.to_string())
        .collect();
    assert_eq!(disabled, vec!["class Debug { }\n".to_string()]);
}

#[test]
fn test_unclosed_region_diagnostics() {
    let tree = parse(UNCLOSED_REGION);
    let diagnostics = tree.diagnostics();
    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["#endregion directive expected", "#endregion directive expected"]
    );
    assert_eq!(diagnostic_codes(&tree), vec!["E0501", "E0501"]);
    // The second one sits at end of input
    assert_eq!(diagnostics[1].range.start(), TextSize::of(UNCLOSED_REGION));
    assert_eq!(class_names(&tree), vec!["C"]);
}

#[rstest]
#[case("#endif\nclass C { }\n", "E0502")]
#[case("#else\nclass C { }\n", "E0502")]
#[case("#endregion\nclass C { }\n", "E0502")]
#[case("#pragma warning\nclass C { }\n", "E0504")]
#[case("#if (A\nclass C { }\n#endif\n", "E0503")]
#[case("#define 1x\nclass C { }\n", "E0301")]
#[case("#if true\nclass C { }\n", "E0501")]
fn test_directive_errors(#[case] source: &str, #[case] code: &str) {
    let tree = parse(source);
    assert_eq!(diagnostic_codes(&tree), vec![code]);
    assert_eq!(tree.root().text(), source);
}

#[test]
fn test_error_and_warning_directives() {
    let tree = parse("#error stop here\n#warning careful\nclass C { }\n");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].message, "#error: 'stop here'");
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[1].message, "#warning: 'careful'");
    assert_eq!(diagnostics[1].severity, Severity::Warning);
}

#[test]
fn test_directive_table_replays_state() {
    let source = "#region Outer\n#if A\nclass C { }\n#endif\n#endregion\n";
    let options = ParseOptions::default().with_preprocessor_symbols(["A"]);
    let tree = SyntaxTree::parse(source, options);
    let table = tree.directives();
    assert_eq!(
        directive_kinds(&tree),
        vec![
            SyntaxKind::REGION_DIRECTIVE,
            SyntaxKind::IF_DIRECTIVE,
            SyntaxKind::ENDIF_DIRECTIVE,
            SyntaxKind::ENDREGION_DIRECTIVE
        ]
    );

    let class_offset = TextSize::new(source.find("class").unwrap() as u32);
    let inside = table.state_at(class_offset);
    assert_eq!(inside.depth(), 2);
    assert!(inside.is_active());
    assert_eq!(inside.expected_closer(), Some("#endif"));
    assert_eq!(table.state_at(TextSize::new(0)).depth(), 0);
    assert_eq!(table.state_at(TextSize::of(source)).depth(), 0);
}

#[test]
fn test_hash_after_code_is_not_a_directive() {
    let tree = parse("class C { } #if X\n");
    assert!(tree.directives().is_empty());
    assert!(!tree.diagnostics().is_empty());
}
