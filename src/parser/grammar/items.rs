//! Compilation units and member declarations
//!
//! - Using directives and namespaces
//! - Type declarations (class, struct, interface, record)
//! - Methods and fields, told apart by the `(` after the name

use super::expressions::{parse_name, parse_type};
use super::statements::{StatementParser, parse_block, parse_declarators};
use crate::parser::errors::{ErrorCode, ParseContext, is_member_start};
use crate::parser::syntax_kind::SyntaxKind;
use crate::syntax::Checkpoint;

/// Member-level operations on top of [`StatementParser`]
pub trait ItemParser: StatementParser {
    /// Whether `record` declares a type under the current options
    fn records_enabled(&self) -> bool;
}

/// Node kinds a member can be reused as
pub const MEMBER_KINDS: &[SyntaxKind] = &[
    SyntaxKind::USING_DIRECTIVE,
    SyntaxKind::NAMESPACE_DECL,
    SyntaxKind::CLASS_DECL,
    SyntaxKind::STRUCT_DECL,
    SyntaxKind::INTERFACE_DECL,
    SyntaxKind::RECORD_DECL,
    SyntaxKind::METHOD_DECL,
    SyntaxKind::FIELD_DECL,
];

/// CompilationUnit = Member* EOF
pub fn parse_compilation_unit<P: ItemParser>(p: &mut P) {
    p.start_node(SyntaxKind::COMPILATION_UNIT);
    p.push_context(ParseContext::CompilationUnit);
    parse_members(p, None);
    p.pop_context();
    p.bump();
    p.finish_node();
}

/// Members up to `closer` (or end of input)
fn parse_members<P: ItemParser>(p: &mut P, closer: Option<SyntaxKind>) {
    loop {
        let kind = p.current_kind();
        if kind == SyntaxKind::EOF || Some(kind) == closer {
            break;
        }
        if is_member_start(kind) {
            parse_member(p);
        } else if !p.skip_to_recovery() {
            break;
        }
    }
}

/// Member = UsingDirective | NamespaceDecl | TypeDecl | MethodDecl | FieldDecl
pub fn parse_member<P: ItemParser>(p: &mut P) {
    if p.try_reuse(MEMBER_KINDS) {
        return;
    }

    let checkpoint = p.checkpoint();
    while p.current_kind().is_modifier() {
        p.bump();
    }

    match p.current_kind() {
        SyntaxKind::USING_KW => {
            p.start_node_at(checkpoint, SyntaxKind::USING_DIRECTIVE);
            p.bump();
            parse_name(p);
            p.expect(SyntaxKind::SEMICOLON);
            p.finish_node();
        }
        SyntaxKind::NAMESPACE_KW => {
            p.start_node_at(checkpoint, SyntaxKind::NAMESPACE_DECL);
            p.bump();
            parse_name(p);
            parse_member_body(p, ParseContext::NamespaceBody);
            p.finish_node();
        }
        SyntaxKind::CLASS_KW => parse_type_decl(p, checkpoint, SyntaxKind::CLASS_DECL),
        SyntaxKind::STRUCT_KW => parse_type_decl(p, checkpoint, SyntaxKind::STRUCT_DECL),
        SyntaxKind::INTERFACE_KW => parse_type_decl(p, checkpoint, SyntaxKind::INTERFACE_DECL),
        SyntaxKind::IDENT if is_record_start(p) => parse_type_decl(p, checkpoint, SyntaxKind::RECORD_DECL),
        kind if kind == SyntaxKind::IDENT || kind.is_predefined_type() => {
            parse_type(p);
            if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::L_PAREN {
                p.start_node_at(checkpoint, SyntaxKind::METHOD_DECL);
                p.bump();
                parse_param_list(p);
                if p.at(SyntaxKind::L_BRACE) {
                    parse_block(p);
                } else {
                    p.expect(SyntaxKind::SEMICOLON);
                }
            } else {
                p.start_node_at(checkpoint, SyntaxKind::FIELD_DECL);
                parse_declarators(p);
                p.expect(SyntaxKind::SEMICOLON);
            }
            p.finish_node();
        }
        _ => {
            // Modifiers with nothing after them
            p.start_node_at(checkpoint, SyntaxKind::INCOMPLETE_MEMBER);
            p.missing(SyntaxKind::IDENT, ErrorCode::E0302);
            p.finish_node();
        }
    }
}

fn is_record_start<P: ItemParser>(p: &mut P) -> bool {
    p.records_enabled() && p.current_text() == "record" && p.nth(1) == SyntaxKind::IDENT
}

/// TypeDecl = Modifier* keyword Ident BaseList? '{' Member* '}'
fn parse_type_decl<P: ItemParser>(p: &mut P, checkpoint: Checkpoint, kind: SyntaxKind) {
    p.start_node_at(checkpoint, kind);
    p.bump();
    p.expect(SyntaxKind::IDENT);
    if p.at(SyntaxKind::COLON) {
        p.start_node(SyntaxKind::BASE_LIST);
        p.bump();
        parse_type(p);
        while p.eat(SyntaxKind::COMMA) {
            parse_type(p);
        }
        p.finish_node();
    }
    parse_member_body(p, ParseContext::TypeBody);
    p.finish_node();
}

/// '{' Member* '}'
fn parse_member_body<P: ItemParser>(p: &mut P, context: ParseContext) {
    p.expect(SyntaxKind::L_BRACE);
    p.push_context(context);
    parse_members(p, Some(SyntaxKind::R_BRACE));
    p.pop_context();
    p.expect(SyntaxKind::R_BRACE);
}

/// ParamList = '(' (Param (',' Param)*)? ')'
fn parse_param_list<P: ItemParser>(p: &mut P) {
    p.start_node(SyntaxKind::PARAM_LIST);
    p.expect(SyntaxKind::L_PAREN);
    let kind = p.current_kind();
    if ParseContext::ParameterList.can_start_element(kind) {
        loop {
            p.start_node(SyntaxKind::PARAM);
            parse_type(p);
            p.expect(SyntaxKind::IDENT);
            p.finish_node();
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}
