//! Statement parsing
//!
//! `parse_statement` first offers the blender a chance to hand back an old
//! statement node unchanged; only when that fails does it parse.

use super::expressions::{ExpressionParser, parse_expression, parse_type, skip_type};
use crate::parser::errors::{ParseContext, is_expression_start, is_statement_start};
use crate::parser::syntax_kind::SyntaxKind;

/// Statement-level operations on top of [`ExpressionParser`]
pub trait StatementParser: ExpressionParser {
    /// Splice in an old node of one of `kinds` starting here, if reusable
    fn try_reuse(&mut self, kinds: &[SyntaxKind]) -> bool;

    fn push_context(&mut self, context: ParseContext);
    fn pop_context(&mut self);

    /// Skip tokens no open list can use into a SKIPPED_TOKENS node.
    /// Returns false when the current token already belongs to some list.
    fn skip_to_recovery(&mut self) -> bool;
}

/// Node kinds a statement can be reused as
pub const STATEMENT_KINDS: &[SyntaxKind] = &[
    SyntaxKind::BLOCK,
    SyntaxKind::EMPTY_STMT,
    SyntaxKind::LOCAL_DECL_STMT,
    SyntaxKind::EXPR_STMT,
    SyntaxKind::IF_STMT,
    SyntaxKind::WHILE_STMT,
    SyntaxKind::RETURN_STMT,
    SyntaxKind::BREAK_STMT,
    SyntaxKind::CONTINUE_STMT,
];

pub fn parse_statement<P: StatementParser>(p: &mut P) {
    if p.try_reuse(STATEMENT_KINDS) {
        return;
    }

    match p.current_kind() {
        SyntaxKind::L_BRACE => parse_block_body(p),
        SyntaxKind::SEMICOLON => {
            p.start_node(SyntaxKind::EMPTY_STMT);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::IF_KW => parse_if(p),
        SyntaxKind::WHILE_KW => parse_while(p),
        SyntaxKind::RETURN_KW => {
            p.start_node(SyntaxKind::RETURN_STMT);
            p.bump();
            let kind = p.current_kind();
            if is_expression_start(kind) {
                parse_expression(p);
            }
            p.expect(SyntaxKind::SEMICOLON);
            p.finish_node();
        }
        SyntaxKind::BREAK_KW => parse_jump(p, SyntaxKind::BREAK_STMT),
        SyntaxKind::CONTINUE_KW => parse_jump(p, SyntaxKind::CONTINUE_STMT),
        kind if kind.is_predefined_type() => parse_local_decl(p),
        SyntaxKind::IDENT if is_local_declaration(p) => parse_local_decl(p),
        _ => {
            p.start_node(SyntaxKind::EXPR_STMT);
            parse_expression(p);
            p.expect(SyntaxKind::SEMICOLON);
            p.finish_node();
        }
    }
}

/// Block at the current position, reusing an old one when possible
pub fn parse_block<P: StatementParser>(p: &mut P) {
    if p.try_reuse(&[SyntaxKind::BLOCK]) {
        return;
    }
    parse_block_body(p);
}

/// Block = '{' Statement* '}'
fn parse_block_body<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::BLOCK);
    p.expect(SyntaxKind::L_BRACE);
    p.push_context(ParseContext::Block);
    loop {
        let kind = p.current_kind();
        if kind == SyntaxKind::R_BRACE || kind == SyntaxKind::EOF {
            break;
        }
        if is_statement_start(kind) {
            parse_statement(p);
        } else if !p.skip_to_recovery() {
            break;
        }
    }
    p.pop_context();
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

/// IfStmt = 'if' '(' Expr ')' Statement ('else' Statement)?
fn parse_if<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::IF_STMT);
    p.bump();
    parse_condition(p);
    parse_embedded_statement(p);
    if p.at(SyntaxKind::ELSE_KW) {
        p.start_node(SyntaxKind::ELSE_CLAUSE);
        p.bump();
        parse_embedded_statement(p);
        p.finish_node();
    }
    p.finish_node();
}

/// WhileStmt = 'while' '(' Expr ')' Statement
fn parse_while<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::WHILE_STMT);
    p.bump();
    parse_condition(p);
    parse_embedded_statement(p);
    p.finish_node();
}

fn parse_condition<P: StatementParser>(p: &mut P) {
    p.expect(SyntaxKind::L_PAREN);
    parse_expression(p);
    p.expect(SyntaxKind::R_PAREN);
}

fn parse_embedded_statement<P: StatementParser>(p: &mut P) {
    let kind = p.current_kind();
    if is_statement_start(kind) {
        parse_statement(p);
    } else {
        // `if (x) }` - the body is missing entirely
        p.start_node(SyntaxKind::EXPR_STMT);
        parse_expression(p);
        p.expect(SyntaxKind::SEMICOLON);
        p.finish_node();
    }
}

fn parse_jump<P: StatementParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// LocalDeclStmt = Type VariableDeclarator (',' VariableDeclarator)* ';'
fn parse_local_decl<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::LOCAL_DECL_STMT);
    parse_type(p);
    parse_declarators(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// VariableDeclarator (',' VariableDeclarator)*
pub fn parse_declarators<P: ExpressionParser>(p: &mut P) {
    parse_variable_declarator(p);
    while p.eat(SyntaxKind::COMMA) {
        parse_variable_declarator(p);
    }
}

/// VariableDeclarator = Ident ('=' Expr)?
fn parse_variable_declarator<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::VARIABLE_DECLARATOR);
    p.expect(SyntaxKind::IDENT);
    if p.eat(SyntaxKind::EQ) {
        parse_expression(p);
    }
    p.finish_node();
}

/// `Foo.Bar[] x` declares a local; `Foo.Bar(x)` and `a = b` do not
fn is_local_declaration<P: ExpressionParser>(p: &mut P) -> bool {
    let start = p.begin_speculation();
    let is_decl = skip_type(p) && p.at(SyntaxKind::IDENT);
    p.end_speculation(start);
    is_decl
}
