//! Expression and type parsing
//!
//! Expressions use precedence climbing over this chain (loosest first):
//!
//! ```text
//! Assignment (= += -= *= /=, right associative)
//!     → || → && → == != → < > <= >= → + - → * / %
//!     → Prefix (! - + ++ --) → Postfix (call, member access, index, ++ --)
//!     → Primary
//! ```

use crate::parser::errors::ErrorCode;
use crate::parser::syntax_kind::SyntaxKind;
use crate::syntax::Checkpoint;

/// Trait for expression parsing operations
///
/// This trait defines the interface between the grammar functions and the
/// main parser, which implements it on top of the blender's slot buffer.
/// Inspection takes `&mut self` because lookahead fills the buffer lazily.
pub trait ExpressionParser {
    // Token inspection
    fn current_kind(&mut self) -> SyntaxKind;
    fn current_text(&mut self) -> String;

    /// Peek at the kind of the nth token ahead
    fn nth(&mut self, n: usize) -> SyntaxKind;

    fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&mut self, kinds: &[SyntaxKind]) -> bool {
        let current = self.current_kind();
        kinds.contains(&current)
    }

    // Token consumption
    fn bump(&mut self);
    fn expect(&mut self, kind: SyntaxKind) -> bool;

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Insert a zero-width token of `kind` carrying `code`
    fn missing(&mut self, kind: SyntaxKind, code: ErrorCode);

    // Speculation
    /// Start looking ahead without building; returns the position to rewind to
    fn begin_speculation(&mut self) -> usize;
    fn end_speculation(&mut self, pos: usize);
    /// Step over the current token while speculating
    fn skip(&mut self);

    // Node building
    fn start_node(&mut self, kind: SyntaxKind);
    fn finish_node(&mut self);
    fn checkpoint(&self) -> Checkpoint;
    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind);
}

pub const ASSIGNMENT_OPS: &[SyntaxKind] = &[
    SyntaxKind::EQ,
    SyntaxKind::PLUS_EQ,
    SyntaxKind::MINUS_EQ,
    SyntaxKind::STAR_EQ,
    SyntaxKind::SLASH_EQ,
];

pub const PREFIX_OPS: &[SyntaxKind] = &[
    SyntaxKind::BANG,
    SyntaxKind::MINUS,
    SyntaxKind::PLUS,
    SyntaxKind::PLUS_PLUS,
    SyntaxKind::MINUS_MINUS,
];

/// Binding power of a binary operator; higher binds tighter
pub fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    use SyntaxKind::*;
    let prec = match kind {
        PIPE_PIPE => 1,
        AMP_AMP => 2,
        EQ_EQ | BANG_EQ => 3,
        LT | GT | LT_EQ | GT_EQ => 4,
        PLUS | MINUS => 5,
        STAR | SLASH | PERCENT => 6,
        _ => return None,
    };
    Some(prec)
}

/// Expr = Assignment
pub fn parse_expression<P: ExpressionParser>(p: &mut P) {
    parse_assignment(p);
}

fn parse_assignment<P: ExpressionParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_binary(p, 1);
    if p.at_any(ASSIGNMENT_OPS) {
        p.start_node_at(checkpoint, SyntaxKind::ASSIGN_EXPR);
        p.bump();
        parse_assignment(p);
        p.finish_node();
    }
}

fn parse_binary<P: ExpressionParser>(p: &mut P, min_prec: u8) {
    let checkpoint = p.checkpoint();
    parse_prefix(p);
    loop {
        let kind = p.current_kind();
        let Some(prec) = binary_precedence(kind) else {
            break;
        };
        if prec < min_prec {
            break;
        }
        p.start_node_at(checkpoint, SyntaxKind::BINARY_EXPR);
        p.bump();
        parse_binary(p, prec + 1);
        p.finish_node();
    }
}

fn parse_prefix<P: ExpressionParser>(p: &mut P) {
    if p.at_any(PREFIX_OPS) {
        p.start_node(SyntaxKind::PREFIX_EXPR);
        p.bump();
        parse_prefix(p);
        p.finish_node();
    } else {
        parse_postfix(p);
    }
}

fn parse_postfix<P: ExpressionParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_primary(p);
    loop {
        match p.current_kind() {
            SyntaxKind::L_PAREN => {
                p.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                parse_arg_list(p);
                p.finish_node();
            }
            SyntaxKind::DOT => {
                p.start_node_at(checkpoint, SyntaxKind::MEMBER_ACCESS_EXPR);
                p.bump();
                p.expect(SyntaxKind::IDENT);
                p.finish_node();
            }
            SyntaxKind::L_BRACKET => {
                p.start_node_at(checkpoint, SyntaxKind::INDEX_EXPR);
                p.bump();
                parse_expression(p);
                p.expect(SyntaxKind::R_BRACKET);
                p.finish_node();
            }
            SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => {
                p.start_node_at(checkpoint, SyntaxKind::POSTFIX_EXPR);
                p.bump();
                p.finish_node();
            }
            _ => break,
        }
    }
}

/// Primary = Literal | Ident | 'this' | '(' Expr ')' | 'new' Type ArgList
fn parse_primary<P: ExpressionParser>(p: &mut P) {
    let kind = p.current_kind();
    match kind {
        _ if kind.is_literal() || matches!(kind, SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW | SyntaxKind::NULL_KW) => {
            p.start_node(SyntaxKind::LITERAL_EXPR);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::IDENT => {
            p.start_node(SyntaxKind::NAME_EXPR);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::THIS_KW => {
            p.start_node(SyntaxKind::THIS_EXPR);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::L_PAREN => {
            p.start_node(SyntaxKind::PAREN_EXPR);
            p.bump();
            parse_expression(p);
            p.expect(SyntaxKind::R_PAREN);
            p.finish_node();
        }
        SyntaxKind::NEW_KW => {
            p.start_node(SyntaxKind::OBJECT_CREATION_EXPR);
            p.bump();
            parse_type(p);
            parse_arg_list(p);
            p.finish_node();
        }
        _ => {
            p.start_node(SyntaxKind::NAME_EXPR);
            p.missing(SyntaxKind::IDENT, ErrorCode::E0401);
            p.finish_node();
        }
    }
}

/// ArgList = '(' (Expr (',' Expr)*)? ')'
pub fn parse_arg_list<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::ARG_LIST);
    p.expect(SyntaxKind::L_PAREN);
    if !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        loop {
            parse_expression(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

// =============================================================================
// Types and names
// =============================================================================

/// Type = (PredefinedType | Name) ('[' ']')*
pub fn parse_type<P: ExpressionParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    let kind = p.current_kind();
    if kind.is_predefined_type() {
        p.start_node(SyntaxKind::PREDEFINED_TYPE);
        p.bump();
        p.finish_node();
    } else if kind == SyntaxKind::IDENT {
        parse_name(p);
    } else {
        p.start_node(SyntaxKind::NAME);
        p.missing(SyntaxKind::IDENT, ErrorCode::E0302);
        p.finish_node();
        return;
    }

    while p.at(SyntaxKind::L_BRACKET) && p.nth(1) == SyntaxKind::R_BRACKET {
        p.start_node_at(checkpoint, SyntaxKind::ARRAY_TYPE);
        p.bump();
        p.bump();
        p.finish_node();
    }
}

/// Name = Ident ('.' Ident)*
pub fn parse_name<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::NAME);
    p.expect(SyntaxKind::IDENT);
    while p.at(SyntaxKind::DOT) && p.nth(1) == SyntaxKind::IDENT {
        p.bump();
        p.bump();
    }
    p.finish_node();
}

/// Step over a type while speculating; false if no type starts here
pub fn skip_type<P: ExpressionParser>(p: &mut P) -> bool {
    let kind = p.current_kind();
    if kind.is_predefined_type() {
        p.skip();
    } else if kind == SyntaxKind::IDENT {
        p.skip();
        while p.at(SyntaxKind::DOT) && p.nth(1) == SyntaxKind::IDENT {
            p.skip();
            p.skip();
        }
    } else {
        return false;
    }
    while p.at(SyntaxKind::L_BRACKET) && p.nth(1) == SyntaxKind::R_BRACKET {
        p.skip();
        p.skip();
    }
    true
}
