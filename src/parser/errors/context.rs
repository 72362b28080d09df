//! Parse context tracking for error recovery
//!
//! The parser keeps a stack of list contexts. When it meets a token it cannot
//! use, it skips tokens until one that some enclosing context can make use of,
//! so that a stray token inside a method body doesn't swallow the rest of the
//! class.

use crate::parser::SyntaxKind;

/// A list production the parser is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    /// Members of a compilation unit
    CompilationUnit,
    /// Members inside `namespace N { ... }`
    NamespaceBody,
    /// Members inside a class, struct, interface or record
    TypeBody,
    /// Statements inside a block
    Block,
    /// Parameters inside `( ... )`
    ParameterList,
    /// Arguments inside `( ... )`
    ArgumentList,
}

impl ParseContext {
    /// Get a human-readable description of this context
    pub fn description(&self) -> &'static str {
        match self {
            Self::CompilationUnit => "at top level",
            Self::NamespaceBody => "in namespace body",
            Self::TypeBody => "in type body",
            Self::Block => "in block",
            Self::ParameterList => "in parameter list",
            Self::ArgumentList => "in argument list",
        }
    }

    /// The token that closes this list
    pub fn closing_token(&self) -> Option<SyntaxKind> {
        match self {
            Self::CompilationUnit => None,
            Self::NamespaceBody | Self::TypeBody | Self::Block => Some(SyntaxKind::R_BRACE),
            Self::ParameterList | Self::ArgumentList => Some(SyntaxKind::R_PAREN),
        }
    }

    /// Whether `kind` can start an element of this list
    pub fn can_start_element(&self, kind: SyntaxKind) -> bool {
        use SyntaxKind::*;
        match self {
            Self::CompilationUnit | Self::NamespaceBody | Self::TypeBody => {
                is_member_start(kind)
            }
            Self::Block => is_statement_start(kind),
            Self::ParameterList => kind == IDENT || kind.is_predefined_type(),
            Self::ArgumentList => is_expression_start(kind),
        }
    }

    /// Whether recovery in this context should stop before `kind`
    pub fn is_recovery_point(&self, kind: SyntaxKind) -> bool {
        kind == SyntaxKind::EOF
            || self.closing_token() == Some(kind)
            || self.can_start_element(kind)
    }
}

/// Tokens that can start a member declaration
pub fn is_member_start(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    kind.is_modifier()
        || kind.is_predefined_type()
        || matches!(
            kind,
            IDENT | USING_KW | NAMESPACE_KW | CLASS_KW | STRUCT_KW | INTERFACE_KW
        )
}

/// Tokens that can start a statement
pub fn is_statement_start(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        L_BRACE | SEMICOLON | IF_KW | WHILE_KW | RETURN_KW | BREAK_KW | CONTINUE_KW
    ) || kind.is_predefined_type()
        || is_expression_start(kind)
}

/// Tokens that can start an expression
pub fn is_expression_start(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    kind.is_literal()
        || matches!(
            kind,
            IDENT
                | THIS_KW
                | TRUE_KW
                | FALSE_KW
                | NULL_KW
                | NEW_KW
                | L_PAREN
                | BANG
                | MINUS
                | PLUS
                | PLUS_PLUS
                | MINUS_MINUS
        )
}
