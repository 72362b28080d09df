//! Typed AST wrappers over the untyped red tree.
//!
//! This module provides strongly-typed accessors for syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Accessors return `None` for parts that are absent or missing after error
//! recovery.

use super::syntax_kind::SyntaxKind;
use crate::syntax::{SyntaxElement, SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

/// Trait for AST tokens that wrap a SyntaxToken
pub trait AstToken: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(token: SyntaxToken) -> Option<Self>;
    fn syntax(&self) -> &SyntaxToken;
    fn text(&self) -> &str {
        self.syntax().text()
    }
}

// ============================================================================
// Helper macros and functions
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $($kind:ident)|+) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// Direct child tokens of a node, skipping missing ones
fn child_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .filter(|t| !t.is_missing())
}

fn child_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    child_tokens(node).find(|t| t.kind() == kind)
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn children<'a, N: AstNode + 'a>(node: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
    node.children().filter_map(N::cast)
}

fn modifiers(node: &SyntaxNode) -> Vec<SyntaxKind> {
    child_tokens(node).map(|t| t.kind()).filter(|k| k.is_modifier()).collect()
}

// ============================================================================
// Root
// ============================================================================

ast_node!(CompilationUnit, COMPILATION_UNIT);

impl CompilationUnit {
    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        children(&self.0)
    }
}

// ============================================================================
// Members
// ============================================================================

/// Any member of a compilation unit, namespace or type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Using(UsingDirective),
    Namespace(NamespaceDecl),
    Type(TypeDecl),
    Method(MethodDecl),
    Field(FieldDecl),
    Incomplete(IncompleteMember),
}

impl AstNode for Member {
    fn can_cast(kind: SyntaxKind) -> bool {
        UsingDirective::can_cast(kind)
            || NamespaceDecl::can_cast(kind)
            || TypeDecl::can_cast(kind)
            || MethodDecl::can_cast(kind)
            || FieldDecl::can_cast(kind)
            || IncompleteMember::can_cast(kind)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::USING_DIRECTIVE => Some(Self::Using(UsingDirective(node))),
            SyntaxKind::NAMESPACE_DECL => Some(Self::Namespace(NamespaceDecl(node))),
            SyntaxKind::METHOD_DECL => Some(Self::Method(MethodDecl(node))),
            SyntaxKind::FIELD_DECL => Some(Self::Field(FieldDecl(node))),
            SyntaxKind::INCOMPLETE_MEMBER => Some(Self::Incomplete(IncompleteMember(node))),
            _ => TypeDecl::cast(node).map(Self::Type),
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Using(n) => n.syntax(),
            Self::Namespace(n) => n.syntax(),
            Self::Type(n) => n.syntax(),
            Self::Method(n) => n.syntax(),
            Self::Field(n) => n.syntax(),
            Self::Incomplete(n) => n.syntax(),
        }
    }
}

ast_node!(UsingDirective, USING_DIRECTIVE);

impl UsingDirective {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

ast_node!(NamespaceDecl, NAMESPACE_DECL);

impl NamespaceDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        children(&self.0)
    }
}

/// Which keyword introduced a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Struct,
    Interface,
    Record,
}

ast_node!(TypeDecl, CLASS_DECL | STRUCT_DECL | INTERFACE_DECL | RECORD_DECL);

impl TypeDecl {
    pub fn decl_kind(&self) -> TypeDeclKind {
        match self.0.kind() {
            SyntaxKind::STRUCT_DECL => TypeDeclKind::Struct,
            SyntaxKind::INTERFACE_DECL => TypeDeclKind::Interface,
            SyntaxKind::RECORD_DECL => TypeDeclKind::Record,
            _ => TypeDeclKind::Class,
        }
    }

    pub fn modifiers(&self) -> Vec<SyntaxKind> {
        modifiers(&self.0)
    }

    /// The declared name (for records, the identifier after `record`)
    pub fn name(&self) -> Option<SyntaxToken> {
        let skip = usize::from(self.decl_kind() == TypeDeclKind::Record);
        child_tokens(&self.0).filter(|t| t.kind() == SyntaxKind::IDENT).nth(skip)
    }

    pub fn base_list(&self) -> Option<BaseList> {
        child(&self.0)
    }

    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        children(&self.0)
    }
}

ast_node!(BaseList, BASE_LIST);

impl BaseList {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        children(&self.0)
    }
}

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    pub fn modifiers(&self) -> Vec<SyntaxKind> {
        modifiers(&self.0)
    }

    pub fn return_type(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    pub fn modifiers(&self) -> Vec<SyntaxKind> {
        modifiers(&self.0)
    }

    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + '_ {
        children(&self.0)
    }
}

ast_node!(IncompleteMember, INCOMPLETE_MEMBER);

impl IncompleteMember {
    pub fn modifiers(&self) -> Vec<SyntaxKind> {
        modifiers(&self.0)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        children(&self.0)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(VariableDeclarator, VARIABLE_DECLARATOR);

impl VariableDeclarator {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn initializer(&self) -> Option<Expr> {
        child(&self.0)
    }
}

// ============================================================================
// Types
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn segments(&self) -> Vec<String> {
        child_tokens(&self.0)
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .map(|t| t.text().to_string())
            .collect()
    }

    /// Dotted name without trivia, e.g. `System.Collections`
    pub fn qualified(&self) -> String {
        self.segments().join(".")
    }
}

ast_node!(Type, NAME | PREDEFINED_TYPE | ARRAY_TYPE);

impl Type {
    pub fn is_array(&self) -> bool {
        self.0.kind() == SyntaxKind::ARRAY_TYPE
    }

    /// Element type of an array type
    pub fn element_type(&self) -> Option<Type> {
        if self.is_array() { child(&self.0) } else { None }
    }

    pub fn name(&self) -> Option<Name> {
        Name::cast(self.0.clone())
    }

    /// Keyword of a predefined type (`int`, `void`, ...)
    pub fn predefined(&self) -> Option<SyntaxKind> {
        if self.0.kind() != SyntaxKind::PREDEFINED_TYPE {
            return None;
        }
        child_tokens(&self.0).map(|t| t.kind()).next()
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        children(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    Empty(EmptyStmt),
    LocalDecl(LocalDeclStmt),
    Expr(ExprStmt),
    If(IfStmt),
    While(WhileStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
}

impl AstNode for Stmt {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::BLOCK
                | SyntaxKind::EMPTY_STMT
                | SyntaxKind::LOCAL_DECL_STMT
                | SyntaxKind::EXPR_STMT
                | SyntaxKind::IF_STMT
                | SyntaxKind::WHILE_STMT
                | SyntaxKind::RETURN_STMT
                | SyntaxKind::BREAK_STMT
                | SyntaxKind::CONTINUE_STMT
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::BLOCK => Some(Self::Block(Block(node))),
            SyntaxKind::EMPTY_STMT => Some(Self::Empty(EmptyStmt(node))),
            SyntaxKind::LOCAL_DECL_STMT => Some(Self::LocalDecl(LocalDeclStmt(node))),
            SyntaxKind::EXPR_STMT => Some(Self::Expr(ExprStmt(node))),
            SyntaxKind::IF_STMT => Some(Self::If(IfStmt(node))),
            SyntaxKind::WHILE_STMT => Some(Self::While(WhileStmt(node))),
            SyntaxKind::RETURN_STMT => Some(Self::Return(ReturnStmt(node))),
            SyntaxKind::BREAK_STMT => Some(Self::Break(BreakStmt(node))),
            SyntaxKind::CONTINUE_STMT => Some(Self::Continue(ContinueStmt(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Block(n) => n.syntax(),
            Self::Empty(n) => n.syntax(),
            Self::LocalDecl(n) => n.syntax(),
            Self::Expr(n) => n.syntax(),
            Self::If(n) => n.syntax(),
            Self::While(n) => n.syntax(),
            Self::Return(n) => n.syntax(),
            Self::Break(n) => n.syntax(),
            Self::Continue(n) => n.syntax(),
        }
    }
}

ast_node!(EmptyStmt, EMPTY_STMT);
ast_node!(BreakStmt, BREAK_STMT);
ast_node!(ContinueStmt, CONTINUE_STMT);

ast_node!(LocalDeclStmt, LOCAL_DECL_STMT);

impl LocalDeclStmt {
    pub fn ty(&self) -> Option<Type> {
        child(&self.0)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + '_ {
        children(&self.0)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        child(&self.0)
    }

    pub fn else_branch(&self) -> Option<Stmt> {
        let clause = self.0.children().find(|n| n.kind() == SyntaxKind::ELSE_CLAUSE)?;
        child(&clause)
    }
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Stmt> {
        child(&self.0)
    }
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        child(&self.0)
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(
    Expr,
    LITERAL_EXPR
        | NAME_EXPR
        | THIS_EXPR
        | PAREN_EXPR
        | PREFIX_EXPR
        | POSTFIX_EXPR
        | BINARY_EXPR
        | ASSIGN_EXPR
        | CALL_EXPR
        | MEMBER_ACCESS_EXPR
        | INDEX_EXPR
        | OBJECT_CREATION_EXPR
);

impl Expr {
    pub fn kind(&self) -> SyntaxKind {
        self.0.kind()
    }

    /// Operand expressions in source order
    pub fn operands(&self) -> impl Iterator<Item = Expr> + '_ {
        children(&self.0)
    }

    /// Operator token of prefix, postfix, binary and assignment expressions
    pub fn operator(&self) -> Option<SyntaxKind> {
        match self.0.kind() {
            SyntaxKind::PREFIX_EXPR
            | SyntaxKind::POSTFIX_EXPR
            | SyntaxKind::BINARY_EXPR
            | SyntaxKind::ASSIGN_EXPR => child_tokens(&self.0).map(|t| t.kind()).find(|k| k.is_punct()),
            _ => None,
        }
    }

    pub fn lhs(&self) -> Option<Expr> {
        self.operands().next()
    }

    pub fn rhs(&self) -> Option<Expr> {
        match self.0.kind() {
            SyntaxKind::BINARY_EXPR | SyntaxKind::ASSIGN_EXPR => self.operands().nth(1),
            _ => None,
        }
    }

    /// Identifier of a name expression, or the member of a member access
    pub fn name(&self) -> Option<SyntaxToken> {
        match self.0.kind() {
            SyntaxKind::NAME_EXPR | SyntaxKind::MEMBER_ACCESS_EXPR => {
                child_token(&self.0, SyntaxKind::IDENT)
            }
            _ => None,
        }
    }

    /// Literal token of a literal expression
    pub fn literal(&self) -> Option<SyntaxToken> {
        if self.0.kind() == SyntaxKind::LITERAL_EXPR {
            child_tokens(&self.0).next()
        } else {
            None
        }
    }

    /// Arguments of a call or object creation
    pub fn args(&self) -> Vec<Expr> {
        child::<ArgList>(&self.0)
            .map(|list| list.args().collect())
            .unwrap_or_default()
    }

    /// Created type of an object creation expression
    pub fn created_type(&self) -> Option<Type> {
        if self.0.kind() == SyntaxKind::OBJECT_CREATION_EXPR {
            child(&self.0)
        } else {
            None
        }
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        children(&self.0)
    }
}
