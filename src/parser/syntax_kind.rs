//! Syntax kinds for the green/red syntax tree
//!
//! This enum defines all possible node, token and trivia kinds in the tree.
//! It follows the grammar structure of the C#-like surface language.

/// All syntax kinds (trivia, tokens and nodes)
///
/// Trivia are attached to tokens and never appear as tree children.
/// Tokens are leaf elements (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (preserved, attached to the neighbouring token)
    // =========================================================================
    WHITESPACE = 0,
    END_OF_LINE,
    SINGLE_LINE_COMMENT,
    MULTI_LINE_COMMENT,
    DISABLED_TEXT, // lines skipped by an inactive #if branch

    // Preprocessor directives (one trivia per directive line)
    IF_DIRECTIVE,
    ELIF_DIRECTIVE,
    ELSE_DIRECTIVE,
    ENDIF_DIRECTIVE,
    REGION_DIRECTIVE,
    ENDREGION_DIRECTIVE,
    DEFINE_DIRECTIVE,
    UNDEF_DIRECTIVE,
    ERROR_DIRECTIVE,
    WARNING_DIRECTIVE,
    BAD_DIRECTIVE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,                   // identifier, also contextual keywords
    INT_LITERAL,             // 42
    REAL_LITERAL,            // 3.14
    STRING_LITERAL,          // "hello"
    VERBATIM_STRING_LITERAL, // @"c:\dir"
    INTERPOLATED_STRING,     // $"x = {x}"
    CHAR_LITERAL,            // 'c'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_PAREN,     // (
    R_PAREN,     // )
    L_BRACKET,   // [
    R_BRACKET,   // ]
    SEMICOLON,   // ;
    COMMA,       // ,
    DOT,         // .
    COLON,       // :
    QUESTION,    // ?
    EQ,          // =
    EQ_EQ,       // ==
    BANG,        // !
    BANG_EQ,     // !=
    LT,          // <
    LT_EQ,       // <=
    GT,          // >
    GT_EQ,       // >=
    PLUS,        // +
    PLUS_EQ,     // +=
    PLUS_PLUS,   // ++
    MINUS,       // -
    MINUS_EQ,    // -=
    MINUS_MINUS, // --
    STAR,        // *
    STAR_EQ,     // *=
    SLASH,       // /
    SLASH_EQ,    // /=
    PERCENT,     // %
    AMP_AMP,     // &&
    PIPE_PIPE,   // ||

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    // Declarations
    CLASS_KW,
    STRUCT_KW,
    INTERFACE_KW,
    NAMESPACE_KW,
    USING_KW,

    // Modifiers
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    STATIC_KW,
    ABSTRACT_KW,
    SEALED_KW,
    READONLY_KW,
    CONST_KW,

    // Predefined types
    VOID_KW,
    INT_KW,
    BOOL_KW,
    STRING_KW,
    OBJECT_KW,
    DOUBLE_KW,
    CHAR_KW,

    // Statements
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    RETURN_KW,
    BREAK_KW,
    CONTINUE_KW,

    // Expressions
    NEW_KW,
    THIS_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,

    // =========================================================================
    // SPECIAL TOKENS
    // =========================================================================
    BAD_TOKEN,
    EOF,

    // =========================================================================
    // NODES
    // =========================================================================
    COMPILATION_UNIT,
    FRAGMENT, // root of a tree parsed from a non-file entry point

    // Members
    USING_DIRECTIVE,
    NAMESPACE_DECL,
    CLASS_DECL,
    STRUCT_DECL,
    INTERFACE_DECL,
    RECORD_DECL,
    BASE_LIST,
    METHOD_DECL,
    FIELD_DECL,
    INCOMPLETE_MEMBER,
    PARAM_LIST,
    PARAM,
    VARIABLE_DECLARATOR,

    // Types
    NAME,
    PREDEFINED_TYPE,
    ARRAY_TYPE,

    // Statements
    BLOCK,
    EMPTY_STMT,
    LOCAL_DECL_STMT,
    EXPR_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    WHILE_STMT,
    RETURN_STMT,
    BREAK_STMT,
    CONTINUE_STMT,

    // Expressions
    LITERAL_EXPR,
    NAME_EXPR,
    THIS_EXPR,
    PAREN_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    BINARY_EXPR,
    ASSIGN_EXPR,
    CALL_EXPR,
    ARG_LIST,
    MEMBER_ACCESS_EXPR,
    INDEX_EXPR,
    OBJECT_CREATION_EXPR,

    // Error recovery
    SKIPPED_TOKENS,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia kind (whitespace, comment, directive, disabled text)
    pub fn is_trivia(self) -> bool {
        (self as u16) <= (Self::BAD_DIRECTIVE as u16)
    }

    /// Check if this is a preprocessor directive trivia
    pub fn is_directive(self) -> bool {
        (self as u16) >= (Self::IF_DIRECTIVE as u16) && (self as u16) <= (Self::BAD_DIRECTIVE as u16)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::CLASS_KW as u16) && (self as u16) <= (Self::NULL_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::PIPE_PIPE as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        (self as u16) >= (Self::INT_LITERAL as u16) && (self as u16) <= (Self::CHAR_LITERAL as u16)
    }

    /// Check if this kind is a token (not trivia, not a node)
    pub fn is_token(self) -> bool {
        (self as u16) >= (Self::IDENT as u16) && (self as u16) <= (Self::EOF as u16)
    }

    /// Check if this kind is a composite node
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::COMPILATION_UNIT as u16) && (self as u16) < (Self::__LAST as u16)
    }

    pub fn is_modifier(self) -> bool {
        (self as u16) >= (Self::PUBLIC_KW as u16) && (self as u16) <= (Self::CONST_KW as u16)
    }

    pub fn is_predefined_type(self) -> bool {
        (self as u16) >= (Self::VOID_KW as u16) && (self as u16) <= (Self::CHAR_KW as u16)
    }

    /// Reserved keyword spelled by `text`; contextual keywords stay identifiers
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        let kind = match text {
            "class" => CLASS_KW,
            "struct" => STRUCT_KW,
            "interface" => INTERFACE_KW,
            "namespace" => NAMESPACE_KW,
            "using" => USING_KW,
            "public" => PUBLIC_KW,
            "private" => PRIVATE_KW,
            "protected" => PROTECTED_KW,
            "internal" => INTERNAL_KW,
            "static" => STATIC_KW,
            "abstract" => ABSTRACT_KW,
            "sealed" => SEALED_KW,
            "readonly" => READONLY_KW,
            "const" => CONST_KW,
            "void" => VOID_KW,
            "int" => INT_KW,
            "bool" => BOOL_KW,
            "string" => STRING_KW,
            "object" => OBJECT_KW,
            "double" => DOUBLE_KW,
            "char" => CHAR_KW,
            "if" => IF_KW,
            "else" => ELSE_KW,
            "while" => WHILE_KW,
            "return" => RETURN_KW,
            "break" => BREAK_KW,
            "continue" => CONTINUE_KW,
            "new" => NEW_KW,
            "this" => THIS_KW,
            "true" => TRUE_KW,
            "false" => FALSE_KW,
            "null" => NULL_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// The canonical text of tokens whose text never varies
    pub fn fixed_text(self) -> Option<&'static str> {
        use SyntaxKind::*;
        let text = match self {
            L_BRACE => "{",
            R_BRACE => "}",
            L_PAREN => "(",
            R_PAREN => ")",
            L_BRACKET => "[",
            R_BRACKET => "]",
            SEMICOLON => ";",
            COMMA => ",",
            DOT => ".",
            COLON => ":",
            QUESTION => "?",
            EQ => "=",
            EQ_EQ => "==",
            BANG => "!",
            BANG_EQ => "!=",
            LT => "<",
            LT_EQ => "<=",
            GT => ">",
            GT_EQ => ">=",
            PLUS => "+",
            PLUS_EQ => "+=",
            PLUS_PLUS => "++",
            MINUS => "-",
            MINUS_EQ => "-=",
            MINUS_MINUS => "--",
            STAR => "*",
            STAR_EQ => "*=",
            SLASH => "/",
            SLASH_EQ => "/=",
            PERCENT => "%",
            AMP_AMP => "&&",
            PIPE_PIPE => "||",
            CLASS_KW => "class",
            STRUCT_KW => "struct",
            INTERFACE_KW => "interface",
            NAMESPACE_KW => "namespace",
            USING_KW => "using",
            PUBLIC_KW => "public",
            PRIVATE_KW => "private",
            PROTECTED_KW => "protected",
            INTERNAL_KW => "internal",
            STATIC_KW => "static",
            ABSTRACT_KW => "abstract",
            SEALED_KW => "sealed",
            READONLY_KW => "readonly",
            CONST_KW => "const",
            VOID_KW => "void",
            INT_KW => "int",
            BOOL_KW => "bool",
            STRING_KW => "string",
            OBJECT_KW => "object",
            DOUBLE_KW => "double",
            CHAR_KW => "char",
            IF_KW => "if",
            ELSE_KW => "else",
            WHILE_KW => "while",
            RETURN_KW => "return",
            BREAK_KW => "break",
            CONTINUE_KW => "continue",
            NEW_KW => "new",
            THIS_KW => "this",
            TRUE_KW => "true",
            FALSE_KW => "false",
            NULL_KW => "null",
            EOF => "",
            _ => return None,
        };
        Some(text)
    }
}

/// Human-readable name of a kind for diagnostics (`';'`, `identifier`, ...)
pub fn kind_to_name(kind: SyntaxKind) -> String {
    use SyntaxKind::*;
    match kind {
        IDENT => "identifier".to_string(),
        INT_LITERAL | REAL_LITERAL => "numeric literal".to_string(),
        STRING_LITERAL | VERBATIM_STRING_LITERAL | INTERPOLATED_STRING => "string literal".to_string(),
        CHAR_LITERAL => "character literal".to_string(),
        EOF => "end of file".to_string(),
        BAD_TOKEN => "invalid token".to_string(),
        _ => match kind.fixed_text() {
            Some(text) => format!("'{}'", text),
            None => format!("{:?}", kind).to_lowercase(),
        },
    }
}
