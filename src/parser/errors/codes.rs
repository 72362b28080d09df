//! Error code definitions for syntax diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens)
//! - E02xx: Structural errors (missing punctuation)
//! - E03xx: Declaration errors
//! - E04xx: Expression errors
//! - E05xx: Preprocessor errors
//! - E09xx: Generic/fallback errors

use std::fmt;

use super::error::Severity;

/// Error codes for syntax diagnostics
///
/// Each code carries a message template. `{0}`, `{1}`, ... are replaced by the
/// diagnostic's arguments when the message is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors (invalid tokens)
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal (regular, verbatim or interpolated)
    E0102,
    /// Unterminated block comment
    E0103,
    /// Unterminated or empty character literal
    E0104,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// A required token is missing
    E0201,

    // =========================================================================
    // E03xx: Declaration errors
    // =========================================================================
    /// Missing identifier
    E0301,
    /// Missing type in a member declaration
    E0302,

    // =========================================================================
    // E04xx: Expression errors
    // =========================================================================
    /// Missing expression where expected
    E0401,

    // =========================================================================
    // E05xx: Preprocessor errors
    // =========================================================================
    /// `#endif` or `#endregion` expected
    E0501,
    /// Directive with no matching opener
    E0502,
    /// Malformed `#if`/`#elif` expression
    E0503,
    /// Unknown directive name
    E0504,
    /// `#error` directive
    E0505,
    /// `#warning` directive
    E0506,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0104 => "E0104",
            // Structural
            Self::E0201 => "E0201",
            // Declaration
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            // Expression
            Self::E0401 => "E0401",
            // Preprocessor
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            Self::E0504 => "E0504",
            Self::E0505 => "E0505",
            Self::E0506 => "E0506",
            // Generic
            Self::E0901 => "E0901",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 | Self::E0104 => "lexical error",
            Self::E0201 => "structural error",
            Self::E0301 | Self::E0302 => "declaration error",
            Self::E0401 => "expression error",
            Self::E0501 | Self::E0502 | Self::E0503 | Self::E0504 | Self::E0505 | Self::E0506 => {
                "preprocessor error"
            }
            Self::E0901 => "syntax error",
        }
    }

    /// Get the message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            // Lexical
            Self::E0101 => "invalid character '{0}'",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "unterminated block comment",
            Self::E0104 => "invalid character literal",
            // Structural
            Self::E0201 => "{0} expected",
            // Declaration
            Self::E0301 => "identifier expected",
            Self::E0302 => "type expected",
            // Expression
            Self::E0401 => "expression expected",
            // Preprocessor
            Self::E0501 => "{0} directive expected",
            Self::E0502 => "unexpected preprocessor directive",
            Self::E0503 => "invalid preprocessor expression",
            Self::E0504 => "preprocessor directive expected",
            Self::E0505 => "#error: '{0}'",
            Self::E0506 => "#warning: '{0}'",
            // Generic
            Self::E0901 => "unexpected token {0}",
        }
    }

    /// Severity a diagnostic with this code gets unless overridden
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::E0506 => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Render the message template with positional arguments
    pub fn format_message<S: AsRef<str>>(&self, args: &[S]) -> String {
        let mut message = self.default_message().to_string();
        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{}}}", i), arg.as_ref());
        }
        message
    }

    /// Check if this is a lexical error (reported by the scanner)
    pub fn is_lexical(&self) -> bool {
        matches!(
            self,
            Self::E0101
                | Self::E0102
                | Self::E0103
                | Self::E0104
                | Self::E0501
                | Self::E0502
                | Self::E0503
                | Self::E0504
                | Self::E0505
                | Self::E0506
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
