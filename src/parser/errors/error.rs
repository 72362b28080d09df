//! Syntax diagnostic types
//!
//! Diagnostics live in two forms:
//! - [`Diagnostic`] is stored inside green tokens, positioned relative to the
//!   token's full start so that the token can be shared between trees.
//! - [`SyntaxDiagnostic`] is the absolute form handed out to callers.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::codes::ErrorCode;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// A hard error
    #[default]
    Error,
    /// A warning that doesn't make the tree invalid
    Warning,
}

impl Severity {
    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A diagnostic attached to a green token
///
/// `offset` is relative to the start of the token's leading trivia.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub offset: TextSize,
    pub len: TextSize,
    pub args: Box<[SmolStr]>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity and no arguments
    pub fn new(code: ErrorCode, offset: TextSize, len: TextSize) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            offset,
            len,
            args: Box::default(),
        }
    }

    /// Create a builder for diagnostics with arguments
    pub fn builder(code: ErrorCode) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code)
    }

    /// Range relative to the owning token's full start
    pub fn relative_range(&self) -> TextRange {
        TextRange::at(self.offset, self.len)
    }

    /// Rendered message
    pub fn message(&self) -> String {
        self.code.format_message(&self.args)
    }

    /// Convert to the absolute form, given the owning token's full start
    pub fn to_absolute(&self, token_start: TextSize) -> SyntaxDiagnostic {
        SyntaxDiagnostic {
            code: self.code,
            severity: self.severity,
            range: TextRange::at(token_start + self.offset, self.len),
            message: self.message(),
        }
    }
}

/// Builder for diagnostics with arguments or a custom severity
pub struct DiagnosticBuilder {
    code: ErrorCode,
    severity: Severity,
    offset: TextSize,
    len: TextSize,
    args: Vec<SmolStr>,
}

impl DiagnosticBuilder {
    /// Create a new builder with an error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            offset: TextSize::new(0),
            len: TextSize::new(0),
            args: Vec::new(),
        }
    }

    /// Set the relative range
    pub fn at(mut self, offset: TextSize, len: TextSize) -> Self {
        self.offset = offset;
        self.len = len;
        self
    }

    /// Append a positional message argument
    pub fn arg(mut self, arg: impl Into<SmolStr>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the severity
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            code: self.code,
            severity: self.severity,
            offset: self.offset,
            len: self.len,
            args: self.args.into_boxed_slice(),
        }
    }
}

/// A diagnostic positioned in the text of a particular tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxDiagnostic {
    /// Categorized error code
    pub code: ErrorCode,
    /// Error severity
    pub severity: Severity,
    /// Source location
    pub range: TextRange,
    /// Human-readable message
    pub message: String,
}

impl SyntaxDiagnostic {
    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        format!(
            "{} {}: {} at {:?}",
            self.severity.as_str(),
            self.code,
            self.message,
            self.range
        )
    }
}
