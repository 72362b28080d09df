//! Syntax diagnostics
//!
//! This module provides:
//! - Categorized error codes with message templates
//! - Token-relative diagnostics stored in the green tree, and their absolute form
//! - Parse contexts that drive error recovery

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::{ParseContext, is_expression_start, is_member_start, is_statement_start};
pub use error::{Diagnostic, DiagnosticBuilder, Severity, SyntaxDiagnostic};
