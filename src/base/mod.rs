//! Foundation types for the quill front-end.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextSnapshot`], [`TextChange`], [`TextChangeSet`] - Versioned source text
//! - [`ParseOptions`], [`LanguageVersion`], [`EntryPoint`] - Parse configuration
//! - [`LineCol`], [`LineIndex`], [`Span`] - Line/column conversion
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//!
//! This module has NO dependencies on other quill modules.

mod options;
mod position;
mod text;

pub use options::{EntryPoint, LanguageVersion, ParseOptions};
pub use position::{LineCol, LineIndex, Span};
pub use text::{TextChange, TextChangeSet, TextError, TextSnapshot};

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
