//! Incremental parser for the surface language
//!
//! This module provides a lossless, incremental parser using:
//! - **logos** for fast lexing
//! - a persistent green/red tree (see [`crate::syntax`]) for the CST
//!
//! ## Architecture
//!
//! ```text
//! Source Text (+ edits)
//!     ↓
//! Scanner (logos) → one token with trivia, under an explicit lexical context
//!     ↓
//! Blender → reused old tokens/subtrees interleaved with scanned tokens
//!     ↓
//! Parser → GreenNode tree (immutable, shared across versions)
//!     ↓
//! SyntaxNode → red tree with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```
//!
//! ## Incremental Reparsing
//!
//! When text changes, we:
//! 1. Map every new offset back to the old text where it was not edited
//! 2. Offer the parser old members, statements and blocks whose text and
//!    lexical context are unchanged
//! 3. Rescan everything else, resynchronising at the first old token boundary
//!    whose context matches again

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
pub mod blender;
pub mod directives;
pub mod errors;
pub mod grammar;
pub mod lexer;
mod syntax_kind;

pub use ast::{AstNode, AstToken};
pub use blender::{Blender, OldTree, ReuseStats};
pub use directives::{DirectiveEntry, DirectiveState, DirectiveTable};
pub use errors::{Diagnostic, ErrorCode, Severity, SyntaxDiagnostic};
pub use lexer::{LOOKAHEAD, LexicalContext, Scanner, lookahead_end, tokenize};
pub use parser::{ParseOutput, ParseStatus, parse};
pub use syntax_kind::{SyntaxKind, kind_to_name};
