//! # quill
//!
//! Incremental syntax front-end for a C#-like language: lossless parse trees
//! that are cheap to update after small edits.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! tree      → SyntaxTree: parse, apply edits, diagnostics, diff
//!   ↓
//! parser    → Logos scanner, directives, blender, recursive-descent parser, typed AST
//!   ↕
//! syntax    → Green/red trees, builder, token cache, differencer
//!   ↓
//! base      → Primitives (text snapshots, options, line index, TextRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax/parser → tree)
// ============================================================================

/// Foundation types: text snapshots and edits, parse options, line index
pub mod base;

/// Parser: Logos scanner, blender, recursive-descent parser, grammar traits
pub mod parser;

/// Syntax: persistent green/red trees and the tree differencer
pub mod syntax;

/// Syntax trees over versioned text
pub mod tree;

// Re-export foundation types
pub use base::{
    EntryPoint, LanguageVersion, LineCol, LineIndex, ParseOptions, TextChange, TextChangeSet, TextError, TextRange,
    TextSize, TextSnapshot,
};
pub use parser::{ParseStatus, ReuseStats, SyntaxDiagnostic, SyntaxKind};
pub use syntax::{GreenNode, GreenToken, SyntaxAnnotation, SyntaxElement, SyntaxNode, SyntaxToken};
pub use tree::{SyntaxTree, diff_trees};
