//! Grammar modules for the surface language
//!
//! This module contains the parsing logic organized by layer:
//! - `expressions` - Expressions, types and names
//! - `statements` - Statements and blocks
//! - `items` - Compilation units and member declarations
//!
//! The parsing functions are generic over a trait (`ExpressionParser` /
//! `StatementParser` / `ItemParser`) so they can be used with any parser
//! implementation.

pub mod expressions;
pub mod items;
pub mod statements;

pub use expressions::{ExpressionParser, parse_expression, parse_type};
pub use items::{ItemParser, MEMBER_KINDS, parse_compilation_unit, parse_member};
pub use statements::{STATEMENT_KINDS, StatementParser, parse_block, parse_statement};
