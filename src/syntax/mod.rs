// Persistent syntax trees: shared green nodes and positional red views
pub mod builder;
pub mod cache;
pub mod diff;
pub mod green;
pub mod red;

pub use builder::{Checkpoint, GreenNodeBuilder};
pub use cache::TokenCache;
pub use diff::diff;
pub use green::{GreenChild, GreenElement, GreenFlags, GreenNode, GreenToken, SyntaxAnnotation, Trivia};
pub use red::{SyntaxElement, SyntaxNode, SyntaxToken};
