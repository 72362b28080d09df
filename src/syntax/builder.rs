//! Bottom-up construction of green trees.

use super::green::{GreenElement, GreenNode, GreenToken};
use crate::parser::SyntaxKind;

/// A position in the builder that a node can later be started at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Builds a green tree from start/finish events
///
/// Unlike a token-stream builder, whole green elements can be pushed, which is
/// how reused subtrees and reused tokens enter the new tree.
#[derive(Debug, Default)]
pub struct GreenNodeBuilder {
    parents: Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
}

impl GreenNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.parents.push((kind, self.children.len()));
    }

    pub fn token(&mut self, token: GreenToken) {
        self.children.push(GreenElement::Token(token));
    }

    /// Push a finished subtree as a single child
    pub fn node(&mut self, node: GreenNode) {
        self.children.push(GreenElement::Node(node));
    }

    pub fn push(&mut self, element: GreenElement) {
        self.children.push(element);
    }

    pub fn finish_node(&mut self) {
        let Some((kind, first_child)) = self.parents.pop() else {
            debug_assert!(false, "finish_node without start_node");
            return;
        };
        let children = self.children.split_off(first_child);
        self.children.push(GreenElement::Node(GreenNode::new(kind, children)));
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Start a node that wraps everything pushed since `checkpoint`
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let Checkpoint(first_child) = checkpoint;
        debug_assert!(first_child <= self.children.len());
        if let Some(&(_, parent_first)) = self.parents.last() {
            debug_assert!(first_child >= parent_first, "checkpoint is outside the current node");
        }
        self.parents.push((kind, first_child.min(self.children.len())));
    }

    /// Number of children pushed since `checkpoint`
    pub fn len_since(&self, checkpoint: Checkpoint) -> usize {
        self.children.len().saturating_sub(checkpoint.0)
    }

    /// Finish the tree; unbalanced nodes are closed
    pub fn finish(mut self) -> GreenNode {
        debug_assert!(self.parents.is_empty(), "unfinished nodes: {:?}", self.parents);
        while !self.parents.is_empty() {
            self.finish_node();
        }
        if self.children.len() == 1 {
            if let Some(GreenElement::Node(node)) = self.children.pop() {
                return node;
            }
        }
        GreenNode::new(SyntaxKind::FRAGMENT, self.children)
    }
}
