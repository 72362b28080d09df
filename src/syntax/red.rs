//! Red tree: a positioned, navigable facade over the green tree.
//!
//! Red nodes are created on demand. A node owns its parent, so a node handed
//! out from anywhere in a tree can always walk back up to the root. Parents
//! refer to materialised children only weakly: walking the same path twice
//! returns the same node for as long as somebody holds it.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use text_size::{TextRange, TextSize};

use super::green::{GreenElement, GreenFlags, GreenNode, GreenToken, SyntaxAnnotation, Trivia};
use crate::parser::SyntaxKind;
use crate::parser::errors::SyntaxDiagnostic;

struct NodeData {
    green: GreenNode,
    offset: TextSize,
    parent: Option<SyntaxNode>,
    index: usize,
    children: Box<[Mutex<Weak<NodeData>>]>,
}

/// A node with an absolute position
#[derive(Clone)]
pub struct SyntaxNode(Arc<NodeData>);

/// A token with an absolute position
#[derive(Clone)]
pub struct SyntaxToken {
    green: GreenToken,
    offset: TextSize,
    parent: SyntaxNode,
    index: usize,
}

#[derive(Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(SyntaxToken),
}

impl SyntaxNode {
    pub fn new_root(green: GreenNode) -> SyntaxNode {
        Self::new(green, TextSize::new(0), None, 0)
    }

    fn new(green: GreenNode, offset: TextSize, parent: Option<SyntaxNode>, index: usize) -> SyntaxNode {
        let children = (0..green.child_count()).map(|_| Mutex::new(Weak::new())).collect();
        SyntaxNode(Arc::new(NodeData {
            green,
            offset,
            parent,
            index,
            children,
        }))
    }

    pub fn kind(&self) -> SyntaxKind {
        self.0.green.kind()
    }

    pub fn green(&self) -> &GreenNode {
        &self.0.green
    }

    /// Start of the node including leading trivia
    pub fn offset(&self) -> TextSize {
        self.0.offset
    }

    pub fn full_range(&self) -> TextRange {
        TextRange::at(self.0.offset, self.0.green.full_width())
    }

    /// Range without the leading trivia of the first token and the trailing
    /// trivia of the last
    pub fn text_range(&self) -> TextRange {
        let full = self.full_range();
        let start = match self.0.green.first_token() {
            Some(token) => full.start() + token.leading_width(),
            None => full.start(),
        };
        let end = match self.0.green.last_token() {
            Some(token) => full.end() - token.trailing_width(),
            None => full.end(),
        };
        TextRange::new(start, end.max(start))
    }

    pub fn flags(&self) -> GreenFlags {
        self.0.green.flags()
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        self.0.green.annotations()
    }

    pub fn has_annotation_kind(&self, kind: &str) -> bool {
        self.annotations().iter().any(|a| a.kind() == kind)
    }

    pub fn parent(&self) -> Option<SyntaxNode> {
        self.0.parent.clone()
    }

    /// The root this node was reached from
    pub fn root(&self) -> SyntaxNode {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    pub fn index(&self) -> usize {
        self.0.index
    }

    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> {
        std::iter::successors(Some(self.clone()), SyntaxNode::parent)
    }

    pub fn child_count(&self) -> usize {
        self.0.children.len()
    }

    /// Child `index`. Child nodes are shared while any handle to them is alive.
    pub fn child(&self, index: usize) -> Option<SyntaxElement> {
        let slot = self.0.children.get(index)?;
        let green = self.0.green.children_with_offsets();
        let child = &green[index];
        let offset = self.0.offset + child.rel_offset();
        let element = match child.element() {
            GreenElement::Node(green_node) => {
                let mut slot = slot.lock();
                let node = match slot.upgrade() {
                    Some(data) => SyntaxNode(data),
                    None => {
                        let created = SyntaxNode::new(green_node.clone(), offset, Some(self.clone()), index);
                        *slot = Arc::downgrade(&created.0);
                        created
                    }
                };
                SyntaxElement::Node(node)
            }
            GreenElement::Token(token) => SyntaxElement::Token(SyntaxToken {
                green: token.clone(),
                offset,
                parent: self.clone(),
                index,
            }),
        };
        Some(element)
    }

    pub fn children_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + '_ {
        (0..self.child_count()).filter_map(move |i| self.child(i))
    }

    /// Child nodes only
    pub fn children(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.children_with_tokens().filter_map(SyntaxElement::into_node)
    }

    /// Pre-order walk over this node and everything below it
    pub fn descendants_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + use<> {
        let mut stack = vec![SyntaxElement::Node(self.clone())];
        std::iter::from_fn(move || {
            let element = stack.pop()?;
            if let SyntaxElement::Node(node) = &element {
                for i in (0..node.child_count()).rev() {
                    if let Some(child) = node.child(i) {
                        stack.push(child);
                    }
                }
            }
            Some(element)
        })
    }

    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode> + use<> {
        self.descendants_with_tokens().filter_map(SyntaxElement::into_node)
    }

    /// All tokens in source order, including missing and end-of-file tokens
    pub fn tokens(&self) -> impl Iterator<Item = SyntaxToken> + use<> {
        self.descendants_with_tokens().filter_map(SyntaxElement::into_token)
    }

    pub fn first_token(&self) -> Option<SyntaxToken> {
        self.tokens().next()
    }

    pub fn last_token(&self) -> Option<SyntaxToken> {
        (0..self.child_count())
            .rev()
            .filter_map(|i| self.child(i))
            .find_map(|child| match child {
                SyntaxElement::Token(token) => Some(token),
                SyntaxElement::Node(node) => node.last_token(),
            })
    }

    /// The non-missing token whose full range contains `offset`
    pub fn token_at_offset(&self, offset: TextSize) -> Option<SyntaxToken> {
        let mut node = self.clone();
        loop {
            let index = node.green().child_index_at_offset(offset.checked_sub(node.offset())?)?;
            match node.child(index)? {
                SyntaxElement::Token(token) => return Some(token),
                SyntaxElement::Node(child) => node = child,
            }
        }
    }

    /// Diagnostics of every token below this node, in source order
    pub fn diagnostics(&self) -> Vec<SyntaxDiagnostic> {
        let mut out = Vec::new();
        if !self.flags().contains(GreenFlags::CONTAINS_DIAGNOSTICS) {
            return out;
        }
        self.0.green.for_each_token(self.offset(), &mut |start, token| {
            out.extend(token.diagnostics().iter().map(|d| d.to_absolute(start)));
        });
        out
    }

    pub fn text(&self) -> String {
        self.0.green.text()
    }

    /// Replace this node's green node and rebuild every ancestor.
    ///
    /// Returns the new root; this tree is untouched.
    pub fn replace_with(&self, replacement: GreenNode) -> GreenNode {
        match self.parent() {
            None => replacement,
            Some(parent) => {
                let new_parent = parent.green().replace_child(self.index(), replacement.into());
                parent.replace_with(new_parent)
            }
        }
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.offset == other.0.offset && self.0.green.ptr_eq(&other.0.green))
    }
}

impl Eq for SyntaxNode {}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.full_range())
    }
}

impl SyntaxToken {
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    pub fn green(&self) -> &GreenToken {
        &self.green
    }

    pub fn text(&self) -> &str {
        self.green.text()
    }

    /// Start of the token including leading trivia
    pub fn offset(&self) -> TextSize {
        self.offset
    }

    pub fn full_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.full_width())
    }

    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset + self.green.leading_width(), self.green.text_width())
    }

    pub fn leading_trivia(&self) -> &[Trivia] {
        self.green.leading_trivia()
    }

    pub fn trailing_trivia(&self) -> &[Trivia] {
        self.green.trailing_trivia()
    }

    pub fn is_missing(&self) -> bool {
        self.green.is_missing()
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        self.green.annotations()
    }

    pub fn diagnostics(&self) -> Vec<SyntaxDiagnostic> {
        self.green
            .diagnostics()
            .iter()
            .map(|d| d.to_absolute(self.offset))
            .collect()
    }

    pub fn parent(&self) -> Option<SyntaxNode> {
        Some(self.parent.clone())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Replace this token and rebuild every ancestor; returns the new root
    pub fn replace_with(&self, replacement: GreenToken) -> GreenNode {
        let new_parent = self.parent.green().replace_child(self.index, replacement.into());
        self.parent.replace_with(new_parent)
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.green.ptr_eq(&other.green)
    }
}

impl Eq for SyntaxToken {}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Node(node) => node.kind(),
            SyntaxElement::Token(token) => token.kind(),
        }
    }

    pub fn full_range(&self) -> TextRange {
        match self {
            SyntaxElement::Node(node) => node.full_range(),
            SyntaxElement::Token(token) => token.full_range(),
        }
    }

    pub fn text_range(&self) -> TextRange {
        match self {
            SyntaxElement::Node(node) => node.text_range(),
            SyntaxElement::Token(token) => token.text_range(),
        }
    }

    pub fn parent(&self) -> Option<SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => node.parent(),
            SyntaxElement::Token(token) => token.parent(),
        }
    }

    pub fn into_node(self) -> Option<SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn into_token(self) -> Option<SyntaxToken> {
        match self {
            SyntaxElement::Node(_) => None,
            SyntaxElement::Token(token) => Some(token),
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            SyntaxElement::Node(_) => None,
            SyntaxElement::Token(token) => Some(token),
        }
    }

    pub fn green(&self) -> GreenElement {
        match self {
            SyntaxElement::Node(node) => GreenElement::Node(node.green().clone()),
            SyntaxElement::Token(token) => GreenElement::Token(token.green().clone()),
        }
    }
}

impl fmt::Debug for SyntaxElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxElement::Node(node) => node.fmt(f),
            SyntaxElement::Token(token) => token.fmt(f),
        }
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        SyntaxElement::Node(node)
    }
}

impl From<SyntaxToken> for SyntaxElement {
    fn from(token: SyntaxToken) -> Self {
        SyntaxElement::Token(token)
    }
}
