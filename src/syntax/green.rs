//! Green tree: immutable, position-independent, structurally shared.
//!
//! Green elements know their kind, width and children but not where they
//! are. The same `GreenNode` can appear in many trees; reference equality
//! ([`GreenNode::ptr_eq`]) is what "reused" means.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::parser::SyntaxKind;
use crate::parser::errors::Diagnostic;

bitflags! {
    /// Summary bits of a green element; a node's flags are the union of its
    /// children's plus its own
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GreenFlags: u8 {
        const CONTAINS_DIAGNOSTICS = 1 << 0;
        const CONTAINS_ANNOTATIONS = 1 << 1;
        const CONTAINS_SKIPPED_TEXT = 1 << 2;
        const CONTAINS_DIRECTIVES = 1 << 3;
        const IS_MISSING = 1 << 4;
    }
}

static NEXT_ANNOTATION: AtomicU64 = AtomicU64::new(1);

/// An opaque marker attached to a node or token by a client
///
/// Every annotation created gets a fresh id, so two annotations with the same
/// kind and data are still distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntaxAnnotation {
    id: u64,
    kind: SmolStr,
    data: Option<SmolStr>,
}

impl SyntaxAnnotation {
    pub fn new(kind: impl Into<SmolStr>) -> Self {
        Self {
            id: NEXT_ANNOTATION.fetch_add(1, Ordering::Relaxed),
            kind: kind.into(),
            data: None,
        }
    }

    pub fn with_data(kind: impl Into<SmolStr>, data: impl Into<SmolStr>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::new(kind)
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

/// A piece of trivia attached to a token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trivia {
    pub kind: SyntaxKind,
    pub text: SmolStr,
}

impl Trivia {
    pub fn new(kind: SyntaxKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// ============================================================================
// Tokens
// ============================================================================

#[derive(PartialEq, Eq)]
struct GreenTokenData {
    kind: SyntaxKind,
    text: SmolStr,
    leading: Box<[Trivia]>,
    trailing: Box<[Trivia]>,
    diagnostics: Box<[Diagnostic]>,
    annotations: Box<[SyntaxAnnotation]>,
    flags: GreenFlags,
    full_width: TextSize,
    leading_width: TextSize,
}

/// A leaf: token text plus the trivia around it
#[derive(Clone)]
pub struct GreenToken(Arc<GreenTokenData>);

fn trivia_width(trivia: &[Trivia]) -> TextSize {
    trivia.iter().map(Trivia::len).sum()
}

fn trivia_flags(trivia: &[Trivia]) -> GreenFlags {
    let mut flags = GreenFlags::empty();
    for piece in trivia {
        if piece.kind.is_directive() {
            flags |= GreenFlags::CONTAINS_DIRECTIVES;
        } else if piece.kind == SyntaxKind::DISABLED_TEXT {
            flags |= GreenFlags::CONTAINS_SKIPPED_TEXT;
        }
    }
    flags
}

impl GreenToken {
    pub fn new(kind: SyntaxKind, text: impl Into<SmolStr>, leading: Vec<Trivia>, trailing: Vec<Trivia>) -> Self {
        Self::from_parts(kind, text.into(), leading.into(), trailing.into(), Box::default(), Box::default(), false)
    }

    pub fn new_with_diagnostics(
        kind: SyntaxKind,
        text: impl Into<SmolStr>,
        leading: Vec<Trivia>,
        trailing: Vec<Trivia>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self::from_parts(
            kind,
            text.into(),
            leading.into(),
            trailing.into(),
            diagnostics.into(),
            Box::default(),
            false,
        )
    }

    /// A token the parser expected but did not find: zero width, with a diagnostic
    pub fn missing(kind: SyntaxKind, diagnostic: Diagnostic) -> Self {
        Self::from_parts(
            kind,
            SmolStr::default(),
            Box::default(),
            Box::default(),
            vec![diagnostic].into(),
            Box::default(),
            true,
        )
    }

    fn from_parts(
        kind: SyntaxKind,
        text: SmolStr,
        leading: Box<[Trivia]>,
        trailing: Box<[Trivia]>,
        diagnostics: Box<[Diagnostic]>,
        annotations: Box<[SyntaxAnnotation]>,
        missing: bool,
    ) -> Self {
        let leading_width = trivia_width(&leading);
        let full_width = leading_width + TextSize::of(text.as_str()) + trivia_width(&trailing);
        let mut flags = trivia_flags(&leading) | trivia_flags(&trailing);
        if !diagnostics.is_empty() {
            flags |= GreenFlags::CONTAINS_DIAGNOSTICS;
        }
        if !annotations.is_empty() {
            flags |= GreenFlags::CONTAINS_ANNOTATIONS;
        }
        if missing {
            flags |= GreenFlags::IS_MISSING;
        }
        Self(Arc::new(GreenTokenData {
            kind,
            text,
            leading,
            trailing,
            diagnostics,
            annotations,
            flags,
            full_width,
            leading_width,
        }))
    }

    pub fn kind(&self) -> SyntaxKind {
        self.0.kind
    }

    /// Token text without trivia
    pub fn text(&self) -> &str {
        &self.0.text
    }

    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.0.leading
    }

    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.0.trailing
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.0.diagnostics
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        &self.0.annotations
    }

    pub fn flags(&self) -> GreenFlags {
        self.0.flags
    }

    pub fn is_missing(&self) -> bool {
        self.0.flags.contains(GreenFlags::IS_MISSING)
    }

    /// Width including trivia
    pub fn full_width(&self) -> TextSize {
        self.0.full_width
    }

    /// Width of the token text alone
    pub fn text_width(&self) -> TextSize {
        TextSize::of(self.0.text.as_str())
    }

    pub fn leading_width(&self) -> TextSize {
        self.0.leading_width
    }

    pub fn trailing_width(&self) -> TextSize {
        self.0.full_width - self.0.leading_width - self.text_width()
    }

    /// Leading trivia, text and trailing trivia, in source order
    pub fn write_full_text(&self, out: &mut String) {
        for piece in self.0.leading.iter() {
            out.push_str(&piece.text);
        }
        out.push_str(&self.0.text);
        for piece in self.0.trailing.iter() {
            out.push_str(&piece.text);
        }
    }

    pub fn full_text(&self) -> String {
        let mut out = String::with_capacity(usize::from(self.full_width()));
        self.write_full_text(&mut out);
        out
    }

    pub fn ptr_eq(&self, other: &GreenToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn with_diagnostic(&self, diagnostic: Diagnostic) -> GreenToken {
        let mut diagnostics = self.0.diagnostics.to_vec();
        diagnostics.push(diagnostic);
        self.rebuild(
            self.0.leading.clone(),
            self.0.trailing.clone(),
            diagnostics.into(),
            self.0.annotations.clone(),
        )
    }

    pub fn with_annotation(&self, annotation: SyntaxAnnotation) -> GreenToken {
        let mut annotations = self.0.annotations.to_vec();
        annotations.push(annotation);
        self.rebuild(
            self.0.leading.clone(),
            self.0.trailing.clone(),
            self.0.diagnostics.clone(),
            annotations.into(),
        )
    }

    /// Replace the leading trivia; diagnostics that pointed into the old
    /// leading trivia are dropped, the rest move with the token text
    pub fn with_leading_trivia(&self, leading: Vec<Trivia>) -> GreenToken {
        let old_width = self.leading_width();
        let new_width = trivia_width(&leading);
        let diagnostics: Vec<Diagnostic> = self
            .0
            .diagnostics
            .iter()
            .filter(|d| d.offset >= old_width)
            .map(|d| Diagnostic {
                offset: d.offset - old_width + new_width,
                ..d.clone()
            })
            .collect();
        self.rebuild(
            leading.into(),
            self.0.trailing.clone(),
            diagnostics.into(),
            self.0.annotations.clone(),
        )
    }

    fn rebuild(
        &self,
        leading: Box<[Trivia]>,
        trailing: Box<[Trivia]>,
        diagnostics: Box<[Diagnostic]>,
        annotations: Box<[SyntaxAnnotation]>,
    ) -> GreenToken {
        Self::from_parts(
            self.0.kind,
            self.0.text.clone(),
            leading,
            trailing,
            diagnostics,
            annotations,
            self.is_missing(),
        )
    }
}

impl PartialEq for GreenToken {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for GreenToken {}

impl fmt::Debug for GreenToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.full_width(), self.full_text())?;
        if !self.diagnostics().is_empty() {
            write!(f, " diagnostics={:?}", self.diagnostics())?;
        }
        Ok(())
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A child of a green node, with its offset relative to the node start
#[derive(Clone, PartialEq, Eq)]
pub struct GreenChild {
    rel_offset: TextSize,
    element: GreenElement,
}

impl GreenChild {
    pub fn rel_offset(&self) -> TextSize {
        self.rel_offset
    }

    pub fn element(&self) -> &GreenElement {
        &self.element
    }
}

#[derive(PartialEq, Eq)]
struct GreenNodeData {
    kind: SyntaxKind,
    full_width: TextSize,
    children: Box<[GreenChild]>,
    annotations: Box<[SyntaxAnnotation]>,
    flags: GreenFlags,
}

/// An interior node
#[derive(Clone)]
pub struct GreenNode(Arc<GreenNodeData>);

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: Vec<GreenElement>) -> Self {
        Self::with_parts(kind, children, Box::default())
    }

    fn with_parts(kind: SyntaxKind, children: Vec<GreenElement>, annotations: Box<[SyntaxAnnotation]>) -> Self {
        let mut offset = TextSize::new(0);
        let mut flags = GreenFlags::empty();
        let children: Box<[GreenChild]> = children
            .into_iter()
            .map(|element| {
                let rel_offset = offset;
                offset += element.full_width();
                flags |= element.flags();
                GreenChild { rel_offset, element }
            })
            .collect();
        if kind == SyntaxKind::SKIPPED_TOKENS {
            flags |= GreenFlags::CONTAINS_SKIPPED_TEXT;
        }
        if !annotations.is_empty() {
            flags |= GreenFlags::CONTAINS_ANNOTATIONS;
        }
        Self(Arc::new(GreenNodeData {
            kind,
            full_width: offset,
            children,
            annotations,
            flags,
        }))
    }

    pub fn kind(&self) -> SyntaxKind {
        self.0.kind
    }

    pub fn full_width(&self) -> TextSize {
        self.0.full_width
    }

    pub fn flags(&self) -> GreenFlags {
        self.0.flags
    }

    pub fn annotations(&self) -> &[SyntaxAnnotation] {
        &self.0.annotations
    }

    pub fn child_count(&self) -> usize {
        self.0.children.len()
    }

    pub fn child(&self, index: usize) -> Option<&GreenElement> {
        self.0.children.get(index).map(|c| &c.element)
    }

    /// Offset of child `index` relative to this node's start
    pub fn child_offset(&self, index: usize) -> Option<TextSize> {
        self.0.children.get(index).map(|c| c.rel_offset)
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = &GreenElement> + DoubleEndedIterator + '_ {
        self.0.children.iter().map(|c| &c.element)
    }

    pub fn children_with_offsets(&self) -> &[GreenChild] {
        &self.0.children
    }

    pub fn ptr_eq(&self, other: &GreenNode) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn elements(&self) -> Vec<GreenElement> {
        self.children().cloned().collect()
    }

    /// A copy with child `index` replaced; other children are shared
    pub fn replace_child(&self, index: usize, element: GreenElement) -> GreenNode {
        let mut children = self.elements();
        if let Some(slot) = children.get_mut(index) {
            *slot = element;
        }
        Self::with_parts(self.kind(), children, self.0.annotations.clone())
    }

    pub fn insert_child(&self, index: usize, element: GreenElement) -> GreenNode {
        let mut children = self.elements();
        children.insert(index.min(children.len()), element);
        Self::with_parts(self.kind(), children, self.0.annotations.clone())
    }

    pub fn remove_child(&self, index: usize) -> GreenNode {
        let mut children = self.elements();
        if index < children.len() {
            children.remove(index);
        }
        Self::with_parts(self.kind(), children, self.0.annotations.clone())
    }

    pub fn with_annotation(&self, annotation: SyntaxAnnotation) -> GreenNode {
        let mut annotations = self.0.annotations.to_vec();
        annotations.push(annotation);
        Self::with_parts(self.kind(), self.elements(), annotations.into())
    }

    /// Index of the child whose span contains `offset`, ignoring zero-width children
    pub fn child_index_at_offset(&self, offset: TextSize) -> Option<usize> {
        if offset >= self.full_width() {
            return None;
        }
        let children = &self.0.children;
        let mut index = children.partition_point(|c| c.rel_offset <= offset).checked_sub(1)?;
        while children[index].element.full_width() == TextSize::new(0) {
            index = index.checked_sub(1)?;
        }
        Some(index)
    }

    /// The scanned token whose full span starts at `offset`, with its start.
    ///
    /// Missing tokens are never returned. At `offset == full_width` the
    /// trailing zero-width end-of-file token is returned, if there is one.
    pub fn token_starting_at(&self, offset: TextSize) -> Option<(TextSize, GreenToken)> {
        if offset == self.full_width() {
            let eof = self.last_token()?;
            return (eof.kind() == SyntaxKind::EOF && eof.full_width() == TextSize::new(0))
                .then(|| (offset, eof));
        }
        let mut node = self.clone();
        let mut node_start = TextSize::new(0);
        loop {
            let index = node.child_index_at_offset(offset - node_start)?;
            let child = &node.0.children[index];
            let start = node_start + child.rel_offset;
            match &child.element {
                GreenElement::Token(token) => {
                    return (start == offset).then(|| (start, token.clone()));
                }
                GreenElement::Node(inner) => {
                    let inner = inner.clone();
                    node = inner;
                    node_start = start;
                }
            }
        }
    }

    /// The outermost descendant node starting at `offset` accepted by `pred`
    pub fn node_starting_at(
        &self,
        offset: TextSize,
        pred: impl Fn(&GreenNode) -> bool,
    ) -> Option<(TextSize, GreenNode)> {
        let mut node = self.clone();
        let mut node_start = TextSize::new(0);
        loop {
            let index = node.child_index_at_offset(offset - node_start)?;
            let child = &node.0.children[index];
            let start = node_start + child.rel_offset;
            let GreenElement::Node(inner) = &child.element else {
                return None;
            };
            if start == offset && pred(inner) {
                return Some((start, inner.clone()));
            }
            let inner = inner.clone();
            node = inner;
            node_start = start;
        }
    }

    pub fn first_token(&self) -> Option<GreenToken> {
        self.children().find_map(|child| match child {
            GreenElement::Token(token) => Some(token.clone()),
            GreenElement::Node(node) => node.first_token(),
        })
    }

    pub fn last_token(&self) -> Option<GreenToken> {
        self.children().rev().find_map(|child| match child {
            GreenElement::Token(token) => Some(token.clone()),
            GreenElement::Node(node) => node.last_token(),
        })
    }

    /// Visit every token in source order together with its full start
    pub fn for_each_token(&self, start: TextSize, f: &mut dyn FnMut(TextSize, &GreenToken)) {
        for child in self.0.children.iter() {
            let child_start = start + child.rel_offset;
            match &child.element {
                GreenElement::Token(token) => f(child_start, token),
                GreenElement::Node(node) => node.for_each_token(child_start, f),
            }
        }
    }

    pub fn write_text(&self, out: &mut String) {
        self.for_each_token(TextSize::new(0), &mut |_, token| token.write_full_text(out));
    }

    /// The exact source text this node covers
    pub fn text(&self) -> String {
        let mut out = String::with_capacity(usize::from(self.full_width()));
        self.write_text(&mut out);
        out
    }

    /// Indented dump of the tree, one element per line
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0, TextSize::new(0));
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize, start: TextSize) {
        use std::fmt::Write;
        let _ = writeln!(
            out,
            "{:indent$}{:?}@{:?}..{:?}",
            "",
            self.kind(),
            start,
            start + self.full_width(),
            indent = depth * 2
        );
        for child in self.0.children.iter() {
            let child_start = start + child.rel_offset;
            match &child.element {
                GreenElement::Node(node) => node.dump_into(out, depth + 1, child_start),
                GreenElement::Token(token) => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{:?}@{:?}..{:?} {:?}",
                        "",
                        token.kind(),
                        child_start,
                        child_start + token.full_width(),
                        token.text(),
                        indent = (depth + 1) * 2
                    );
                }
            }
        }
    }
}

impl PartialEq for GreenNode {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for GreenNode {}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind())
            .field("full_width", &self.full_width())
            .field("children", &self.children().collect::<Vec<_>>())
            .finish()
    }
}

// ============================================================================
// Elements
// ============================================================================

/// Either a node or a token
#[derive(Clone, PartialEq, Eq)]
pub enum GreenElement {
    Node(GreenNode),
    Token(GreenToken),
}

impl GreenElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            GreenElement::Node(node) => node.kind(),
            GreenElement::Token(token) => token.kind(),
        }
    }

    pub fn full_width(&self) -> TextSize {
        match self {
            GreenElement::Node(node) => node.full_width(),
            GreenElement::Token(token) => token.full_width(),
        }
    }

    pub fn flags(&self) -> GreenFlags {
        match self {
            GreenElement::Node(node) => node.flags(),
            GreenElement::Token(token) => token.flags(),
        }
    }

    pub fn as_node(&self) -> Option<&GreenNode> {
        match self {
            GreenElement::Node(node) => Some(node),
            GreenElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&GreenToken> {
        match self {
            GreenElement::Node(_) => None,
            GreenElement::Token(token) => Some(token),
        }
    }

    /// Reference equality
    pub fn ptr_eq(&self, other: &GreenElement) -> bool {
        match (self, other) {
            (GreenElement::Node(a), GreenElement::Node(b)) => a.ptr_eq(b),
            (GreenElement::Token(a), GreenElement::Token(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn write_text(&self, out: &mut String) {
        match self {
            GreenElement::Node(node) => node.write_text(out),
            GreenElement::Token(token) => token.write_full_text(out),
        }
    }

    /// Visit every token in source order together with its full start
    pub fn for_each_token(&self, start: TextSize, f: &mut dyn FnMut(TextSize, &GreenToken)) {
        match self {
            GreenElement::Node(node) => node.for_each_token(start, f),
            GreenElement::Token(token) => f(start, token),
        }
    }
}

impl fmt::Debug for GreenElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GreenElement::Node(node) => node.fmt(f),
            GreenElement::Token(token) => token.fmt(f),
        }
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        GreenElement::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        GreenElement::Token(token)
    }
}
