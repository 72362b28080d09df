//! Token source that mixes reused old elements with freshly scanned tokens
//!
//! The blender owns a growing buffer of slots. Each slot is a token or a whole
//! subtree, together with the lexical context and directive-table length right
//! after it, so the parser's cursor is just a slot index and rewinding is free.
//!
//! An old element with full span `[p, q)` is reused at new offset `N` when:
//! - `p` is the old offset that `N` maps to,
//! - no change touches `[p, r)` plus the scanner's
//!   [`LOOKAHEAD`](super::lexer::LOOKAHEAD) characters,
//!   where `r` is `q`, or the end of the following old token for a subtree
//!   whose end the parser chose by looking at that token (an `if` without
//!   `else` at its right edge),
//! - the element carries no diagnostics or annotations,
//! - the lexical context replayed from the old directive table at `p` equals
//!   the current one.
//!
//! Anything else is rescanned.

use text_size::{TextRange, TextSize};
use tracing::trace;

use super::SyntaxKind;
use super::directives::{DirectiveEntry, DirectiveTable};
use super::lexer::{LexicalContext, Scanner, lookahead_end};
use crate::base::TextChangeSet;
use crate::syntax::{GreenElement, GreenFlags, GreenNode, GreenToken, TokenCache};

/// Where a slot's element came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOrigin {
    Scanned,
    ReusedToken,
    ReusedNode,
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub element: GreenElement,
    pub start: TextSize,
    pub end: TextSize,
    /// Context right after the element
    pub context: LexicalContext,
    pub origin: SlotOrigin,
    table_len: usize,
}

impl Slot {
    /// First token of the element (the element itself for token slots)
    pub fn first_token(&self) -> Option<GreenToken> {
        match &self.element {
            GreenElement::Token(token) => Some(token.clone()),
            GreenElement::Node(node) => node.first_token(),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        match &self.element {
            GreenElement::Token(token) => token.kind(),
            GreenElement::Node(node) => node.first_token().map_or(SyntaxKind::EOF, |t| t.kind()),
        }
    }
}

/// What the last parse took from the old tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReuseStats {
    pub reused_tokens: usize,
    pub reused_nodes: usize,
    pub scanned_tokens: usize,
}

/// The previous parse a reparse draws from
#[derive(Debug, Clone, Copy)]
pub struct OldTree<'a> {
    pub root: &'a GreenNode,
    pub text: &'a str,
    pub directives: &'a DirectiveTable,
}

struct Reuse<'a> {
    old: OldTree<'a>,
    /// `(old span, new span)` of every change, in order
    spans: Vec<(TextRange, TextRange)>,
}

pub struct Blender<'a> {
    scanner: Scanner<'a>,
    reuse: Option<Reuse<'a>>,
    initial: LexicalContext,
    slots: Vec<Slot>,
    table: DirectiveTable,
}

impl<'a> Blender<'a> {
    /// A blender that only scans
    pub fn new(text: &'a str, cache: &'a TokenCache, initial: LexicalContext) -> Self {
        Self {
            scanner: Scanner::new(text, cache),
            reuse: None,
            table: DirectiveTable::new(initial.directives.clone()),
            initial,
            slots: Vec::new(),
        }
    }

    /// A blender that reuses what it can of `old`, edited by `changes` into `text`
    pub fn incremental(
        old: OldTree<'a>,
        changes: &TextChangeSet,
        text: &'a str,
        cache: &'a TokenCache,
        initial: LexicalContext,
    ) -> Self {
        let mut blender = Self::new(text, cache, initial);
        blender.reuse = Some(Reuse {
            old,
            spans: changes.spans(),
        });
        blender
    }

    pub fn text(&self) -> &'a str {
        self.scanner.text()
    }

    /// The slot at `index`, scanning as needed; past end of input this is the EOF slot
    pub fn slot(&mut self, index: usize) -> &Slot {
        while self.slots.len() <= index && !self.at_end() {
            self.fill();
        }
        let index = index.min(self.slots.len().saturating_sub(1));
        &self.slots[index]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn stats(&self) -> ReuseStats {
        let mut stats = ReuseStats::default();
        for slot in &self.slots {
            match slot.origin {
                SlotOrigin::Scanned => stats.scanned_tokens += 1,
                SlotOrigin::ReusedToken => stats.reused_tokens += 1,
                SlotOrigin::ReusedNode => stats.reused_nodes += 1,
            }
        }
        stats
    }

    /// Directive table of everything blended so far
    pub fn directives(&self) -> &DirectiveTable {
        &self.table
    }

    pub fn into_directives(self) -> DirectiveTable {
        self.table
    }

    fn at_end(&self) -> bool {
        self.slots
            .last()
            .is_some_and(|slot| slot.element.kind() == SyntaxKind::EOF)
    }

    /// Start offset and context before slot `index`, and the table length there
    fn state_before(&self, index: usize) -> (TextSize, LexicalContext, usize) {
        match index.checked_sub(1).and_then(|i| self.slots.get(i)) {
            Some(slot) => (slot.end, slot.context.clone(), slot.table_len),
            None => (TextSize::new(0), self.initial.clone(), 0),
        }
    }

    /// Drop every slot from `index` on
    pub fn truncate(&mut self, index: usize) {
        if index < self.slots.len() {
            let (_, _, table_len) = self.state_before(index);
            self.slots.truncate(index);
            self.table.truncate(table_len);
        }
    }

    fn fill(&mut self) {
        let index = self.slots.len();
        let (start, context, _) = self.state_before(index);
        if let Some(slot) = self.reuse_token(start, &context) {
            self.slots.push(slot);
            return;
        }

        let scan = self.scanner.scan(start, &context);
        trace!("[BLENDER] scanned {:?} at {:?}", scan.token.kind(), start);
        for entry in scan.directives {
            self.table.push(entry);
        }
        self.slots.push(Slot {
            element: GreenElement::Token(scan.token),
            start,
            end: scan.end,
            context: scan.context,
            origin: SlotOrigin::Scanned,
            table_len: self.table.len(),
        });
    }

    fn reuse_token(&mut self, start: TextSize, context: &LexicalContext) -> Option<Slot> {
        let reuse = self.reuse.as_ref()?;
        let old_start = reuse.to_old_offset(start)?;
        let (offset, token) = reuse.old.root.token_starting_at(old_start)?;
        if offset != old_start || token.kind() == SyntaxKind::EOF {
            return None;
        }
        let old_end = old_start + token.full_width();
        let element = GreenElement::Token(token);
        if !reuse.accepts(&element, old_start, old_end, context) {
            return None;
        }
        trace!("[BLENDER] reused token {:?} at {:?}", element.kind(), start);
        Some(self.reused_slot(element, start, old_start, SlotOrigin::ReusedToken))
    }

    /// Replace slot `index` (and everything after it) with an old subtree of
    /// one of `kinds` starting at the same offset, if one is reusable there
    pub fn try_reuse_node(&mut self, index: usize, kinds: &[SyntaxKind]) -> Option<GreenNode> {
        if index > 0 {
            self.slot(index - 1);
        }
        if index > self.slots.len() {
            return None;
        }
        let (start, context, _) = self.state_before(index);
        let reuse = self.reuse.as_ref()?;
        let old_start = reuse.to_old_offset(start)?;
        let (offset, node) = reuse
            .old
            .root
            .node_starting_at(old_start, |node| kinds.contains(&node.kind()))?;
        if offset != old_start {
            return None;
        }
        let old_end = old_start + node.full_width();
        let window_end = if is_open_ended(&node) {
            reuse
                .old
                .root
                .token_starting_at(old_end)
                .map_or(old_end, |(at, next)| at + next.full_width())
        } else {
            old_end
        };
        let element = GreenElement::Node(node.clone());
        if !reuse.accepts(&element, old_start, window_end, &context) {
            trace!("[BLENDER] rejected {:?} at {:?}", node.kind(), start);
            return None;
        }

        trace!("[BLENDER] reused {:?} at {:?}", node.kind(), start);
        self.truncate(index);
        let slot = self.reused_slot(element, start, old_start, SlotOrigin::ReusedNode);
        self.slots.push(slot);
        Some(node)
    }

    /// Slot for an accepted old element, copying its directives into the new table
    fn reused_slot(&mut self, element: GreenElement, start: TextSize, old_start: TextSize, origin: SlotOrigin) -> Slot {
        let width = element.full_width();
        let end = start + width;
        let mut context = LexicalContext {
            directives: self.state_before(self.slots.len()).1.directives,
            at_line_start: self.text()[..usize::from(end)].ends_with(['\n', '\r']),
        };
        if let Some(reuse) = &self.reuse {
            let old_range = TextRange::at(old_start, width);
            for entry in reuse.old.directives.entries_in(old_range) {
                let shifted = DirectiveEntry {
                    range: TextRange::at(entry.range.start() - old_start + start, entry.range.len()),
                    ..entry.clone()
                };
                context.directives = shifted.state_after.clone();
                self.table.push(shifted);
            }
        }
        Slot {
            element,
            start,
            end,
            context,
            origin,
            table_len: self.table.len(),
        }
    }
}

/// Whether the parser had to see the token after `node` to end it there:
/// an `if` without `else` on its right edge would take a following `else`
fn is_open_ended(node: &GreenNode) -> bool {
    let mut node = node.clone();
    loop {
        let last = node.children().last().cloned();
        let has_else = matches!(&last, Some(GreenElement::Node(n)) if n.kind() == SyntaxKind::ELSE_CLAUSE);
        if node.kind() == SyntaxKind::IF_STMT && !has_else {
            return true;
        }
        match last {
            Some(GreenElement::Node(child)) => node = child,
            _ => return false,
        }
    }
}

impl Reuse<'_> {
    /// Old offset holding the same text as new offset `new`, unless it lies in changed text
    fn to_old_offset(&self, new: TextSize) -> Option<TextSize> {
        let mut delta: i64 = 0;
        for (old_span, new_span) in &self.spans {
            if new < new_span.start() {
                break;
            }
            if new < new_span.end() {
                return None;
            }
            delta = i64::from(u32::from(old_span.end())) - i64::from(u32::from(new_span.end()));
        }
        let old = i64::from(u32::from(new)) + delta;
        u32::try_from(old).ok().map(TextSize::new)
    }

    /// No change touches `[start, end)` or the lookahead after it in the old text
    fn is_clean(&self, start: TextSize, end: TextSize) -> bool {
        let limit = lookahead_end(self.old.text, end);
        self.spans
            .iter()
            .all(|(old_span, _)| !(old_span.start() < limit && old_span.end() > start))
    }

    fn context_at(&self, offset: TextSize) -> LexicalContext {
        let at = usize::from(offset);
        LexicalContext {
            directives: self.old.directives.state_at(offset).clone(),
            at_line_start: at == 0 || self.old.text.get(..at).is_some_and(|s| s.ends_with(['\n', '\r'])),
        }
    }

    fn accepts(&self, element: &GreenElement, start: TextSize, window_end: TextSize, context: &LexicalContext) -> bool {
        element.full_width() > TextSize::new(0)
            && !element
                .flags()
                .intersects(GreenFlags::CONTAINS_DIAGNOSTICS | GreenFlags::CONTAINS_ANNOTATIONS)
            && self.is_clean(start, window_end)
            && self.context_at(start) == *context
    }
}
