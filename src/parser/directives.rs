//! Preprocessor directive processing.
//!
//! Directives are trivia. Each processed directive line moves the
//! [`DirectiveState`] (open `#if`/`#region` frames and defined symbols) and
//! is recorded in a [`DirectiveTable`], from which the state at any offset can
//! be replayed without rescanning.

use std::sync::Arc;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::SyntaxKind;
use super::errors::{Diagnostic, ErrorCode};

/// One open `#if` or `#region`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Frame {
    Region,
    Conditional {
        /// The current branch was selected
        active: bool,
        /// Some branch at this level has been selected
        taken: bool,
        seen_else: bool,
    },
}

/// Open directive frames and defined symbols at a point in the text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DirectiveState {
    frames: Arc<[Frame]>,
    symbols: Arc<[SmolStr]>,
}

impl DirectiveState {
    /// The state at the start of a file with `symbols` predefined
    pub fn with_symbols<S: AsRef<str>>(symbols: &[S]) -> Self {
        let mut sorted: Vec<SmolStr> = symbols.iter().map(|s| SmolStr::new(s.as_ref())).collect();
        sorted.sort();
        sorted.dedup();
        Self {
            frames: Arc::from([]),
            symbols: sorted.into(),
        }
    }

    /// Whether text at this point is compiled (not inside a false `#if` branch)
    pub fn is_active(&self) -> bool {
        self.frames.iter().all(|frame| match frame {
            Frame::Region => true,
            Frame::Conditional { active, .. } => *active,
        })
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.symbols.binary_search_by(|s| s.as_str().cmp(symbol)).is_ok()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The directive that would close the innermost open frame
    pub fn expected_closer(&self) -> Option<&'static str> {
        self.frames.last().map(|frame| match frame {
            Frame::Region => "#endregion",
            Frame::Conditional { .. } => "#endif",
        })
    }

    fn push(&self, frame: Frame) -> Self {
        let mut frames = self.frames.to_vec();
        frames.push(frame);
        Self {
            frames: frames.into(),
            symbols: self.symbols.clone(),
        }
    }

    fn pop(&self) -> Self {
        let mut frames = self.frames.to_vec();
        frames.pop();
        Self {
            frames: frames.into(),
            symbols: self.symbols.clone(),
        }
    }

    fn replace_top(&self, frame: Frame) -> Self {
        let mut frames = self.frames.to_vec();
        if let Some(top) = frames.last_mut() {
            *top = frame;
        }
        Self {
            frames: frames.into(),
            symbols: self.symbols.clone(),
        }
    }

    fn define(&self, symbol: &str, defined: bool) -> Self {
        let mut symbols = self.symbols.to_vec();
        match (symbols.binary_search_by(|s| s.as_str().cmp(symbol)), defined) {
            (Err(index), true) => symbols.insert(index, SmolStr::new(symbol)),
            (Ok(index), false) => {
                symbols.remove(index);
            }
            _ => return self.clone(),
        }
        Self {
            frames: self.frames.clone(),
            symbols: symbols.into(),
        }
    }
}

/// A processed directive and the state after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveEntry {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub state_after: DirectiveState,
}

/// All directives of a tree, in source order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectiveTable {
    initial: DirectiveState,
    entries: Vec<DirectiveEntry>,
}

impl DirectiveTable {
    pub fn new(initial: DirectiveState) -> Self {
        Self {
            initial,
            entries: Vec::new(),
        }
    }

    pub fn initial(&self) -> &DirectiveState {
        &self.initial
    }

    pub fn entries(&self) -> &[DirectiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: DirectiveEntry) {
        debug_assert!(self.entries.last().is_none_or(|last| last.range.end() <= entry.range.start()));
        self.entries.push(entry);
    }

    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// State after the last directive ending at or before `offset`
    pub fn state_at(&self, offset: TextSize) -> &DirectiveState {
        let index = self.entries.partition_point(|e| e.range.end() <= offset);
        match index.checked_sub(1) {
            Some(i) => &self.entries[i].state_after,
            None => &self.initial,
        }
    }

    /// Entries lying entirely within `range`
    pub fn entries_in(&self, range: TextRange) -> &[DirectiveEntry] {
        let start = self.entries.partition_point(|e| e.range.start() < range.start());
        let end = self.entries.partition_point(|e| e.range.end() <= range.end());
        if start >= end { &[] } else { &self.entries[start..end] }
    }
}

/// Result of processing one directive line
#[derive(Debug, Clone)]
pub struct DirectiveOutcome {
    pub kind: SyntaxKind,
    pub state: DirectiveState,
    /// Diagnostics with offsets relative to the `#`
    pub diagnostics: Vec<Diagnostic>,
}

/// Directive names still honoured inside a false `#if` branch
pub fn is_conditional_directive(line: &str) -> bool {
    line.starts_with('#') && matches!(directive_name(line).0, "if" | "elif" | "else" | "endif")
}

/// Name of the directive on `line` (which starts at `#`) and the offset after it
fn directive_name(line: &str) -> (&str, usize) {
    let rest = line.strip_prefix('#').unwrap_or(line);
    let trimmed = rest.trim_start_matches([' ', '\t']);
    let name_start = line.len() - trimmed.len();
    let name_len = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    (&trimmed[..name_len], name_start + name_len)
}

/// Process a directive line (starting at `#`, without its line terminator)
pub fn process_directive(line: &str, state: &DirectiveState) -> DirectiveOutcome {
    let (name, name_end) = directive_name(line);
    let rest = &line[name_end..];
    let line_len = TextSize::of(line);
    let whole_line = |code: ErrorCode| Diagnostic::new(code, TextSize::new(0), line_len);
    let mut diagnostics = Vec::new();

    let (kind, next) = match name {
        "if" => {
            let value = evaluate(rest, name_end, state, &mut diagnostics);
            let frame = Frame::Conditional {
                active: value,
                taken: value,
                seen_else: false,
            };
            (SyntaxKind::IF_DIRECTIVE, state.push(frame))
        }
        "elif" => match state.frames.last() {
            Some(Frame::Conditional {
                taken,
                seen_else: false,
                ..
            }) => {
                let taken = *taken;
                let value = evaluate(rest, name_end, state, &mut diagnostics);
                let active = !taken && value;
                let frame = Frame::Conditional {
                    active,
                    taken: taken || active,
                    seen_else: false,
                };
                (SyntaxKind::ELIF_DIRECTIVE, state.replace_top(frame))
            }
            _ => {
                diagnostics.push(whole_line(ErrorCode::E0502));
                (SyntaxKind::ELIF_DIRECTIVE, state.clone())
            }
        },
        "else" => match state.frames.last() {
            Some(Frame::Conditional {
                taken,
                seen_else: false,
                ..
            }) => {
                let frame = Frame::Conditional {
                    active: !*taken,
                    taken: true,
                    seen_else: true,
                };
                (SyntaxKind::ELSE_DIRECTIVE, state.replace_top(frame))
            }
            _ => {
                diagnostics.push(whole_line(ErrorCode::E0502));
                (SyntaxKind::ELSE_DIRECTIVE, state.clone())
            }
        },
        "endif" => match state.frames.last() {
            Some(Frame::Conditional { .. }) => (SyntaxKind::ENDIF_DIRECTIVE, state.pop()),
            Some(Frame::Region) => {
                diagnostics.push(
                    Diagnostic::builder(ErrorCode::E0501)
                        .at(TextSize::new(0), line_len)
                        .arg("#endregion")
                        .build(),
                );
                (SyntaxKind::ENDIF_DIRECTIVE, state.clone())
            }
            None => {
                diagnostics.push(whole_line(ErrorCode::E0502));
                (SyntaxKind::ENDIF_DIRECTIVE, state.clone())
            }
        },
        "region" => (SyntaxKind::REGION_DIRECTIVE, state.push(Frame::Region)),
        "endregion" => match state.frames.last() {
            Some(Frame::Region) => (SyntaxKind::ENDREGION_DIRECTIVE, state.pop()),
            Some(Frame::Conditional { .. }) => {
                diagnostics.push(
                    Diagnostic::builder(ErrorCode::E0501)
                        .at(TextSize::new(0), line_len)
                        .arg("#endif")
                        .build(),
                );
                (SyntaxKind::ENDREGION_DIRECTIVE, state.clone())
            }
            None => {
                diagnostics.push(whole_line(ErrorCode::E0502));
                (SyntaxKind::ENDREGION_DIRECTIVE, state.clone())
            }
        },
        "define" | "undef" => {
            let kind = if name == "define" {
                SyntaxKind::DEFINE_DIRECTIVE
            } else {
                SyntaxKind::UNDEF_DIRECTIVE
            };
            let symbol = strip_comment(rest).trim();
            if is_symbol(symbol) {
                (kind, state.define(symbol, name == "define"))
            } else {
                diagnostics.push(whole_line(ErrorCode::E0301));
                (kind, state.clone())
            }
        }
        "error" | "warning" => {
            let (kind, code) = if name == "error" {
                (SyntaxKind::ERROR_DIRECTIVE, ErrorCode::E0505)
            } else {
                (SyntaxKind::WARNING_DIRECTIVE, ErrorCode::E0506)
            };
            diagnostics.push(
                Diagnostic::builder(code)
                    .at(TextSize::new(0), line_len)
                    .arg(rest.trim())
                    .build(),
            );
            (kind, state.clone())
        }
        _ => {
            diagnostics.push(whole_line(ErrorCode::E0504));
            (SyntaxKind::BAD_DIRECTIVE, state.clone())
        }
    };

    DirectiveOutcome {
        kind,
        state: next,
        diagnostics,
    }
}

fn strip_comment(text: &str) -> &str {
    match text.find("//") {
        Some(index) => &text[..index],
        None => text,
    }
}

fn is_symbol(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c == '_' || unicode_ident::is_xid_start(c))
        && chars.all(unicode_ident::is_xid_continue)
}

/// Evaluate a conditional expression; malformed input reports E0503 and is false
fn evaluate(text: &str, offset: usize, state: &DirectiveState, diagnostics: &mut Vec<Diagnostic>) -> bool {
    let expr = strip_comment(text);
    let mut parser = ExprParser {
        text: expr,
        pos: 0,
        state,
    };
    let value = parser.parse_or();
    parser.skip_ws();
    match value {
        Some(value) if parser.pos == expr.len() => value,
        _ => {
            let trimmed_end = expr.trim_end().len();
            let start = TextSize::new(offset as u32);
            let len = TextSize::new(trimmed_end as u32);
            diagnostics.push(Diagnostic::new(ErrorCode::E0503, start, len));
            false
        }
    }
}

/// `||` < `&&` < `==`/`!=` < `!` < primary
struct ExprParser<'a> {
    text: &'a str,
    pos: usize,
    state: &'a DirectiveState,
}

impl ExprParser<'_> {
    fn skip_ws(&mut self) {
        let rest = &self.text[self.pos..];
        self.pos += rest.len() - rest.trim_start_matches([' ', '\t']).len();
    }

    fn eat(&mut self, op: &str) -> bool {
        self.skip_ws();
        if self.text[self.pos..].starts_with(op) {
            self.pos += op.len();
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Option<bool> {
        let mut value = self.parse_and()?;
        while self.eat("||") {
            let rhs = self.parse_and()?;
            value = value || rhs;
        }
        Some(value)
    }

    fn parse_and(&mut self) -> Option<bool> {
        let mut value = self.parse_eq()?;
        while self.eat("&&") {
            let rhs = self.parse_eq()?;
            value = value && rhs;
        }
        Some(value)
    }

    fn parse_eq(&mut self) -> Option<bool> {
        let mut value = self.parse_unary()?;
        loop {
            if self.eat("==") {
                let rhs = self.parse_unary()?;
                value = value == rhs;
            } else if self.eat("!=") {
                let rhs = self.parse_unary()?;
                value = value != rhs;
            } else {
                return Some(value);
            }
        }
    }

    fn parse_unary(&mut self) -> Option<bool> {
        self.skip_ws();
        let rest = &self.text[self.pos..];
        if rest.starts_with('!') && !rest.starts_with("!=") {
            self.pos += 1;
            return self.parse_unary().map(|v| !v);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<bool> {
        if self.eat("(") {
            let value = self.parse_or()?;
            return self.eat(")").then_some(value);
        }
        self.skip_ws();
        let rest = &self.text[self.pos..];
        let len = rest
            .char_indices()
            .find(|&(i, c)| !(c == '_' || (i == 0 && unicode_ident::is_xid_start(c)) || (i > 0 && unicode_ident::is_xid_continue(c))))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 {
            return None;
        }
        let word = &rest[..len];
        self.pos += len;
        Some(match word {
            "true" => true,
            "false" => false,
            symbol => self.state.is_defined(symbol),
        })
    }
}
