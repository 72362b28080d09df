//! Logos-based scanner
//!
//! [`Scanner::scan`] produces exactly one token, with its leading and
//! trailing trivia, from a position and an explicit [`LexicalContext`]. The
//! result depends only on the text from that position on, never on anything
//! before it, which is what lets the blender restart scanning anywhere.
//!
//! - Leading trivia: everything between the previous token and this one,
//!   including directive lines and disabled text.
//! - Trailing trivia: whitespace and comments on the same line, up to and
//!   including the line break.

use logos::Logos;
use text_size::{TextRange, TextSize};

use super::SyntaxKind;
use super::directives::{DirectiveEntry, DirectiveState, is_conditional_directive, process_directive};
use super::errors::{Diagnostic, ErrorCode};
use crate::base::ParseOptions;
use crate::syntax::{GreenToken, TokenCache, Trivia};

/// How many characters past a token's full end the scanner may look.
///
/// Trailing trivia peeks at `//` or `/*`, and a number peeks at `.` and the
/// digit after it. An edit further away than this from a token cannot change
/// how the token scans.
pub const LOOKAHEAD: usize = 2;

/// Offset just past the text the scanner may read after a token ending at `end`.
///
/// Trailing trivia stops at a line feed without looking further. Within
/// [`LOOKAHEAD`] characters of the end of `text` the bound lies past the end,
/// so that text appended there counts as read.
pub fn lookahead_end(text: &str, end: TextSize) -> TextSize {
    let at = usize::from(end);
    if text.get(..at).is_some_and(|before| before.ends_with('\n')) {
        return end;
    }
    let rest = text.get(at..).unwrap_or("");
    let mut chars = rest.chars();
    let mut limit = end;
    for _ in 0..LOOKAHEAD {
        match chars.next() {
            Some(c) => limit += TextSize::of(c),
            None => return limit + TextSize::new(1),
        }
    }
    limit
}

/// Everything about the text before a position that affects scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalContext {
    pub directives: DirectiveState,
    /// Only whitespace precedes the position on its line
    pub at_line_start: bool,
}

impl LexicalContext {
    pub fn start_of_file(directives: DirectiveState) -> Self {
        Self {
            directives,
            at_line_start: true,
        }
    }
}

/// One scanned token
#[derive(Debug, Clone)]
pub struct Scan {
    pub token: GreenToken,
    /// Full end of the token
    pub end: TextSize,
    /// Context right after the token
    pub context: LexicalContext,
    /// Directives found in the token's leading trivia
    pub directives: Vec<DirectiveEntry>,
}

/// Scans tokens out of one text, pooling them through a shared cache
pub struct Scanner<'a> {
    text: &'a str,
    cache: &'a TokenCache,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str, cache: &'a TokenCache) -> Self {
        Self { text, cache }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Scan the token whose full text starts at `pos`
    pub fn scan(&self, pos: TextSize, context: &LexicalContext) -> Scan {
        let start = usize::from(pos);
        let mut token = TokenScan {
            text: self.text,
            start,
            cursor: start,
            state: context.directives.clone(),
            line_start: context.at_line_start,
            leading: Vec::new(),
            trailing: Vec::new(),
            diagnostics: Vec::new(),
            entries: Vec::new(),
        };

        token.leading_trivia();
        let text_start = token.cursor;
        let kind = token.token_body();
        let text_end = token.cursor;
        if kind != SyntaxKind::EOF {
            token.trailing_trivia();
        }

        let end = token.cursor;
        let at_line_start = if end > start {
            self.text[..end].ends_with(['\n', '\r'])
        } else {
            context.at_line_start
        };
        let text = &self.text[text_start..text_end];
        let green = if token.diagnostics.is_empty() {
            self.cache.token(kind, text, token.leading, token.trailing)
        } else {
            GreenToken::new_with_diagnostics(kind, text, token.leading, token.trailing, token.diagnostics)
        };

        Scan {
            token: green,
            end: TextSize::new(end as u32),
            context: LexicalContext {
                directives: token.state,
                at_line_start,
            },
            directives: token.entries,
        }
    }
}

/// Tokenize an entire string, end-of-file token included
pub fn tokenize(text: &str, options: &ParseOptions) -> Vec<GreenToken> {
    let cache = TokenCache::new();
    let scanner = Scanner::new(text, &cache);
    let mut context = LexicalContext::start_of_file(DirectiveState::with_symbols(&options.preprocessor_symbols));
    let mut pos = TextSize::new(0);
    let mut tokens = Vec::new();
    loop {
        let scan = scanner.scan(pos, &context);
        let done = scan.token.kind() == SyntaxKind::EOF;
        tokens.push(scan.token);
        if done {
            return tokens;
        }
        pos = scan.end;
        context = scan.context;
    }
}

// ============================================================================
// Token assembly
// ============================================================================

struct TokenScan<'a> {
    text: &'a str,
    start: usize,
    cursor: usize,
    state: DirectiveState,
    line_start: bool,
    leading: Vec<Trivia>,
    trailing: Vec<Trivia>,
    diagnostics: Vec<Diagnostic>,
    entries: Vec<DirectiveEntry>,
}

fn is_whitespace(c: char) -> bool {
    c != '\r' && c != '\n' && c.is_whitespace()
}

fn line_end(rest: &str) -> usize {
    rest.find(['\r', '\n']).unwrap_or(rest.len())
}

fn eol_len(rest: &str) -> usize {
    if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with(['\r', '\n']) {
        1
    } else {
        0
    }
}

fn size(n: usize) -> TextSize {
    TextSize::new(n as u32)
}

impl<'a> TokenScan<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.cursor..]
    }

    /// Diagnostic over `[from, from + len)`, both absolute
    fn report(&mut self, code: ErrorCode, from: usize, len: usize) {
        self.diagnostics
            .push(Diagnostic::new(code, size(from - self.start), size(len)));
    }

    fn push_leading(&mut self, kind: SyntaxKind, len: usize) {
        let piece = &self.text[self.cursor..self.cursor + len];
        match self.leading.last_mut() {
            Some(last) if kind == SyntaxKind::DISABLED_TEXT && last.kind == SyntaxKind::DISABLED_TEXT => {
                let mut merged = last.text.to_string();
                merged.push_str(piece);
                last.text = merged.into();
            }
            _ => self.leading.push(Trivia::new(kind, piece)),
        }
        self.cursor += len;
    }

    fn leading_trivia(&mut self) {
        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return;
            }

            if !self.state.is_active() {
                let line_len = line_end(rest);
                let line = rest[..line_len].trim_start_matches(is_whitespace);
                if !self.line_start || !is_conditional_directive(line) {
                    let len = line_len + eol_len(&rest[line_len..]);
                    self.push_leading(SyntaxKind::DISABLED_TEXT, len);
                    self.line_start = true;
                    continue;
                }
            }

            let Some(c) = rest.chars().next() else {
                return;
            };
            if is_whitespace(c) {
                let len = rest.find(|c: char| !is_whitespace(c)).unwrap_or(rest.len());
                self.push_leading(SyntaxKind::WHITESPACE, len);
            } else if eol_len(rest) > 0 {
                let len = eol_len(rest);
                self.push_leading(SyntaxKind::END_OF_LINE, len);
                self.line_start = true;
            } else if rest.starts_with("//") {
                let len = line_end(rest);
                self.push_leading(SyntaxKind::SINGLE_LINE_COMMENT, len);
                self.line_start = false;
            } else if rest.starts_with("/*") {
                let len = self.block_comment();
                self.push_leading(SyntaxKind::MULTI_LINE_COMMENT, len);
                self.line_start = false;
            } else if c == '#' && self.line_start {
                self.directive();
            } else {
                return;
            }
        }
    }

    fn trailing_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let Some(c) = rest.chars().next() else {
                return;
            };
            let (kind, len) = if is_whitespace(c) {
                let len = rest.find(|c: char| !is_whitespace(c)).unwrap_or(rest.len());
                (SyntaxKind::WHITESPACE, len)
            } else if rest.starts_with("//") {
                (SyntaxKind::SINGLE_LINE_COMMENT, line_end(rest))
            } else if rest.starts_with("/*") {
                (SyntaxKind::MULTI_LINE_COMMENT, self.block_comment())
            } else {
                let len = eol_len(rest);
                if len > 0 {
                    self.trailing.push(Trivia::new(SyntaxKind::END_OF_LINE, &rest[..len]));
                    self.cursor += len;
                }
                return;
            };
            self.trailing.push(Trivia::new(kind, &rest[..len]));
            self.cursor += len;
        }
    }

    /// Length of the block comment at the cursor; reports it if unterminated
    fn block_comment(&mut self) -> usize {
        let rest = self.rest();
        match rest[2..].find("*/") {
            Some(index) => index + 4,
            None => {
                let len = rest.len();
                self.report(ErrorCode::E0103, self.cursor, len);
                len
            }
        }
    }

    fn directive(&mut self) {
        let rest = self.rest();
        let line_len = line_end(rest);
        let len = line_len + eol_len(&rest[line_len..]);
        let outcome = process_directive(&rest[..line_len], &self.state);

        let directive_start = self.cursor;
        let shift = size(directive_start - self.start);
        self.diagnostics.extend(outcome.diagnostics.into_iter().map(|d| Diagnostic {
            offset: d.offset + shift,
            ..d
        }));
        self.push_leading(outcome.kind, len);
        self.entries.push(DirectiveEntry {
            kind: outcome.kind,
            range: TextRange::new(size(directive_start), size(self.cursor)),
            state_after: outcome.state.clone(),
        });
        self.state = outcome.state;
        self.line_start = true;
    }

    fn token_body(&mut self) -> SyntaxKind {
        let rest = self.rest();
        let Some(first) = rest.chars().next() else {
            if let Some(closer) = self.state.expected_closer() {
                self.diagnostics.push(
                    Diagnostic::builder(ErrorCode::E0501)
                        .at(size(self.cursor - self.start), TextSize::new(0))
                        .arg(closer)
                        .build(),
                );
            }
            return SyntaxKind::EOF;
        };

        let mut lexer = LogosToken::lexer(rest);
        let (kind, len, error) = match lexer.next() {
            Some(Ok(token)) => {
                let len = lexer.span().end;
                let kind = match SyntaxKind::from(token) {
                    SyntaxKind::IDENT if token == LogosToken::Ident => {
                        SyntaxKind::from_keyword(&rest[..len]).unwrap_or(SyntaxKind::IDENT)
                    }
                    kind => kind,
                };
                let error = token.error_code().or_else(|| {
                    (kind == SyntaxKind::CHAR_LITERAL && &rest[..len] == "''").then_some(ErrorCode::E0104)
                });
                (kind, len, error)
            }
            _ if first == '_' || unicode_ident::is_xid_start(first) => {
                let len = first.len_utf8()
                    + rest[first.len_utf8()..]
                        .chars()
                        .take_while(|c| unicode_ident::is_xid_continue(*c))
                        .map(char::len_utf8)
                        .sum::<usize>();
                (SyntaxKind::IDENT, len, None)
            }
            _ => {
                let len = first.len_utf8();
                self.diagnostics.push(
                    Diagnostic::builder(ErrorCode::E0101)
                        .at(size(self.cursor - self.start), size(len))
                        .arg(first.to_string())
                        .build(),
                );
                (SyntaxKind::BAD_TOKEN, len, None)
            }
        };
        if let Some(code) = error {
            self.report(code, self.cursor, len);
        }
        self.cursor += len;
        kind
    }
}

// ============================================================================
// Raw tokens
// ============================================================================

/// Whether a delimited literal found its closing delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Closed,
    Unclosed,
}

/// Logos token enum - maps to SyntaxKind
///
/// Trivia never reach logos: the scanner consumes them itself, because
/// whether `#` starts a directive depends on the lexical context.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // IDENTIFIERS AND LITERALS
    // =========================================================================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", ident_tail)]
    Ident,

    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*", ident_tail)]
    VerbatimIdent,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+")]
    Real,

    #[token("\"", regular_string)]
    String(Termination),

    #[token("@\"", verbatim_string)]
    VerbatimString(Termination),

    #[token("$\"", interpolated_string)]
    InterpolatedString(Termination),

    #[token("'", char_literal)]
    Char(Termination),

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("+=")]
    PlusEq,
    #[token("++")]
    PlusPlus,
    #[token("-")]
    Minus,
    #[token("-=")]
    MinusEq,
    #[token("--")]
    MinusMinus,
    #[token("*")]
    Star,
    #[token("*=")]
    StarEq,
    #[token("/")]
    Slash,
    #[token("/=")]
    SlashEq,
    #[token("%")]
    Percent,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
}

impl LogosToken {
    /// Lexical error carried by the token itself
    fn error_code(self) -> Option<ErrorCode> {
        match self {
            Self::String(Termination::Unclosed)
            | Self::VerbatimString(Termination::Unclosed)
            | Self::InterpolatedString(Termination::Unclosed) => Some(ErrorCode::E0102),
            Self::Char(Termination::Unclosed) => Some(ErrorCode::E0104),
            _ => None,
        }
    }
}

fn ident_tail(lex: &mut logos::Lexer<LogosToken>) -> bool {
    let extra: usize = lex
        .remainder()
        .chars()
        .take_while(|c| unicode_ident::is_xid_continue(*c))
        .map(char::len_utf8)
        .sum();
    lex.bump(extra);
    true
}

/// `"..."` with backslash escapes, ending at the line break
fn regular_string(lex: &mut logos::Lexer<LogosToken>) -> Termination {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if !matches!(bytes.get(i + 1), None | Some(b'\r') | Some(b'\n')) => i += 2,
            b'"' => {
                lex.bump(i + 1);
                return Termination::Closed;
            }
            b'\r' | b'\n' => {
                lex.bump(i);
                return Termination::Unclosed;
            }
            _ => i += 1,
        }
    }
    lex.bump(bytes.len());
    Termination::Unclosed
}

/// `@"..."` where `""` is a quote; may span lines
fn verbatim_string(lex: &mut logos::Lexer<LogosToken>) -> Termination {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            lex.bump(i + 1);
            return Termination::Closed;
        }
        i += 1;
    }
    lex.bump(bytes.len());
    Termination::Unclosed
}

/// `$"..."`: quotes inside `{...}` holes belong to nested strings
fn interpolated_string(lex: &mut logos::Lexer<LogosToken>) -> Termination {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' | b'\n' => {
                lex.bump(i);
                return Termination::Unclosed;
            }
            b'\\' if depth == 0 && !matches!(bytes.get(i + 1), None | Some(b'\r') | Some(b'\n')) => {
                i += 2;
                continue;
            }
            b'{' if depth == 0 && bytes.get(i + 1) == Some(&b'{') => {
                i += 2;
                continue;
            }
            b'}' if depth == 0 && bytes.get(i + 1) == Some(&b'}') => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' if depth > 0 => depth -= 1,
            b'"' if depth == 0 => {
                lex.bump(i + 1);
                return Termination::Closed;
            }
            b'"' => {
                // Nested regular string inside a hole
                i += 1;
                while i < bytes.len() && !matches!(bytes[i], b'"' | b'\r' | b'\n') {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                if i >= bytes.len() || bytes[i] != b'"' {
                    let end = i.min(bytes.len());
                    lex.bump(end);
                    return Termination::Unclosed;
                }
            }
            _ => {}
        }
        i += 1;
    }
    lex.bump(bytes.len());
    Termination::Unclosed
}

/// `'c'` or `'\n'`
fn char_literal(lex: &mut logos::Lexer<LogosToken>) -> Termination {
    let bytes = lex.remainder().as_bytes();
    let start = match (bytes.first(), bytes.get(1)) {
        (Some(b'\\'), Some(b'\r' | b'\n')) => 1,
        (Some(b'\\'), Some(_)) => 2,
        _ => 0,
    };
    for (i, byte) in bytes.iter().enumerate().skip(start) {
        match byte {
            b'\'' => {
                lex.bump(i + 1);
                return Termination::Closed;
            }
            b'\r' | b'\n' => {
                lex.bump(i);
                return Termination::Unclosed;
            }
            _ => {}
        }
    }
    lex.bump(bytes.len());
    Termination::Unclosed
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Ident | LogosToken::VerbatimIdent => SyntaxKind::IDENT,
            LogosToken::Int => SyntaxKind::INT_LITERAL,
            LogosToken::Real => SyntaxKind::REAL_LITERAL,
            LogosToken::String(_) => SyntaxKind::STRING_LITERAL,
            LogosToken::VerbatimString(_) => SyntaxKind::VERBATIM_STRING_LITERAL,
            LogosToken::InterpolatedString(_) => SyntaxKind::INTERPOLATED_STRING,
            LogosToken::Char(_) => SyntaxKind::CHAR_LITERAL,

            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Question => SyntaxKind::QUESTION,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::BangEq => SyntaxKind::BANG_EQ,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::PlusEq => SyntaxKind::PLUS_EQ,
            LogosToken::PlusPlus => SyntaxKind::PLUS_PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::MinusEq => SyntaxKind::MINUS_EQ,
            LogosToken::MinusMinus => SyntaxKind::MINUS_MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::StarEq => SyntaxKind::STAR_EQ,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::SlashEq => SyntaxKind::SLASH_EQ,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::AmpAmp => SyntaxKind::AMP_AMP,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,
        }
    }
}
