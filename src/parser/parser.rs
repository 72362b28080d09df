//! Recursive descent parser
//!
//! Builds a green tree from the blender's slot buffer. The cursor is a slot
//! index, so speculation is a saved index and a rewind. Error recovery never
//! fails the parse: missing tokens are synthesised with a diagnostic and
//! unusable tokens are wrapped in SKIPPED_TOKENS nodes.

use tracing::debug;

use super::blender::{Blender, ReuseStats};
use super::directives::DirectiveTable;
use super::errors::{Diagnostic, ErrorCode, ParseContext};
use super::grammar::{
    ExpressionParser, ItemParser, StatementParser, parse_compilation_unit, parse_expression, parse_member,
    parse_statement,
};
use super::syntax_kind::{SyntaxKind, kind_to_name};
use crate::base::{EntryPoint, ParseOptions};
use crate::parser::errors::{is_expression_start, is_member_start, is_statement_start};
use crate::syntax::{Checkpoint, GreenElement, GreenNode, GreenNodeBuilder, GreenToken};

/// How the parse ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseStatus {
    #[default]
    Complete,
    /// A required token was missing at end of input
    UnexpectedEndOfInput,
}

/// Everything a parse produces
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub green: GreenNode,
    pub status: ParseStatus,
    pub directives: DirectiveTable,
    pub stats: ReuseStats,
}

/// Parse everything the blender yields, starting at `entry`
pub fn parse(blender: Blender<'_>, options: &ParseOptions, entry: EntryPoint) -> ParseOutput {
    let mut parser = Parser::new(blender, options);
    match entry {
        EntryPoint::CompilationUnit => parse_compilation_unit(&mut parser),
        EntryPoint::Member => parser.parse_fragment(|p| {
            let kind = p.current_kind();
            if is_member_start(kind) {
                parse_member(p);
            }
        }),
        EntryPoint::Statement => parser.parse_fragment(|p| {
            let kind = p.current_kind();
            if is_statement_start(kind) {
                parse_statement(p);
            }
        }),
        EntryPoint::Expression => parser.parse_fragment(|p| {
            let kind = p.current_kind();
            if is_expression_start(kind) {
                parse_expression(p);
            }
        }),
    }
    parser.finish(entry)
}

/// The parser state
struct Parser<'a> {
    blender: Blender<'a>,
    options: &'a ParseOptions,
    pos: usize,
    builder: GreenNodeBuilder,
    contexts: Vec<ParseContext>,
    speculation: usize,
    status: ParseStatus,
}

impl<'a> Parser<'a> {
    fn new(blender: Blender<'a>, options: &'a ParseOptions) -> Self {
        Self {
            blender,
            options,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            contexts: Vec::new(),
            speculation: 0,
            status: ParseStatus::Complete,
        }
    }

    fn finish(self, entry: EntryPoint) -> ParseOutput {
        let green = self.builder.finish();
        let stats = self.blender.stats();
        debug!(
            "[PARSE] {:?}: {} bytes, {:?}, {} scanned / {} reused tokens / {} reused nodes",
            entry,
            u32::from(green.full_width()),
            self.status,
            stats.scanned_tokens,
            stats.reused_tokens,
            stats.reused_nodes
        );
        ParseOutput {
            green,
            status: self.status,
            directives: self.blender.into_directives(),
            stats,
        }
    }

    /// FRAGMENT = production SKIPPED_TOKENS? EOF
    fn parse_fragment(&mut self, production: impl FnOnce(&mut Self)) {
        self.start_node(SyntaxKind::FRAGMENT);
        production(self);
        self.skip_to_recovery();
        self.bump();
        self.finish_node();
    }

    fn current_element(&mut self) -> GreenElement {
        self.blender.slot(self.pos).element.clone()
    }

    fn current_token(&mut self) -> Option<GreenToken> {
        self.blender.slot(self.pos).first_token()
    }
}

// =============================================================================
// Grammar trait implementations
// =============================================================================

impl ExpressionParser for Parser<'_> {
    fn current_kind(&mut self) -> SyntaxKind {
        self.blender.slot(self.pos).kind()
    }

    fn current_text(&mut self) -> String {
        self.current_token().map(|t| t.text().to_string()).unwrap_or_default()
    }

    fn nth(&mut self, n: usize) -> SyntaxKind {
        self.blender.slot(self.pos + n).kind()
    }

    fn bump(&mut self) {
        if self.speculation == 0 {
            let element = self.current_element();
            self.builder.push(element);
        }
        self.pos += 1;
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let code = if kind == SyntaxKind::IDENT {
            ErrorCode::E0301
        } else {
            ErrorCode::E0201
        };
        self.missing(kind, code);
        false
    }

    fn missing(&mut self, kind: SyntaxKind, code: ErrorCode) {
        if self.speculation > 0 {
            return;
        }
        let mut diagnostic = Diagnostic::builder(code);
        if code == ErrorCode::E0201 {
            diagnostic = diagnostic.arg(kind_to_name(kind));
        }
        if self.at(SyntaxKind::EOF) {
            self.status = ParseStatus::UnexpectedEndOfInput;
        }
        self.builder.token(GreenToken::missing(kind, diagnostic.build()));
    }

    fn begin_speculation(&mut self) -> usize {
        self.speculation += 1;
        self.pos
    }

    fn end_speculation(&mut self, pos: usize) {
        self.speculation = self.speculation.saturating_sub(1);
        self.pos = pos;
    }

    fn skip(&mut self) {
        if self.current_kind() != SyntaxKind::EOF {
            self.pos += 1;
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind);
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind);
    }
}

impl StatementParser for Parser<'_> {
    fn try_reuse(&mut self, kinds: &[SyntaxKind]) -> bool {
        if self.speculation > 0 {
            return false;
        }
        match self.blender.try_reuse_node(self.pos, kinds) {
            Some(node) => {
                self.builder.node(node);
                self.pos += 1;
                true
            }
            None => false,
        }
    }

    fn push_context(&mut self, context: ParseContext) {
        self.contexts.push(context);
    }

    fn pop_context(&mut self) {
        self.contexts.pop();
    }

    fn skip_to_recovery(&mut self) -> bool {
        let mut skipped = Vec::new();
        loop {
            let kind = self.current_kind();
            if kind == SyntaxKind::EOF || self.contexts.iter().any(|c| c.is_recovery_point(kind)) {
                break;
            }
            let element: GreenElement = match self.current_element() {
                GreenElement::Token(token) if skipped.is_empty() => token
                    .with_diagnostic(
                        Diagnostic::builder(ErrorCode::E0901)
                            .at(token.leading_width(), token.text_width())
                            .arg(kind_to_name(kind))
                            .build(),
                    )
                    .into(),
                element => element,
            };
            skipped.push(element);
            self.pos += 1;
        }

        if skipped.is_empty() {
            return false;
        }
        self.builder.start_node(SyntaxKind::SKIPPED_TOKENS);
        for element in skipped {
            self.builder.push(element);
        }
        self.builder.finish_node();
        true
    }
}

impl ItemParser for Parser<'_> {
    fn records_enabled(&self) -> bool {
        self.options.language_version.supports_records()
    }
}
