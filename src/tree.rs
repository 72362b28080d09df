//! Syntax trees over versioned text
//!
//! A [`SyntaxTree`] pairs a text snapshot with its green tree and directive
//! table. Editing never mutates: [`SyntaxTree::apply_edits`] returns a new tree
//! that shares every green node the edit did not disturb, and the old tree
//! stays fully usable.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::base::{EntryPoint, ParseOptions, TextChangeSet, TextError, TextSnapshot};
use crate::parser::{
    Blender, DirectiveState, DirectiveTable, LexicalContext, OldTree, ParseOutput, ParseStatus, ReuseStats,
    SyntaxDiagnostic, parse,
};
use crate::syntax::{GreenNode, SyntaxAnnotation, SyntaxElement, SyntaxNode, SyntaxToken, TokenCache, diff};

/// An immutable parse of one text snapshot
#[derive(Debug, Clone)]
pub struct SyntaxTree(Arc<TreeData>);

#[derive(Debug)]
struct TreeData {
    snapshot: TextSnapshot,
    options: ParseOptions,
    entry: EntryPoint,
    green: GreenNode,
    directives: DirectiveTable,
    status: ParseStatus,
    stats: ReuseStats,
    /// Shared by every tree of one lineage
    cache: Arc<TokenCache>,
    root: OnceLock<SyntaxNode>,
}

impl SyntaxTree {
    /// Parse `text` as a compilation unit
    pub fn parse(text: &str, options: ParseOptions) -> SyntaxTree {
        Self::parse_entry(text, options, EntryPoint::CompilationUnit)
    }

    /// Parse `text` starting from `entry`
    pub fn parse_entry(text: &str, options: ParseOptions, entry: EntryPoint) -> SyntaxTree {
        Self::parse_snapshot(TextSnapshot::new(text), options, entry)
    }

    /// Parse an existing snapshot from scratch
    pub fn parse_snapshot(snapshot: TextSnapshot, options: ParseOptions, entry: EntryPoint) -> SyntaxTree {
        let cache = Arc::new(TokenCache::new());
        let output = {
            let blender = Blender::new(snapshot.text(), &cache, initial_context(&options));
            parse(blender, &options, entry)
        };
        Self::from_output(snapshot, options, entry, cache, output)
    }

    fn from_output(
        snapshot: TextSnapshot,
        options: ParseOptions,
        entry: EntryPoint,
        cache: Arc<TokenCache>,
        output: ParseOutput,
    ) -> SyntaxTree {
        SyntaxTree(Arc::new(TreeData {
            snapshot,
            options,
            entry,
            green: output.green,
            directives: output.directives,
            status: output.status,
            stats: output.stats,
            cache,
            root: OnceLock::new(),
        }))
    }

    /// Apply `changes` to this tree's text and reparse incrementally
    pub fn apply_edits(&self, changes: &TextChangeSet) -> Result<SyntaxTree, TextError> {
        let snapshot = self.0.snapshot.apply(changes)?;
        Ok(self.reparse(snapshot, changes))
    }

    /// Reparse for a later snapshot of the same text, replaying its edit history
    pub fn with_snapshot(&self, snapshot: &TextSnapshot) -> Result<SyntaxTree, TextError> {
        let changes = TextSnapshot::change_ranges(&self.0.snapshot, snapshot)?;
        Ok(self.reparse(snapshot.clone(), &changes))
    }

    fn reparse(&self, snapshot: TextSnapshot, changes: &TextChangeSet) -> SyntaxTree {
        let data = &self.0;
        let old = OldTree {
            root: &data.green,
            text: data.snapshot.text(),
            directives: &data.directives,
        };
        let output = {
            let blender = Blender::incremental(
                old,
                changes,
                snapshot.text(),
                &data.cache,
                initial_context(&data.options),
            );
            parse(blender, &data.options, data.entry)
        };
        debug!(
            "[REPARSE] {} change(s), version {} -> {}: {} reused nodes, {} reused tokens, {} scanned",
            changes.len(),
            data.snapshot.version(),
            snapshot.version(),
            output.stats.reused_nodes,
            output.stats.reused_tokens,
            output.stats.scanned_tokens
        );
        Self::from_output(snapshot, data.options.clone(), data.entry, data.cache.clone(), output)
    }

    pub fn text(&self) -> &str {
        self.0.snapshot.text()
    }

    pub fn snapshot(&self) -> &TextSnapshot {
        &self.0.snapshot
    }

    pub fn options(&self) -> &ParseOptions {
        &self.0.options
    }

    pub fn entry(&self) -> EntryPoint {
        self.0.entry
    }

    pub fn green(&self) -> &GreenNode {
        &self.0.green
    }

    /// Red root, created on first use and shared by later calls
    pub fn root(&self) -> SyntaxNode {
        self.0
            .root
            .get_or_init(|| SyntaxNode::new_root(self.0.green.clone()))
            .clone()
    }

    /// Every diagnostic in the tree, in source order
    pub fn diagnostics(&self) -> Vec<SyntaxDiagnostic> {
        self.root().diagnostics()
    }

    pub fn directives(&self) -> &DirectiveTable {
        &self.0.directives
    }

    pub fn status(&self) -> ParseStatus {
        self.0.status
    }

    /// What the parse that produced this tree reused
    pub fn reuse_stats(&self) -> ReuseStats {
        self.0.stats
    }

    /// A tree identical to this one except that `node` carries `annotation`.
    /// Returns `None` if `node` does not belong to this tree.
    pub fn with_node_annotation(&self, node: &SyntaxNode, annotation: SyntaxAnnotation) -> Option<SyntaxTree> {
        if !self.owns(node) {
            return None;
        }
        let green = node.replace_with(node.green().with_annotation(annotation));
        Some(self.with_green(green))
    }

    /// A tree identical to this one except that `token` carries `annotation`.
    /// Returns `None` if `token` does not belong to this tree.
    pub fn with_token_annotation(&self, token: &SyntaxToken, annotation: SyntaxAnnotation) -> Option<SyntaxTree> {
        let parent = token.parent()?;
        if !self.owns(&parent) {
            return None;
        }
        let green = token.replace_with(token.green().with_annotation(annotation));
        Some(self.with_green(green))
    }

    fn owns(&self, node: &SyntaxNode) -> bool {
        node.root().green().ptr_eq(&self.0.green)
    }

    fn with_green(&self, green: GreenNode) -> SyntaxTree {
        let data = &self.0;
        SyntaxTree(Arc::new(TreeData {
            snapshot: data.snapshot.clone(),
            options: data.options.clone(),
            entry: data.entry,
            green,
            directives: data.directives.clone(),
            status: data.status,
            stats: data.stats,
            cache: data.cache.clone(),
            root: OnceLock::new(),
        }))
    }
}

fn initial_context(options: &ParseOptions) -> LexicalContext {
    LexicalContext::start_of_file(DirectiveState::with_symbols(&options.preprocessor_symbols))
}

/// Elements of `new` that differ from `old`, in pre-order
pub fn diff_trees(old: &SyntaxTree, new: &SyntaxTree) -> Vec<SyntaxElement> {
    diff(&old.root(), &new.root())
}
