//! Incremental Tests - Concurrency
//!
//! Trees are immutable and share one token cache per lineage, so many
//! reparses of the same tree can run at once.

#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use rayon::prelude::*;

use quill::{SyntaxTree, TextChange, TextChangeSet, TextRange, TextSize};

use crate::helpers::source_fixtures::SMALL_FILE;
use crate::helpers::tree_assertions::{assert_incremental_matches_full, parse};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_tree_types_are_thread_safe() {
    assert_send_sync::<SyntaxTree>();
    assert_send_sync::<quill::SyntaxNode>();
    assert_send_sync::<quill::SyntaxToken>();
    assert_send_sync::<quill::GreenNode>();
}

#[test]
fn test_parallel_edits_of_one_tree() {
    let base = parse(SMALL_FILE);
    let len = SMALL_FILE.len() as u32;
    let edits: Vec<(u32, &str)> = (0..len)
        .step_by(5)
        .flat_map(|at| [(at, "x"), (at, "}"), (at, "\n#if A\n")])
        .collect();

    let trees: Vec<SyntaxTree> = edits
        .par_iter()
        .map(|&(at, text)| {
            let change = TextChange::insert(TextSize::new(at), text);
            base.apply_edits(&TextChangeSet::single(change)).unwrap()
        })
        .collect();

    trees.par_iter().for_each(assert_incremental_matches_full);
    assert_eq!(base.text(), SMALL_FILE);
    assert_eq!(base.root().text(), SMALL_FILE);
}

#[test]
fn test_parallel_chains_share_the_cache() {
    let base = parse("class C { }\n");
    let finals: Vec<SyntaxTree> = (0..8u32)
        .into_par_iter()
        .map(|n| {
            let mut tree = base.clone();
            for i in 0..=n {
                let at = TextSize::of(tree.text()) - TextSize::new(2);
                let member = format!("int f{i}; ");
                let change = TextChange::new(TextRange::empty(at), member);
                tree = tree.apply_edits(&TextChangeSet::single(change)).unwrap();
            }
            tree
        })
        .collect();

    for (n, tree) in finals.iter().enumerate() {
        assert_incremental_matches_full(tree);
        assert_eq!(tree.text().matches("int f").count(), n + 1);
    }
}
