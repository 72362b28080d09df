//! Token pooling.
//!
//! Identical short tokens with simple trivia are handed out as the same
//! `GreenToken`, so rescanning unchanged text after an edit produces
//! reference-equal tokens and the differencer can skip them.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::green::{GreenToken, Trivia};
use crate::parser::SyntaxKind;

const MAX_TEXT_LEN: usize = 32;
const MAX_TRIVIA_PIECES: usize = 2;
const MAX_TRIVIA_LEN: usize = 16;
const MAX_ENTRIES: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TokenKey {
    kind: SyntaxKind,
    text: SmolStr,
    leading: Box<[Trivia]>,
    trailing: Box<[Trivia]>,
}

/// Deduplicates green tokens across all trees of a lineage.
///
/// The cache only decides sharing, never content: a pooled token is
/// structurally equal to the one that would have been created.
#[derive(Debug, Default)]
pub struct TokenCache {
    tokens: Mutex<FxHashMap<TokenKey, GreenToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a token with the given parts, pooled when it is small and plain.
    pub fn token(&self, kind: SyntaxKind, text: &str, leading: Vec<Trivia>, trailing: Vec<Trivia>) -> GreenToken {
        if !is_poolable(text, &leading, &trailing) {
            return GreenToken::new(kind, text, leading, trailing);
        }
        let key = TokenKey {
            kind,
            text: SmolStr::new(text),
            leading: leading.into(),
            trailing: trailing.into(),
        };
        let mut tokens = self.tokens.lock();
        if let Some(existing) = tokens.get(&key) {
            return existing.clone();
        }
        let token = GreenToken::new(kind, key.text.clone(), key.leading.to_vec(), key.trailing.to_vec());
        if tokens.len() < MAX_ENTRIES {
            tokens.insert(key, token.clone());
        }
        token
    }

    /// Number of pooled tokens.
    pub fn len(&self) -> usize {
        self.tokens.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.lock().is_empty()
    }
}

fn is_poolable(text: &str, leading: &[Trivia], trailing: &[Trivia]) -> bool {
    let simple = |trivia: &[Trivia]| {
        trivia.len() <= MAX_TRIVIA_PIECES
            && trivia.iter().all(|piece| {
                matches!(piece.kind, SyntaxKind::WHITESPACE | SyntaxKind::END_OF_LINE)
                    && piece.text.len() <= MAX_TRIVIA_LEN
            })
    };
    text.len() <= MAX_TEXT_LEN && simple(leading) && simple(trailing)
}
