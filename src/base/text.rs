//! Versioned, immutable source text.
//!
//! A [`TextSnapshot`] remembers (weakly) the snapshot it was derived from and
//! the [`TextChangeSet`] that produced it, so that the edits between two
//! versions of a document can be recovered without diffing the text.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use text_size::{TextRange, TextSize};
use thiserror::Error;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);
static NEXT_LINEAGE: AtomicU64 = AtomicU64::new(1);

/// Errors produced when a caller hands the text buffer inconsistent input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// Changes are not sorted by start offset, or two changes overlap.
    #[error("change {index} starts before the end of the previous change")]
    InvalidChangeOrdering { index: usize },

    /// A change span reaches past the end of the text.
    #[error("change {range:?} is out of bounds for text of length {len:?}")]
    ChangeOutOfBounds { range: TextRange, len: TextSize },

    /// A change span splits a UTF-8 encoded character.
    #[error("change {range:?} does not fall on character boundaries")]
    NotCharBoundary { range: TextRange },

    /// The newer snapshot is not derived from the older one.
    #[error("snapshot version {new} is not derived from version {old}")]
    StaleSnapshot { old: u64, new: u64 },
}

/// A single replacement: `span` (in the old text) becomes `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextChange {
    pub span: TextRange,
    pub new_text: String,
}

impl TextChange {
    pub fn new(span: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(span: TextRange) -> Self {
        Self::new(span, String::new())
    }

    /// Length of the inserted text
    pub fn new_len(&self) -> TextSize {
        TextSize::of(self.new_text.as_str())
    }

    /// Signed length difference introduced by this change
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(self.new_len())) - i64::from(u32::from(self.span.len()))
    }
}

/// An ordered, non-overlapping sequence of changes applied atomically.
///
/// Spans refer to the text *before* any change of the set is applied.
/// Touching changes (`prev.end == next.start`) are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextChangeSet {
    changes: Vec<TextChange>,
}

impl TextChangeSet {
    pub fn new(changes: Vec<TextChange>) -> Result<Self, TextError> {
        for (index, pair) in changes.windows(2).enumerate() {
            if pair[1].span.start() < pair[0].span.end() {
                return Err(TextError::InvalidChangeOrdering { index: index + 1 });
            }
        }
        Ok(Self { changes })
    }

    pub fn single(change: TextChange) -> Self {
        Self {
            changes: vec![change],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextChange> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[TextChange] {
        &self.changes
    }

    /// Pairs of (old span, new range) for every change, in order
    pub fn spans(&self) -> Vec<(TextRange, TextRange)> {
        let mut delta: i64 = 0;
        self.changes
            .iter()
            .map(|change| {
                let new_start = shift(change.span.start(), delta);
                delta += change.delta();
                (change.span, TextRange::at(new_start, change.new_len()))
            })
            .collect()
    }

    /// Apply the changes to `text`, checking bounds and character boundaries
    pub fn apply_to(&self, text: &str) -> Result<String, TextError> {
        let len = TextSize::of(text);
        let mut out = String::with_capacity(text.len());
        let mut last = 0usize;
        for change in &self.changes {
            if change.span.end() > len {
                return Err(TextError::ChangeOutOfBounds {
                    range: change.span,
                    len,
                });
            }
            let start = usize::from(change.span.start());
            let end = usize::from(change.span.end());
            if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
                return Err(TextError::NotCharBoundary { range: change.span });
            }
            out.push_str(&text[last..start]);
            out.push_str(&change.new_text);
            last = end;
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}

fn shift(offset: TextSize, delta: i64) -> TextSize {
    TextSize::new((i64::from(u32::from(offset)) + delta) as u32)
}

#[derive(Debug)]
struct SnapshotData {
    text: Arc<str>,
    version: u64,
    lineage: u64,
    origin: Option<Origin>,
}

#[derive(Debug)]
struct Origin {
    base: Weak<SnapshotData>,
    base_version: u64,
    changes: TextChangeSet,
}

/// An immutable version of a document's text.
///
/// Cloning is cheap. Versions increase monotonically across the process, so a
/// snapshot derived from another always has the larger version.
#[derive(Debug, Clone)]
pub struct TextSnapshot(Arc<SnapshotData>);

impl TextSnapshot {
    /// Create the first snapshot of a new lineage
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(Arc::new(SnapshotData {
            text: text.into(),
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
            lineage: NEXT_LINEAGE.fetch_add(1, Ordering::Relaxed),
            origin: None,
        }))
    }

    pub fn text(&self) -> &str {
        &self.0.text
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(&*self.0.text)
    }

    pub fn is_empty(&self) -> bool {
        self.0.text.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.0.version
    }

    /// Identifier shared by all snapshots derived from the same original
    pub fn lineage(&self) -> u64 {
        self.0.lineage
    }

    pub fn ptr_eq(&self, other: &TextSnapshot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Derive a new snapshot by applying `changes`
    pub fn apply(&self, changes: &TextChangeSet) -> Result<TextSnapshot, TextError> {
        let text = changes.apply_to(self.text())?;
        Ok(Self(Arc::new(SnapshotData {
            text: text.into(),
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
            lineage: self.0.lineage,
            origin: Some(Origin {
                base: Arc::downgrade(&self.0),
                base_version: self.0.version,
                changes: changes.clone(),
            }),
        })))
    }

    /// Reconstruct the changes that turn `old` into `new`.
    ///
    /// A direct child yields the recorded change set. Several hops collapse to
    /// one change covering everything touched. If an intermediate snapshot has
    /// been dropped the whole text is reported as replaced.
    pub fn change_ranges(old: &TextSnapshot, new: &TextSnapshot) -> Result<TextChangeSet, TextError> {
        let stale = || TextError::StaleSnapshot {
            old: old.version(),
            new: new.version(),
        };
        if old.lineage() != new.lineage() || new.version() < old.version() {
            return Err(stale());
        }
        if old.ptr_eq(new) {
            return Ok(TextChangeSet::default());
        }

        // Newest hop first
        let mut hops: Vec<TextChangeSet> = Vec::new();
        let mut current = new.0.clone();
        loop {
            let Some(origin) = &current.origin else {
                return Err(stale());
            };
            if origin.base_version < old.version() {
                return Err(stale());
            }
            hops.push(origin.changes.clone());
            if origin.base_version == old.version() {
                break;
            }
            match origin.base.upgrade() {
                Some(base) => current = base,
                None => {
                    return Ok(TextChangeSet::single(TextChange::new(
                        TextRange::up_to(old.len()),
                        new.text(),
                    )));
                }
            }
        }

        if hops.len() == 1 {
            return Ok(hops.pop().unwrap_or_default());
        }
        hops.reverse();
        Ok(collapse(&hops, new.text()))
    }
}

impl PartialEq for TextSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TextSnapshot {}

/// Bounding box of one hop: (start, old end, new end)
fn bounding_box(set: &TextChangeSet) -> Option<(i64, i64, i64)> {
    let first = set.as_slice().first()?;
    let last = set.as_slice().last()?;
    let delta: i64 = set.iter().map(TextChange::delta).sum();
    let start = i64::from(u32::from(first.span.start()));
    let end = i64::from(u32::from(last.span.end()));
    Some((start, end, end + delta))
}

fn collapse(hops: &[TextChangeSet], new_text: &str) -> TextChangeSet {
    // Composed change: old [start, old_end) became [start, cur_end) in the latest text
    let mut composed: Option<(i64, i64, i64)> = None;
    for hop in hops {
        let Some((s, t, u)) = bounding_box(hop) else {
            continue;
        };
        composed = Some(match composed {
            None => (s, t, u),
            Some((start, old_end, cur_end)) => {
                let delta = cur_end - old_end;
                let new_start = start.min(s);
                let new_old_end = if t > cur_end { t - delta } else { old_end };
                let new_cur_end = if cur_end >= t { cur_end + (u - t) } else { u };
                (new_start, new_old_end, new_cur_end)
            }
        });
    }
    match composed {
        None => TextChangeSet::default(),
        Some((start, old_end, cur_end)) => TextChangeSet::single(TextChange::new(
            TextRange::new(TextSize::new(start as u32), TextSize::new(old_end as u32)),
            &new_text[start as usize..cur_end as usize],
        )),
    }
}
