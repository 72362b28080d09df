//! Line/column positions for rendering diagnostics.

use text_size::{TextRange, TextSize};

/// A 0-indexed line/column pair; `col` counts bytes from the line start
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// A span in line/column coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: LineCol,
    pub end: LineCol,
}

impl Span {
    /// Check if a position falls within this span
    pub fn contains(&self, position: LineCol) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Pre-computed line starts for offset to line/column conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// `line_starts[n]` is the offset of line n; `line_starts[0]` is always 0
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    /// `\n`, `\r\n` and a lone `\r` all end a line
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 2;
                    line_starts.push(TextSize::new(i as u32));
                }
                b'\n' | b'\r' => {
                    i += 1;
                    line_starts.push(TextSize::new(i as u32));
                }
                _ => i += 1,
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        LineCol {
            line: line as u32,
            col: u32::from(offset - self.line_starts[line]),
        }
    }

    pub fn span(&self, range: TextRange) -> Span {
        Span {
            start: self.line_col(range.start()),
            end: self.line_col(range.end()),
        }
    }

    /// Offset of a line/column pair, if it lies inside the text
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        let offset = start + TextSize::new(line_col.col);
        (offset <= self.len).then_some(offset)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
