//! Types shared by every stage of the pipeline

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Byte range into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// 1-based line and column of the span start
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let before = &source[..self.start.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let col = before
            .rfind('\n')
            .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
            + 1;
        (line, col)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 6);
        let b = Span::new(1, 3);
        assert_eq!(a.to(b), Span::new(1, 6));
    }

    #[test]
    fn test_line_col() {
        let src = "let a = 1;\nlet b = 2;";
        assert_eq!(Span::point(0).line_col(src), (1, 1));
        assert_eq!(Span::point(15).line_col(src), (2, 5));
    }
}
