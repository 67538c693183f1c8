use std::cmp::max;
use std::cmp::min;

/// Half-open byte range into the original source text. Nodes synthesised by
/// rewrite passes reuse the range of the node they were derived from; ranges
/// are diagnostic metadata only and never affect rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize) -> SourceRange {
        SourceRange { start, end }
    }

    pub fn anonymous() -> SourceRange {
        SourceRange { start: 0, end: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn extend(&mut self, other: SourceRange) {
        self.start = min(self.start, other.start);
        self.end = max(self.end, other.end);
    }
}
