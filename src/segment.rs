//! Segment addressing.

use std::fmt;

/// Document ordinal within a single segment.
pub type DocId = u32;

/// Handle for one immutable segment of the underlying store.
///
/// Supplied by the consumer when loading field data. Field data never
/// owns the segment it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentContext {
    ord: usize,
    doc_base: u32,
    max_doc: u32,
}

impl SegmentContext {
    /// Create a context for the segment at position `ord`.
    pub fn new(ord: usize, doc_base: u32, max_doc: u32) -> Self {
        SegmentContext {
            ord,
            doc_base,
            max_doc,
        }
    }

    /// Position of this segment among its siblings.
    pub fn ord(&self) -> usize {
        self.ord
    }

    /// First global document id of this segment.
    pub fn doc_base(&self) -> u32 {
        self.doc_base
    }

    /// Number of document ordinals in this segment.
    pub fn max_doc(&self) -> u32 {
        self.max_doc
    }

    /// Translate a segment-local ordinal to a global document id.
    pub fn global_doc(&self, doc: DocId) -> u64 {
        self.doc_base as u64 + doc as u64
    }
}

impl fmt::Display for SegmentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment[{}]", self.ord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_doc() {
        let segment = SegmentContext::new(1, 100, 50);
        assert_eq!(segment.global_doc(0), 100);
        assert_eq!(segment.global_doc(7), 107);
        assert_eq!(segment.to_string(), "segment[1]");
    }
}
