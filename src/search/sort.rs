//! Sorting documents by the values of a numeric field.

use std::cmp::Ordering;

use log::debug;

use crate::error::Result;
use crate::fielddata::{
    IndexNumericFieldData, LeafFieldData, LeafNumericFieldData, SortedNumericDoubleValues,
};
use crate::search::mode::MultiValueMode;
use crate::segment::{DocId, SegmentContext};

/// Which comparator reads the values of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparatorKind {
    /// Values come in any order; every value is read and reduced.
    Custom,
    /// Values are sorted within each document; positional reads are enough.
    SortedNumeric,
}

/// A document with the value it sorts by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortedDoc {
    /// Global document id.
    pub doc: u64,
    /// Selected value, `None` if the document has no values.
    pub value: Option<f64>,
}

/// Sort definition for one numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct SortField {
    field: String,
    mode: MultiValueMode,
    reverse: bool,
    comparator: ComparatorKind,
}

impl SortField {
    pub fn new<S: Into<String>>(
        field: S,
        mode: MultiValueMode,
        reverse: bool,
        comparator: ComparatorKind,
    ) -> Self {
        SortField {
            field: field.into(),
            mode,
            reverse,
            comparator,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn mode(&self) -> MultiValueMode {
        self.mode
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn comparator(&self) -> ComparatorKind {
        self.comparator
    }

    /// Select the sort value of every document in `docs` and order them.
    ///
    /// `docs` are visited in ascending order regardless of how they are
    /// passed. Documents without values sort last in both directions.
    pub fn sort_segment(
        &self,
        segment: &SegmentContext,
        values: &mut dyn SortedNumericDoubleValues,
        docs: &[DocId],
    ) -> Result<Vec<SortedDoc>> {
        let mut ordered = docs.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut buffer = Vec::new();
        let mut hits = Vec::with_capacity(ordered.len());
        for doc in ordered {
            let value = if values.advance_exact(doc)? {
                buffer.clear();
                for _ in 0..values.doc_value_count() {
                    buffer.push(values.next_value());
                }
                match self.comparator {
                    ComparatorKind::Custom => self.mode.select(&buffer),
                    ComparatorKind::SortedNumeric => self.mode.select_sorted(&buffer),
                }
            } else {
                None
            };
            hits.push(SortedDoc {
                doc: segment.global_doc(doc),
                value,
            });
        }

        hits.sort_by(|a, b| self.compare(a, b));
        Ok(hits)
    }

    /// Order two documents by value, then by document id.
    pub fn compare(&self, a: &SortedDoc, b: &SortedDoc) -> Ordering {
        let by_value = match (a.value, b.value) {
            (Some(x), Some(y)) => {
                if self.reverse {
                    y.total_cmp(&x)
                } else {
                    x.total_cmp(&y)
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_value.then_with(|| a.doc.cmp(&b.doc))
    }
}

/// Sort all documents of `segments` by `sort` and keep the first `top_n`.
///
/// Each segment is loaded, read, and closed in turn.
pub fn sort_segments<F>(
    field_data: &F,
    sort: &SortField,
    segments: &[SegmentContext],
    top_n: usize,
) -> Result<Vec<SortedDoc>>
where
    F: IndexNumericFieldData,
{
    let mut merged = Vec::new();
    for segment in segments {
        let mut leaf = field_data.load(segment)?;
        let docs: Vec<DocId> = (0..segment.max_doc()).collect();
        let hits = sort.sort_segment(segment, leaf.double_values(), &docs);
        leaf.close();

        let mut hits = hits?;
        hits.truncate(top_n);
        merged.extend(hits);
    }

    merged.sort_by(|a, b| sort.compare(a, b));
    merged.truncate(top_n);
    debug!(
        "sorted {} segments by [{}], kept {} docs",
        segments.len(),
        sort.field(),
        merged.len()
    );
    Ok(merged)
}
