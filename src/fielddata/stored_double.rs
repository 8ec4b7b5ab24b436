//! Field data for doubles already materialized in a per-segment column.
//!
//! Values of each document are kept sorted ascending, which lets the sort
//! layer read the minimum and maximum without scanning.

use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::error::Result;
use crate::fielddata::{
    IndexFieldData, IndexNumericFieldData, LeafFieldData, LeafNumericFieldData, NumericType,
    SortedNumericDoubleValues, ValuesSourceType,
};
use crate::segment::{DocId, SegmentContext};

/// Multi-valued double column of one segment.
///
/// `offsets[doc]..offsets[doc + 1]` is the value range of `doc`.
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleColumn {
    offsets: Vec<u32>,
    values: Vec<f64>,
}

impl DoubleColumn {
    /// Build a column from the values of each document, in ordinal order.
    pub fn from_docs<I, V>(docs: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: IntoIterator<Item = f64>,
    {
        let mut offsets = vec![0];
        let mut values = Vec::new();

        for doc in docs {
            let start = values.len();
            values.extend(doc);
            values[start..].sort_by(f64::total_cmp);
            offsets.push(values.len() as u32);
        }

        DoubleColumn { offsets, values }
    }

    /// Number of documents in the column.
    pub fn num_docs(&self) -> u32 {
        (self.offsets.len() - 1) as u32
    }

    /// Values of `doc`, sorted ascending. Empty past the last document.
    pub fn doc_values(&self, doc: DocId) -> &[f64] {
        let doc = doc as usize;
        if doc + 1 >= self.offsets.len() {
            return &[];
        }
        &self.values[self.offsets[doc] as usize..self.offsets[doc + 1] as usize]
    }

    fn size_in_bytes(&self) -> u64 {
        (self.offsets.len() * size_of::<u32>() + self.values.len() * size_of::<f64>()) as u64
    }
}

/// Failures loading a stored column.
#[derive(Error, Debug)]
pub enum ColumnError {
    /// The segment has no column for the field.
    #[error("No column for [{field}] on {segment}")]
    MissingColumn {
        field: String,
        segment: SegmentContext,
    },
}

/// Field data over stored double columns, one per segment.
#[derive(Debug, Clone)]
pub struct StoredDoubleFieldData {
    field_name: String,
    segments: Vec<Arc<DoubleColumn>>,
}

impl StoredDoubleFieldData {
    /// `segments[ord]` holds the column of the segment at position `ord`.
    pub fn new<S: Into<String>>(field_name: S, segments: Vec<DoubleColumn>) -> Self {
        StoredDoubleFieldData {
            field_name: field_name.into(),
            segments: segments.into_iter().map(Arc::new).collect(),
        }
    }
}

impl IndexFieldData for StoredDoubleFieldData {
    type Leaf = StoredDoubleLeafFieldData;
    type Error = ColumnError;

    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn values_source_type(&self) -> ValuesSourceType {
        ValuesSourceType::Numeric
    }

    fn load_direct(
        &self,
        segment: &SegmentContext,
    ) -> std::result::Result<StoredDoubleLeafFieldData, ColumnError> {
        let column = self
            .segments
            .get(segment.ord())
            .ok_or_else(|| ColumnError::MissingColumn {
                field: self.field_name.clone(),
                segment: *segment,
            })?;
        debug!("loaded stored doubles for [{}] on {}", self.field_name, segment);

        Ok(StoredDoubleLeafFieldData {
            values: StoredDoubleValues {
                column: Arc::clone(column),
                start: 0,
                end: 0,
                cursor: 0,
            },
        })
    }
}

impl IndexNumericFieldData for StoredDoubleFieldData {
    fn numeric_type(&self) -> NumericType {
        NumericType::Double
    }

    fn sort_requires_custom_comparator(&self) -> bool {
        false
    }
}

/// Segment field data over one stored column.
#[derive(Debug)]
pub struct StoredDoubleLeafFieldData {
    values: StoredDoubleValues,
}

impl LeafFieldData for StoredDoubleLeafFieldData {
    fn ram_bytes_used(&self) -> u64 {
        self.values.column.size_in_bytes()
    }

    fn close(&mut self) {}
}

impl LeafNumericFieldData for StoredDoubleLeafFieldData {
    fn double_values(&mut self) -> &mut dyn SortedNumericDoubleValues {
        &mut self.values
    }
}

#[derive(Debug)]
struct StoredDoubleValues {
    column: Arc<DoubleColumn>,
    start: usize,
    end: usize,
    cursor: usize,
}

impl SortedNumericDoubleValues for StoredDoubleValues {
    fn advance_exact(&mut self, doc: DocId) -> Result<bool> {
        let doc = doc as usize;
        if doc + 1 >= self.column.offsets.len() {
            self.start = 0;
            self.end = 0;
        } else {
            self.start = self.column.offsets[doc] as usize;
            self.end = self.column.offsets[doc + 1] as usize;
        }
        self.cursor = self.start;
        Ok(self.end > self.start)
    }

    fn doc_value_count(&self) -> usize {
        self.end - self.start
    }

    fn next_value(&mut self) -> f64 {
        let value = self.column.values[self.cursor];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_sorts_within_doc() {
        let column = DoubleColumn::from_docs(vec![vec![3.0, 1.0, 2.0], vec![], vec![-0.5]]);
        assert_eq!(column.num_docs(), 3);
        assert_eq!(column.doc_values(0), &[1.0, 2.0, 3.0]);
        assert!(column.doc_values(1).is_empty());
        assert_eq!(column.doc_values(2), &[-0.5]);
        assert!(column.doc_values(3).is_empty());
    }

    #[test]
    fn test_stored_values() {
        let field_data = StoredDoubleFieldData::new(
            "price",
            vec![DoubleColumn::from_docs(vec![vec![3.0, 1.0], vec![]])],
        );
        assert!(!field_data.sort_requires_custom_comparator());

        let mut leaf = field_data.load(&SegmentContext::new(0, 0, 2)).unwrap();
        assert!(leaf.ram_bytes_used() > 0);

        let values = leaf.double_values();
        assert!(values.advance_exact(0).unwrap());
        assert_eq!(values.doc_value_count(), 2);
        assert_eq!(values.next_value(), 1.0);
        assert_eq!(values.doc_value_count(), 2);
        assert_eq!(values.next_value(), 3.0);
        assert!(!values.advance_exact(1).unwrap());
        assert!(!values.advance_exact(5).unwrap());
    }

    #[test]
    fn test_missing_segment() {
        let field_data = StoredDoubleFieldData::new("price", vec![]);
        let segment = SegmentContext::new(1, 0, 1);

        assert!(matches!(
            field_data.load_direct(&segment),
            Err(ColumnError::MissingColumn { .. })
        ));

        let err = match field_data.load(&segment) {
            Err(e) => e,
            Ok(_) => panic!("load should fail"),
        };
        assert!(err.script_cause().is_none());
        let cause = err.load_cause::<ColumnError>().unwrap();
        assert_eq!(cause.to_string(), "No column for [price] on segment[1]");
    }
}
