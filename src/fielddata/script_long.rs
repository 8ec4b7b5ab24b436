//! Field data for runtime fields computed by a long script.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::error::Result;
use crate::fielddata::{
    IndexFieldData, IndexFieldDataBuilder, IndexNumericFieldData, LeafFieldData,
    LeafNumericFieldData, NumericType, SortedNumericDoubleValues, ValuesSourceType,
};
use crate::script::{self, LongFieldScript, LongLeafFactory, ScriptError};
use crate::segment::{DocId, SegmentContext};

/// Captures the settings of a long runtime field.
#[derive(Clone)]
pub struct ScriptLongFieldDataBuilder {
    name: String,
    leaf_factory: Arc<dyn LongLeafFactory>,
}

impl ScriptLongFieldDataBuilder {
    pub fn new<S: Into<String>>(name: S, leaf_factory: Arc<dyn LongLeafFactory>) -> Self {
        ScriptLongFieldDataBuilder {
            name: name.into(),
            leaf_factory,
        }
    }
}

impl IndexFieldDataBuilder for ScriptLongFieldDataBuilder {
    type FieldData = ScriptLongFieldData;

    fn build(&self) -> ScriptLongFieldData {
        ScriptLongFieldData {
            field_name: self.name.clone(),
            leaf_factory: Arc::clone(&self.leaf_factory),
        }
    }
}

/// Field data of a long runtime field.
pub struct ScriptLongFieldData {
    field_name: String,
    leaf_factory: Arc<dyn LongLeafFactory>,
}

impl ScriptLongFieldData {
    pub fn builder<S: Into<String>>(
        name: S,
        leaf_factory: Arc<dyn LongLeafFactory>,
    ) -> ScriptLongFieldDataBuilder {
        ScriptLongFieldDataBuilder::new(name, leaf_factory)
    }
}

impl fmt::Debug for ScriptLongFieldData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptLongFieldData")
            .field("field_name", &self.field_name)
            .finish_non_exhaustive()
    }
}

impl IndexFieldData for ScriptLongFieldData {
    type Leaf = ScriptLongLeafFieldData;
    type Error = ScriptError;

    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn values_source_type(&self) -> ValuesSourceType {
        ValuesSourceType::Numeric
    }

    fn load_direct(&self, segment: &SegmentContext) -> script::Result<ScriptLongLeafFieldData> {
        let script = self.leaf_factory.new_instance(segment)?;
        debug!("loaded long script for [{}] on {}", self.field_name, segment);
        Ok(ScriptLongLeafFieldData {
            values: ScriptLongDocValues::new(script),
            closed: false,
        })
    }
}

impl IndexNumericFieldData for ScriptLongFieldData {
    fn numeric_type(&self) -> NumericType {
        NumericType::Long
    }

    fn sort_requires_custom_comparator(&self) -> bool {
        true
    }
}

/// Segment field data backed by one long script instance.
pub struct ScriptLongLeafFieldData {
    values: ScriptLongDocValues,
    closed: bool,
}

impl ScriptLongLeafFieldData {
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The values of this segment in their native `i64` form.
    pub fn long_values(&mut self) -> &mut ScriptLongDocValues {
        &mut self.values
    }
}

impl LeafFieldData for ScriptLongLeafFieldData {
    fn ram_bytes_used(&self) -> u64 {
        0
    }

    fn close(&mut self) {
        if !self.closed {
            trace!("closing long script field data");
            self.closed = true;
        }
    }
}

impl LeafNumericFieldData for ScriptLongLeafFieldData {
    fn double_values(&mut self) -> &mut dyn SortedNumericDoubleValues {
        &mut self.values
    }
}

/// Cursor over the values a long script computes for each document.
///
/// Read through [`SortedNumericDoubleValues`] the values are widened to `f64`.
pub struct ScriptLongDocValues {
    script: Box<dyn LongFieldScript>,
    count: usize,
    cursor: usize,
    last_doc: Option<DocId>,
}

impl ScriptLongDocValues {
    pub fn new(script: Box<dyn LongFieldScript>) -> Self {
        ScriptLongDocValues {
            script,
            count: 0,
            cursor: 0,
            last_doc: None,
        }
    }

    /// Read the next value of the current document without conversion.
    pub fn next_long(&mut self) -> i64 {
        debug_assert!(self.cursor < self.count, "no values left for current document");
        let value = self.script.values()[self.cursor];
        self.cursor += 1;
        value
    }
}

impl SortedNumericDoubleValues for ScriptLongDocValues {
    fn advance_exact(&mut self, doc: DocId) -> Result<bool> {
        debug_assert!(
            self.last_doc.is_none_or(|last| doc >= last),
            "documents must be visited in order: {doc} after {:?}",
            self.last_doc
        );
        self.last_doc = Some(doc);
        self.count = 0;
        self.cursor = 0;

        self.script.run_for_doc(doc)?;
        self.count = self.script.count();
        Ok(self.count > 0)
    }

    fn doc_value_count(&self) -> usize {
        self.count
    }

    fn next_value(&mut self) -> f64 {
        self.next_long() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldDataError;
    use crate::testing::{FailingLeafFactory, VecLongLeafFactory};

    fn visits_field(segments: Vec<Vec<Vec<i64>>>) -> ScriptLongFieldData {
        ScriptLongFieldData::builder("visits", Arc::new(VecLongLeafFactory::new("visits", segments)))
            .build()
    }

    #[test]
    fn test_long_field_data() {
        let field_data = ScriptLongFieldData::builder(
            "visits",
            Arc::new(VecLongLeafFactory::new("visits", vec![vec![vec![10, -4], vec![7]]])),
        )
        .build();

        assert_eq!(field_data.field_name(), "visits");
        assert_eq!(field_data.numeric_type(), NumericType::Long);
        assert!(field_data.sort_requires_custom_comparator());

        let mut leaf = field_data.load(&SegmentContext::new(0, 0, 2)).unwrap();
        let values = leaf.long_values();
        assert!(values.advance_exact(0).unwrap());
        assert_eq!(values.next_long(), 10);
        assert_eq!(values.next_long(), -4);

        let values = leaf.double_values();
        assert!(values.advance_exact(1).unwrap());
        assert_eq!(values.doc_value_count(), 1);
        assert_eq!(values.next_value(), 7.0);
    }

    #[test]
    fn test_advance_resets_cursor() {
        let field_data = visits_field(vec![vec![vec![1, 2, 3], vec![40]]]);
        let mut leaf = field_data.load(&SegmentContext::new(0, 0, 2)).unwrap();
        let values = leaf.long_values();

        assert!(values.advance_exact(0).unwrap());
        assert_eq!(values.next_long(), 1);

        assert!(values.advance_exact(1).unwrap());
        assert_eq!(values.doc_value_count(), 1);
        assert_eq!(values.next_long(), 40);
    }

    #[test]
    fn test_load_direct_surfaces_raw_error() {
        let field_data = ScriptLongFieldData::builder(
            "visits",
            Arc::new(FailingLeafFactory::malformed_segment("doc values missing")),
        )
        .build();
        let segment = SegmentContext::new(1, 5, 5);

        match field_data.load_direct(&segment) {
            Err(ScriptError::MalformedSegment(msg)) => assert_eq!(msg, "doc values missing"),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("load_direct should fail"),
        }

        let err = match field_data.load(&segment) {
            Err(e) => e,
            Ok(_) => panic!("load should fail"),
        };
        assert!(matches!(err, FieldDataError::Load { .. }));
        assert!(matches!(
            err.script_cause(),
            Some(ScriptError::MalformedSegment(_))
        ));
    }

    #[test]
    fn test_evaluation_error_propagates() {
        let factory = VecLongLeafFactory::new("visits", vec![vec![vec![1], vec![2]]]).failing_on(1);
        let field_data = ScriptLongFieldData::builder("visits", Arc::new(factory)).build();
        let mut leaf = field_data.load(&SegmentContext::new(0, 0, 2)).unwrap();
        let values = leaf.double_values();

        assert!(values.advance_exact(0).unwrap());
        let err = values.advance_exact(1).unwrap_err();
        assert!(matches!(
            err,
            FieldDataError::Script(ScriptError::Evaluation(_))
        ));
        assert_eq!(values.doc_value_count(), 0);
    }

    #[test]
    fn test_close_is_idempotent() {
        let field_data = visits_field(vec![vec![vec![1]]]);
        let mut leaf = field_data.load(&SegmentContext::new(0, 0, 1)).unwrap();
        assert!(!leaf.is_closed());

        leaf.close();
        leaf.close();
        assert!(leaf.is_closed());
    }
}
