//! Field data for runtime fields computed by a double script.
//!
//! Nothing is read from the index: every segment load creates a fresh
//! script instance, and every [`advance_exact`](SortedNumericDoubleValues::advance_exact)
//! runs the script for that document. Values come back in the order the
//! script emitted them, so sorting needs the custom comparator.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::error::Result;
use crate::fielddata::{
    IndexFieldData, IndexFieldDataBuilder, IndexNumericFieldData, LeafFieldData,
    LeafNumericFieldData, NumericType, SortedNumericDoubleValues, ValuesSourceType,
};
use crate::script::{self, DoubleFieldScript, DoubleLeafFactory, ScriptError};
use crate::segment::{DocId, SegmentContext};

/// Captures the settings of a double runtime field.
#[derive(Clone)]
pub struct ScriptDoubleFieldDataBuilder {
    name: String,
    leaf_factory: Arc<dyn DoubleLeafFactory>,
}

impl ScriptDoubleFieldDataBuilder {
    pub fn new<S: Into<String>>(name: S, leaf_factory: Arc<dyn DoubleLeafFactory>) -> Self {
        ScriptDoubleFieldDataBuilder {
            name: name.into(),
            leaf_factory,
        }
    }
}

impl IndexFieldDataBuilder for ScriptDoubleFieldDataBuilder {
    type FieldData = ScriptDoubleFieldData;

    fn build(&self) -> ScriptDoubleFieldData {
        ScriptDoubleFieldData {
            field_name: self.name.clone(),
            leaf_factory: Arc::clone(&self.leaf_factory),
        }
    }
}

/// Field data of a double runtime field.
pub struct ScriptDoubleFieldData {
    field_name: String,
    leaf_factory: Arc<dyn DoubleLeafFactory>,
}

impl ScriptDoubleFieldData {
    /// Shortcut for [`ScriptDoubleFieldDataBuilder::new`].
    pub fn builder<S: Into<String>>(
        name: S,
        leaf_factory: Arc<dyn DoubleLeafFactory>,
    ) -> ScriptDoubleFieldDataBuilder {
        ScriptDoubleFieldDataBuilder::new(name, leaf_factory)
    }
}

impl fmt::Debug for ScriptDoubleFieldData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptDoubleFieldData")
            .field("field_name", &self.field_name)
            .finish_non_exhaustive()
    }
}

impl IndexFieldData for ScriptDoubleFieldData {
    type Leaf = ScriptDoubleLeafFieldData;
    type Error = ScriptError;

    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn values_source_type(&self) -> ValuesSourceType {
        ValuesSourceType::Numeric
    }

    fn load_direct(&self, segment: &SegmentContext) -> script::Result<ScriptDoubleLeafFieldData> {
        let script = self.leaf_factory.new_instance(segment)?;
        debug!("loaded double script for [{}] on {}", self.field_name, segment);
        Ok(ScriptDoubleLeafFieldData::new(ScriptDoubleDocValues::new(
            script,
        )))
    }
}

impl IndexNumericFieldData for ScriptDoubleFieldData {
    fn numeric_type(&self) -> NumericType {
        NumericType::Double
    }

    fn sort_requires_custom_comparator(&self) -> bool {
        true
    }
}

/// Segment field data backed by one double script instance.
pub struct ScriptDoubleLeafFieldData {
    values: ScriptDoubleDocValues,
    closed: bool,
}

impl ScriptDoubleLeafFieldData {
    fn new(values: ScriptDoubleDocValues) -> Self {
        ScriptDoubleLeafFieldData {
            values,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl LeafFieldData for ScriptDoubleLeafFieldData {
    // Memory of script instances is tracked by the script engine.
    fn ram_bytes_used(&self) -> u64 {
        0
    }

    fn close(&mut self) {
        if !self.closed {
            trace!("closing double script field data");
            self.closed = true;
        }
    }
}

impl LeafNumericFieldData for ScriptDoubleLeafFieldData {
    fn double_values(&mut self) -> &mut dyn SortedNumericDoubleValues {
        &mut self.values
    }
}

/// Cursor over the values a double script computes for each document.
pub struct ScriptDoubleDocValues {
    script: Box<dyn DoubleFieldScript>,
    count: usize,
    cursor: usize,
    last_doc: Option<DocId>,
}

impl ScriptDoubleDocValues {
    pub fn new(script: Box<dyn DoubleFieldScript>) -> Self {
        ScriptDoubleDocValues {
            script,
            count: 0,
            cursor: 0,
            last_doc: None,
        }
    }
}

impl SortedNumericDoubleValues for ScriptDoubleDocValues {
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
        debug_assert!(self.cursor < self.count, "no values left for current document");
        let value = self.script.values()[self.cursor];
        self.cursor += 1;
        value
    }
}
