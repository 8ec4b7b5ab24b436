//! Runtime field data selected by the field's configured type.

use std::sync::Arc;

use crate::fielddata::{
    IndexFieldData, IndexNumericFieldData, LeafNumericFieldData, NumericType,
    ScriptDoubleFieldData, ScriptLongFieldData, ValuesSourceType,
};
use crate::script::{self, ScriptError};
use crate::segment::SegmentContext;

/// Field data of a runtime field, one variant per script type.
#[derive(Debug, Clone)]
pub enum RuntimeFieldData {
    Double(Arc<ScriptDoubleFieldData>),
    Long(Arc<ScriptLongFieldData>),
}

impl IndexFieldData for RuntimeFieldData {
    type Leaf = Box<dyn LeafNumericFieldData>;
    type Error = ScriptError;

    fn field_name(&self) -> &str {
        match self {
            RuntimeFieldData::Double(fd) => fd.field_name(),
            RuntimeFieldData::Long(fd) => fd.field_name(),
        }
    }

    fn values_source_type(&self) -> ValuesSourceType {
        match self {
            RuntimeFieldData::Double(fd) => fd.values_source_type(),
            RuntimeFieldData::Long(fd) => fd.values_source_type(),
        }
    }

    fn load_direct(&self, segment: &SegmentContext) -> script::Result<Self::Leaf> {
        let leaf: Box<dyn LeafNumericFieldData> = match self {
            RuntimeFieldData::Double(fd) => Box::new(fd.load_direct(segment)?),
            RuntimeFieldData::Long(fd) => Box::new(fd.load_direct(segment)?),
        };
        Ok(leaf)
    }
}

impl IndexNumericFieldData for RuntimeFieldData {
    fn numeric_type(&self) -> NumericType {
        match self {
            RuntimeFieldData::Double(fd) => fd.numeric_type(),
            RuntimeFieldData::Long(fd) => fd.numeric_type(),
        }
    }

    fn sort_requires_custom_comparator(&self) -> bool {
        match self {
            RuntimeFieldData::Double(fd) => fd.sort_requires_custom_comparator(),
            RuntimeFieldData::Long(fd) => fd.sort_requires_custom_comparator(),
        }
    }
}
