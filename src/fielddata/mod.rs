//! Field data: per-segment columnar access to field values for sorting and
//! aggregations.
//!
//! An [`IndexFieldData`] describes one field across the whole index and
//! loads a [`LeafFieldData`] for each segment on demand. Numeric leaves
//! expose their values through [`SortedNumericDoubleValues`], a forward-only
//! cursor over the values of each document.
//!
//! Variants:
//! - [`ScriptDoubleFieldData`]: values computed by a double script.
//! - [`ScriptLongFieldData`]: values computed by a long script.
//! - [`StoredDoubleFieldData`]: values read from an in-memory column.

pub mod runtime;
pub mod service;
pub mod script_double;
pub mod script_long;
pub mod stored_double;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{FieldDataError, Result};
use crate::search::mode::MultiValueMode;
use crate::search::sort::{ComparatorKind, SortField};
use crate::segment::{DocId, SegmentContext};

pub use runtime::RuntimeFieldData;
pub use service::{FieldDataService, LeafFactory};
pub use script_double::{
    ScriptDoubleDocValues, ScriptDoubleFieldData, ScriptDoubleFieldDataBuilder,
    ScriptDoubleLeafFieldData,
};
pub use script_long::{
    ScriptLongDocValues, ScriptLongFieldData, ScriptLongFieldDataBuilder, ScriptLongLeafFieldData,
};
pub use stored_double::{
    ColumnError, DoubleColumn, StoredDoubleFieldData, StoredDoubleLeafFieldData,
};

/// Category of values a field produces, as seen by aggregations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuesSourceType {
    Numeric,
    Bytes,
    GeoPoint,
    Range,
    Date,
    Boolean,
}

/// Concrete numeric representation of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericType {
    Boolean,
    Long,
    Date,
    Float,
    Double,
}

impl NumericType {
    /// Whether values of this type are read as floating point numbers.
    pub fn is_floating_point(&self) -> bool {
        matches!(self, NumericType::Float | NumericType::Double)
    }
}

/// Forward-only cursor over the `f64` values of each document in a segment.
///
/// Documents must be visited in non-decreasing ordinal order. After a call
/// to [`advance_exact`](Self::advance_exact), [`next_value`](Self::next_value)
/// may be called exactly [`doc_value_count`](Self::doc_value_count) times.
pub trait SortedNumericDoubleValues: Send {
    /// Position the cursor on `doc`. Returns `true` if the document has values.
    fn advance_exact(&mut self, doc: DocId) -> Result<bool>;

    /// Number of values of the current document.
    fn doc_value_count(&self) -> usize;

    /// Read the next value of the current document.
    fn next_value(&mut self) -> f64;
}

/// Field data of one segment.
pub trait LeafFieldData: Send {
    /// Memory held by this leaf, as reported to resource accounting.
    fn ram_bytes_used(&self) -> u64;

    /// Release this leaf. Calling it more than once is allowed.
    fn close(&mut self);
}

/// Field data of one segment whose values are numeric.
pub trait LeafNumericFieldData: LeafFieldData {
    /// The values of this segment as doubles.
    fn double_values(&mut self) -> &mut dyn SortedNumericDoubleValues;
}

// Allow boxed leaves to be used wherever a leaf is expected
impl<T: LeafFieldData + ?Sized> LeafFieldData for Box<T> {
    fn ram_bytes_used(&self) -> u64 {
        self.as_ref().ram_bytes_used()
    }

    fn close(&mut self) {
        self.as_mut().close()
    }
}

impl<T: LeafNumericFieldData + ?Sized> LeafNumericFieldData for Box<T> {
    fn double_values(&mut self) -> &mut dyn SortedNumericDoubleValues {
        self.as_mut().double_values()
    }
}

/// Field data of one field across all segments of an index.
pub trait IndexFieldData: Send + Sync {
    type Leaf: LeafFieldData;

    /// Raw failure of [`load_direct`](Self::load_direct).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Name of the field.
    fn field_name(&self) -> &str;

    /// Category of values this field produces.
    fn values_source_type(&self) -> ValuesSourceType;

    /// Load the field data of `segment`, surfacing the raw failure.
    fn load_direct(&self, segment: &SegmentContext) -> std::result::Result<Self::Leaf, Self::Error>;

    /// Load the field data of `segment`.
    ///
    /// Any failure is normalized into [`FieldDataError::Load`] with the raw
    /// failure as its source.
    fn load(&self, segment: &SegmentContext) -> Result<Self::Leaf> {
        self.load_direct(segment).map_err(|e| {
            warn!(
                "failed to load field data for [{}] on {}: {}",
                self.field_name(),
                segment,
                e
            );
            FieldDataError::convert(self.field_name(), *segment, e)
        })
    }
}

/// Field data whose values are numbers.
pub trait IndexNumericFieldData: IndexFieldData<Leaf: LeafNumericFieldData> {
    /// Numeric representation of the values.
    fn numeric_type(&self) -> NumericType;

    /// Whether sorting must go through a comparator that makes no
    /// assumption about value order or cardinality within a document.
    fn sort_requires_custom_comparator(&self) -> bool;

    /// Build the sort definition for this field.
    fn sort_field(&self, mode: MultiValueMode, reverse: bool) -> SortField {
        let comparator = if self.sort_requires_custom_comparator() {
            ComparatorKind::Custom
        } else {
            ComparatorKind::SortedNumeric
        };
        SortField::new(self.field_name(), mode, reverse, comparator)
    }
}

/// Builds an [`IndexFieldData`] from captured field settings.
pub trait IndexFieldDataBuilder {
    type FieldData: IndexFieldData;

    fn build(&self) -> Self::FieldData;
}
