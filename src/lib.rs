//! # Runfield
//!
//! Field data for runtime fields: script-computed numeric values exposed
//! through the same per-segment columnar interface that sorting and
//! aggregations use for stored values.
//!
//! ## Features
//!
//! - Double and long runtime fields backed by per-segment script instances
//! - Forward-only multi-valued cursors with per-document recomputation
//! - Normalized segment load failures that keep the original cause
//! - Sorting with custom or sorted-numeric comparators
//! - Parallel per-segment numeric statistics
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use runfield::fielddata::{
//!     IndexFieldData, IndexFieldDataBuilder, LeafNumericFieldData, ScriptDoubleFieldData,
//! };
//! use runfield::segment::SegmentContext;
//! use runfield::testing::VecLeafFactory;
//!
//! let factory = VecLeafFactory::new("computed_score", vec![vec![vec![3.0, 1.0], vec![]]]);
//! let field_data = ScriptDoubleFieldData::builder("computed_score", Arc::new(factory)).build();
//!
//! let mut leaf = field_data.load(&SegmentContext::new(0, 0, 2)).unwrap();
//! let values = leaf.double_values();
//! assert!(values.advance_exact(0).unwrap());
//! assert_eq!(values.doc_value_count(), 2);
//! ```

pub mod config;
pub mod error;
pub mod fielddata;
pub mod script;
pub mod search;
pub mod segment;
pub mod testing;

pub mod prelude {
    pub use crate::error::{FieldDataError, Result};
    pub use crate::fielddata::{
        IndexFieldData, IndexFieldDataBuilder, IndexNumericFieldData, LeafFieldData,
        LeafNumericFieldData, NumericType, SortedNumericDoubleValues, ValuesSourceType,
    };
    pub use crate::segment::{DocId, SegmentContext};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
