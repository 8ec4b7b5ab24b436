//! Consumers of numeric field data: sorting and numeric aggregations.

pub mod mode;
pub mod sort;
pub mod stats;

pub use mode::MultiValueMode;
pub use sort::{ComparatorKind, SortField, SortedDoc, sort_segments};
pub use stats::{NumericStats, aggregate_stats};
