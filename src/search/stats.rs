//! Min, max, sum and count over the values of a numeric field.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fielddata::{
    IndexNumericFieldData, LeafFieldData, LeafNumericFieldData, SortedNumericDoubleValues,
};
use crate::segment::SegmentContext;

/// Statistics over every value of every collected document.
///
/// `min` and `max` are `None` until a value is collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean of all values, `None` if nothing was collected.
    pub fn avg(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }

    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
    }

    /// Collect the values of documents `0..max_doc`.
    pub fn collect(&mut self, values: &mut dyn SortedNumericDoubleValues, max_doc: u32) -> Result<()> {
        for doc in 0..max_doc {
            if values.advance_exact(doc)? {
                for _ in 0..values.doc_value_count() {
                    self.add(values.next_value());
                }
            }
        }
        Ok(())
    }

    pub fn merge(mut self, other: NumericStats) -> NumericStats {
        self.count += other.count;
        self.sum += other.sum;
        self.min = merge_bound(self.min, other.min, f64::min);
        self.max = merge_bound(self.max, other.max, f64::max);
        self
    }
}

fn merge_bound(a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(pick(x, y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// Aggregate all documents of `segments`, one worker per segment.
///
/// Every worker loads its own leaf, so no cursor is shared between threads.
pub fn aggregate_stats<F>(field_data: &F, segments: &[SegmentContext]) -> Result<NumericStats>
where
    F: IndexNumericFieldData,
{
    let per_segment = segments
        .par_iter()
        .map(|segment| {
            let mut leaf = field_data.load(segment)?;
            let mut stats = NumericStats::new();
            let collected = stats.collect(leaf.double_values(), segment.max_doc());
            leaf.close();
            collected.map(|_| stats)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(per_segment
        .into_iter()
        .fold(NumericStats::new(), NumericStats::merge))
}
