//! Reduction of a multi-valued document to a single sort value.

use serde::{Deserialize, Serialize};

/// How the values of a multi-valued document are reduced to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiValueMode {
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Sum of all values.
    Sum,
    /// Arithmetic mean.
    Avg,
    /// Middle value, or the mean of the two middle values.
    Median,
}

impl MultiValueMode {
    /// Default mode for a sort direction: `Min` ascending, `Max` descending.
    pub fn for_order(reverse: bool) -> Self {
        if reverse {
            MultiValueMode::Max
        } else {
            MultiValueMode::Min
        }
    }

    /// Reduce `values` given in any order. `None` if there are no values.
    pub fn select(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }

        Some(match self {
            MultiValueMode::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            MultiValueMode::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            MultiValueMode::Sum => values.iter().sum(),
            MultiValueMode::Avg => values.iter().sum::<f64>() / values.len() as f64,
            MultiValueMode::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                median_of_sorted(&sorted)
            }
        })
    }

    /// Reduce `values` that are already sorted ascending.
    pub fn select_sorted(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }

        Some(match self {
            MultiValueMode::Min => values[0],
            MultiValueMode::Max => values[values.len() - 1],
            MultiValueMode::Median => median_of_sorted(values),
            MultiValueMode::Sum | MultiValueMode::Avg => return self.select(values),
        })
    }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
