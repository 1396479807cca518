/*!
 * CPS histogram.
 *
 * Ten buckets of width 5; the last one (`45+`) is open ended. Empty buckets
 * before the first and after the last populated bucket are dropped.
 */

use serde::{Deserialize, Serialize};

/// Width of one bucket in CPS
pub const BUCKET_WIDTH: f64 = 5.0;

/// Number of buckets before trimming
pub const BUCKET_COUNT: usize = 10;

/// One CPS band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Position among the untrimmed buckets (0..=9)
    pub index: usize,
    /// Inclusive lower bound
    pub min: f64,
    /// Exclusive upper bound, `None` for the last bucket
    pub max: Option<f64>,
    pub label: String,
    pub count: usize,
    /// `count / total` as a rounded integer percentage
    pub percentage: u32,
}

impl HistogramBucket {
    /// Whether a CPS value falls into this bucket
    pub fn contains(&self, cps: f64) -> bool {
        cps >= self.min && self.max.is_none_or(|max| cps < max)
    }
}

/// Bucket a CPS value belongs to
pub fn bucket_index(cps: f64) -> usize {
    if cps.is_nan() || cps <= 0.0 {
        return 0;
    }
    ((cps / BUCKET_WIDTH).floor() as usize).min(BUCKET_COUNT - 1)
}

fn bucket_label(index: usize) -> String {
    let min = index as f64 * BUCKET_WIDTH;
    if index == BUCKET_COUNT - 1 {
        format!("{}+", min)
    } else {
        format!("{}-{}", min, min + BUCKET_WIDTH)
    }
}

/// Build the trimmed histogram for a list of CPS values
pub fn build_histogram(cps_values: &[f64]) -> Vec<HistogramBucket> {
    let mut counts = [0usize; BUCKET_COUNT];
    for cps in cps_values {
        counts[bucket_index(*cps)] += 1;
    }

    let first = counts.iter().position(|&c| c > 0);
    let last = counts.iter().rposition(|&c| c > 0);
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let total = cps_values.len() as f64;

    (first..=last)
        .map(|index| {
            let min = index as f64 * BUCKET_WIDTH;
            HistogramBucket {
                index,
                min,
                max: (index < BUCKET_COUNT - 1).then_some(min + BUCKET_WIDTH),
                label: bucket_label(index),
                count: counts[index],
                percentage: (counts[index] as f64 * 100.0 / total).round() as u32,
            }
        })
        .collect()
}
