use std::fmt;

use super::cps::Severity;
use super::histogram::HistogramBucket;
use super::service::AnalyzedSegment;

// @module: Selection of analyzed segments for display

/// Which analyzed segments to show
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Filter {
    #[default]
    All,
    BySeverity(Severity),
    /// `min <= cps < max`; no upper bound when `max` is `None`
    ByCpsRange { min: f64, max: Option<f64> },
}

impl Filter {
    /// Filter that selects the segments of one histogram bucket
    pub fn from_bucket(bucket: &HistogramBucket) -> Self {
        Filter::ByCpsRange {
            min: bucket.min,
            max: bucket.max,
        }
    }

    pub fn matches(&self, item: &AnalyzedSegment) -> bool {
        match self {
            Filter::All => true,
            Filter::BySeverity(severity) => item.metrics.severity == *severity,
            Filter::ByCpsRange { min, max } => {
                item.metrics.cps >= *min && max.is_none_or(|max| item.metrics.cps < max)
            }
        }
    }

    /// Matching segments in their original order
    pub fn apply<'a>(&self, items: &'a [AnalyzedSegment]) -> Vec<&'a AnalyzedSegment> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::BySeverity(severity) => write!(f, "{}", severity),
            Filter::ByCpsRange { min, max: Some(max) } => write!(f, "{}-{} cps", min, max),
            Filter::ByCpsRange { min, max: None } => write!(f, "{}+ cps", min),
        }
    }
}
