/*!
 * Reading speed (characters per second) and severity bands.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::subtitle_processor::Segment;

/// Durations are floored to this many seconds before dividing
pub const MIN_DURATION_SECS: f64 = 0.1;

/// Default upper bound of the safe band
pub const DEFAULT_SAFE_MAX: f64 = 25.0;

/// Default upper bound of the warning band
pub const DEFAULT_WARNING_MAX: f64 = 40.0;

/// Readability severity, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Safe,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Safe => write!(f, "safe"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// CPS thresholds. Callers keep `safe_max < warning_max`; the analysis does
/// not check it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpsThresholds {
    /// CPS at or above this is at least a warning
    pub safe_max: f64,
    /// CPS above this is critical
    pub warning_max: f64,
}

impl CpsThresholds {
    pub fn new(safe_max: f64, warning_max: f64) -> Self {
        Self { safe_max, warning_max }
    }

    /// Severity band of a CPS value
    pub fn severity_for(&self, cps: f64) -> Severity {
        if cps > self.warning_max {
            Severity::Critical
        } else if cps >= self.safe_max {
            Severity::Warning
        } else {
            Severity::Safe
        }
    }
}

impl Default for CpsThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_SAFE_MAX, DEFAULT_WARNING_MAX)
    }
}

/// Characters per second of `text` over the segment's display time.
///
/// Zero, negative and sub-100ms durations are clamped to 0.1 s.
pub fn calculate_cps(segment: &Segment, text: &str) -> f64 {
    let duration = segment.duration_seconds().max(MIN_DURATION_SECS);
    text.chars().count() as f64 / duration
}
