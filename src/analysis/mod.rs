/*!
 * Readability analysis for subtitle segments.
 *
 * This module classifies every segment by reading speed and line shape and
 * aggregates per-file statistics:
 * - Characters per second (CPS) against two configurable thresholds
 * - Line count and line length checks that force a segment to critical
 * - Min/max/median/average CPS, severity counts and a CPS histogram
 *
 * # Architecture
 *
 * - `cps`: CPS calculation, thresholds and severity bands
 * - `line_shape`: line count and line length checks
 * - `histogram`: fixed-width CPS buckets with trimming
 * - `service`: per-segment classification and the single-pass aggregation
 * - `filter`: selecting analyzed segments for display
 *
 * Analysis never mutates its input: enriched segments are returned as new
 * [`AnalyzedSegment`] values.
 */

pub mod cps;
pub mod line_shape;
pub mod histogram;
pub mod service;
pub mod filter;

// Re-export main types
pub use cps::{CpsThresholds, Severity, calculate_cps};
pub use filter::Filter;
pub use histogram::HistogramBucket;
pub use line_shape::{LineShapeConfig, SegmentIssue};
pub use service::{
    Analysis, AnalysisResult, AnalyzedSegment, Analyzer, SegmentMetrics, SeverityCounts,
    analyze_segments, classify,
};
