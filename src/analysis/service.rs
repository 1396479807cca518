/*!
 * Analysis service that classifies segments and aggregates statistics.
 *
 * Classification combines the CPS band with the line shape checks; shape
 * failures override the CPS band. Aggregation runs once over the segment
 * list and never fails: an empty list yields zeroed statistics.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::subtitle_processor::{Segment, TextField};

use super::cps::{self, CpsThresholds, Severity};
use super::histogram::{self, HistogramBucket};
use super::line_shape::{LineShapeConfig, SegmentIssue};

/// Configuration for the analysis service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// CPS at or above this is a warning
    #[serde(default = "default_safe_max")]
    pub safe_max: f64,

    /// CPS above this is critical
    #[serde(default = "default_warning_max")]
    pub warning_max: f64,

    /// Maximum characters on one line
    #[serde(default = "default_max_line_chars")]
    pub max_line_chars: usize,

    /// Maximum number of non-empty lines
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Track that is analyzed (falls back to the other one when empty)
    #[serde(default)]
    pub text_field: TextField,
}

fn default_safe_max() -> f64 {
    cps::DEFAULT_SAFE_MAX
}

fn default_warning_max() -> f64 {
    cps::DEFAULT_WARNING_MAX
}

fn default_max_line_chars() -> usize {
    super::line_shape::DEFAULT_MAX_LINE_CHARS
}

fn default_max_lines() -> usize {
    super::line_shape::DEFAULT_MAX_LINES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            safe_max: default_safe_max(),
            warning_max: default_warning_max(),
            max_line_chars: default_max_line_chars(),
            max_lines: default_max_lines(),
            text_field: TextField::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn thresholds(&self) -> CpsThresholds {
        CpsThresholds::new(self.safe_max, self.warning_max)
    }

    pub fn line_shape(&self) -> LineShapeConfig {
        LineShapeConfig {
            max_lines: self.max_lines,
            max_line_chars: self.max_line_chars,
        }
    }
}

/// Per-segment analysis output
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMetrics {
    pub severity: Severity,
    pub cps: f64,
    pub issues: Vec<SegmentIssue>,
}

impl SegmentMetrics {
    /// Whether a line shape check failed
    pub fn has_shape_issue(&self) -> bool {
        self.issues.iter().any(SegmentIssue::is_shape_issue)
    }

    /// Human-readable issue messages
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// A segment paired with its metrics
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedSegment {
    pub segment: Segment,
    pub metrics: SegmentMetrics,
}

/// Severity counts; they always sum to the number of segments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub safe: usize,
    pub warning: usize,
    pub critical: usize,
}

impl SeverityCounts {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Safe => self.safe += 1,
            Severity::Warning => self.warning += 1,
            Severity::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.safe + self.warning + self.critical
    }
}

/// Aggregate statistics of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_lines: usize,
    /// Segments failing a line shape check
    pub too_long_lines: usize,
    /// Segments whose CPS is above the warning band
    pub too_fast_lines: usize,
    pub avg_cps: f64,
    pub min_cps: f64,
    pub max_cps: f64,
    pub median_cps: f64,
    pub cps_groups: SeverityCounts,
    pub cps_histogram: Vec<HistogramBucket>,
}

/// Output of [`Analyzer::analyze`]
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub segments: Vec<AnalyzedSegment>,
    pub result: AnalysisResult,
}

/// Classifies segments and aggregates statistics
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Classify one segment
    pub fn classify(&self, segment: &Segment) -> SegmentMetrics {
        let thresholds = self.config.thresholds();
        let text = segment.text_or_fallback(self.config.text_field);
        let cps = cps::calculate_cps(segment, text);

        let mut severity = thresholds.severity_for(cps);
        let mut issues = Vec::new();

        match severity {
            Severity::Warning => issues.push(SegmentIssue::ReadingSpeedHigh {
                cps,
                safe_max: thresholds.safe_max,
            }),
            Severity::Critical => issues.push(SegmentIssue::ReadingSpeedCritical {
                cps,
                warning_max: thresholds.warning_max,
            }),
            Severity::Safe => {}
        }

        let shape_issues = self.config.line_shape().check(text);
        if !shape_issues.is_empty() {
            severity = Severity::Critical;
            issues.extend(shape_issues);
        }

        SegmentMetrics { severity, cps, issues }
    }

    /// Classify every segment and compute the aggregate statistics
    pub fn analyze(&self, segments: &[Segment]) -> Analysis {
        let analyzed: Vec<AnalyzedSegment> = segments
            .iter()
            .map(|segment| AnalyzedSegment {
                metrics: self.classify(segment),
                segment: segment.clone(),
            })
            .collect();

        let result = aggregate(&analyzed, self.config.warning_max);

        debug!(
            "Analyzed {} segment(s): {} safe, {} warning, {} critical",
            result.total_lines,
            result.cps_groups.safe,
            result.cps_groups.warning,
            result.cps_groups.critical
        );

        Analysis {
            segments: analyzed,
            result,
        }
    }
}

fn aggregate(analyzed: &[AnalyzedSegment], warning_max: f64) -> AnalysisResult {
    if analyzed.is_empty() {
        return AnalysisResult::default();
    }

    let mut result = AnalysisResult {
        total_lines: analyzed.len(),
        ..AnalysisResult::default()
    };

    let mut values = Vec::with_capacity(analyzed.len());
    for item in analyzed {
        let metrics = &item.metrics;
        result.cps_groups.record(metrics.severity);
        if metrics.has_shape_issue() {
            result.too_long_lines += 1;
        }
        if metrics.cps > warning_max {
            result.too_fast_lines += 1;
        }
        values.push(metrics.cps);
    }

    result.cps_histogram = histogram::build_histogram(&values);

    values.sort_by(f64::total_cmp);
    let n = values.len();
    result.min_cps = values[0];
    result.max_cps = values[n - 1];
    result.avg_cps = values.iter().sum::<f64>() / n as f64;
    result.median_cps = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };

    result
}

/// Classify one segment with the default line shape limits
pub fn classify(segment: &Segment, field: TextField, thresholds: &CpsThresholds) -> SegmentMetrics {
    analyzer_for(field, thresholds).classify(segment)
}

/// Analyze segments with the default line shape limits
pub fn analyze_segments(segments: &[Segment], field: TextField, thresholds: &CpsThresholds) -> Analysis {
    analyzer_for(field, thresholds).analyze(segments)
}

fn analyzer_for(field: TextField, thresholds: &CpsThresholds) -> Analyzer {
    Analyzer::with_config(AnalysisConfig {
        safe_max: thresholds.safe_max,
        warning_max: thresholds.warning_max,
        text_field: field,
        ..AnalysisConfig::default()
    })
}
