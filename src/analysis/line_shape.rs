/*!
 * Line shape checks.
 *
 * A subtitle with too many lines or with an overlong line is unreadable no
 * matter how slow it is, so every failed check forces the segment to
 * critical.
 */

use serde::{Deserialize, Serialize};

/// Default maximum number of non-empty lines
pub const DEFAULT_MAX_LINES: usize = 2;

/// Default maximum characters on a single line
pub const DEFAULT_MAX_LINE_CHARS: usize = 45;

/// Problems found on a segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentIssue {
    /// More non-empty lines than allowed
    TooManyLines { line_count: usize, max_lines: usize },
    /// At least one line is longer than allowed
    LineTooLong { line_chars: usize, max_chars: usize },
    /// CPS in the warning band
    ReadingSpeedHigh { cps: f64, safe_max: f64 },
    /// CPS above the warning band
    ReadingSpeedCritical { cps: f64, warning_max: f64 },
}

impl SegmentIssue {
    /// Whether this issue comes from a line shape check
    pub fn is_shape_issue(&self) -> bool {
        matches!(self, Self::TooManyLines { .. } | Self::LineTooLong { .. })
    }
}

impl std::fmt::Display for SegmentIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentIssue::TooManyLines { line_count, max_lines } => {
                write!(f, "Quá nhiều dòng ({}/{})", line_count, max_lines)
            }
            SegmentIssue::LineTooLong { .. } => write!(f, "Dòng phụ đề quá dài"),
            SegmentIssue::ReadingSpeedHigh { cps, .. } => {
                write!(f, "Tốc độ đọc cao ({:.1} CPS)", cps)
            }
            SegmentIssue::ReadingSpeedCritical { cps, .. } => {
                write!(f, "Tốc độ đọc quá nhanh ({:.1} CPS)", cps)
            }
        }
    }
}

/// Limits for the line shape checks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineShapeConfig {
    pub max_lines: usize,
    pub max_line_chars: usize,
}

impl Default for LineShapeConfig {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
        }
    }
}

impl LineShapeConfig {
    /// Run both checks; an empty result means the shape is fine
    pub fn check(&self, text: &str) -> Vec<SegmentIssue> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut issues = Vec::new();

        if lines.len() > self.max_lines {
            issues.push(SegmentIssue::TooManyLines {
                line_count: lines.len(),
                max_lines: self.max_lines,
            });
        }

        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if longest > self.max_line_chars {
            issues.push(SegmentIssue::LineTooLong {
                line_chars: longest,
                max_chars: self.max_line_chars,
            });
        }

        issues
    }
}
