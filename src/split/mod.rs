/*!
 * Splitting a subtitle file into several smaller files.
 *
 * Four strategies are supported:
 * - By count: fixed number of segments per file
 * - By duration: fixed wall-clock windows in minutes
 * - By markers: manual cut timestamps
 * - By range: one explicit 1-based index range
 *
 * Each result carries a derived file name and, optionally, a metadata header
 * that the SRT generator writes as a `NOTE` block.
 */

pub mod naming;
pub mod strategies;

use std::fmt;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::errors::SplitError;
use crate::subtitle_processor::{self, Segment, TextField};
use crate::time_codec;

pub use naming::{split_base_name, split_file_name};
pub use strategies::Chunk;

/// Split settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Write a metadata header into every result
    #[serde(default = "default_true")]
    pub include_metadata: bool,

    /// Default window for duration splits
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: f64,

    /// Default chunk size for count splits
    #[serde(default = "default_count_per_file")]
    pub count_per_file: usize,
}

fn default_true() -> bool {
    true
}

fn default_duration_minutes() -> f64 {
    10.0
}

fn default_count_per_file() -> usize {
    200
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            include_metadata: default_true(),
            duration_minutes: default_duration_minutes(),
            count_per_file: default_count_per_file(),
        }
    }
}

/// Ways of selecting one explicit range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelection {
    /// Segments `1..=n`
    StartToN(usize),
    /// Segments `a..=b`
    AToB(usize, usize),
    /// Segments `n..=N`
    NToEnd(usize),
}

impl RangeSelection {
    /// 1-based inclusive bounds before clamping
    pub fn bounds(self, total: usize) -> (usize, usize) {
        match self {
            RangeSelection::StartToN(n) => (1, n),
            RangeSelection::AToB(a, b) => (a, b),
            RangeSelection::NToEnd(n) => (n, total),
        }
    }
}

/// How to split
#[derive(Debug, Clone, PartialEq)]
pub enum SplitStrategy {
    ByCount(usize),
    ByDuration { minutes: f64 },
    ByMarkers(Vec<String>),
    ByRange(RangeSelection),
}

impl SplitStrategy {
    /// Markers from free text, one timestamp per line
    pub fn markers_from_text(text: &str) -> Self {
        SplitStrategy::ByMarkers(text.lines().map(str::to_string).collect())
    }

    /// Compute the index ranges of the results without copying segments
    pub fn chunks(&self, segments: &[Segment]) -> Result<Vec<Chunk>, SplitError> {
        match self {
            SplitStrategy::ByCount(count) => strategies::by_count(segments, *count),
            SplitStrategy::ByDuration { minutes } => strategies::by_duration(segments, *minutes),
            SplitStrategy::ByMarkers(markers) => strategies::by_markers(segments, markers),
            SplitStrategy::ByRange(selection) => {
                let (start, end) = selection.bounds(segments.len());
                strategies::by_range(segments, start, end)
            }
        }
    }

    /// Expected number of result files.
    ///
    /// Count and markers are estimated from the parameters alone
    /// (`ceil(N / count)`, non-blank markers + 1); duration runs the index
    /// pass.
    pub fn preview_count(&self, segments: &[Segment]) -> Result<usize, SplitError> {
        match self {
            SplitStrategy::ByCount(0) => Err(SplitError::InvalidCount),
            SplitStrategy::ByCount(count) => Ok(segments.len().div_ceil(*count)),
            SplitStrategy::ByMarkers(markers) => Ok(strategies::parse_markers(markers)?.len() + 1),
            SplitStrategy::ByRange(selection) => {
                let (start, end) = selection.bounds(segments.len());
                strategies::clamp_range(segments.len(), start, end).map(|_| 1)
            }
            SplitStrategy::ByDuration { .. } => Ok(self.chunks(segments)?.len()),
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::ByCount(count) => write!(f, "every {} segments", count),
            SplitStrategy::ByDuration { minutes } => write!(f, "every {} minutes", minutes),
            SplitStrategy::ByMarkers(markers) => write!(f, "at {} marker(s)", markers.len()),
            SplitStrategy::ByRange(selection) => write!(f, "range {:?}", selection),
        }
    }
}

/// Header describing where a split result came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMetadata {
    pub range_label: String,
    /// Start of the first segment
    pub start_time: String,
    /// End of the last segment
    pub end_time: String,
    pub segment_count: usize,
    /// `HH:MM:SS` between first start and last end
    pub duration: String,
}

impl SplitMetadata {
    /// Metadata of a non-empty chunk
    pub fn from_segments(range_label: &str, segments: &[Segment]) -> Option<Self> {
        let first = segments.first()?;
        let last = segments.last()?;

        Some(Self {
            range_label: range_label.to_string(),
            start_time: first.start_time.clone(),
            end_time: last.end_time.clone(),
            segment_count: segments.len(),
            duration: time_codec::format_duration_hms(last.end_seconds() - first.start_seconds()),
        })
    }

    /// `NOTE` block ending with a single newline
    pub fn to_note_block(&self) -> String {
        format!(
            "NOTE Split metadata\nRange: {}\nStart: {}\nEnd: {}\nSegments: {}\nDuration: {}\n",
            self.range_label, self.start_time, self.end_time, self.segment_count, self.duration
        )
    }
}

/// One output file of a split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    pub file_name: String,
    pub segments: Vec<Segment>,
    pub metadata: Option<SplitMetadata>,
}

impl SplitResult {
    /// Render as SRT, header included when present
    pub fn to_srt(&self, field: TextField) -> String {
        subtitle_processor::generate_srt(&self.segments, field, self.metadata.as_ref())
    }
}

/// Split `segments` into result files named after `source_name`.
///
/// Count, duration and marker splits of an empty list yield no results; a
/// range split of an empty list fails.
pub fn split(
    segments: &[Segment],
    source_name: &str,
    strategy: &SplitStrategy,
    include_metadata: bool,
) -> Result<Vec<SplitResult>, SplitError> {
    let chunks = strategy.chunks(segments)?;

    let results: Vec<SplitResult> = chunks
        .into_iter()
        .map(|chunk| {
            let part = &segments[chunk.range];
            SplitResult {
                file_name: naming::split_file_name(source_name, &chunk.label),
                segments: part.to_vec(),
                metadata: if include_metadata {
                    SplitMetadata::from_segments(&chunk.label, part)
                } else {
                    None
                },
            }
        })
        .collect();

    if !matches!(strategy, SplitStrategy::ByRange(_)) {
        let covered: usize = results.iter().map(|r| r.segments.len()).sum();
        if covered != segments.len() {
            error!(
                "Split {} covered {} of {} segments",
                strategy,
                covered,
                segments.len()
            );
        }
    }

    debug!("Split '{}' {} into {} file(s)", source_name, strategy, results.len());
    Ok(results)
}
