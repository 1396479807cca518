/*!
 * Chunking strategies.
 *
 * Every strategy works on indices only: it returns contiguous,
 * non-overlapping index ranges with a label, and leaves copying segments to
 * the caller. Except for an explicit range, the returned chunks cover the
 * input exactly once, in order.
 */

use std::ops::Range;

use log::debug;

use crate::errors::SplitError;
use crate::subtitle_processor::Segment;
use crate::time_codec;

/// A contiguous run of segments and its file name label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub range: Range<usize>,
    pub label: String,
}

impl Chunk {
    fn new(range: Range<usize>, label: String) -> Self {
        Self { range, label }
    }
}

/// Chunks of `count` segments; the last may be shorter.
/// Labels are 1-based inclusive index ranges (`1-30`).
pub fn by_count(segments: &[Segment], count: usize) -> Result<Vec<Chunk>, SplitError> {
    if count == 0 {
        return Err(SplitError::InvalidCount);
    }

    let chunks = (0..segments.len())
        .step_by(count)
        .map(|start| {
            let end = (start + count).min(segments.len());
            Chunk::new(start..end, index_label(start + 1, end))
        })
        .collect();

    Ok(chunks)
}

/// Chunks of fixed wall-clock windows.
///
/// A chunk ends when a segment starts at or after the current window
/// boundary. The boundary then jumps straight to the window holding that
/// segment, so long silent gaps produce no empty chunks. Labels are the
/// window bounds in minutes (`0-10min`).
pub fn by_duration(segments: &[Segment], minutes: f64) -> Result<Vec<Chunk>, SplitError> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(SplitError::InvalidDuration(minutes));
    }

    let window = minutes * 60.0;
    let mut chunks = Vec::new();
    // Whole number kept as f64 so very small windows cannot overflow it
    let mut window_index = 0.0_f64;
    let mut chunk_start = 0;

    for (i, segment) in segments.iter().enumerate() {
        let start = segment.start_seconds();
        if start >= (window_index + 1.0) * window {
            let next_index = (start / window).floor();
            if !next_index.is_finite() {
                return Err(SplitError::InvalidDuration(minutes));
            }
            if i > chunk_start {
                chunks.push(Chunk::new(chunk_start..i, window_label(window_index, minutes)));
                chunk_start = i;
            }
            window_index = next_index;
        }
    }

    if chunk_start < segments.len() {
        chunks.push(Chunk::new(
            chunk_start..segments.len(),
            window_label(window_index, minutes),
        ));
    }

    Ok(chunks)
}

/// Chunks cut at manual timestamps, one per line.
///
/// Blank lines are ignored; any other line must be a valid `HH:MM:SS` or
/// `HH:MM:SS,mmm` timestamp. Markers are sorted, and several markers passed
/// by the same segment produce a single cut. Labels are the chunk's first
/// start and last end as `HH.MM.SS`.
pub fn by_markers<S: AsRef<str>>(segments: &[Segment], markers: &[S]) -> Result<Vec<Chunk>, SplitError> {
    let mut cuts = parse_markers(markers)?;
    cuts.sort_by(f64::total_cmp);
    debug!("Splitting at {} marker(s)", cuts.len());

    let mut chunks = Vec::new();
    let mut next_cut = 0;
    let mut chunk_start = 0;

    for (i, segment) in segments.iter().enumerate() {
        let start = segment.start_seconds();
        while next_cut < cuts.len() && start >= cuts[next_cut] {
            if i > chunk_start {
                chunks.push(Chunk::new(chunk_start..i, time_label(&segments[chunk_start..i])));
                chunk_start = i;
            }
            next_cut += 1;
        }
    }

    if chunk_start < segments.len() {
        chunks.push(Chunk::new(
            chunk_start..segments.len(),
            time_label(&segments[chunk_start..]),
        ));
    }

    Ok(chunks)
}

/// Exactly one chunk for a 1-based inclusive range clamped to `[1, N]`
pub fn by_range(segments: &[Segment], start: usize, end: usize) -> Result<Vec<Chunk>, SplitError> {
    let (start, end) = clamp_range(segments.len(), start, end)?;
    Ok(vec![Chunk::new(start - 1..end, index_label(start, end))])
}

/// Clamp a 1-based inclusive range to the list bounds
pub fn clamp_range(total: usize, start: usize, end: usize) -> Result<(usize, usize), SplitError> {
    if total == 0 {
        return Err(SplitError::EmptyInput);
    }

    let start = start.clamp(1, total);
    let end = end.clamp(1, total);
    if start > end {
        return Err(SplitError::InvalidRange { start, end });
    }

    Ok((start, end))
}

/// Parse non-blank marker lines into seconds
pub fn parse_markers<S: AsRef<str>>(markers: &[S]) -> Result<Vec<f64>, SplitError> {
    markers
        .iter()
        .map(|m| m.as_ref().trim())
        .filter(|m| !m.is_empty())
        .map(|m| time_codec::parse_timestamp(m).map_err(|_| SplitError::InvalidMarker(m.to_string())))
        .collect()
}

fn index_label(first: usize, last: usize) -> String {
    format!("{}-{}", first, last)
}

fn window_label(window_index: f64, minutes: f64) -> String {
    format!(
        "{}-{}min",
        format_minutes(window_index * minutes),
        format_minutes((window_index + 1.0) * minutes)
    )
}

// Three decimals are enough to hide float noise such as 0.30000000000000004
fn format_minutes(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}

// Colons are not allowed in file names on every platform
fn time_label(chunk: &[Segment]) -> String {
    let (Some(first), Some(last)) = (chunk.first(), chunk.last()) else {
        return String::new();
    };
    format!(
        "{}-{}",
        time_codec::strip_millis(&first.start_time).replace(':', "."),
        time_codec::strip_millis(&last.end_time).replace(':', ".")
    )
}
