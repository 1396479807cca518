/*!
 * Tests for reading speed and line shape analysis
 */

use subkit::analysis::service::AnalysisConfig;
use subkit::analysis::{
    Analyzer, CpsThresholds, Filter, SegmentIssue, Severity, analyze_segments, calculate_cps, classify,
};
use subkit::subtitle_processor::{Segment, TextField};

use crate::common;

fn segment(text: &str, start: &str, end: &str) -> Segment {
    Segment::new(1, start, end, None, Some(text.to_string()))
}

/// Ten characters over two seconds is 5 CPS, well inside the safe band
#[test]
fn test_classify_withSlowShortLine_shouldBeSafe() {
    let seg = Segment::new(1, "00:00:00,000", "00:00:02,000", Some("一二三四五六七八九十".into()), None);
    let thresholds = CpsThresholds::new(25.0, 40.0);

    assert_eq!(calculate_cps(&seg, seg.text_or_fallback(TextField::Original)), 5.0);

    let metrics = classify(&seg, TextField::Original, &thresholds);
    assert_eq!(metrics.cps, 5.0);
    assert_eq!(metrics.severity, Severity::Safe);
    assert!(metrics.issues.is_empty());
}

/// A line over the length limit is critical even at a low reading speed
#[test]
fn test_classify_withOverlongLine_shouldBeCritical() {
    let seg = segment(&"a".repeat(46), "00:00:00,000", "00:00:10,000");
    let metrics = Analyzer::new().classify(&seg);

    assert!(metrics.cps < 25.0);
    assert_eq!(metrics.severity, Severity::Critical);
    assert!(metrics.messages().contains(&"Dòng phụ đề quá dài".to_string()));
}

/// Three lines exceed the default line count
#[test]
fn test_classify_withTooManyLines_shouldReportCount() {
    let seg = segment("một\nhai\nba", "00:00:00,000", "00:00:10,000");
    let metrics = Analyzer::new().classify(&seg);

    assert_eq!(metrics.severity, Severity::Critical);
    assert!(metrics.issues.iter().any(|i| matches!(i, SegmentIssue::TooManyLines { line_count: 3, .. })));
}

/// Band edges: safe below `safe_max`, warning up to `warning_max`, critical above
#[test]
fn test_severity_atBandEdges_shouldFollowThresholds() {
    let thresholds = CpsThresholds::new(25.0, 40.0);
    let at = |chars: usize| classify(&segment(&"x".repeat(chars), "00:00:00,000", "00:00:01,000"), TextField::Translated, &thresholds).severity;

    assert_eq!(at(24), Severity::Safe);
    assert_eq!(at(25), Severity::Warning);
    assert_eq!(at(40), Severity::Warning);
    assert_eq!(at(41), Severity::Critical);
}

/// Adding text to a segment never lowers its severity
#[test]
fn test_severity_withGrowingText_shouldNeverDecrease() {
    let thresholds = CpsThresholds::default();
    let mut previous = Severity::Safe;

    for chars in 0..120 {
        let seg = segment(&"x".repeat(chars), "00:00:00,000", "00:00:02,000");
        let severity = classify(&seg, TextField::Translated, &thresholds).severity;
        assert!(severity >= previous, "severity dropped at {} chars", chars);
        previous = severity;
    }
}

/// Tighter thresholds never make a segment look better
#[test]
fn test_severity_withTighterThresholds_shouldNeverImprove() {
    let segments = common::sample_segments(20);
    let loose = CpsThresholds::new(25.0, 40.0);
    let tight = CpsThresholds::new(2.0, 3.0);

    for seg in &segments {
        let a = classify(seg, TextField::Translated, &loose).severity;
        let b = classify(seg, TextField::Translated, &tight).severity;
        assert!(b >= a);
    }
}

/// No segments gives zeroed statistics and an empty histogram
#[test]
fn test_analyze_segments_withEmptyInput_shouldReturnZeroes() {
    let analysis = analyze_segments(&[], TextField::Translated, &CpsThresholds::default());

    assert!(analysis.segments.is_empty());
    assert_eq!(analysis.result.total_lines, 0);
    assert_eq!(analysis.result.avg_cps, 0.0);
    assert!(analysis.result.cps_histogram.is_empty());
}

/// Severity groups partition the input and the histogram covers every segment
#[test]
fn test_analyze_withMixedSegments_shouldPartitionAndBucket() {
    let segments = vec![
        segment("short", "00:00:00,000", "00:00:02,000"),
        segment(&"x".repeat(30), "00:00:02,000", "00:00:03,000"),
        segment(&"y".repeat(44), "00:00:03,000", "00:00:04,000"),
    ];
    let analysis = Analyzer::with_config(AnalysisConfig::default()).analyze(&segments);
    let result = &analysis.result;

    assert_eq!(result.total_lines, 3);
    assert_eq!(result.cps_groups.total(), 3);
    assert_eq!(result.cps_groups.safe, 1);
    assert_eq!(result.cps_groups.warning, 1);
    assert_eq!(result.cps_groups.critical, 1);
    assert_eq!(result.too_fast_lines, 1);
    assert_eq!(result.max_cps, 44.0);
    assert_eq!(result.median_cps, 30.0);
    assert_eq!(result.cps_histogram.iter().map(|b| b.count).sum::<usize>(), 3);

    // Input is left untouched
    assert!(segments.iter().all(|s| !s.is_modified));
}

/// Filters select by severity or by a histogram bucket range
#[test]
fn test_filter_shouldSelectMatchingSegments() {
    let segments = vec![
        segment("short", "00:00:00,000", "00:00:02,000"),
        segment(&"x".repeat(30), "00:00:02,000", "00:00:03,000"),
    ];
    let analysis = Analyzer::new().analyze(&segments);

    assert_eq!(Filter::All.apply(&analysis.segments).len(), 2);
    assert_eq!(Filter::BySeverity(Severity::Warning).apply(&analysis.segments).len(), 1);

    let range = Filter::ByCpsRange { min: 0.0, max: Some(5.0) };
    let picked = range.apply(&analysis.segments);
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].segment.translated_text.as_deref(), Some("short"));
}
