/*!
 * Tests for error types and conversions
 */

use subkit::errors::{AppError, ConfigError, ProjectError, ProviderError, SplitError, SubtitleError, TranslationError};

#[test]
fn test_subtitleError_noValidSegments_shouldReportSkippedBlocks() {
    let error = SubtitleError::NoValidSegments { skipped_blocks: 4 };
    let display = format!("{}", error);
    assert!(display.contains("no valid segments"));
    assert!(display.contains("4 malformed"));
}

#[test]
fn test_projectError_unsupportedVersion_shouldShowBothVersions() {
    let error = ProjectError::UnsupportedVersion {
        found: "2.0".to_string(),
        expected: "1.0".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("'2.0'"));
    assert!(display.contains("'1.0'"));
}

#[test]
fn test_splitError_invalidRange_shouldShowBounds() {
    let display = format!("{}", SplitError::InvalidRange { start: 9, end: 3 });
    assert!(display.contains("start 9"));
    assert!(display.contains("end 3"));
}

#[test]
fn test_translationError_fromProviderError_shouldWrap() {
    let error: TranslationError = ProviderError::RateLimitExceeded("slow down".to_string()).into();
    assert!(matches!(error, TranslationError::Provider(ProviderError::RateLimitExceeded(_))));
    assert!(format!("{}", error).contains("Rate limit exceeded: slow down"));
}

#[test]
fn test_appError_fromDomainErrors_shouldPickVariant() {
    assert!(matches!(AppError::from(SplitError::InvalidCount), AppError::Split(_)));
    assert!(matches!(
        AppError::from(ConfigError::Parse("bad".to_string())),
        AppError::Config(ConfigError::Parse(_))
    ));
    assert!(matches!(
        AppError::from(ProjectError::InvalidJson("eof".to_string())),
        AppError::Project(_)
    ));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "movie.srt missing");
    let error = AppError::from(io_error);
    assert!(matches!(error, AppError::File(_)));
    assert!(format!("{}", error).contains("movie.srt missing"));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let error = AppError::from(anyhow::anyhow!("something odd"));
    assert_eq!(format!("{}", error), "Unknown error: something odd");
}
