/*!
 * Translation pass tests with mock providers
 */

use anyhow::Result;
use std::sync::{Arc, Mutex};

use subkit::preset::StylePreset;
use subkit::project::{generate_project, parse_project};
use subkit::providers::mock::MockProvider;
use subkit::providers::{StyleAnalyzer, TranslationProvider};
use subkit::translation::{TranslationConfig, TranslationPass};

use crate::common;

fn config(batch_size: usize, max_concurrent_batches: usize) -> TranslationConfig {
    TranslationConfig {
        batch_size,
        max_concurrent_batches,
        ..TranslationConfig::default()
    }
}

fn upper(text: &str) -> String {
    text.to_uppercase()
}

/// Test that a full pass translates every pending segment in order
#[tokio::test]
async fn test_run_withConcurrentBatches_shouldKeepSegmentOrder() -> Result<()> {
    let provider = Arc::new(MockProvider::slow(5));
    let pass = TranslationPass::new(provider.clone(), config(3, 4));

    let segments = common::untranslated_segments(20);
    let outcome = pass.run(&segments).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.translated_count, 20);
    assert_eq!(provider.request_count(), 7);
    for (i, segment) in outcome.segments.iter().enumerate() {
        assert_eq!(segment.id, i + 1);
        assert_eq!(segment.translated_text.as_deref(), Some(format!("[vi] 第{}句", i + 1).as_str()));
    }
    Ok(())
}

/// Test that re-running after success sends nothing
#[tokio::test]
async fn test_run_afterSuccess_shouldBeIdempotent() -> Result<()> {
    let provider = Arc::new(MockProvider::working().with_custom_translation(upper));
    let pass = TranslationPass::new(provider.clone(), config(5, 1));

    let first = pass.run(&common::untranslated_segments(8)).await;
    let calls = provider.request_count();
    let second = pass.run(&first.segments).await;

    assert_eq!(provider.request_count(), calls);
    assert_eq!(second.batches_sent, 0);
    assert_eq!(second.segments, first.segments);
    Ok(())
}

/// Test that a second pass picks up only what the first one left pending
#[tokio::test]
async fn test_run_afterPartialFailure_shouldResumePendingOnly() -> Result<()> {
    let flaky = Arc::new(MockProvider::intermittent(2));
    let first = TranslationPass::new(flaky, config(2, 1))
        .run(&common::untranslated_segments(8))
        .await;

    assert_eq!(first.failures.len(), 2);
    assert_eq!(first.translated_count, 4);
    let still_pending: Vec<usize> = first.failures.iter().flat_map(|f| f.segment_ids.clone()).collect();
    assert_eq!(still_pending, vec![3, 4, 7, 8]);

    let working = Arc::new(MockProvider::working());
    let second = TranslationPass::new(working.clone(), config(2, 1)).run(&first.segments).await;

    assert!(second.is_complete());
    assert_eq!(second.translated_count, 4);
    assert_eq!(working.request_count(), 2);
    assert!(second.segments.iter().all(|s| s.translated_text.is_some()));
    Ok(())
}

/// Test that a failing provider leaves the input untouched
#[tokio::test]
async fn test_run_withFailingProvider_shouldReportEveryBatch() -> Result<()> {
    let pass = TranslationPass::new(Arc::new(MockProvider::failing()), config(4, 2));
    let segments = common::untranslated_segments(10);

    let outcome = pass.run(&segments).await;

    assert_eq!(outcome.failures.len(), 3);
    assert_eq!(outcome.translated_count, 0);
    assert_eq!(outcome.segments, segments);
    Ok(())
}

/// Test that progress is reported once per sent batch
#[tokio::test]
async fn test_run_withProgress_shouldReportEachBatch() -> Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let pass = TranslationPass::new(Arc::new(MockProvider::working()), config(2, 1));

    pass.run_with_progress(&common::untranslated_segments(5), move |done, total| {
        if let Ok(mut seen) = sink.lock() {
            seen.push((done, total));
        }
    })
    .await;

    let seen = seen.lock().map(|s| s.clone()).unwrap_or_default();
    assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
    Ok(())
}

/// Test that the analyzed preset reaches the provider and the project file
#[tokio::test]
async fn test_preset_fromAnalyzer_shouldSurviveTranslationAndProject() -> Result<()> {
    let provider = Arc::new(MockProvider::working());
    provider.test_connection().await?;
    let preset: StylePreset = provider.analyze_style("Nirvana in Fire").await?;
    assert_eq!(preset.reference.title_or_summary, "Nirvana in Fire");

    let pass = TranslationPass::new(provider, config(10, 1)).with_preset(Some(preset.clone()));
    let outcome = pass.run(&common::untranslated_segments(3)).await;

    let json = generate_project(&outcome.segments, "nirvana", Some(&preset), None)?;
    let restored = parse_project(&json)?;
    assert_eq!(restored.preset, Some(preset));
    assert_eq!(restored.segments[2].translated_text.as_deref(), Some("[vi] 第3句"));
    Ok(())
}
