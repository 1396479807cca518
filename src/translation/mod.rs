/*!
 * Batched translation pass over a segment list.
 *
 * The pass only touches pending segments (source text present, target text
 * empty), so running it again after a full success sends nothing. A batch
 * whose response is rejected leaves its segments pending and is reported in
 * the outcome; the other batches still apply.
 *
 * - `batch`: planning batches and sending them to a provider
 */

pub mod batch;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::errors::{ConfigError, TranslationError};
use crate::language_utils;
use crate::preset::StylePreset;
use crate::providers::TranslationProvider;
use crate::subtitle_processor::Segment;

pub use batch::{BatchTranslator, PendingBatch};

/// Translation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// ISO code of the source track
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// ISO code of the target track
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Segments per provider request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Preceding source lines sent as context
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,

    /// Requests in flight at once
    #[serde(default = "default_max_concurrent_batches")]
    pub max_concurrent_batches: usize,
}

fn default_source_language() -> String {
    "zh".to_string()
}

fn default_target_language() -> String {
    "vi".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_context_lines() -> usize {
    3
}

fn default_max_concurrent_batches() -> usize {
    1
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            batch_size: default_batch_size(),
            context_lines: default_context_lines(),
            max_concurrent_batches: default_max_concurrent_batches(),
        }
    }
}

impl TranslationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue("translation.batch_size must be at least 1".to_string()));
        }
        if self.max_concurrent_batches == 0 {
            return Err(ConfigError::InvalidValue(
                "translation.max_concurrent_batches must be at least 1".to_string(),
            ));
        }
        for code in [&self.source_language, &self.target_language] {
            language_utils::normalize_to_part2t(code)
                .map_err(|e| ConfigError::InvalidValue(format!("translation language: {}", e)))?;
        }
        Ok(())
    }
}

/// A batch that could not be applied
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub batch_index: usize,
    /// Ids of the segments that stay pending
    pub segment_ids: Vec<usize>,
    pub error: TranslationError,
}

/// Result of one translation pass
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    /// Input segments with the accepted translations applied
    pub segments: Vec<Segment>,
    pub translated_count: usize,
    /// Requests actually sent to the provider
    pub batches_sent: usize,
    pub failures: Vec<BatchFailure>,
    /// Some batches were skipped because the pass was cancelled
    pub cancelled: bool,
}

impl TranslationOutcome {
    fn unchanged(segments: &[Segment]) -> Self {
        Self {
            segments: segments.to_vec(),
            translated_count: 0,
            batches_sent: 0,
            failures: Vec::new(),
            cancelled: false,
        }
    }

    /// Every batch was sent and accepted
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

/// Runs translation passes against one provider
#[derive(Clone)]
pub struct TranslationPass {
    provider: Arc<dyn TranslationProvider>,
    config: TranslationConfig,
    preset: Option<StylePreset>,
    cancel: Arc<AtomicBool>,
}

impl TranslationPass {
    pub fn new(provider: Arc<dyn TranslationProvider>, config: TranslationConfig) -> Self {
        Self {
            provider,
            config,
            preset: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Style preset sent with every batch
    pub fn with_preset(mut self, preset: Option<StylePreset>) -> Self {
        self.preset = preset;
        self
    }

    /// Use an externally owned cancel flag
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Flag that stops the pass before its next batch when set
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub async fn run(&self, segments: &[Segment]) -> TranslationOutcome {
        self.run_with_progress(segments, |_, _| {}).await
    }

    /// Translate all pending segments, reporting `(done, total)` batches
    pub async fn run_with_progress(
        &self,
        segments: &[Segment],
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> TranslationOutcome {
        let batches = batch::plan_batches(segments, &self.config, self.preset.as_ref());
        if batches.is_empty() {
            info!("Nothing to translate");
            return TranslationOutcome::unchanged(segments);
        }

        info!(
            "Translating {} batch(es) from {} to {}",
            batches.len(),
            self.config.source_language,
            self.config.target_language
        );

        let translator = BatchTranslator::new(
            Arc::clone(&self.provider),
            self.config.max_concurrent_batches,
            Arc::clone(&self.cancel),
        );
        let results = translator.translate_batches(batches, progress_callback).await;

        let mut outcome = TranslationOutcome::unchanged(segments);
        for (pending, result) in results {
            match result {
                None => outcome.cancelled = true,
                Some(Ok(lines)) => {
                    outcome.batches_sent += 1;
                    for (position, line) in pending.positions.iter().zip(lines) {
                        let segment = &mut outcome.segments[*position];
                        segment.translated_text = Some(line);
                        segment.is_modified = true;
                        outcome.translated_count += 1;
                    }
                }
                Some(Err(error)) => {
                    outcome.batches_sent += 1;
                    outcome.failures.push(BatchFailure {
                        batch_index: pending.index,
                        segment_ids: pending.positions.iter().map(|&p| segments[p].id).collect(),
                        error,
                    });
                }
            }
        }

        if !outcome.failures.is_empty() {
            warn!(
                "{} batch(es) failed; {} segment(s) translated",
                outcome.failures.len(),
                outcome.translated_count
            );
        }

        outcome
    }
}
