/*!
 * Batch planning and execution for the translation pass.
 *
 * Planning picks the pending segments (source text present, target text
 * empty), groups them into fixed-size batches and attaches the preceding
 * source lines as context. Execution sends the batches with bounded
 * concurrency and validates that every response has exactly one line per
 * request line.
 */

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use crate::errors::TranslationError;
use crate::preset::StylePreset;
use crate::providers::{TranslationProvider, TranslationRequest};
use crate::subtitle_processor::{Segment, TextField};

use super::TranslationConfig;

/// A batch of pending segments and the request built for it
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBatch {
    /// Position of the batch in the plan
    pub index: usize,
    /// Positions of the batch's segments in the segment list
    pub positions: Vec<usize>,
    pub request: TranslationRequest,
}

/// Outcome of sending one batch; `None` when it was skipped after cancellation
pub type BatchResult = (PendingBatch, Option<Result<Vec<String>, TranslationError>>);

/// Whether a segment still needs a translation
pub fn is_pending(segment: &Segment) -> bool {
    segment.has_text(TextField::Original) && !segment.has_text(TextField::Translated)
}

/// Group pending segments into batches
pub fn plan_batches(
    segments: &[Segment],
    config: &TranslationConfig,
    preset: Option<&StylePreset>,
) -> Vec<PendingBatch> {
    let pending: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| is_pending(s))
        .map(|(i, _)| i)
        .collect();

    pending
        .chunks(config.batch_size.max(1))
        .enumerate()
        .map(|(index, positions)| {
            let texts = positions
                .iter()
                .map(|&p| segments[p].text(TextField::Original).unwrap_or("").to_string())
                .collect();

            PendingBatch {
                index,
                positions: positions.to_vec(),
                request: TranslationRequest {
                    texts,
                    context: context_before(segments, positions[0], config.context_lines),
                    preset: preset.cloned(),
                    source_language: config.source_language.clone(),
                    target_language: config.target_language.clone(),
                },
            }
        })
        .collect()
}

// Up to `lines` non-empty source lines before `position`, oldest first
fn context_before(segments: &[Segment], position: usize, lines: usize) -> Vec<String> {
    let mut context: Vec<String> = segments[..position]
        .iter()
        .rev()
        .filter_map(|s| s.text(TextField::Original))
        .filter(|t| !t.trim().is_empty())
        .take(lines)
        .map(str::to_string)
        .collect();
    context.reverse();
    context
}

/// Sends planned batches to a provider
pub struct BatchTranslator {
    provider: Arc<dyn TranslationProvider>,
    max_concurrent_batches: usize,
    cancel: Arc<AtomicBool>,
}

impl BatchTranslator {
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        max_concurrent_batches: usize,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            provider,
            max_concurrent_batches: max_concurrent_batches.max(1),
            cancel,
        }
    }

    /// Send every batch and return the results in plan order.
    ///
    /// Batches not yet started when the cancel flag is raised are returned
    /// with a `None` result.
    pub async fn translate_batches(
        &self,
        batches: Vec<PendingBatch>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Vec<BatchResult> {
        let total_batches = batches.len();
        let processed_batches = Arc::new(AtomicUsize::new(0));

        let mut results = stream::iter(batches)
            .map(|batch| {
                let provider = Arc::clone(&self.provider);
                let cancel = Arc::clone(&self.cancel);
                let processed_batches = Arc::clone(&processed_batches);
                let progress_callback = progress_callback.clone();

                async move {
                    if cancel.load(Ordering::SeqCst) {
                        debug!("Batch {} skipped: pass cancelled", batch.index + 1);
                        return (batch, None);
                    }

                    let start_time = Instant::now();
                    let expected = batch.request.texts.len();
                    let result = provider
                        .translate_batch(batch.request.clone())
                        .await
                        .map_err(TranslationError::from)
                        .and_then(|lines| {
                            if lines.len() == expected {
                                Ok(lines)
                            } else {
                                Err(TranslationError::BatchSizeMismatch {
                                    expected,
                                    got: lines.len(),
                                })
                            }
                        });

                    match &result {
                        Ok(_) => debug!(
                            "Batch {} of {} completed in {:?}",
                            batch.index + 1,
                            total_batches,
                            start_time.elapsed()
                        ),
                        Err(e) => warn!("Batch {} of {} rejected: {}", batch.index + 1, total_batches, e),
                    }

                    let current = processed_batches.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_batches);

                    (batch, Some(result))
                }
            })
            .buffer_unordered(self.max_concurrent_batches)
            .collect::<Vec<_>>()
            .await;

        // Restore plan order
        results.sort_by_key(|(batch, _)| batch.index);
        results
    }
}
