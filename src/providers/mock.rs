/*!
 * Mock provider for tests and offline runs.
 *
 * The mock simulates the behaviors the translation pass must cope with:
 * - `MockProvider::working()` - one tagged translation per input line
 * - `MockProvider::intermittent(n)` - every n-th request fails
 * - `MockProvider::failing()` - every request fails
 * - `MockProvider::wrong_count()` - one line short per batch
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::preset::StylePreset;
use crate::providers::{StyleAnalyzer, TranslationProvider, TranslationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with one line per input
    Working,
    /// Fails every Nth request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns one line fewer than requested
    WrongCount,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock translation provider and style analyzer
#[derive(Debug)]
pub struct MockProvider {
    behavior: MockBehavior,
    /// Shared between clones so intermittent failures span all of them
    request_count: Arc<AtomicUsize>,
    /// Custom line translator (optional)
    custom_translation: Option<fn(&str) -> String>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_translation: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn wrong_count() -> Self {
        Self::new(MockBehavior::WrongCount)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom per-line translator
    pub fn with_custom_translation(mut self, translate: fn(&str) -> String) -> Self {
        self.custom_translation = Some(translate);
        self
    }

    /// Number of requests received so far, across clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn translate_line(&self, text: &str, target_language: &str) -> String {
        match self.custom_translation {
            Some(translate) => translate(text),
            None => format!("[{}] {}", target_language, text),
        }
    }

    fn translate_all(&self, request: &TranslationRequest) -> Vec<String> {
        request
            .texts
            .iter()
            .map(|t| self.translate_line(t, &request.target_language))
            .collect()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_translation: self.custom_translation,
        }
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate_batch(&self, request: TranslationRequest) -> Result<Vec<String>, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(self.translate_all(&request)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::RequestFailed(format!(
                        "Simulated intermittent failure (request #{})",
                        count + 1
                    )))
                } else {
                    Ok(self.translate_all(&request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated provider failure".to_string(),
            )),

            MockBehavior::WrongCount => {
                let mut lines = self.translate_all(&request);
                lines.pop();
                Ok(lines)
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.translate_all(&request))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated provider failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl StyleAnalyzer for MockProvider {
    async fn analyze_style(&self, title_or_summary: &str) -> Result<StylePreset, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        if self.behavior == MockBehavior::Failing {
            return Err(ProviderError::ConnectionError(
                "Simulated provider failure".to_string(),
            ));
        }

        let mut preset = StylePreset::for_reference(title_or_summary).with_humor_level(3);
        preset.title_original = title_or_summary.to_string();
        preset.toggle_genre("drama");
        preset.toggle_tone("neutral");
        Ok(preset)
    }
}
