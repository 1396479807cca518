/*!
 * Provider seams for AI-backed features.
 *
 * The toolkit does not talk to any model itself. A caller plugs in:
 * - a [`TranslationProvider`] that turns a batch of source lines into the
 *   same number of target lines
 * - a [`StyleAnalyzer`] that derives a [`StylePreset`] from a title or
 *   summary
 *
 * `mock` contains a configurable in-process implementation of both.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::preset::StylePreset;

pub mod mock;

/// One batch sent to a translation provider
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationRequest {
    /// Source lines, one per segment
    pub texts: Vec<String>,
    /// Source lines immediately preceding the batch, oldest first
    pub context: Vec<String>,
    /// Style the translation should follow
    pub preset: Option<StylePreset>,
    pub source_language: String,
    pub target_language: String,
}

impl TranslationRequest {
    /// Plain-text instructions for prompt-based providers.
    ///
    /// The response must be a JSON array of strings in the same order as
    /// `texts`.
    pub fn render_prompt(&self) -> String {
        let mut prompt = format!(
            "Translate the following {} subtitle segments to natural, modern {}.\n",
            self.source_language, self.target_language
        );
        prompt.push_str("Keep the context consistent across segments.\n");

        if let Some(preset) = &self.preset {
            prompt.push_str(&format!("Style: {}\n", preset.context_line()));
        }
        if !self.context.is_empty() {
            prompt.push_str(&format!(
                "Previous lines (do not translate): {}\n",
                serde_json::Value::from(self.context.clone())
            ));
        }

        prompt.push_str("Return a JSON array of strings in the exact same order.\n");
        prompt.push_str(&format!("Segments: {}", serde_json::Value::from(self.texts.clone())));
        prompt
    }
}

/// Translates batches of subtitle lines
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate every text of the request.
    ///
    /// Implementations should return exactly one string per input text; the
    /// translation pass rejects the batch otherwise.
    async fn translate_batch(&self, request: TranslationRequest) -> Result<Vec<String>, ProviderError>;

    /// Check that the provider is reachable
    async fn test_connection(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Derives a style preset for a title
#[async_trait]
pub trait StyleAnalyzer: Send + Sync + Debug {
    async fn analyze_style(&self, title_or_summary: &str) -> Result<StylePreset, ProviderError>;
}
