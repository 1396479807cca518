/*!
 * Translation style preset ("DNA").
 *
 * The preset is produced by a style analyzer and threaded through to the
 * translation provider and the project file. The toolkit never interprets it;
 * fields it does not know about are kept verbatim so a preset survives a
 * load/save cycle unchanged.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Highest humor intensity a preset can carry
pub const MAX_HUMOR_LEVEL: u8 = 10;

/// Reference material the preset was derived from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresetReference {
    /// Title or short summary used as translation context
    #[serde(default)]
    pub title_or_summary: String,
}

/// Style descriptor for a title
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StylePreset {
    #[serde(default)]
    pub reference: PresetReference,

    /// Title in the source language
    #[serde(default)]
    pub title_original: String,

    /// Title in the target language
    #[serde(default)]
    pub title_vi: String,

    #[serde(default)]
    pub genres: Vec<String>,

    #[serde(default)]
    pub tone: Vec<String>,

    /// 0 (none) to 10 (slapstick)
    #[serde(default)]
    pub humor_level: u8,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StylePreset {
    /// Create a preset for a title/summary with no style information yet
    pub fn for_reference(title_or_summary: &str) -> Self {
        StylePreset {
            reference: PresetReference {
                title_or_summary: title_or_summary.to_string(),
            },
            ..Default::default()
        }
    }

    /// Copy of the preset with the humor level clamped to 0..=10
    pub fn with_humor_level(mut self, level: u8) -> Self {
        self.humor_level = level.min(MAX_HUMOR_LEVEL);
        self
    }

    /// Add or remove a genre
    pub fn toggle_genre(&mut self, genre: &str) {
        toggle(&mut self.genres, genre);
    }

    /// Add or remove a tone
    pub fn toggle_tone(&mut self, tone: &str) {
        toggle(&mut self.tone, tone);
    }

    /// One-line summary used as translation context
    pub fn context_line(&self) -> String {
        let mut parts = Vec::new();
        if !self.reference.title_or_summary.is_empty() {
            parts.push(self.reference.title_or_summary.clone());
        }
        if !self.genres.is_empty() {
            parts.push(format!("genres: {}", self.genres.join(", ")));
        }
        if !self.tone.is_empty() {
            parts.push(format!("tone: {}", self.tone.join(", ")));
        }
        parts.push(format!("humor: {}/{}", self.humor_level, MAX_HUMOR_LEVEL));
        parts.join(" | ")
    }
}

fn toggle(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|i| i == item) {
        list.remove(pos);
    } else {
        list.push(item.to_string());
    }
}
