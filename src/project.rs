/*!
 * Project file codec.
 *
 * A project is a JSON envelope that keeps both text tracks, the style preset
 * and the creation time of a subtitle file across sessions:
 *
 * ```json
 * {"version": "1.0", "original_title": "...", "created_at": "...", "updated_at": "...",
 *  "preset": null, "segments": [{"id": 1, "start": "...", "end": "...", "original": "...", "translated": "..."}]}
 * ```
 *
 * Text fields are always strings in this format; absent text is stored and
 * loaded as `""`.
 */

use chrono::{SecondsFormat, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ProjectError;
use crate::preset::StylePreset;
use crate::subtitle_processor::Segment;

/// The single project schema version this codec reads and writes
pub const PROJECT_VERSION: &str = "1.0";

/// On-disk project envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub version: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub preset: Option<StylePreset>,
    pub segments: Vec<ProjectSegment>,
}

/// On-disk segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSegment {
    pub id: usize,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub translated: String,
}

/// A project loaded back into memory
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedProject {
    pub segments: Vec<Segment>,
    pub preset: Option<StylePreset>,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

// Only the version is read first so that a future schema reports a version
// mismatch instead of a confusing field error.
#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: Option<Value>,
}

/// Current time in the project timestamp format (RFC 3339, UTC, milliseconds)
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serialize segments into project JSON.
///
/// `created_at` is kept when given (re-saving an existing project) and
/// defaults to now; `updated_at` is always now.
pub fn generate_project(
    segments: &[Segment],
    title: &str,
    preset: Option<&StylePreset>,
    created_at: Option<&str>,
) -> Result<String, ProjectError> {
    let now = now_timestamp();

    let project = ProjectFile {
        version: PROJECT_VERSION.to_string(),
        original_title: title.to_string(),
        created_at: created_at.map(str::to_string).unwrap_or_else(|| now.clone()),
        updated_at: now,
        preset: preset.cloned(),
        segments: segments
            .iter()
            .map(|s| ProjectSegment {
                id: s.id,
                start: s.start_time.clone(),
                end: s.end_time.clone(),
                original: s.original_text.clone().unwrap_or_default(),
                translated: s.translated_text.clone().unwrap_or_default(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&project).map_err(|e| ProjectError::Serialize(e.to_string()))
}

/// Parse project JSON back into segments, preset and title
pub fn parse_project(json: &str) -> Result<ParsedProject, ProjectError> {
    let probe: VersionProbe =
        serde_json::from_str(json).map_err(|e| ProjectError::InvalidJson(e.to_string()))?;

    // Only the exact version string matches; `1.0` as a number does not
    let found = match probe.version {
        Some(Value::String(v)) if v == PROJECT_VERSION => None,
        Some(Value::String(v)) => Some(v),
        Some(other) => Some(other.to_string()),
        None => Some(String::new()),
    };
    if let Some(found) = found {
        return Err(ProjectError::UnsupportedVersion {
            found,
            expected: PROJECT_VERSION.to_string(),
        });
    }

    let project: ProjectFile =
        serde_json::from_str(json).map_err(|e| ProjectError::InvalidJson(e.to_string()))?;

    debug!(
        "Loaded project '{}' with {} segment(s)",
        project.original_title,
        project.segments.len()
    );

    let segments = project
        .segments
        .into_iter()
        .map(|s| Segment::new(s.id, s.start, s.end, Some(s.original), Some(s.translated)))
        .collect();

    Ok(ParsedProject {
        segments,
        preset: project.preset,
        title: project.original_title,
        created_at: project.created_at,
        updated_at: project.updated_at,
    })
}
