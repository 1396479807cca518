use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ProjectError, SubtitleError};
use crate::file_utils::{self, FileManager, FileNameInfo};
use crate::language_utils::{self, LineClass};
use crate::preset::StylePreset;
use crate::project;
use crate::split::SplitMetadata;
use crate::time_codec;

// @module: Subtitle segments, SRT parsing and generation

// @const: SRT timing line
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}:\d{2}:\d{2},\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2},\d{3})").unwrap()
});

// @const: Blank-line block separator (lines holding only whitespace count as blank)
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

// @const: Whitespace runs collapsed by the local fix
static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Lines longer than this (in characters) are wrapped by [`local_fix`]
const LOCAL_FIX_WRAP_CHARS: usize = 40;

/// Which text track of a segment an operation reads or writes
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    /// Source-language track
    Original,
    /// Target-language track
    #[default]
    Translated,
}

impl TextField {
    /// The opposite track
    pub fn other(self) -> Self {
        match self {
            Self::Original => Self::Translated,
            Self::Translated => Self::Original,
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Translated => write!(f, "translated"),
        }
    }
}

impl FromStr for TextField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "original" | "source" => Ok(Self::Original),
            "translated" | "target" => Ok(Self::Translated),
            _ => Err(anyhow!("Invalid text field: {}", s)),
        }
    }
}

// @struct: One subtitle cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    // @field: Display index, dense 1..N after reindexing
    pub id: usize,

    // @field: Start timestamp, HH:MM:SS,mmm
    pub start_time: String,

    // @field: End timestamp, HH:MM:SS,mmm
    pub end_time: String,

    // @field: Source-language text
    pub original_text: Option<String>,

    // @field: Target-language text
    pub translated_text: Option<String>,

    // @field: Touched by a human or AI edit since load
    #[serde(default)]
    pub is_modified: bool,
}

impl Segment {
    /// Creates a new unmodified segment
    pub fn new(
        id: usize,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        original_text: Option<String>,
        translated_text: Option<String>,
    ) -> Self {
        Segment {
            id,
            start_time: start_time.into(),
            end_time: end_time.into(),
            original_text,
            translated_text,
            is_modified: false,
        }
    }

    /// Text of one track, `None` when absent
    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Original => self.original_text.as_deref(),
            TextField::Translated => self.translated_text.as_deref(),
        }
    }

    /// Text of the chosen track, falling back to the other track and then to
    /// the empty string. Empty strings count as absent.
    pub fn text_or_fallback(&self, field: TextField) -> &str {
        self.text(field)
            .filter(|t| !t.is_empty())
            .or_else(|| self.text(field.other()).filter(|t| !t.is_empty()))
            .unwrap_or("")
    }

    /// Replace the text of one track
    pub fn set_text(&mut self, field: TextField, text: Option<String>) {
        match field {
            TextField::Original => self.original_text = text,
            TextField::Translated => self.translated_text = text,
        }
    }

    /// Whether the track holds non-blank text
    pub fn has_text(&self, field: TextField) -> bool {
        self.text(field).is_some_and(|t| !t.trim().is_empty())
    }

    /// Start time in seconds (0 for a malformed timestamp)
    pub fn start_seconds(&self) -> f64 {
        time_codec::time_to_seconds(&self.start_time)
    }

    /// End time in seconds (0 for a malformed timestamp)
    pub fn end_seconds(&self) -> f64 {
        time_codec::time_to_seconds(&self.end_time)
    }

    /// Display duration in seconds; negative when the cue is inverted
    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds() - self.start_seconds()
    }
}

/// Result of parsing SRT content
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSrt {
    /// Segments in file order
    pub segments: Vec<Segment>,
    /// Blocks dropped because they had no valid timing line
    pub skipped_blocks: usize,
    /// `NOTE` blocks that were recognised and ignored
    pub note_blocks: usize,
}

/// Parse SRT text into segments.
///
/// Malformed blocks are skipped and counted. Body lines containing CJK
/// ideographs go to `original_text`, all other lines to `translated_text`.
/// Content without a single valid block is reported as
/// [`SubtitleError::NoValidSegments`].
pub fn parse_srt(content: &str) -> Result<ParsedSrt, SubtitleError> {
    let normalized = content
        .trim_start_matches('\u{FEFF}')
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let normalized = normalized.trim();

    let mut segments = Vec::new();
    let mut skipped_blocks = 0;
    let mut note_blocks = 0;

    if !normalized.is_empty() {
        for (block_idx, block) in BLOCK_SEPARATOR_REGEX.split(normalized).enumerate() {
            let lines: Vec<&str> = block
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();

            if lines.is_empty() {
                continue;
            }

            if lines[0].starts_with("NOTE") {
                note_blocks += 1;
                continue;
            }

            match parse_block(&lines, segments.len() + 1) {
                Some(segment) => segments.push(segment),
                None => {
                    skipped_blocks += 1;
                    warn!("Skipping malformed subtitle block {}: {:?}", block_idx + 1, lines.first());
                }
            }
        }
    }

    if segments.is_empty() {
        warn!("No valid subtitle segments found in content");
        return Err(SubtitleError::NoValidSegments { skipped_blocks });
    }

    debug!(
        "Parsed {} segment(s), skipped {} block(s), ignored {} note(s)",
        segments.len(),
        skipped_blocks,
        note_blocks
    );

    Ok(ParsedSrt {
        segments,
        skipped_blocks,
        note_blocks,
    })
}

fn parse_block(lines: &[&str], fallback_id: usize) -> Option<Segment> {
    if lines.len() < 2 {
        return None;
    }

    let caps = TIMING_LINE_REGEX.captures(lines[1])?;
    let id = lines[0].parse::<usize>().unwrap_or(fallback_id);

    let mut source = Vec::new();
    let mut target = Vec::new();
    for line in &lines[2..] {
        match language_utils::classify_line(line) {
            LineClass::Source => source.push(*line),
            LineClass::Target => target.push(*line),
        }
    }

    let join = |parts: Vec<&str>| (!parts.is_empty()).then(|| parts.join("\n"));

    Some(Segment::new(
        id,
        &caps[1],
        &caps[2],
        join(source),
        join(target),
    ))
}

/// Render segments as SRT text.
///
/// Blocks are numbered 1..N in slice order regardless of segment ids, and
/// carry the chosen track only (empty when absent). A split metadata header
/// is emitted first as a `NOTE` block when given.
pub fn generate_srt(segments: &[Segment], field: TextField, metadata: Option<&SplitMetadata>) -> String {
    let mut output = String::new();

    if let Some(meta) = metadata {
        output.push_str(&meta.to_note_block());
        output.push('\n');
    }

    let blocks: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            // Blank lines inside the body would end the block early
            let text = segment
                .text(field)
                .unwrap_or("")
                .lines()
                .filter(|l| !l.trim().is_empty())
                .collect::<Vec<_>>()
                .join("\n");
            format!("{}\n{} --> {}\n{}\n", i + 1, segment.start_time, segment.end_time, text)
        })
        .collect();

    output.push_str(&blocks.join("\n"));
    output
}

/// Renumber ids densely from 1 in slice order
pub fn reindex(segments: &[Segment]) -> Vec<Segment> {
    segments
        .iter()
        .enumerate()
        .map(|(i, s)| Segment { id: i + 1, ..s.clone() })
        .collect()
}

/// Remove the segments with the given ids and renumber the rest
pub fn delete_segments(segments: &[Segment], ids: &[usize]) -> Vec<Segment> {
    let kept: Vec<Segment> = segments
        .iter()
        .filter(|s| !ids.contains(&s.id))
        .cloned()
        .collect();
    reindex(&kept)
}

/// Set the text of one track on the segment with `id`, marking it modified
pub fn update_text(segments: &[Segment], id: usize, field: TextField, text: &str) -> Vec<Segment> {
    segments
        .iter()
        .map(|s| {
            let mut s = s.clone();
            if s.id == id {
                s.set_text(field, Some(text.to_string()));
                s.is_modified = true;
            }
            s
        })
        .collect()
}

/// Quick offline cleanup of a subtitle text.
///
/// Trims, collapses every whitespace run (newlines included) to one space and,
/// when the result is longer than 40 characters, breaks it at the first space
/// at or after the middle.
pub fn local_fix(text: &str) -> String {
    let fixed = WHITESPACE_RUN_REGEX.replace_all(text.trim(), " ").into_owned();
    let char_count = fixed.chars().count();

    if char_count <= LOCAL_FIX_WRAP_CHARS {
        return fixed;
    }

    let mid = char_count / 2;
    let break_at = fixed
        .char_indices()
        .enumerate()
        .find(|(char_pos, (_, c))| *char_pos >= mid && *c == ' ')
        .map(|(_, (byte_idx, _))| byte_idx);

    match break_at {
        Some(idx) => format!("{}\n{}", &fixed[..idx], &fixed[idx + 1..]),
        None => fixed,
    }
}

/// Apply [`local_fix`] to one track of every segment
pub fn apply_local_fix(segments: &[Segment], field: TextField) -> Vec<Segment> {
    segments
        .iter()
        .map(|s| {
            let mut s = s.clone();
            let change = s
                .text(field)
                .filter(|t| !t.is_empty())
                .and_then(|t| {
                    let fixed = local_fix(t);
                    (fixed != t).then_some(fixed)
                });
            if let Some(fixed) = change {
                s.set_text(field, Some(fixed));
                s.is_modified = true;
            }
            s
        })
        .collect()
}

/// A loaded subtitle file together with its naming information
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// File name the segments were loaded from
    pub source_name: String,

    /// Base name and edit count parsed from the file name
    pub file_info: FileNameInfo,

    /// Segments in file order
    pub segments: Vec<Segment>,

    /// Style preset (project files only)
    pub preset: Option<StylePreset>,

    /// Creation time of the project this was loaded from, kept on re-save
    pub created_at: Option<String>,

    /// Malformed SRT blocks dropped while loading
    pub skipped_blocks: usize,
}

impl SubtitleCollection {
    /// Build a collection from SRT text
    pub fn from_srt_str(source_name: &str, content: &str) -> Result<Self> {
        let parsed = parse_srt(content)
            .with_context(|| format!("Failed to load subtitles from '{}'", source_name))?;

        Ok(SubtitleCollection {
            source_name: source_name.to_string(),
            file_info: file_utils::parse_file_name(source_name),
            segments: parsed.segments,
            preset: None,
            created_at: None,
            skipped_blocks: parsed.skipped_blocks,
        })
    }

    /// Build a collection from project JSON
    pub fn from_project_str(source_name: &str, content: &str) -> Result<Self> {
        let parsed = project::parse_project(content)
            .with_context(|| format!("Failed to load project '{}'", source_name))?;

        let mut file_info = file_utils::parse_file_name(source_name);
        if file_info.base_name.is_empty() {
            file_info.base_name = parsed.title.clone();
        }

        Ok(SubtitleCollection {
            source_name: source_name.to_string(),
            file_info,
            segments: parsed.segments,
            preset: parsed.preset,
            created_at: (!parsed.created_at.is_empty()).then_some(parsed.created_at),
            skipped_blocks: 0,
        })
    }

    /// Load an SRT or project file, chosen by extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| anyhow!("Not a file path: {:?}", path))?;

        let content = FileManager::read_to_string(path)?;

        if file_utils::is_project_file_name(&source_name) {
            Self::from_project_str(&source_name, &content)
        } else {
            Self::from_srt_str(&source_name, &content)
        }
    }

    /// Serialize as project JSON, keeping the creation time of a loaded project
    pub fn to_project_json(&self) -> Result<String, ProjectError> {
        project::generate_project(
            &self.segments,
            &self.file_info.base_name,
            self.preset.as_ref(),
            self.created_at.as_deref(),
        )
    }

    /// Write one track as SRT
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P, field: TextField) -> Result<()> {
        FileManager::write_to_file(path, &generate_srt(&self.segments, field, None))
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {}", self.source_name)?;
        writeln!(f, "Edits: {}", self.file_info.edited_count)?;
        writeln!(f, "Segments: {}", self.segments.len())?;
        if self.skipped_blocks > 0 {
            writeln!(f, "Skipped blocks: {}", self.skipped_blocks)?;
        }
        Ok(())
    }
}
