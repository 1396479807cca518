use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

// @module: File naming and file system helpers

// Longest first so `movie.skt.json` loses both parts
const KNOWN_EXTENSIONS: &[&str] = &[".skt.json", ".skt", ".json", ".srt"];

const PROJECT_EXTENSIONS: &[&str] = &[".skt.json", ".skt", ".json"];

// @const: Leading revision tag. A count with a leading zero is not a tag.
static EDITED_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\[Edited([1-9]\d*)?\](.*)$").unwrap()
});

// @struct: Revision information carried by a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameInfo {
    // @field: Name without revision tag and extension
    pub base_name: String,

    // @field: How many times the file was exported after editing
    pub edited_count: u32,
}

/// Strip the first matching known extension (case-insensitive)
pub fn strip_known_extension(name: &str) -> &str {
    KNOWN_EXTENSIONS
        .iter()
        .find(|ext| has_extension(name, ext))
        .map(|ext| &name[..name.len() - ext.len()])
        .unwrap_or(name)
}

/// Whether a file name designates a project file rather than SRT
pub fn is_project_file_name(name: &str) -> bool {
    PROJECT_EXTENSIONS.iter().any(|ext| has_extension(name, ext))
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.len() >= ext.len()
        && name.is_char_boundary(name.len() - ext.len())
        && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
}

/// Split a file name into base name and edit count.
///
/// `[Edited]movie.srt` is count 1, `[Edited3]movie.srt` count 3. A
/// zero-padded tag such as `[Edited01]` is not recognised and stays part of
/// the base name with count 0.
pub fn parse_file_name(name: &str) -> FileNameInfo {
    let stem = strip_known_extension(name);

    if let Some(caps) = EDITED_TAG_REGEX.captures(stem) {
        let count = match caps.get(1) {
            Some(m) => m.as_str().parse::<u32>().ok(),
            None => Some(1),
        };
        if let Some(edited_count) = count {
            return FileNameInfo {
                base_name: caps[2].to_string(),
                edited_count,
            };
        }
    }

    FileNameInfo {
        base_name: stem.to_string(),
        edited_count: 0,
    }
}

/// Name of the next export of `base_name`: the edit count is always
/// incremented, count 1 renders as `[Edited]`, higher counts as `[EditedN]`.
pub fn generate_export_file_name(base_name: &str, current_count: u32, extension: &str) -> String {
    let next = current_count.saturating_add(1);
    let tag = if next == 1 {
        "[Edited]".to_string()
    } else {
        format!("[Edited{}]", next)
    };

    let ext = extension.trim_start_matches('.');
    if ext.is_empty() {
        format!("{}{}", tag, base_name)
    } else {
        format!("{}{}.{}", tag, base_name, ext)
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating the parent directory
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }
}
