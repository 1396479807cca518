use once_cell::sync::Lazy;
use regex::Regex;

use crate::file_utils;

// @module: File names of split results

// @const: Prefix added to every split result, possibly repeated
static SPLIT_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\[split [^\]]*\]\s*)+").unwrap());

/// Source name without earlier split prefixes and without extension
pub fn split_base_name(source_name: &str) -> String {
    let unprefixed = SPLIT_PREFIX_REGEX.replace(source_name.trim(), "");
    file_utils::strip_known_extension(&unprefixed).to_string()
}

/// `[split <label>] <base>.srt`
pub fn split_file_name(source_name: &str, label: &str) -> String {
    format!("[split {}] {}.srt", label, split_base_name(source_name))
}
