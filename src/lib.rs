/*!
 * # subkit - subtitle analysis, splitting and project toolkit
 *
 * A Rust library for checking, editing and splitting bilingual subtitle
 * files.
 *
 * ## Features
 *
 * - Parse SRT files, separating CJK source lines from target-language lines
 * - Reading speed (CPS) and line shape analysis with aggregate statistics
 * - Split files by segment count, duration, manual markers or index range
 * - Save and restore projects (both tracks plus style preset) as JSON
 * - Track export revisions in file names (`[Edited]`, `[Edited2]`, ...)
 * - Batched, resumable translation through a pluggable provider
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `time_codec`: SRT timestamp parsing and formatting
 * - `subtitle_processor`: Segments, SRT parsing/generation and editing helpers
 * - `analysis`: CPS, line shape checks, statistics and histogram
 * - `split`: Splitting strategies and result naming
 * - `project`: Project JSON codec
 * - `preset`: Translation style preset
 * - `file_utils`: Revision-aware file naming and file system operations
 * - `language_utils`: Script detection and ISO language code utilities
 * - `providers`: Translation provider and style analyzer traits:
 *   - `providers::mock`: In-process mock implementation
 * - `translation`: Batched translation pass
 * - `session`: Recent project history
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod analysis;
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod preset;
pub mod project;
pub mod providers;
pub mod session;
pub mod split;
pub mod subtitle_processor;
pub mod time_codec;
pub mod translation;

// Re-export main types for easier usage
pub use analysis::{AnalysisResult, Analyzer, CpsThresholds, Severity, analyze_segments};
pub use app_config::Config;
pub use errors::{AppError, ProjectError, ProviderError, SplitError, SubtitleError, TranslationError};
pub use file_utils::{FileNameInfo, generate_export_file_name, parse_file_name};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use project::{generate_project, parse_project};
pub use split::{SplitResult, SplitStrategy, split};
pub use subtitle_processor::{Segment, SubtitleCollection, TextField, generate_srt, parse_srt};
pub use translation::{TranslationOutcome, TranslationPass};
