/*!
 * Error types for the subkit library.
 *
 * This module contains custom error types for the different parts of the
 * toolkit, using the thiserror crate for ergonomic error definitions.
 * Core functions return these typed errors; the binary and the file helpers
 * wrap them in `anyhow` with context.
 */

use thiserror::Error;

/// Errors that can occur while reading or interpreting SRT content
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// The content contained no block with a valid timestamp line
    #[error("File has no valid segments ({skipped_blocks} malformed block(s) skipped)")]
    NoValidSegments {
        /// Number of blocks that were dropped while parsing
        skipped_blocks: usize,
    },

    /// A timestamp string did not match `HH:MM:SS,mmm`
    #[error("Invalid timestamp: '{0}'")]
    InvalidTimestamp(String),
}

/// Errors raised by the project file codec
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    /// The project declares a schema version we cannot read
    #[error("Unsupported project version: found '{found}', expected '{expected}'")]
    UnsupportedVersion {
        /// Version tag found in the file (empty when absent)
        found: String,
        /// The single supported version tag
        expected: String,
    },

    /// The project text is not valid JSON or does not match the schema
    #[error("Invalid project file: {0}")]
    InvalidJson(String),

    /// The project could not be serialized
    #[error("Failed to serialize project: {0}")]
    Serialize(String),
}

/// Errors raised when a split request cannot be satisfied
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    /// There are no segments to split
    #[error("Cannot split an empty segment list")]
    EmptyInput,

    /// Segment count per file must be at least 1
    #[error("Segment count per file must be greater than zero")]
    InvalidCount,

    /// Duration per file must be a positive number of minutes
    #[error("Duration per file must be greater than zero minutes, got {0}")]
    InvalidDuration(f64),

    /// A manual marker could not be parsed as a timestamp
    #[error("Invalid split marker: '{0}'")]
    InvalidMarker(String),

    /// An explicit index range is inverted after clamping
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Clamped 1-based start index
        start: usize,
        /// Clamped 1-based end index
        end: usize,
    },
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider returned a different number of strings than it was sent
    #[error("Batch size mismatch: sent {expected} segment(s), received {got} translation(s)")]
    BatchSizeMismatch {
        /// Number of texts in the request
        expected: usize,
        /// Number of texts in the response
        got: usize,
    },
}

/// Errors raised while loading, validating or saving configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Thresholds must satisfy `0 < safe_max < warning_max`
    #[error("Invalid CPS thresholds: safe_max {safe_max} must be positive and below warning_max {warning_max}")]
    InvalidThresholds {
        /// Upper bound of the safe band
        safe_max: f64,
        /// Upper bound of the warning band
        warning_max: f64,
    },

    /// Any other out-of-range setting
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// Reading or writing the configuration file failed
    #[error("Configuration I/O error: {0}")]
    Io(String),

    /// The configuration file is not valid JSON
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the project codec
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// Error from the splitter
    #[error("Split error: {0}")]
    Split(#[from] SplitError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from configuration handling
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
