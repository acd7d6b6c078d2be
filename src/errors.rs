/*!
 * Error types for the aquarelle application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

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

impl ProviderError {
    /// Whether a retry with backoff has a chance of succeeding.
    ///
    /// Connection problems, rate limits, and server-side (5xx) errors are
    /// transient; authentication failures, client (4xx) errors, and
    /// unparseable responses are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionError(_) | Self::RateLimitExceeded(_) | Self::RequestFailed(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500 || *status_code == 429,
            Self::ParseError(_) | Self::AuthenticationError(_) => false,
        }
    }
}

/// Errors that can occur during subtitle parsing and validation
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A cue block is missing required fields or fails validation.
    /// Fatal for the document; carries the offending cue index.
    #[error("Malformed cue {cue_index}: {reason}")]
    MalformedInput {
        /// 1-based index of the offending cue
        cue_index: usize,
        /// What was wrong with the block
        reason: String,
    },

    /// The document contained no cue blocks at all
    #[error("No subtitle entries found in document")]
    Empty,

    /// The file could not be decoded with any supported encoding
    #[error("Could not decode file with any supported encoding: {0}")]
    Encoding(String),
}

/// Errors that can occur while loading a glossary
#[derive(Error, Debug)]
pub enum GlossaryError {
    /// Duplicate source term - fatal at load time, before any translation work
    #[error("Duplicate glossary term '{term}' at line {line}")]
    DuplicateTerm {
        /// The conflicting source term
        term: String,
        /// 1-based CSV line of the duplicate row
        line: usize,
    },

    /// Header row is missing a required column
    #[error("Glossary header is missing a required column: {0}")]
    MissingColumn(String),

    /// A row could not be parsed as CSV
    #[error("Malformed CSV at line {line}: {reason}")]
    MalformedRow {
        /// 1-based CSV line of the bad row
        line: usize,
        /// What was wrong with the row
        reason: String,
    },

    /// Error reading the glossary file
    #[error("Failed to read glossary file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API, after retries were exhausted
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The response carried a different number of lines than the window sent.
    /// Non-retryable: such a response cannot be safely mapped onto timestamps.
    #[error("Window {window}: response carried {actual} lines, expected {expected}")]
    CountMismatch {
        /// 0-based window index
        window: usize,
        /// Number of cues in the window
        expected: usize,
        /// Number of lines in the response
        actual: usize,
    },

    /// The response referenced a cue index that is not part of the window
    #[error("Window {window}: response referenced unknown cue index {index}")]
    UnknownIndex {
        /// 0-based window index
        window: usize,
        /// The out-of-window cue index
        index: usize,
    },

    /// The window plan itself was invalid (configuration error)
    #[error("Invalid window plan: {0}")]
    InvalidPlan(String),
}
