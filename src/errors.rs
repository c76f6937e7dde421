/*!
 * Error types for the clockspeak application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors produced when raw user text cannot be read as a clock time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeInputError {
    /// Nothing but whitespace was entered
    #[error("Time input is empty")]
    Empty,

    /// Text does not look like H:MM or HH:MM
    #[error("Malformed time input: '{0}' (expected H:MM or HH:MM)")]
    Malformed(String),

    /// Hour component outside 0-23
    #[error("Hour out of range: {0} (expected 0-23)")]
    HourOutOfRange(u32),

    /// Minute component outside 0-59
    #[error("Minute out of range: {0} (expected 0-59)")]
    MinuteOutOfRange(u32),
}

/// Errors that can occur while loading vocabulary tables
#[derive(Error, Debug)]
pub enum VocabularyError {
    /// Reading a vocabulary file or directory failed
    #[error("Vocabulary I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A vocabulary file is not valid JSON for the expected layout
    #[error("Failed to parse vocabulary '{code}': {message}")]
    Parse {
        /// Language code of the offending table
        code: String,
        /// Parser message
        message: String,
    },
}

/// Errors reported by speech back-ends
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeechError {
    /// No usable speech capability is present
    #[error("Speech output unavailable: {0}")]
    Unavailable(String),

    /// The speech process could not be started
    #[error("Failed to start speech process '{program}': {message}")]
    SpawnFailed {
        /// Program that failed to spawn
        program: String,
        /// OS error text
        message: String,
    },

    /// The speech process exited unsuccessfully
    #[error("Speech process '{program}' failed: {stderr}")]
    ProcessFailed {
        /// Program that failed
        program: String,
        /// Captured standard error
        stderr: String,
    },

    /// The remote speech endpoint rejected or failed the request
    #[error("Speech request failed: {0}")]
    RequestFailed(String),

    /// The utterance was cancelled before it finished
    #[error("Utterance cancelled")]
    Cancelled,
}

/// Errors surfaced to the caller of playback operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The entered text is not a valid time
    #[error("Invalid time: {0}")]
    MalformedTimeInput(#[from] TimeInputError),

    /// No vocabulary could be resolved for the language
    #[error("No time phrase available for language '{0}'")]
    PhraseUnavailable(String),

    /// A sequence is playing and has not been paused
    #[error("A sequence is currently playing")]
    SequenceActive,

    /// The player task has shut down
    #[error("Player is no longer running")]
    PlayerClosed,
}
