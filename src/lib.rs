/*!
 * # clockspeak - spoken clock time trainer
 *
 * A Rust library that turns clock times into the phrase a native speaker
 * would use and speaks them, one at a time or as a timed sequence.
 *
 * ## Features
 *
 * - Time phrases for Slavic, Germanic, Latin, Arabic and Turkic phrasing
 *   rules, with correct plural agreement for minute words
 * - Built-in vocabularies for ar, de, en, fr, nl, pl, pt, ru, tr and uk,
 *   overridable from a directory of JSON files
 * - Sequence playback with pause, resume and stop, driven over any speech
 *   back-end (local synthesizer, HTTP endpoint, silent)
 * - Strict `H:MM` input parsing and random practice times
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `time_input`: Time parsing, formatting and random generation
 * - `language_utils`: Language tags, families and ISO names
 * - `vocabulary`: Per-language word tables and their provider
 * - `phrase`: Time phrase generation:
 *   - `phrase::plural`: Plural form selection
 * - `speech`: Speech back-ends:
 *   - `speech::command`: Local synthesizer process
 *   - `speech::http`: Remote speak endpoint
 *   - `speech::voices`: Voice selection
 * - `playback`: Sequence state machine and its async driver
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
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod phrase;
pub mod playback;
pub mod speech;
pub mod time_input;
pub mod vocabulary;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{PlaybackError, SpeechError, TimeInputError, VocabularyError};
pub use language_utils::{base_language, LanguageFamily};
pub use phrase::{choose_form, lookup_or, FormatOptions, PhraseFormatter};
pub use playback::{Player, PlayerHandle, PlaybackEvent, PlaybackSequencer, PlaybackSettings, PlaybackState};
pub use speech::{SpeechPort, SpeechRequest};
pub use time_input::{format_as_hhmm, parse_time_input, TimeValue};
pub use vocabulary::{LanguageVocabulary, VocabularyProvider, VocabularyStore};
