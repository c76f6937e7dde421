/*!
 * Speech output back-ends.
 *
 * This module contains the `SpeechPort` capability the playback layer talks
 * to, plus implementations for the supported back-ends:
 * - `command`: a local synthesizer binary (espeak-ng style arguments)
 * - `http`: a remote `/speak` endpoint
 * - `silent`: completes immediately, for dry runs
 * - `mock`: scripted behaviour for tests
 */

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

use crate::errors::SpeechError;

pub mod command;
pub mod http;
pub mod mock;
pub mod silent;
pub mod voices;

pub use voices::{select_voice, Voice};

/// One utterance to be spoken
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRequest {
    /// Text to speak
    pub text: String,
    /// Speaking rate multiplier (> 0, 1.0 is normal)
    pub rate: f32,
    /// Pitch multiplier (> 0, 1.0 is normal)
    pub pitch: f32,
    /// Volume in [0, 1]
    pub volume: f32,
    /// BCP-47 style language tag, e.g. "nl-NL"
    pub language_tag: String,
    /// Preferred voice name
    pub voice: Option<String>,
    /// Cancel whatever is currently being spoken first
    pub interrupt: bool,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>, language_tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            language_tag: language_tag.into(),
            voice: None,
            interrupt: true,
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_interrupt(mut self, interrupt: bool) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Replace out-of-range parameters with their defaults
    ///
    /// Non-positive or non-finite rate and pitch become 1.0; a volume outside
    /// [0, 1] becomes 1.0.
    pub fn normalized(mut self) -> Self {
        if !(self.rate.is_finite() && self.rate > 0.0) {
            self.rate = 1.0;
        }
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            self.pitch = 1.0;
        }
        if !(self.volume.is_finite() && (0.0..=1.0).contains(&self.volume)) {
            self.volume = 1.0;
        }
        self
    }
}

/// Common trait for all speech back-ends
///
/// `speak` resolves when the utterance has finished, failed, or been
/// cancelled. Implementations honour `interrupt` by cancelling their own
/// current utterance first. Only one utterance is ever in flight.
#[async_trait]
pub trait SpeechPort: Send + Sync + Debug {
    /// Speak one utterance
    ///
    /// # Arguments
    /// * `request` - What to say and how
    ///
    /// # Returns
    /// * `Result<(), SpeechError>` - Ok when the utterance ended normally
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError>;

    /// Cancel the utterance in flight, if any
    fn cancel(&self);

    /// Short back-end name for logs
    fn name(&self) -> &str;
}
