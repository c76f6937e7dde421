/*!
 * Sequence playback state machine.
 *
 * `PlaybackSequencer` owns the `PlaybackState` and decides what happens next,
 * but performs no I/O itself. Every operation returns a list of `Effect`s
 * (speak, cancel, schedule a timer, emit an event) for a driver to carry out,
 * and the driver feeds speech and timer signals back in.
 *
 * Every speech request and every timer carries an `OwnerToken`. Signals whose
 * token is not the one currently expected are stale (the utterance was
 * cancelled or superseded) and are ignored.
 */

use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

use super::events::{ControlState, ItemId, PlaybackEvent};
use super::slots::SequenceDataSource;
use super::state::{PlaybackMode, PlaybackState};
use crate::errors::PlaybackError;
use crate::phrase::{FormatOptions, PhraseFormatter};
use crate::speech::SpeechRequest;
use crate::time_input::{parse_time_input, TimeValue};
use crate::vocabulary::VocabularyProvider;

/// Identifies the speech request or timer that produced a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerToken(u64);

impl OwnerToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Work the driver must perform on behalf of the sequencer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start an utterance; report start/end back with `token`
    Speak { token: OwnerToken, request: SpeechRequest },
    /// Stop the utterance in flight
    CancelSpeech,
    /// Call `on_advance_due(token)` after `delay`
    ScheduleAdvance { token: OwnerToken, delay: Duration },
    /// Abort the timer scheduled with `token`
    CancelAdvance(OwnerToken),
    /// Forward to listeners
    Emit(PlaybackEvent),
}

/// Settings read on every utterance
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSettings {
    pub language_code: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Pause between the end of one slot and the start of the next
    pub delay: Duration,
    pub use_24h: bool,
    pub voice_name: Option<String>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            language_code: "nl-NL".to_string(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            delay: Duration::from_millis(2000),
            use_24h: false,
            voice_name: None,
        }
    }
}

impl PlaybackSettings {
    fn format_options(&self) -> FormatOptions {
        FormatOptions { use_24h: self.use_24h }
    }
}

/// Accepted single-speak request
#[derive(Debug)]
pub struct SingleSpeakOutcome {
    /// Token the utterance was issued with
    pub token: OwnerToken,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Slot(usize),
    Single(Option<ItemId>),
}

impl Owner {
    fn item(&self) -> Option<ItemId> {
        match *self {
            Owner::Slot(index) => Some(ItemId(index)),
            Owner::Single(item) => item,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Utterance {
    token: OwnerToken,
    owner: Owner,
}

#[derive(Debug, Clone, Copy)]
struct PendingAdvance {
    token: OwnerToken,
    from_index: usize,
}

/// Sequence and single-speak state machine
pub struct PlaybackSequencer {
    formatter: PhraseFormatter<Arc<dyn VocabularyProvider>>,
    slots: Arc<dyn SequenceDataSource>,
    settings: PlaybackSettings,
    state: PlaybackState,
    next_token: u64,
    utterance: Option<Utterance>,
    pending: Option<PendingAdvance>,
}

impl PlaybackSequencer {
    pub fn new(
        vocabulary: Arc<dyn VocabularyProvider>,
        slots: Arc<dyn SequenceDataSource>,
        settings: PlaybackSettings,
    ) -> Self {
        Self {
            formatter: PhraseFormatter::new(vocabulary),
            slots,
            settings,
            state: PlaybackState::default(),
            next_token: 0,
            utterance: None,
            pending: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn controls(&self) -> ControlState {
        ControlState::for_state(&self.state)
    }

    /// Phrase for `time` with the current language and hour mode
    pub fn phrase_for(&self, time: TimeValue) -> String {
        self.formatter
            .format(time, &self.settings.language_code, self.settings.format_options())
    }

    /// Replace the settings; refused while a sequence is playing unpaused
    pub fn update_settings(&mut self, settings: PlaybackSettings) -> bool {
        if self.state.is_playing() {
            debug!("Settings are locked while the sequence plays");
            return false;
        }
        self.settings = settings;
        true
    }

    /// Begin at slot 0. No-op unless idle.
    pub fn start_sequence(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state.in_sequence() {
            debug!("start ignored in state {}", self.state);
            return effects;
        }
        // A single utterance may still be in flight
        self.cancel_utterance(&mut effects);

        info!("Starting sequence of {} slots", self.slots.len());
        self.state = PlaybackState {
            mode: PlaybackMode::Sequential,
            index: 0,
            paused: false,
            speaking: false,
        };
        effects.push(Effect::Emit(PlaybackEvent::SequenceStarted));
        self.play_at(0, &mut effects);
        effects
    }

    /// Hold at the current slot. No-op unless playing.
    pub fn pause_sequence(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.is_playing() {
            debug!("pause ignored in state {}", self.state);
            return effects;
        }
        self.cancel_advance(&mut effects);
        self.cancel_utterance(&mut effects);
        self.state.paused = true;

        let index = self.state.index;
        effects.push(Effect::Emit(PlaybackEvent::SequencePaused { index }));
        effects.push(self.controls_changed());
        effects
    }

    /// Re-attempt the slot the sequence was paused at. No-op unless paused.
    pub fn continue_sequence(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.state.is_paused() {
            debug!("continue ignored in state {}", self.state);
            return effects;
        }
        self.cancel_utterance(&mut effects);
        self.state.paused = false;

        let index = self.state.index;
        effects.push(Effect::Emit(PlaybackEvent::SequenceResumed { index }));
        self.play_at(index, &mut effects);
        effects
    }

    /// Cancel everything and return to idle. No-op when already idle.
    pub fn stop_sequence(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state.is_idle() {
            debug!("stop ignored in state {}", self.state);
            return effects;
        }
        self.cancel_utterance(&mut effects);
        self.finish(true, &mut effects);
        effects
    }

    /// Start, pause or continue, as the combined start/pause control does
    pub fn toggle(&mut self) -> Vec<Effect> {
        if self.state.is_playing() {
            self.pause_sequence()
        } else if self.state.is_paused() {
            self.continue_sequence()
        } else {
            self.start_sequence()
        }
    }

    /// Speak a ready-made phrase outside the sequence
    ///
    /// Rejected while a sequence plays unpaused. Any utterance in flight is
    /// cancelled first. `rate` overrides the configured rate.
    pub fn speak_single(
        &mut self,
        phrase: &str,
        rate: Option<f32>,
        item: Option<ItemId>,
    ) -> Result<SingleSpeakOutcome, PlaybackError> {
        if self.state.is_playing() {
            return Err(PlaybackError::SequenceActive);
        }
        if phrase.trim().is_empty() {
            return Err(PlaybackError::PhraseUnavailable(self.settings.language_code.clone()));
        }

        let mut effects = Vec::new();
        self.cancel_utterance(&mut effects);
        if self.state.is_idle() {
            self.state.mode = PlaybackMode::Single;
        }
        let rate = rate.unwrap_or(self.settings.rate);
        let token = self.issue_speech(Owner::Single(item), phrase, rate, &mut effects);
        Ok(SingleSpeakOutcome { token, effects })
    }

    /// Parse raw time text, format it and speak it outside the sequence
    pub fn speak_time(
        &mut self,
        raw: &str,
        item: Option<ItemId>,
    ) -> Result<SingleSpeakOutcome, PlaybackError> {
        if self.state.is_playing() {
            return Err(PlaybackError::SequenceActive);
        }
        let time = parse_time_input(raw)?;
        let phrase = self.phrase_for(time);
        self.speak_single(&phrase, None, item)
    }

    /// The utterance issued with `token` has started
    pub fn on_speech_started(&mut self, token: OwnerToken) -> Vec<Effect> {
        match self.utterance {
            Some(current) if current.token == token => {
                vec![Effect::Emit(PlaybackEvent::SpeechStarted { item: current.owner.item() })]
            }
            _ => {
                debug!("Ignoring stale start signal {:?}", token);
                Vec::new()
            }
        }
    }

    /// The utterance issued with `token` has ended, failed or been cancelled
    pub fn on_speech_ended(&mut self, token: OwnerToken) -> Vec<Effect> {
        let mut effects = Vec::new();
        let current = match self.utterance {
            Some(current) if current.token == token => current,
            _ => {
                debug!("Ignoring stale end signal {:?}", token);
                return effects;
            }
        };
        self.utterance = None;
        self.state.speaking = false;
        effects.push(Effect::Emit(PlaybackEvent::SpeechEnded { item: current.owner.item() }));

        match current.owner {
            Owner::Slot(index) if self.state.is_playing() && self.state.index == index => {
                let token = self.next_token();
                self.pending = Some(PendingAdvance { token, from_index: index });
                effects.push(Effect::ScheduleAdvance { token, delay: self.settings.delay });
            }
            Owner::Slot(_) => {}
            Owner::Single(_) => {
                if self.state.mode == PlaybackMode::Single {
                    self.state.mode = PlaybackMode::Idle;
                }
            }
        }
        effects
    }

    /// The inter-slot delay scheduled with `token` has elapsed
    pub fn on_advance_due(&mut self, token: OwnerToken) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                if self.state.is_playing() {
                    self.play_at(pending.from_index + 1, &mut effects);
                }
            }
            _ => debug!("Ignoring stale advance timer {:?}", token),
        }
        effects
    }

    // Speak the first usable slot from `index` on, or finish past the end.
    fn play_at(&mut self, mut index: usize, effects: &mut Vec<Effect>) {
        loop {
            if index >= self.slots.len() {
                self.finish(false, effects);
                return;
            }

            self.state.index = index;
            effects.push(Effect::Emit(PlaybackEvent::IndexChanged { index }));
            effects.push(self.controls_changed());

            let raw = self.slots.raw_text(index).unwrap_or_default();
            if raw.trim().is_empty() {
                debug!("Skipping empty slot {}", index);
                index += 1;
                continue;
            }
            let time = match parse_time_input(&raw) {
                Ok(time) => time,
                Err(e) => {
                    debug!("Skipping slot {}: {}", index, e);
                    index += 1;
                    continue;
                }
            };
            let phrase = self.phrase_for(time);
            if phrase.is_empty() {
                debug!("Skipping slot {}: no phrase for '{}'", index, self.settings.language_code);
                index += 1;
                continue;
            }

            let rate = self.settings.rate;
            self.issue_speech(Owner::Slot(index), &phrase, rate, effects);
            return;
        }
    }

    fn finish(&mut self, stopped: bool, effects: &mut Vec<Effect>) {
        self.cancel_advance(effects);
        let was_sequence = self.state.in_sequence();
        self.state = PlaybackState::default();
        if was_sequence {
            info!("Sequence {}", if stopped { "stopped" } else { "finished" });
            effects.push(Effect::Emit(PlaybackEvent::SequenceFinished { stopped }));
        }
        effects.push(self.controls_changed());
    }

    fn issue_speech(&mut self, owner: Owner, text: &str, rate: f32, effects: &mut Vec<Effect>) -> OwnerToken {
        let token = self.next_token();
        let request = SpeechRequest::new(text, self.settings.language_code.as_str())
            .with_rate(rate)
            .with_pitch(self.settings.pitch)
            .with_volume(self.settings.volume)
            .with_voice(self.settings.voice_name.clone())
            .with_interrupt(true)
            .normalized();

        self.utterance = Some(Utterance { token, owner });
        self.state.speaking = true;
        effects.push(Effect::Speak { token, request });
        token
    }

    fn cancel_utterance(&mut self, effects: &mut Vec<Effect>) {
        if let Some(current) = self.utterance.take() {
            self.state.speaking = false;
            effects.push(Effect::CancelSpeech);
            effects.push(Effect::Emit(PlaybackEvent::SpeechEnded { item: current.owner.item() }));
            if let Owner::Single(_) = current.owner {
                if self.state.mode == PlaybackMode::Single {
                    self.state.mode = PlaybackMode::Idle;
                }
            }
        }
    }

    fn cancel_advance(&mut self, effects: &mut Vec<Effect>) {
        if let Some(pending) = self.pending.take() {
            effects.push(Effect::CancelAdvance(pending.token));
        }
    }

    fn controls_changed(&self) -> Effect {
        Effect::Emit(PlaybackEvent::ControlsChanged(self.controls()))
    }

    fn next_token(&mut self) -> OwnerToken {
        self.next_token += 1;
        OwnerToken(self.next_token)
    }
}
