use serde::Serialize;

use super::state::PlaybackState;

/// Opaque identifier of the UI item that requested an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ItemId(pub usize);

/// Label of the combined start/pause control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartPauseLabel {
    Start,
    Pause,
    Continue,
}

/// Which controls the UI should offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub start_pause: StartPauseLabel,
    /// Per-slot inputs and speak buttons
    pub item_controls_enabled: bool,
    /// Speed, delay and language editing
    pub global_controls_enabled: bool,
    /// Slot to highlight
    pub active_index: Option<usize>,
}

impl ControlState {
    pub fn for_state(state: &PlaybackState) -> Self {
        if state.is_playing() {
            Self {
                start_pause: StartPauseLabel::Pause,
                item_controls_enabled: false,
                global_controls_enabled: false,
                active_index: Some(state.index),
            }
        } else if state.is_paused() {
            Self {
                start_pause: StartPauseLabel::Continue,
                item_controls_enabled: false,
                global_controls_enabled: true,
                active_index: Some(state.index),
            }
        } else {
            Self {
                start_pause: StartPauseLabel::Start,
                item_controls_enabled: true,
                global_controls_enabled: true,
                active_index: None,
            }
        }
    }
}

/// Signals emitted to UI listeners
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    SequenceStarted,
    IndexChanged { index: usize },
    SequencePaused { index: usize },
    SequenceResumed { index: usize },
    /// `stopped` is true when ended by request rather than by running out of slots
    SequenceFinished { stopped: bool },
    SpeechStarted { item: Option<ItemId> },
    SpeechEnded { item: Option<ItemId> },
    ControlsChanged(ControlState),
}
