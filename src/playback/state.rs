use serde::Serialize;
use std::fmt;

/// What the player is doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    /// Nothing running (initial and terminal)
    #[default]
    Idle,
    /// Walking the sequence slots
    Sequential,
    /// One utterance outside any sequence
    Single,
}

/// Snapshot of the playback state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    /// Current slot; meaningful in sequential mode only
    pub index: usize,
    pub paused: bool,
    /// An utterance is in flight
    pub speaking: bool,
}

impl PlaybackState {
    pub fn is_idle(&self) -> bool {
        self.mode == PlaybackMode::Idle
    }

    /// Sequence running and not paused
    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Sequential && !self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.mode == PlaybackMode::Sequential && self.paused
    }

    pub fn in_sequence(&self) -> bool {
        self.mode == PlaybackMode::Sequential
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mode, self.paused) {
            (PlaybackMode::Idle, _) => write!(f, "idle")?,
            (PlaybackMode::Sequential, false) => write!(f, "playing({})", self.index)?,
            (PlaybackMode::Sequential, true) => write!(f, "paused({})", self.index)?,
            (PlaybackMode::Single, _) => write!(f, "single")?,
        }
        if self.speaking {
            write!(f, "+speaking")?;
        }
        Ok(())
    }
}
