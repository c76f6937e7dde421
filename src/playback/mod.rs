/*!
 * Sequence and single-item playback.
 *
 * - `sequencer`: the pure state machine deciding what to speak and when
 * - `player`: the tokio task executing the state machine's effects
 * - `slots`: the slot list a sequence walks
 * - `events` and `state`: what listeners and callers observe
 */

pub mod events;
pub mod player;
pub mod sequencer;
pub mod slots;
pub mod state;

pub use events::{ControlState, ItemId, PlaybackEvent, StartPauseLabel};
pub use player::{Player, PlayerHandle, SpeechCompletion};
pub use sequencer::{Effect, OwnerToken, PlaybackSequencer, PlaybackSettings, SingleSpeakOutcome};
pub use slots::{SequenceDataSource, SequenceSlots};
pub use state::{PlaybackMode, PlaybackState};
