/*!
 * Async driver for the playback state machine.
 *
 * `Player` owns a `PlaybackSequencer` on a single tokio task and carries out
 * its effects: utterances run on spawned tasks against the shared
 * `SpeechPort`, delays are spawned sleeps. Completion signals come back over
 * a channel, so the sequencer only ever sees one event at a time.
 * `PlayerHandle` is the cloneable front end.
 */

use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use super::events::{ItemId, PlaybackEvent};
use super::sequencer::{Effect, OwnerToken, PlaybackSequencer, PlaybackSettings, SingleSpeakOutcome};
use super::state::PlaybackState;
use crate::errors::{PlaybackError, SpeechError};
use crate::speech::SpeechPort;

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 256;

type SingleReply = oneshot::Sender<Result<SpeechCompletion, PlaybackError>>;

enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    Toggle,
    SpeakSingle {
        phrase: String,
        rate: Option<f32>,
        item: Option<ItemId>,
        reply: SingleReply,
    },
    SpeakTime {
        raw: String,
        item: Option<ItemId>,
        reply: SingleReply,
    },
    UpdateSettings {
        settings: PlaybackSettings,
        reply: oneshot::Sender<bool>,
    },
    State {
        reply: oneshot::Sender<PlaybackState>,
    },
    Shutdown,
}

enum Signal {
    SpeechStarted(OwnerToken),
    SpeechEnded(OwnerToken, Result<(), SpeechError>),
    AdvanceDue(OwnerToken),
}

/// Resolves when a single-speak utterance ends, fails or is cancelled
#[derive(Debug)]
pub struct SpeechCompletion {
    token: OwnerToken,
    done: oneshot::Receiver<()>,
}

impl SpeechCompletion {
    pub fn token(&self) -> OwnerToken {
        self.token
    }

    pub async fn finished(self) {
        let _ = self.done.await;
    }
}

/// Cloneable handle to a running `Player`
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlayerHandle {
    async fn send(&self, command: Command) -> Result<(), PlaybackError> {
        self.commands.send(command).await.map_err(|_| PlaybackError::PlayerClosed)
    }

    pub async fn start(&self) -> Result<(), PlaybackError> {
        self.send(Command::Start).await
    }

    pub async fn pause(&self) -> Result<(), PlaybackError> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<(), PlaybackError> {
        self.send(Command::Resume).await
    }

    pub async fn stop(&self) -> Result<(), PlaybackError> {
        self.send(Command::Stop).await
    }

    pub async fn toggle(&self) -> Result<(), PlaybackError> {
        self.send(Command::Toggle).await
    }

    /// Speak a phrase outside the sequence
    ///
    /// Returns once the request is accepted; await the returned
    /// `SpeechCompletion` to wait for the end of the utterance.
    pub async fn speak_single(
        &self,
        phrase: impl Into<String>,
        rate: Option<f32>,
        item: Option<ItemId>,
    ) -> Result<SpeechCompletion, PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SpeakSingle { phrase: phrase.into(), rate, item, reply }).await?;
        rx.await.map_err(|_| PlaybackError::PlayerClosed)?
    }

    /// Parse, format and speak a raw time entry outside the sequence
    pub async fn speak_time(
        &self,
        raw: impl Into<String>,
        item: Option<ItemId>,
    ) -> Result<SpeechCompletion, PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SpeakTime { raw: raw.into(), item, reply }).await?;
        rx.await.map_err(|_| PlaybackError::PlayerClosed)?
    }

    /// Replace the settings; `Ok(false)` while a sequence plays unpaused
    pub async fn update_settings(&self, settings: PlaybackSettings) -> Result<bool, PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::UpdateSettings { settings, reply }).await?;
        rx.await.map_err(|_| PlaybackError::PlayerClosed)
    }

    pub async fn state(&self) -> Result<PlaybackState, PlaybackError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::State { reply }).await?;
        rx.await.map_err(|_| PlaybackError::PlayerClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Stop playback and end the player task
    pub async fn shutdown(&self) -> Result<(), PlaybackError> {
        self.send(Command::Shutdown).await
    }
}

/// Task owning the sequencer and the speech port
pub struct Player {
    sequencer: PlaybackSequencer,
    port: Arc<dyn SpeechPort>,
    events: broadcast::Sender<PlaybackEvent>,
    commands: mpsc::Receiver<Command>,
    signal_tx: mpsc::UnboundedSender<Signal>,
    signal_rx: mpsc::UnboundedReceiver<Signal>,
    speech_task: Option<(OwnerToken, JoinHandle<()>)>,
    advance_timer: Option<(OwnerToken, JoinHandle<()>)>,
    waiters: HashMap<OwnerToken, oneshot::Sender<()>>,
}

impl Player {
    /// Start the player on the current tokio runtime
    pub fn spawn(sequencer: PlaybackSequencer, port: Arc<dyn SpeechPort>) -> (PlayerHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();

        debug!("Spawning player with '{}' speech", port.name());
        let player = Self {
            sequencer,
            port,
            events: events.clone(),
            commands: command_rx,
            signal_tx,
            signal_rx,
            speech_task: None,
            advance_timer: None,
            waiters: HashMap::new(),
        };
        let task = tokio::spawn(player.run());
        (PlayerHandle { commands: command_tx, events }, task)
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(signal) = self.signal_rx.recv() => self.handle_signal(signal),
            }
        }

        let effects = self.sequencer.stop_sequence();
        self.apply(effects);
        debug!("Player stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start => {
                let effects = self.sequencer.start_sequence();
                self.apply(effects);
            }
            Command::Pause => {
                let effects = self.sequencer.pause_sequence();
                self.apply(effects);
            }
            Command::Resume => {
                let effects = self.sequencer.continue_sequence();
                self.apply(effects);
            }
            Command::Stop => {
                let effects = self.sequencer.stop_sequence();
                self.apply(effects);
            }
            Command::Toggle => {
                let effects = self.sequencer.toggle();
                self.apply(effects);
            }
            Command::SpeakSingle { phrase, rate, item, reply } => {
                let outcome = self.sequencer.speak_single(&phrase, rate, item);
                self.accept_single(outcome, reply);
            }
            Command::SpeakTime { raw, item, reply } => {
                let outcome = self.sequencer.speak_time(&raw, item);
                self.accept_single(outcome, reply);
            }
            Command::UpdateSettings { settings, reply } => {
                let _ = reply.send(self.sequencer.update_settings(settings));
            }
            Command::State { reply } => {
                let _ = reply.send(self.sequencer.state());
            }
            Command::Shutdown => {}
        }
    }

    fn accept_single(&mut self, outcome: Result<SingleSpeakOutcome, PlaybackError>, reply: SingleReply) {
        match outcome {
            Ok(SingleSpeakOutcome { token, effects }) => {
                let (done_tx, done) = oneshot::channel();
                self.waiters.insert(token, done_tx);
                self.apply(effects);
                let _ = reply.send(Ok(SpeechCompletion { token, done }));
            }
            Err(e) => {
                debug!("Single speak rejected: {}", e);
                let _ = reply.send(Err(e));
            }
        }
    }

    fn handle_signal(&mut self, signal: Signal) {
        let effects = match signal {
            Signal::SpeechStarted(token) => self.sequencer.on_speech_started(token),
            Signal::SpeechEnded(token, result) => {
                match result {
                    Ok(()) | Err(SpeechError::Cancelled) => {}
                    Err(e) => warn!("Speech failed, treating as end of utterance: {}", e),
                }
                if matches!(self.speech_task, Some((current, _)) if current == token) {
                    self.speech_task = None;
                }
                self.waiters.remove(&token);
                self.sequencer.on_speech_ended(token)
            }
            Signal::AdvanceDue(token) => {
                if matches!(self.advance_timer, Some((current, _)) if current == token) {
                    self.advance_timer = None;
                }
                self.sequencer.on_advance_due(token)
            }
        };
        self.apply(effects);
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Speak { token, request } => {
                    if let Some((previous, handle)) = self.speech_task.take() {
                        handle.abort();
                        self.waiters.remove(&previous);
                    }
                    let port = Arc::clone(&self.port);
                    let signals = self.signal_tx.clone();
                    let handle = tokio::spawn(async move {
                        let _ = signals.send(Signal::SpeechStarted(token));
                        let result = port.speak(request).await;
                        let _ = signals.send(Signal::SpeechEnded(token, result));
                    });
                    self.speech_task = Some((token, handle));
                }
                Effect::CancelSpeech => {
                    self.port.cancel();
                    if let Some((token, handle)) = self.speech_task.take() {
                        handle.abort();
                        // Dropping the sender resolves the caller's completion
                        self.waiters.remove(&token);
                    }
                }
                Effect::ScheduleAdvance { token, delay } => {
                    if let Some((_, handle)) = self.advance_timer.take() {
                        handle.abort();
                    }
                    let signals = self.signal_tx.clone();
                    let handle = tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = signals.send(Signal::AdvanceDue(token));
                    });
                    self.advance_timer = Some((token, handle));
                }
                Effect::CancelAdvance(token) => {
                    if matches!(self.advance_timer, Some((current, _)) if current == token) {
                        if let Some((_, handle)) = self.advance_timer.take() {
                            handle.abort();
                        }
                    }
                }
                Effect::Emit(event) => {
                    // No subscribers is fine
                    let _ = self.events.send(event);
                }
            }
        }
    }
}
