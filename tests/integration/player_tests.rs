/*!
 * Integration tests for the playback driver over a mock speech port
 */

use std::sync::Arc;
use std::time::Duration;

use clockspeak::errors::PlaybackError;
use clockspeak::playback::{
    ItemId, PlaybackEvent, PlaybackSequencer, Player, PlayerHandle, SequenceDataSource, SequenceSlots,
};
use clockspeak::speech::mock::MockSpeechPort;
use clockspeak::vocabulary::{VocabularyProvider, VocabularyStore};
use crate::common::{self, wait_for};

fn spawn(slots: &[&str], port: &MockSpeechPort) -> (PlayerHandle, tokio::task::JoinHandle<()>) {
    common::init_test_logging();
    let slots: Arc<dyn SequenceDataSource> = Arc::new(SequenceSlots::from_texts(slots.iter().copied()));
    let sequencer = PlaybackSequencer::new(common::builtin_provider(), slots, common::test_settings("en"));
    Player::spawn(sequencer, Arc::new(port.clone()))
}

fn is_finished(event: &PlaybackEvent) -> bool {
    matches!(event, PlaybackEvent::SequenceFinished { .. })
}

fn is_speech_started(event: &PlaybackEvent) -> bool {
    matches!(event, PlaybackEvent::SpeechStarted { .. })
}

#[tokio::test(start_paused = true)]
async fn test_sequence_withInvalidSlots_shouldSpeakValidOnesInOrder() {
    let port = MockSpeechPort::with_duration(500);
    let (handle, _task) = spawn(&["9:15", "bad", "", "10:30"], &port);
    let mut events = handle.subscribe();

    let started = tokio::time::Instant::now();
    handle.start().await.unwrap();
    let received = wait_for(&mut events, is_finished).await;

    assert_eq!(port.spoken_texts(), vec!["quarter past nine", "half past ten"]);
    assert_eq!(received.last(), Some(&PlaybackEvent::SequenceFinished { stopped: false }));
    assert!(received.contains(&PlaybackEvent::SpeechStarted { item: Some(ItemId(3)) }));
    // Two utterances and two delays
    assert!(started.elapsed() >= Duration::from_millis(2 * 500 + 2 * 1000));
    assert!(handle.state().await.unwrap().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_pause_midUtterance_shouldHoldUntilResume() {
    let port = MockSpeechPort::holding();
    let (handle, _task) = spawn(&["1:00", "2:00"], &port);
    let mut events = handle.subscribe();

    handle.start().await.unwrap();
    wait_for(&mut events, is_speech_started).await;

    handle.pause().await.unwrap();
    wait_for(&mut events, |e| matches!(e, PlaybackEvent::SequencePaused { index: 0 })).await;
    assert_eq!(port.cancel_count(), 1);

    // Nothing advances while paused, however long we wait
    tokio::time::sleep(Duration::from_secs(30)).await;
    let state = handle.state().await.unwrap();
    assert!(state.is_paused());
    assert_eq!(state.index, 0);
    assert_eq!(port.spoken_texts(), vec!["one o'clock"]);

    handle.resume().await.unwrap();
    wait_for(&mut events, is_speech_started).await;
    assert_eq!(port.spoken_texts(), vec!["one o'clock", "one o'clock"]);

    handle.stop().await.unwrap();
    let received = wait_for(&mut events, is_finished).await;
    assert_eq!(received.last(), Some(&PlaybackEvent::SequenceFinished { stopped: true }));
}

#[tokio::test(start_paused = true)]
async fn test_speak_single_duringSequence_shouldBeRejectedWithoutSpeaking() {
    let port = MockSpeechPort::holding();
    let (handle, _task) = spawn(&["1:00"], &port);
    let mut events = handle.subscribe();

    handle.start().await.unwrap();
    wait_for(&mut events, is_speech_started).await;

    let result = handle.speak_single("hello", None, None).await;
    assert!(matches!(result, Err(PlaybackError::SequenceActive)));
    assert_eq!(port.requests().len(), 1);

    handle.pause().await.unwrap();
    let completion = handle.speak_single("hello", None, Some(ItemId(7))).await.unwrap();
    wait_for(&mut events, |e| *e == PlaybackEvent::SpeechStarted { item: Some(ItemId(7)) }).await;
    assert_eq!(port.spoken_texts(), vec!["one o'clock", "hello"]);

    // Stopping cancels the single utterance too, which settles its completion
    handle.stop().await.unwrap();
    completion.finished().await;
}

#[tokio::test(start_paused = true)]
async fn test_speak_time_whenIdle_shouldSettleAfterUtterance() {
    let port = MockSpeechPort::with_duration(800);
    let (handle, _task) = spawn(&[], &port);

    let started = tokio::time::Instant::now();
    let completion = handle.speak_time("9:45", Some(ItemId(1))).await.unwrap();
    completion.finished().await;

    assert!(started.elapsed() >= Duration::from_millis(800));
    assert_eq!(port.spoken_texts(), vec!["quarter to ten"]);
    assert!(handle.state().await.unwrap().is_idle());

    let invalid = handle.speak_time("nine", None).await;
    assert!(matches!(invalid, Err(PlaybackError::MalformedTimeInput(_))));
}

#[tokio::test(start_paused = true)]
async fn test_speak_single_twice_shouldCancelFirstUtterance() {
    let port = MockSpeechPort::holding();
    let (handle, _task) = spawn(&[], &port);
    let mut events = handle.subscribe();

    let first = handle.speak_single("first", None, None).await.unwrap();
    let first_token = first.token();
    let second = handle.speak_single("second", None, None).await.unwrap();
    assert!(second.token() > first_token);

    // The first completion settles as soon as it is superseded
    first.finished().await;
    wait_for(&mut events, is_speech_started).await;
    assert_eq!(port.spoken_texts().last().map(String::as_str), Some("second"));
    assert!(port.cancel_count() >= 1);

    handle.stop().await.unwrap();
    second.finished().await;
    assert!(handle.state().await.unwrap().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_sequence_withFailingSpeech_shouldStillFinish() {
    let port = MockSpeechPort::failing();
    let (handle, _task) = spawn(&["1:00", "2:00"], &port);
    let mut events = handle.subscribe();

    handle.start().await.unwrap();
    let received = wait_for(&mut events, is_finished).await;

    assert_eq!(port.spoken_texts(), vec!["one o'clock", "two o'clock"]);
    assert_eq!(received.last(), Some(&PlaybackEvent::SequenceFinished { stopped: false }));
}

#[tokio::test(start_paused = true)]
async fn test_update_settings_shouldFollowPlaybackState() {
    let port = MockSpeechPort::holding();
    let (handle, _task) = spawn(&["1:00"], &port);
    let mut events = handle.subscribe();
    let mut settings = common::test_settings("nl");

    assert!(handle.update_settings(settings.clone()).await.unwrap());

    handle.start().await.unwrap();
    wait_for(&mut events, is_speech_started).await;
    assert_eq!(port.spoken_texts(), vec!["een uur"]);

    settings.language_code = "de".to_string();
    assert!(!handle.update_settings(settings.clone()).await.unwrap());

    handle.pause().await.unwrap();
    assert!(handle.update_settings(settings).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_shouldCloseHandle() {
    let port = MockSpeechPort::instant();
    let (handle, task) = spawn(&["1:00"], &port);

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(handle.start().await, Err(PlaybackError::PlayerClosed));
    assert!(matches!(handle.state().await, Err(PlaybackError::PlayerClosed)));
}

#[tokio::test(start_paused = true)]
async fn test_toggle_shouldDriveStartPauseContinue() {
    let port = MockSpeechPort::holding();
    let (handle, _task) = spawn(&["1:00", "2:00"], &port);
    let mut events = handle.subscribe();

    handle.toggle().await.unwrap();
    wait_for(&mut events, is_speech_started).await;
    assert!(handle.state().await.unwrap().is_playing());

    handle.toggle().await.unwrap();
    assert!(handle.state().await.unwrap().is_paused());

    handle.toggle().await.unwrap();
    wait_for(&mut events, |e| matches!(e, PlaybackEvent::SequenceResumed { index: 0 })).await;
    assert!(handle.state().await.unwrap().is_playing());
}

#[tokio::test(start_paused = true)]
async fn test_speak_time_withoutVocabulary_shouldReportPhraseUnavailable() {
    common::init_test_logging();
    let port = MockSpeechPort::instant();
    let slots: Arc<dyn SequenceDataSource> = Arc::new(SequenceSlots::new(0));
    let provider: Arc<dyn VocabularyProvider> = Arc::new(VocabularyStore::new());
    let sequencer = PlaybackSequencer::new(provider, slots, common::test_settings("nl"));
    let (handle, _task) = Player::spawn(sequencer, Arc::new(port.clone()));

    let result = handle.speak_time("3:15", None).await;
    assert!(matches!(result, Err(PlaybackError::PhraseUnavailable(ref lang)) if lang == "nl"));
    assert!(port.requests().is_empty());
    assert!(handle.state().await.unwrap().is_idle());
}
