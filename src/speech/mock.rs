/*!
 * Mock speech port for testing.
 *
 * This module provides a scripted speech port:
 * - `MockSpeechPort::instant()` - Every utterance ends immediately
 * - `MockSpeechPort::with_duration()` - Every utterance takes a fixed time
 * - `MockSpeechPort::failing()` - Every utterance fails
 * - `MockSpeechPort::holding()` - Utterances only end when cancelled
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use crate::errors::SpeechError;
use crate::speech::{SpeechPort, SpeechRequest};

/// Behavior mode for the mock speech port
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockSpeechBehavior {
    /// Ends after the given time
    Complete { duration_ms: u64 },
    /// Fails right away
    Failing,
    /// Never ends on its own
    HoldUntilCancelled,
}

/// Mock speech port recording every request it receives
#[derive(Debug, Clone)]
pub struct MockSpeechPort {
    behavior: MockSpeechBehavior,
    requests: Arc<Mutex<Vec<SpeechRequest>>>,
    cancel_count: Arc<AtomicUsize>,
    cancel: Arc<Notify>,
}

impl MockSpeechPort {
    pub fn new(behavior: MockSpeechBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::new(Mutex::new(Vec::new())),
            cancel_count: Arc::new(AtomicUsize::new(0)),
            cancel: Arc::new(Notify::new()),
        }
    }

    pub fn instant() -> Self {
        Self::new(MockSpeechBehavior::Complete { duration_ms: 0 })
    }

    pub fn with_duration(duration_ms: u64) -> Self {
        Self::new(MockSpeechBehavior::Complete { duration_ms })
    }

    pub fn failing() -> Self {
        Self::new(MockSpeechBehavior::Failing)
    }

    pub fn holding() -> Self {
        Self::new(MockSpeechBehavior::HoldUntilCancelled)
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().clone()
    }

    /// Texts received so far, in order
    pub fn spoken_texts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.text.clone()).collect()
    }

    /// Number of explicit `cancel` calls
    pub fn cancel_count(&self) -> usize {
        self.cancel_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechPort for MockSpeechPort {
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        self.requests.lock().push(request);

        match self.behavior {
            MockSpeechBehavior::Failing => Err(SpeechError::Unavailable("mock failure".to_string())),
            MockSpeechBehavior::Complete { duration_ms } => {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(duration_ms)) => Ok(()),
                    _ = &mut cancelled => Err(SpeechError::Cancelled),
                }
            }
            MockSpeechBehavior::HoldUntilCancelled => {
                cancelled.await;
                Err(SpeechError::Cancelled)
            }
        }
    }

    fn cancel(&self) {
        self.cancel_count.fetch_add(1, Ordering::SeqCst);
        self.cancel.notify_waiters();
    }

    fn name(&self) -> &str {
        "mock"
    }
}
