/*!
 * Local speech synthesizer driven as a child process.
 *
 * The default program is `espeak-ng`; any binary accepting the same
 * `-v`/`-s`/`-p`/`-a` flags and reading text from stdin works.
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::Notify;

use crate::errors::SpeechError;
use crate::language_utils::base_language;
use crate::speech::{select_voice, SpeechPort, SpeechRequest, Voice};

/// espeak-ng words per minute at rate 1.0
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// espeak-ng pitch at 1.0 (range 0-99)
const BASE_PITCH: f32 = 50.0;

/// espeak-ng amplitude at volume 1.0 (range 0-200)
const BASE_AMPLITUDE: f32 = 100.0;

/// Speech port running a synthesizer process per utterance
#[derive(Debug)]
pub struct CommandSpeechPort {
    program: String,
    voices: Vec<Voice>,
    fallback_locale: Option<String>,
    timeout: Duration,
    cancel: Arc<Notify>,
}

impl CommandSpeechPort {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            voices: Vec::new(),
            fallback_locale: None,
            timeout,
            cancel: Arc::new(Notify::new()),
        }
    }

    /// Voices the synthesizer offers, used for voice selection
    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// Locale to prefer when no voice matches the request language
    pub fn with_fallback_locale(mut self, locale: Option<String>) -> Self {
        self.fallback_locale = locale;
        self
    }

    /// Command-line arguments for one request
    pub fn build_args(&self, request: &SpeechRequest) -> Vec<String> {
        let voice = select_voice(
            &self.voices,
            request.voice.as_deref(),
            &request.language_tag,
            self.fallback_locale.as_deref(),
        )
        .map(|v| v.name.clone())
        .unwrap_or_else(|| base_language(&request.language_tag));

        let mut args = Vec::with_capacity(9);
        if !voice.is_empty() {
            args.push("-v".to_string());
            args.push(voice);
        }
        args.push("-s".to_string());
        args.push(format!("{}", (BASE_WORDS_PER_MINUTE * request.rate).round() as u32));
        args.push("-p".to_string());
        args.push(format!("{}", (BASE_PITCH * request.pitch).round().clamp(0.0, 99.0) as u32));
        args.push("-a".to_string());
        args.push(format!("{}", (BASE_AMPLITUDE * request.volume).round().clamp(0.0, 200.0) as u32));
        args.push("--stdin".to_string());
        args
    }
}

#[async_trait]
impl SpeechPort for CommandSpeechPort {
    async fn speak(&self, request: SpeechRequest) -> Result<(), SpeechError> {
        let request = request.normalized();
        if request.interrupt {
            self.cancel();
        }
        // Registered before spawning so a cancel during startup is not lost
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);

        let args = self.build_args(&request);
        debug!("Running {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SpeechError::SpawnFailed {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(request.text.as_bytes()).await {
                Ok(()) => {}
                // The exit status below tells whether that was a failure
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("{} closed stdin early", self.program);
                }
                Err(e) => {
                    return Err(SpeechError::ProcessFailed {
                        program: self.program.clone(),
                        stderr: e.to_string(),
                    });
                }
            }
        }

        tokio::select! {
            status = child.wait() => {
                let status = status.map_err(|e| SpeechError::ProcessFailed {
                    program: self.program.clone(),
                    stderr: e.to_string(),
                })?;
                if status.success() {
                    return Ok(());
                }
                let mut stderr = String::new();
                if let Some(mut pipe) = child.stderr.take() {
                    let _ = pipe.read_to_string(&mut stderr).await;
                }
                if stderr.trim().is_empty() {
                    stderr = format!("exited with {}", status);
                }
                Err(SpeechError::ProcessFailed {
                    program: self.program.clone(),
                    stderr: stderr.trim().to_string(),
                })
            }
            _ = &mut cancelled => {
                debug!("Cancelling {} utterance", self.program);
                if let Err(e) = child.start_kill() {
                    warn!("Failed to stop {}: {}", self.program, e);
                }
                Err(SpeechError::Cancelled)
            }
            _ = tokio::time::sleep(self.timeout) => {
                let _ = child.start_kill();
                Err(SpeechError::ProcessFailed {
                    program: self.program.clone(),
                    stderr: format!("timed out after {}s", self.timeout.as_secs()),
                })
            }
        }
    }

    fn cancel(&self) {
        self.cancel.notify_waiters();
    }

    fn name(&self) -> &str {
        "command"
    }
}
