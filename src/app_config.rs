use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::language_utils::validate_language_code;
use crate::playback::PlaybackSettings;
use crate::speech::Voice;

/// Trainer configuration, stored as JSON (`conf.json` by default)
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language the times are spoken in (BCP-47 tag, e.g. "nl-NL")
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Interface language for labels
    #[serde(default = "default_ui_lang")]
    pub ui_lang: String,

    /// Speaking rate multiplier
    #[serde(default = "default_one")]
    pub rate: f32,

    /// Pitch multiplier
    #[serde(default = "default_one")]
    pub pitch: f32,

    /// Volume in [0, 1]
    #[serde(default = "default_one")]
    pub volume: f32,

    /// Pause between sequence items in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Use 24-entry hour tables
    #[serde(default)]
    pub use_24h: bool,

    /// Preferred voice name
    #[serde(default)]
    pub voice_name: Option<String>,

    /// Directory of `<code>.json` vocabularies overriding the built-in ones
    #[serde(default)]
    pub vocab_dir: Option<PathBuf>,

    /// Minute granularity of random times
    #[serde(default = "default_random_step_minutes")]
    pub random_step_minutes: u32,

    /// Speech back-end
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech back-end type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackend {
    /// Local synthesizer process
    #[default]
    Command,
    /// Remote `/speak` endpoint
    Http,
    /// Log only
    Silent,
}

impl SpeechBackend {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Command => "Command",
            Self::Http => "HTTP",
            Self::Silent => "Silent",
        }
    }
}

impl std::fmt::Display for SpeechBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Command => "command",
            Self::Http => "http",
            Self::Silent => "silent",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for SpeechBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "command" => Ok(Self::Command),
            "http" => Ok(Self::Http),
            "silent" => Ok(Self::Silent),
            _ => Err(anyhow!("Invalid speech backend: {}", s)),
        }
    }
}

/// Speech back-end configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpeechConfig {
    #[serde(default)]
    pub backend: SpeechBackend,

    /// Synthesizer program for the command back-end
    #[serde(default = "default_speech_command")]
    pub command: String,

    /// Endpoint for the http back-end
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,

    /// Per-utterance timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Voices offered by the synthesizer, for voice selection
    #[serde(default)]
    pub voices: Vec<Voice>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: SpeechBackend::default(),
            command: default_speech_command(),
            endpoint: default_speech_endpoint(),
            timeout_secs: default_timeout_secs(),
            voices: Vec::new(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Longest accepted delay between sequence items
pub const MAX_DELAY_MS: u64 = 60_000;

fn default_language_code() -> String {
    "nl-NL".to_string()
}

fn default_ui_lang() -> String {
    "en".to_string()
}

fn default_one() -> f32 {
    1.0
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_random_step_minutes() -> u32 {
    5
}

fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

fn default_speech_endpoint() -> String {
    "http://localhost:8080/speak".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Read a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load `path`, or write and return the default configuration if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }
        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        validate_language_code(&self.language_code)
            .with_context(|| format!("Invalid language_code '{}'", self.language_code))?;
        validate_language_code(&self.ui_lang)
            .with_context(|| format!("Invalid ui_lang '{}'", self.ui_lang))?;

        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(anyhow!("rate must be greater than 0, got {}", self.rate));
        }
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(anyhow!("pitch must be greater than 0, got {}", self.pitch));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(anyhow!("volume must be within [0, 1], got {}", self.volume));
        }
        if self.delay_ms > MAX_DELAY_MS {
            return Err(anyhow!("delay_ms must be at most {}, got {}", MAX_DELAY_MS, self.delay_ms));
        }
        if !(1..=30).contains(&self.random_step_minutes) || 60 % self.random_step_minutes != 0 {
            return Err(anyhow!(
                "random_step_minutes must divide 60 and be within 1-30, got {}",
                self.random_step_minutes
            ));
        }

        match self.speech.backend {
            SpeechBackend::Command if self.speech.command.trim().is_empty() => {
                return Err(anyhow!("speech.command is required for the command backend"));
            }
            SpeechBackend::Http if self.speech.endpoint.trim().is_empty() => {
                return Err(anyhow!("speech.endpoint is required for the http backend"));
            }
            _ => {}
        }
        if self.speech.timeout_secs == 0 {
            return Err(anyhow!("speech.timeout_secs must be greater than 0"));
        }

        Ok(())
    }

    /// Settings the player reads on every utterance
    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            language_code: self.language_code.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
            delay: Duration::from_millis(self.delay_ms),
            use_24h: self.use_24h,
            voice_name: self.voice_name.clone().filter(|v| !v.trim().is_empty()),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language_code: default_language_code(),
            ui_lang: default_ui_lang(),
            rate: default_one(),
            pitch: default_one(),
            volume: default_one(),
            delay_ms: default_delay_ms(),
            use_24h: false,
            voice_name: None,
            vocab_dir: None,
            random_step_minutes: default_random_step_minutes(),
            speech: SpeechConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
