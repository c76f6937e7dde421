// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use clockspeak::app_config::{Config, LogLevel, SpeechBackend};
use clockspeak::language_utils::{language_name, native_language_name, LanguageFamily, SUPPORTED_LANGUAGES};
use clockspeak::phrase::{FormatOptions, PhraseFormatter};
use clockspeak::playback::{
    PlaybackEvent, PlaybackSequencer, Player, PlayerHandle, SequenceDataSource, SequenceSlots,
};
use clockspeak::speech::command::CommandSpeechPort;
use clockspeak::speech::http::HttpSpeechPort;
use clockspeak::speech::silent::SilentSpeechPort;
use clockspeak::speech::SpeechPort;
use clockspeak::time_input::{parse_time_input, random_time_string};
use clockspeak::vocabulary::{VocabularyProvider, VocabularyStore};

/// CLI Wrapper for SpeechBackend to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSpeechBackend {
    Command,
    Http,
    Silent,
}

impl From<CliSpeechBackend> for SpeechBackend {
    fn from(cli_backend: CliSpeechBackend) -> Self {
        match cli_backend {
            CliSpeechBackend::Command => SpeechBackend::Command,
            CliSpeechBackend::Http => SpeechBackend::Http,
            CliSpeechBackend::Silent => SpeechBackend::Silent,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the spoken phrase for a time
    Phrase {
        /// Time as H:MM or HH:MM
        #[arg(value_name = "TIME")]
        time: String,

        /// Use 24-entry hour tables
        #[arg(long)]
        use_24h: bool,
    },

    /// Speak one time through the configured backend
    Speak {
        /// Time as H:MM or HH:MM
        #[arg(value_name = "TIME")]
        time: String,

        /// Speaking rate multiplier for this utterance
        #[arg(short, long)]
        rate: Option<f32>,
    },

    /// Play a sequence of times with a pause between them
    Sequence {
        /// Times as H:MM or HH:MM; invalid entries are skipped
        #[arg(value_name = "TIME")]
        times: Vec<String>,

        /// Play this many random times instead
        #[arg(short, long, conflicts_with = "times")]
        random: Option<usize>,

        /// Pause between items in milliseconds
        #[arg(short, long)]
        delay_ms: Option<u64>,
    },

    /// Print random practice times
    Random {
        /// How many times to print
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
    },

    /// List the languages with built-in vocabularies
    Languages,

    /// Generate shell completions for clockspeak
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// clockspeak - practise telling the time in another language
#[derive(Parser, Debug)]
#[command(name = "clockspeak")]
#[command(version)]
#[command(about = "Spoken clock time trainer")]
#[command(long_about = "clockspeak turns clock times into the phrase a native speaker would say and speaks them.

EXAMPLES:
    clockspeak phrase 14:45                      # Print the phrase in the configured language
    clockspeak -l ru phrase 9:55                 # Print the phrase in Russian
    clockspeak speak 3:15                        # Speak one time
    clockspeak sequence 9:15 10:30 11:45         # Speak a sequence (p pause, c continue, s stop)
    clockspeak sequence --random 12 -d 3000      # Twelve random times, three seconds apart
    clockspeak completions bash > clockspeak.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Language to speak (e.g. 'nl-NL', 'ru', 'de')
    #[arg(short, long, global = true)]
    language: Option<String>,

    /// Speech backend to use
    #[arg(short, long, value_enum, global = true)]
    backend: Option<CliSpeechBackend>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with trace as the ceiling; the effective
    // level is lowered with set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "clockspeak", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Languages => {
            list_languages();
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;

    let result = match cli.command {
        Commands::Phrase { time, use_24h } => run_phrase(&config, &time, use_24h || config.use_24h),
        Commands::Speak { time, rate } => run_speak(config, &time, rate).await,
        Commands::Sequence { times, random, delay_ms } => run_sequence(config, times, random, delay_ms).await,
        Commands::Random { count } => {
            for _ in 0..count {
                println!("{}", random_time_string(config.random_step_minutes));
            }
            Ok(())
        }
        Commands::Languages | Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

/// Load or create the configuration, apply CLI overrides and validate
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(language) = &cli.language {
        config.language_code = language.clone();
    }
    if let Some(backend) = &cli.backend {
        config.speech.backend = backend.clone().into();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn build_vocabulary(config: &Config) -> Arc<dyn VocabularyProvider> {
    let mut store = VocabularyStore::builtin();
    if let Some(dir) = &config.vocab_dir {
        match store.load_dir(dir) {
            Ok(codes) => debug!("Loaded vocabularies from {}: {}", dir.display(), codes.join(", ")),
            Err(e) => warn!("Could not read vocabulary directory {}: {}", dir.display(), e),
        }
    }
    if !store.contains(&config.language_code) {
        warn!("No vocabulary for '{}', phrases fall back to English", config.language_code);
    }
    Arc::new(store)
}

fn build_speech_port(config: &Config) -> Arc<dyn SpeechPort> {
    let timeout = Duration::from_secs(config.speech.timeout_secs);
    match config.speech.backend {
        SpeechBackend::Command => Arc::new(
            CommandSpeechPort::new(config.speech.command.clone(), timeout)
                .with_voices(config.speech.voices.clone())
                .with_fallback_locale(Some(config.ui_lang.clone())),
        ),
        SpeechBackend::Http => Arc::new(HttpSpeechPort::new(config.speech.endpoint.clone(), timeout)),
        SpeechBackend::Silent => Arc::new(SilentSpeechPort),
    }
}

fn list_languages() {
    for code in SUPPORTED_LANGUAGES {
        let name = language_name(code).unwrap_or_else(|_| code.to_string());
        let native = native_language_name(code).unwrap_or_else(|_| name.clone());
        println!("{:<4} {:<12} {:<14} {}", code, name, native, LanguageFamily::for_code(code));
    }
}

fn run_phrase(config: &Config, raw: &str, use_24h: bool) -> Result<()> {
    let time = parse_time_input(raw)?;
    let formatter = PhraseFormatter::new(build_vocabulary(config));
    let phrase = formatter.format(time, &config.language_code, FormatOptions { use_24h });
    if phrase.is_empty() {
        return Err(anyhow!("No time phrase available for language '{}'", config.language_code));
    }
    println!("{}", phrase);
    Ok(())
}

fn spawn_player(config: &Config, slots: Arc<dyn SequenceDataSource>) -> PlayerHandle {
    info!("Speaking {} through the {} backend", config.language_code, config.speech.backend.display_name());
    let sequencer = PlaybackSequencer::new(build_vocabulary(config), slots, config.playback_settings());
    let (handle, _task) = Player::spawn(sequencer, build_speech_port(config));
    handle
}

async fn run_speak(mut config: Config, raw: &str, rate: Option<f32>) -> Result<()> {
    if let Some(rate) = rate {
        config.rate = rate;
        config.validate().context("Invalid rate")?;
    }

    let handle = spawn_player(&config, Arc::new(SequenceSlots::new(0)));
    let result = match handle.speak_time(raw, None).await {
        Ok(completion) => {
            completion.finished().await;
            Ok(())
        }
        Err(e) => Err(e),
    };
    handle.shutdown().await?;
    Ok(result?)
}

async fn run_sequence(
    mut config: Config,
    times: Vec<String>,
    random: Option<usize>,
    delay_ms: Option<u64>,
) -> Result<()> {
    if let Some(delay_ms) = delay_ms {
        config.delay_ms = delay_ms;
        config.validate().context("Invalid delay")?;
    }

    let slots = match random {
        Some(count) => {
            let slots = SequenceSlots::new(count);
            slots.fill_random(config.random_step_minutes);
            slots
        }
        None => SequenceSlots::from_texts(times),
    };
    if slots.is_empty() {
        return Err(anyhow!("Nothing to play: give times or --random N"));
    }
    let texts = slots.texts();
    let slots = Arc::new(slots);

    let handle = spawn_player(&config, slots.clone());
    let mut events = handle.subscribe();

    let progress_bar = ProgressBar::new(slots.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} times {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar.enable_steady_tick(Duration::from_millis(120));

    info!("Keys: p = pause, c = continue, s = stop (then Enter)");
    let key_task = tokio::spawn(read_keys(handle.clone()));

    handle.start().await?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PlaybackEvent::IndexChanged { index }) => {
                    progress_bar.set_position(index as u64);
                    progress_bar.set_message(texts.get(index).cloned().unwrap_or_default());
                }
                Ok(PlaybackEvent::SequencePaused { .. }) => progress_bar.set_message("paused"),
                Ok(PlaybackEvent::SequenceFinished { stopped }) => {
                    progress_bar.set_position(slots.len() as u64);
                    let message = if stopped { "stopped" } else { "done" };
                    progress_bar.finish_with_message(message);
                    break;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => debug!("Progress display skipped {} events", skipped),
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, stopping sequence");
                handle.stop().await?;
            }
        }
    }

    key_task.abort();
    handle.shutdown().await?;
    Ok(())
}

// Forward p/c/s lines from stdin to the player
//
// Stdin is read on a plain thread so a pending read never holds up runtime
// shutdown.
async fn read_keys(handle: PlayerHandle) {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    while let Some(line) = rx.recv().await {
        let result = match line.trim() {
            "p" => handle.pause().await,
            "c" => handle.resume().await,
            "s" => handle.stop().await,
            "" => continue,
            other => {
                warn!("Unknown key '{}' (p, c or s)", other);
                continue;
            }
        };
        if result.is_err() {
            break;
        }
    }
}
