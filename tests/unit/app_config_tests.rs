/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::time::Duration;

use clockspeak::app_config::{Config, LogLevel, SpeechBackend};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language_code, "nl-NL");
    assert_eq!(config.ui_lang, "en");
    assert_eq!(config.rate, 1.0);
    assert_eq!(config.delay_ms, 2000);
    assert!(!config.use_24h);
    assert_eq!(config.random_step_minutes, 5);
    assert_eq!(config.speech.backend, SpeechBackend::Command);
    assert_eq!(config.speech.command, "espeak-ng");
    assert_eq!(config.speech.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let valid = Config::default();

    let mut config = valid.clone();
    config.language_code = "zz-ZZ".to_string();
    assert!(config.validate().is_err());

    let mut config = valid.clone();
    config.rate = 0.0;
    assert!(config.validate().is_err());

    let mut config = valid.clone();
    config.volume = 1.5;
    assert!(config.validate().is_err());

    let mut config = valid.clone();
    config.delay_ms = 60_001;
    assert!(config.validate().is_err());
    config.delay_ms = 60_000;
    assert!(config.validate().is_ok());

    let mut config = valid.clone();
    config.random_step_minutes = 7;
    assert!(config.validate().is_err());
    config.random_step_minutes = 15;
    assert!(config.validate().is_ok());

    let mut config = valid.clone();
    config.speech.backend = SpeechBackend::Http;
    config.speech.endpoint = " ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"language_code": "ru", "delay_ms": 500, "speech": {"backend": "silent"}, "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.language_code, "ru");
    assert_eq!(config.delay_ms, 500);
    assert_eq!(config.speech.backend, SpeechBackend::Silent);
    assert_eq!(config.speech.command, "espeak-ng");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.rate, 1.0);
    Ok(())
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created, Config::default());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded, created);
    Ok(())
}

#[test]
fn test_config_fromInvalidJson_shouldFailWithContext() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    let error = Config::from_file(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_playback_settings_shouldProjectPlaybackFields() {
    let mut config = Config::default();
    config.delay_ms = 1500;
    config.use_24h = true;
    config.voice_name = Some("  ".to_string());

    let settings = config.playback_settings();
    assert_eq!(settings.language_code, "nl-NL");
    assert_eq!(settings.delay, Duration::from_millis(1500));
    assert!(settings.use_24h);
    assert_eq!(settings.voice_name, None);
}

#[test]
fn test_speech_backend_fromStr_shouldParseKnownNames() {
    assert_eq!("HTTP".parse::<SpeechBackend>().unwrap(), SpeechBackend::Http);
    assert_eq!(SpeechBackend::Silent.to_string(), "silent");
    assert_eq!(SpeechBackend::Http.display_name(), "HTTP");
    assert!("festival".parse::<SpeechBackend>().is_err());
}

#[test]
fn test_log_level_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
