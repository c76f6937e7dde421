/*!
 * End-to-end tests from configuration file to spoken phrase
 */

use anyhow::Result;
use std::sync::Arc;

use clockspeak::app_config::Config;
use clockspeak::phrase::{FormatOptions, PhraseFormatter};
use clockspeak::playback::{PlaybackSequencer, SequenceDataSource, SequenceSlots};
use clockspeak::speech::silent::SilentSpeechPort;
use clockspeak::speech::{SpeechPort, SpeechRequest};
use clockspeak::time_input::{parse_time_input, random_time_string};
use clockspeak::vocabulary::{VocabularyProvider, VocabularyStore};
use crate::common;

const DUTCH_OVERRIDE: &str = r#"{
    "hours": {"0": "TWAALF", "3": "DRIE", "4": "VIER"},
    "minutes": {"10": "tien"},
    "words": {
        "hour": "uur",
        "half": "half",
        "over": "over",
        "before": "voor",
        "quarter": "kwart"
    }
}"#;

fn store_for(config: &Config) -> Result<VocabularyStore> {
    let mut store = VocabularyStore::builtin();
    if let Some(dir) = &config.vocab_dir {
        store.load_dir(dir)?;
    }
    Ok(store)
}

#[test]
fn test_config_withVocabDir_shouldOverrideBuiltinTable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let vocab_dir = temp_dir.path().join("vocabs");
    std::fs::create_dir(&vocab_dir)?;
    common::create_test_file(&vocab_dir, "nl.json", DUTCH_OVERRIDE)?;

    let config_json = format!(
        r#"{{"language_code": "nl-NL", "vocab_dir": {}}}"#,
        serde_json::to_string(&vocab_dir)?
    );
    let config_path = common::create_test_file(temp_dir.path(), "conf.json", &config_json)?;

    let config = Config::from_file(&config_path)?;
    config.validate()?;
    let formatter = PhraseFormatter::new(store_for(&config)?);

    let phrase = formatter.format(parse_time_input("3:20")?, &config.language_code, FormatOptions::default());
    assert_eq!(phrase, "tien voor half VIER");
    assert_eq!(
        formatter.format(parse_time_input("3:00")?, "nl", FormatOptions::default()),
        "DRIE uur"
    );

    // Languages without an override keep their built-in table
    assert_eq!(
        formatter.format(parse_time_input("3:00")?, "en", FormatOptions::default()),
        "three o'clock"
    );
    Ok(())
}

#[test]
fn test_load_or_create_withMissingFile_shouldSpeakDefaultLanguage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&config_path)?;
    assert!(config_path.exists());
    assert_eq!(Config::from_file(&config_path)?, config);

    let slots: Arc<dyn SequenceDataSource> = Arc::new(SequenceSlots::new(0));
    let provider: Arc<dyn VocabularyProvider> = Arc::new(store_for(&config)?);
    let sequencer = PlaybackSequencer::new(provider, slots, config.playback_settings());

    assert_eq!(sequencer.phrase_for(parse_time_input("3:00")?), "drie uur");
    assert_eq!(sequencer.phrase_for(parse_time_input("15:20")?), "tien voor half vier");
    Ok(())
}

#[test]
fn test_formatter_withUnknownLanguage_shouldFallBackToEnglish() -> Result<()> {
    let formatter = PhraseFormatter::new(VocabularyStore::builtin());
    let time = parse_time_input("9:15")?;
    assert_eq!(formatter.format(time, "xx-YY", FormatOptions::default()), "quarter past nine");
    Ok(())
}

#[test]
fn test_random_practice_times_shouldAlwaysProducePhrases() -> Result<()> {
    let store = VocabularyStore::builtin();
    let formatter = PhraseFormatter::new(store.clone());
    for code in store.languages() {
        for _ in 0..50 {
            let raw = random_time_string(5);
            let time = parse_time_input(&raw)?;
            assert_eq!(time.minute() % 5, 0, "{} is not on the 5 minute grid", raw);
            let phrase = formatter.format(time, &code, FormatOptions::default());
            assert!(!phrase.trim().is_empty(), "empty phrase for {} in {}", raw, code);
            assert!(!phrase.contains("  "), "unnormalized phrase {:?}", phrase);
        }
    }
    Ok(())
}

#[test]
fn test_silent_backend_withFormattedPhrase_shouldComplete() -> Result<()> {
    common::init_test_logging();
    let config = Config { language_code: "ru-RU".to_string(), ..Config::default() };
    let formatter = PhraseFormatter::new(store_for(&config)?);
    let phrase = formatter.format(parse_time_input("3:40")?, &config.language_code, FormatOptions::default());
    assert_eq!(phrase, "без двадцати минут четыре");

    let settings = config.playback_settings();
    let request = SpeechRequest::new(phrase, settings.language_code.as_str()).with_rate(settings.rate);
    let result = tokio_test::block_on(async { SilentSpeechPort.speak(request).await });
    assert!(result.is_ok());
    Ok(())
}
