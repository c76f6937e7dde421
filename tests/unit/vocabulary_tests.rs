/*!
 * Tests for vocabulary tables and the vocabulary store
 */

use anyhow::Result;

use clockspeak::errors::VocabularyError;
use clockspeak::language_utils::SUPPORTED_LANGUAGES;
use clockspeak::vocabulary::{LanguageVocabulary, NumberTable, VocabularyProvider, VocabularyStore};
use crate::common;

#[test]
fn test_builtin_store_shouldContainEverySupportedLanguage() {
    let store = VocabularyStore::builtin();
    for code in SUPPORTED_LANGUAGES {
        assert!(store.contains(code), "missing built-in vocabulary for {}", code);
        let resolved = store.vocabulary(code).unwrap();
        assert_eq!(resolved.language, code);
        assert_eq!(resolved.vocabulary.hours.len(), 12, "hours for {}", code);
    }
}

#[test]
fn test_vocabulary_withRegionalTag_shouldResolveBaseLanguage() {
    let store = VocabularyStore::builtin();
    let resolved = store.vocabulary("nl-NL").unwrap();
    assert_eq!(resolved.language, "nl");
    assert_eq!(resolved.vocabulary.word("quarter"), "kwart");
}

#[test]
fn test_vocabulary_withUnknownLanguage_shouldFallBackToEnglishOnce() {
    let store = VocabularyStore::builtin();
    let resolved = store.vocabulary("zz").unwrap();
    assert_eq!(resolved.language, "en");

    let empty = VocabularyStore::new();
    assert!(empty.vocabulary("zz").is_none());
    assert!(empty.vocabulary("en").is_none());
}

#[test]
fn test_vocabulary_json_withObjectKeys_shouldParseNumbersAndForms() -> Result<()> {
    let json = r#"{
        "hours": {"0": "twaalf", "1": "een"},
        "minutes": {"5": "vijf"},
        "words": {"half": "half", "minuteForms": ["minuut", "minuten"]}
    }"#;
    let vocab = LanguageVocabulary::from_json_str("nl", json)?;
    assert_eq!(vocab.hours.get(1), Some("een"));
    assert_eq!(vocab.minutes.get(5), Some("vijf"));
    assert_eq!(vocab.word("half"), "half");
    assert_eq!(vocab.word("missing"), "");
    assert_eq!(vocab.minute_forms(), vec!["minuut", "minuten"]);
    assert!(vocab.hours_genitive.is_none());
    Ok(())
}

#[test]
fn test_vocabulary_json_withBadKeys_shouldReturnParseError() {
    let result = LanguageVocabulary::from_json_str("xx", r#"{"hours": {"one": "een"}}"#);
    assert!(matches!(result, Err(VocabularyError::Parse { ref code, .. }) if code == "xx"));

    let result = LanguageVocabulary::from_json_str("xx", "not json");
    assert!(result.is_err());
}

#[test]
fn test_load_dir_withMixedFiles_shouldLoadValidAndSkipRest() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "en.json", r#"{"hours": {"3": "THREE"}, "words": {"hour": "sharp"}}"#)?;
    common::create_test_file(temp_dir.path(), "eo.json", r#"{"hours": ["dek du", "unu"]}"#)?;
    common::create_test_file(temp_dir.path(), "broken.json", "{ nope")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignored")?;

    let mut store = VocabularyStore::builtin();
    let loaded = store.load_dir(temp_dir.path())?;

    assert_eq!(loaded, vec!["en".to_string(), "eo".to_string()]);
    assert!(store.contains("eo"));
    assert!(!store.contains("broken"));

    let en = store.vocabulary("en").unwrap().vocabulary;
    assert_eq!(en.hours.get(3), Some("THREE"));
    assert_eq!(en.word("hour"), "sharp");
    Ok(())
}

#[test]
fn test_load_dir_withNestedDirectories_shouldOnlyReadTopLevelFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("archive");
    std::fs::create_dir(&nested)?;
    common::create_test_file(&nested, "de.json", r#"{"hours": {"3": "DREI"}}"#)?;
    std::fs::create_dir(temp_dir.path().join("fr.json"))?;
    common::create_test_file(temp_dir.path(), "nl.json", r#"{"hours": {"3": "DRIE"}}"#)?;

    let mut store = VocabularyStore::builtin();
    let loaded = store.load_dir(temp_dir.path())?;

    assert_eq!(loaded, vec!["nl".to_string()]);
    assert_eq!(store.vocabulary("de").unwrap().vocabulary.hours.get(3), Some("drei"));
    assert_eq!(store.vocabulary("nl").unwrap().vocabulary.hours.get(3), Some("DRIE"));
    Ok(())
}

#[test]
fn test_load_dir_withMissingDirectory_shouldReturnIoError() {
    let mut store = VocabularyStore::new();
    let result = store.load_dir("/definitely/not/a/real/vocab/dir");
    assert!(matches!(result, Err(VocabularyError::Io(_))));
}

#[test]
fn test_number_table_withEmptyEntry_shouldTreatAsMissing() {
    let table: NumberTable = [(1, "een"), (2, "")].into_iter().collect();
    assert_eq!(table.get(1), Some("een"));
    assert_eq!(table.get(2), None);
    assert_eq!(table.len(), 2);
}
