/*!
 * Per-language word tables used to spell out clock times.
 *
 * A vocabulary is a read-only lookup table: hour names, minute names,
 * optional inflected (genitive) variants of both, and connector words such
 * as "half" or "quarterBefore". Tables are loaded from JSON files named
 * `<code>.json`, or taken from the built-in set compiled into the binary.
 */

use log::{debug, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

use crate::errors::VocabularyError;
use crate::language_utils::{base_language, FALLBACK_LANGUAGE};

pub mod builtin;

/// Table from a number (hour or minute index) to its spoken name
///
/// Accepts either a JSON object keyed by decimal strings or a plain array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawNumberTable")]
pub struct NumberTable(BTreeMap<u32, String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumberTable {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl TryFrom<RawNumberTable> for NumberTable {
    type Error = String;

    fn try_from(raw: RawNumberTable) -> Result<Self, Self::Error> {
        match raw {
            RawNumberTable::List(items) => Ok(Self(
                items.into_iter().enumerate().map(|(i, w)| (i as u32, w)).collect(),
            )),
            RawNumberTable::Map(entries) => entries
                .into_iter()
                .map(|(k, w)| {
                    k.trim()
                        .parse::<u32>()
                        .map(|n| (n, w))
                        .map_err(|_| format!("table key '{}' is not a number", k))
                })
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(Self),
        }
    }
}

impl NumberTable {
    pub fn get(&self, index: u32) -> Option<&str> {
        self.0.get(&index).map(String::as_str).filter(|w| !w.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for NumberTable {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

/// A connector word or an ordered list of plural forms
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WordEntry {
    Text(String),
    Forms(Vec<String>),
    Other(serde_json::Value),
}

/// Vocabulary for one language
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageVocabulary {
    /// Hour names, indexed 0-11 (or 0-23 for 24-hour tables)
    #[serde(default)]
    pub hours: NumberTable,

    /// Inflected hour names used after "of"/"half" in Slavic phrasing
    #[serde(default)]
    pub hours_genitive: Option<NumberTable>,

    /// Minute names
    #[serde(default)]
    pub minutes: NumberTable,

    /// Inflected minute names used after "without"
    #[serde(default)]
    pub minutes_genitive: Option<NumberTable>,

    /// Connector words ("hour", "half", "quarter", ...) and plural forms
    #[serde(default)]
    pub words: HashMap<String, WordEntry>,
}

impl LanguageVocabulary {
    /// Parse a vocabulary from its JSON text
    pub fn from_json_str(code: &str, json: &str) -> Result<Self, VocabularyError> {
        serde_json::from_str(json).map_err(|e| VocabularyError::Parse {
            code: code.to_string(),
            message: e.to_string(),
        })
    }

    /// Connector word, or "" when the table has none
    pub fn word(&self, key: &str) -> &str {
        match self.words.get(key) {
            Some(WordEntry::Text(text)) => text,
            _ => "",
        }
    }

    /// Connector word, or `fallback` when the table has none
    pub fn word_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        match self.word(key) {
            "" => fallback,
            word => word,
        }
    }

    /// Plural forms stored under `key` (empty when absent)
    pub fn forms(&self, key: &str) -> Vec<&str> {
        match self.words.get(key) {
            Some(WordEntry::Forms(forms)) => forms.iter().map(String::as_str).collect(),
            Some(WordEntry::Text(single)) => vec![single.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn minute_forms(&self) -> Vec<&str> {
        self.forms("minuteForms")
    }

    pub fn with_hours(mut self, hours: NumberTable) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_hours_genitive(mut self, hours: NumberTable) -> Self {
        self.hours_genitive = Some(hours);
        self
    }

    pub fn with_minutes(mut self, minutes: NumberTable) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn with_minutes_genitive(mut self, minutes: NumberTable) -> Self {
        self.minutes_genitive = Some(minutes);
        self
    }

    pub fn with_word(mut self, key: &str, word: &str) -> Self {
        self.words.insert(key.to_string(), WordEntry::Text(word.to_string()));
        self
    }

    pub fn with_forms(mut self, key: &str, forms: &[&str]) -> Self {
        self.words.insert(
            key.to_string(),
            WordEntry::Forms(forms.iter().map(|f| f.to_string()).collect()),
        );
        self
    }
}

/// A vocabulary together with the language it was found under
///
/// `language` differs from the requested code when the fallback applied.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedVocabulary<'a> {
    pub language: &'a str,
    pub vocabulary: &'a LanguageVocabulary,
}

/// Source of vocabularies for the phrase formatter
///
/// Implementations apply the single "en" fallback themselves; `None` means
/// neither the requested language nor the fallback is available.
pub trait VocabularyProvider: Send + Sync {
    fn vocabulary(&self, language_code: &str) -> Option<ResolvedVocabulary<'_>>;
}

impl<T: VocabularyProvider + ?Sized> VocabularyProvider for Arc<T> {
    fn vocabulary(&self, language_code: &str) -> Option<ResolvedVocabulary<'_>> {
        (**self).vocabulary(language_code)
    }
}

/// In-memory vocabulary set keyed by base language code
#[derive(Debug, Clone, Default)]
pub struct VocabularyStore {
    tables: HashMap<String, LanguageVocabulary>,
}

impl VocabularyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding every built-in vocabulary
    pub fn builtin() -> Self {
        let mut store = Self::new();
        for (code, json) in builtin::BUILTIN_VOCABULARIES {
            match LanguageVocabulary::from_json_str(code, json) {
                Ok(vocab) => store.insert(code, vocab),
                Err(e) => warn!("Skipping built-in vocabulary: {}", e),
            }
        }
        store
    }

    /// Register (or replace) the table for a language
    pub fn insert(&mut self, code: &str, vocabulary: LanguageVocabulary) {
        self.tables.insert(base_language(code), vocabulary);
    }

    /// Load every `<code>.json` file in a directory over the current tables
    ///
    /// Files that cannot be read or parsed are logged and skipped. Returns
    /// the codes that were loaded.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<Vec<String>, VocabularyError> {
        let dir = dir.as_ref();
        let mut loaded = Vec::new();

        for entry in WalkDir::new(dir).max_depth(1).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                // The directory itself is unreadable or missing
                Err(e) if e.depth() == 0 => return Err(VocabularyError::Io(e.into())),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(code) = path.file_stem().and_then(|s| s.to_str()).map(base_language) else {
                continue;
            };

            let parsed = std::fs::read_to_string(path)
                .map_err(VocabularyError::from)
                .and_then(|text| LanguageVocabulary::from_json_str(&code, &text));
            match parsed {
                Ok(vocab) => {
                    debug!("Loaded vocabulary '{}' from {}", code, path.display());
                    self.insert(&code, vocab);
                    loaded.push(code);
                }
                Err(e) => warn!("Ignoring vocabulary file {}: {}", path.display(), e),
            }
        }

        loaded.sort();
        Ok(loaded)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.tables.contains_key(&base_language(code))
    }

    /// Codes with a table, sorted
    pub fn languages(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.tables.keys().cloned().collect();
        codes.sort();
        codes
    }
}

impl VocabularyProvider for VocabularyStore {
    fn vocabulary(&self, language_code: &str) -> Option<ResolvedVocabulary<'_>> {
        self.tables
            .get_key_value(&base_language(language_code))
            .or_else(|| self.tables.get_key_value(FALLBACK_LANGUAGE))
            .map(|(language, vocabulary)| ResolvedVocabulary { language: language.as_str(), vocabulary })
    }
}
