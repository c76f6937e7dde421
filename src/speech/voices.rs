use serde::{Deserialize, Serialize};

use crate::language_utils::base_language;

/// A voice offered by a speech back-end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Engine-specific voice name
    pub name: String,
    /// Language tag the voice speaks, e.g. "nl-NL"
    #[serde(default)]
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self { name: name.into(), lang: lang.into() }
    }
}

/// Pick the best voice for a request
///
/// Preference order: exact name, case-insensitive partial name, exact
/// language tag, same base language, a voice whose tag starts with the
/// fallback locale's base language, and finally the first voice.
pub fn select_voice<'a>(
    voices: &'a [Voice],
    voice_name: Option<&str>,
    language_tag: &str,
    fallback_locale: Option<&str>,
) -> Option<&'a Voice> {
    if voices.is_empty() {
        return None;
    }

    if let Some(desired) = voice_name.map(str::trim).filter(|n| !n.is_empty()) {
        if let Some(exact) = voices.iter().find(|v| v.name == desired) {
            return Some(exact);
        }
        let desired = desired.to_lowercase();
        if let Some(partial) = voices.iter().find(|v| v.name.trim().to_lowercase().contains(&desired)) {
            return Some(partial);
        }
    }

    let desired_lang = language_tag.trim().to_lowercase();
    if !desired_lang.is_empty() {
        if let Some(full) = voices.iter().find(|v| v.lang.to_lowercase() == desired_lang) {
            return Some(full);
        }
        let base = base_language(&desired_lang);
        if let Some(by_base) = voices.iter().find(|v| base_language(&v.lang) == base) {
            return Some(by_base);
        }
    }

    if let Some(locale_base) = fallback_locale.map(base_language).filter(|b| !b.is_empty()) {
        if let Some(by_locale) = voices.iter().find(|v| v.lang.to_lowercase().starts_with(&locale_base)) {
            return Some(by_locale);
        }
    }

    voices.first()
}
