use anyhow::{Result, anyhow};
use isolang::Language;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Language utilities for clock phrase generation
///
/// This module normalizes free-form language tags ("nl-NL", "ru_RU", " EN ")
/// to their base subtag and maps base codes to the phrase family whose
/// grammar builds the spoken time.
/// Languages that ship with a vocabulary table
pub const SUPPORTED_LANGUAGES: [&str; 10] = ["ar", "de", "en", "fr", "nl", "pl", "pt", "ru", "tr", "uk"];

/// Vocabulary used when the requested language has none
pub const FALLBACK_LANGUAGE: &str = "en";

/// Grouping of languages sharing one time-phrase construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFamily {
    /// Russian, Ukrainian, Polish
    Slavic,
    /// German, Dutch
    Germanic,
    /// English, French, Portuguese
    Latin,
    /// Arabic
    Arabic,
    /// Turkish
    Turkic,
    /// Anything not in the table
    Default,
}

static FAMILY_TABLE: LazyLock<HashMap<&'static str, LanguageFamily>> = LazyLock::new(|| {
    HashMap::from([
        ("ru", LanguageFamily::Slavic),
        ("uk", LanguageFamily::Slavic),
        ("pl", LanguageFamily::Slavic),
        ("de", LanguageFamily::Germanic),
        ("nl", LanguageFamily::Germanic),
        ("fr", LanguageFamily::Latin),
        ("pt", LanguageFamily::Latin),
        ("en", LanguageFamily::Latin),
        ("ar", LanguageFamily::Arabic),
        ("tr", LanguageFamily::Turkic),
    ])
});

impl LanguageFamily {
    /// Family for a language tag; the tag is normalized first
    pub fn for_code(code: &str) -> Self {
        let base = base_language(code);
        FAMILY_TABLE.get(base.as_str()).copied().unwrap_or(LanguageFamily::Default)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Slavic => "slavic",
            Self::Germanic => "germanic",
            Self::Latin => "latin",
            Self::Arabic => "arabic",
            Self::Turkic => "turkic",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Base subtag of a language tag, lower-cased
///
/// "nl-NL" -> "nl", "pt_BR" -> "pt", " RU " -> "ru". An empty input gives an
/// empty string.
pub fn base_language(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Validate that a language tag has a real ISO 639-1 base subtag
pub fn validate_language_code(code: &str) -> Result<String> {
    let base = base_language(code);
    if base.len() == 2 && Language::from_639_1(&base).is_some() {
        return Ok(base);
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English language name for a tag
pub fn language_name(code: &str) -> Result<String> {
    let base = validate_language_code(code)?;
    let lang = Language::from_639_1(&base)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", base))?;

    Ok(lang.to_name().to_string())
}

/// Get the language's own name for a tag, falling back to the English name
pub fn native_language_name(code: &str) -> Result<String> {
    let base = validate_language_code(code)?;
    let lang = Language::from_639_1(&base)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", base))?;

    Ok(lang.to_autonym().unwrap_or_else(|| lang.to_name()).to_string())
}
