/*!
 * Spoken time phrases.
 *
 * `PhraseFormatter` turns a `TimeValue` and a language tag into the phrase a
 * native speaker would say ("kwart over drie", "без пяти минут два"). The
 * grammar is a fixed rule table per language family (see `families`); the
 * words come from a `VocabularyProvider`.
 *
 * Missing vocabulary never fails a phrase: absent connector words become
 * empty, absent hour and minute names become numerals. Only a language with
 * no vocabulary at all (and no "en" fallback) yields an empty string.
 */

use log::debug;

use crate::language_utils::LanguageFamily;
use crate::time_input::TimeValue;
use crate::vocabulary::{LanguageVocabulary, NumberTable, VocabularyProvider};

mod families;
pub mod plural;

pub use plural::choose_form;

/// Formatting switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Index hour names with a 24-entry table instead of a 12-entry one
    pub use_24h: bool,
}

impl FormatOptions {
    pub fn twenty_four_hour() -> Self {
        Self { use_24h: true }
    }
}

/// Name for `key` in `table`, or `fallback` when the table or entry is missing
pub fn lookup_or(table: Option<&NumberTable>, key: u32, fallback: impl Into<String>) -> String {
    match table.and_then(|t| t.get(key)) {
        Some(word) => word.to_string(),
        None => fallback.into(),
    }
}

/// Join phrase parts with single spaces, dropping empty parts
pub(crate) fn join_words<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .flat_map(|p| p.as_ref().split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Words resolved for one time value in one vocabulary
pub(crate) struct ClockWords<'a> {
    vocab: &'a LanguageVocabulary,
    pub minute: u32,
    pub hour: String,
    pub next_hour: String,
    pub next_hour_genitive: String,
}

impl<'a> ClockWords<'a> {
    pub(crate) fn resolve(vocab: &'a LanguageVocabulary, time: TimeValue, options: FormatOptions) -> Self {
        let h = time.hour();
        let next = (h + 1) % 24;

        let (idx, next_idx) = if options.use_24h { (h, next) } else { (h % 12, next % 12) };

        // Unnamed hours are spoken as the 24-hour numeral in either mode
        let hour = lookup_or(Some(&vocab.hours), idx, h.to_string());
        let next_hour = lookup_or(Some(&vocab.hours), next_idx, next.to_string());
        let next_hour_genitive = lookup_or(vocab.hours_genitive.as_ref(), next_idx, next_hour.clone());

        Self {
            vocab,
            minute: time.minute(),
            hour,
            next_hour,
            next_hour_genitive,
        }
    }

    pub(crate) fn word(&self, key: &str) -> &'a str {
        self.vocab.word(key)
    }

    pub(crate) fn word_or(&self, key: &str, fallback: &'a str) -> &'a str {
        self.vocab.word_or(key, fallback)
    }

    pub(crate) fn minutes(&self, n: u32) -> String {
        lookup_or(Some(&self.vocab.minutes), n, n.to_string())
    }

    pub(crate) fn minutes_genitive(&self, n: u32) -> String {
        lookup_or(self.vocab.minutes_genitive.as_ref(), n, self.minutes(n))
    }

    pub(crate) fn minute_form(&self, n: u32) -> &'a str {
        choose_form(i64::from(n), &self.vocab.minute_forms())
    }
}

/// Build the phrase for a time with an already-resolved vocabulary
pub fn format_time_phrase(
    vocab: &LanguageVocabulary,
    family: LanguageFamily,
    time: TimeValue,
    options: FormatOptions,
) -> String {
    let words = ClockWords::resolve(vocab, time, options);
    families::build(family, &words)
}

/// Time phrase generator backed by a vocabulary provider
#[derive(Debug, Clone)]
pub struct PhraseFormatter<P> {
    provider: P,
}

impl<P: VocabularyProvider> PhraseFormatter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Phrase for `time` in `language_code`, or "" when no vocabulary exists
    ///
    /// The grammar follows the language whose vocabulary was found, so a
    /// request for an unknown language speaks with the fallback's rules.
    pub fn format(&self, time: TimeValue, language_code: &str, options: FormatOptions) -> String {
        let Some(resolved) = self.provider.vocabulary(language_code) else {
            debug!("No vocabulary for '{}' and no fallback", language_code);
            return String::new();
        };

        let family = LanguageFamily::for_code(resolved.language);
        format_time_phrase(resolved.vocabulary, family, time, options)
    }
}
