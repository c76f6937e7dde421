//! Phrase construction rules, one function per language family.

use super::{join_words, ClockWords};
use crate::language_utils::LanguageFamily;

pub(super) fn build(family: LanguageFamily, w: &ClockWords<'_>) -> String {
    match family {
        LanguageFamily::Slavic => slavic(w),
        LanguageFamily::Germanic => germanic(w),
        LanguageFamily::Latin => latin(w),
        LanguageFamily::Arabic => arabic(w),
        LanguageFamily::Turkic => turkic(w),
        LanguageFamily::Default => fallback(w),
    }
}

// Slavic counts minutes towards the next hour ("десять минут одиннадцатого").
// Branch order matters: 15 and 40 are tested before the ranges containing them.
fn slavic(w: &ClockWords<'_>) -> String {
    let mm = w.minute;
    match mm {
        0 => join_words(&[w.hour.as_str(), w.word("hour")]),
        15 => join_words(&[w.word("quarter"), w.word("of"), w.next_hour_genitive.as_str()]),
        1..=29 => join_words(&[
            w.minutes(mm).as_str(),
            w.minute_form(mm),
            w.word("of"),
            w.next_hour_genitive.as_str(),
        ]),
        30 => join_words(&[w.word("half"), w.next_hour_genitive.as_str()]),
        40 => join_words(&[
            w.word("without"),
            w.minutes_genitive(60 - mm).as_str(),
            w.minute_form(mm),
            w.word("of"),
            w.next_hour.as_str(),
        ]),
        31..=44 => join_words(&[w.minutes(mm).as_str(), w.minute_form(mm), w.next_hour_genitive.as_str()]),
        45 => join_words(&[w.word("quarterBefore"), w.next_hour.as_str()]),
        46..=49 => join_words(&[w.minutes(mm).as_str(), w.minute_form(60 - mm), w.next_hour_genitive.as_str()]),
        _ => join_words(&[
            w.word("without"),
            w.minutes_genitive(60 - mm).as_str(),
            w.minute_form(mm),
            w.next_hour.as_str(),
        ]),
    }
}

// Germanic anchors the second quarter-hour on "half": "tien voor half vier".
fn germanic(w: &ClockWords<'_>) -> String {
    let mm = w.minute;
    match mm {
        0 => join_words(&[w.hour.as_str(), w.word("hour")]),
        1..=14 => join_words(&[w.minutes(mm).as_str(), w.word("over"), w.hour.as_str()]),
        15 => join_words(&[w.word("quarter"), w.word("over"), w.hour.as_str()]),
        16..=29 => join_words(&[
            w.minutes(30 - mm).as_str(),
            w.word("before"),
            w.word("half"),
            w.next_hour.as_str(),
        ]),
        30 => join_words(&[w.word("half"), w.next_hour.as_str()]),
        31..=44 => join_words(&[
            w.minutes(mm - 30).as_str(),
            w.word("over"),
            w.word("half"),
            w.next_hour.as_str(),
        ]),
        45 => join_words(&[w.word("quarter"), w.word("before"), w.next_hour.as_str()]),
        _ => join_words(&[w.minutes(60 - mm).as_str(), w.word("before"), w.next_hour.as_str()]),
    }
}

fn latin(w: &ClockWords<'_>) -> String {
    let mm = w.minute;
    match mm {
        0 => join_words(&[w.hour.as_str(), w.word("hour")]),
        15 => join_words(&[w.word("quarterOver"), w.hour.as_str()]),
        30 => join_words(&[w.word("half"), w.hour.as_str()]),
        45 => join_words(&[w.word("quarterBefore"), w.next_hour.as_str()]),
        1..=29 => join_words(&[w.minutes(mm).as_str(), w.minute_form(mm), w.word("past"), w.hour.as_str()]),
        _ => join_words(&[
            w.minutes(60 - mm).as_str(),
            w.minute_form(60 - mm),
            w.word("to"),
            w.next_hour.as_str(),
        ]),
    }
}

fn arabic(w: &ClockWords<'_>) -> String {
    let mm = w.minute;
    match mm {
        0 => join_words(&[w.hour.as_str(), w.word("hour")]),
        15 => join_words(&[w.hour.as_str(), w.word("quarterOver")]),
        30 => join_words(&[w.hour.as_str(), w.word("half")]),
        45 => join_words(&[w.next_hour.as_str(), w.word("quarterBefore")]),
        1..=29 => join_words(&[
            w.hour.as_str(),
            w.word_or("and", "و"),
            w.minutes(mm).as_str(),
            w.minute_form(mm),
        ]),
        _ => join_words(&[
            w.next_hour.as_str(),
            w.word("before"),
            w.minutes(60 - mm).as_str(),
            w.minute_form(60 - mm),
        ]),
    }
}

// Turkic has no dedicated quarter phrasing.
fn turkic(w: &ClockWords<'_>) -> String {
    let mm = w.minute;
    match mm {
        0 => join_words(&[w.hour.as_str(), w.word("hour")]),
        30 => join_words(&[w.hour.as_str(), w.word("half")]),
        1..=29 => join_words(&[w.hour.as_str(), w.minutes(mm).as_str(), w.minute_form(mm), w.word("past")]),
        _ => join_words(&[
            w.next_hour.as_str(),
            w.minutes(60 - mm).as_str(),
            w.minute_form(60 - mm),
            w.word("to"),
        ]),
    }
}

fn fallback(w: &ClockWords<'_>) -> String {
    let mm = w.minute;
    match mm {
        0 => join_words(&[w.hour.as_str(), w.word("hour")]),
        30 => join_words(&[w.word("half"), w.next_hour.as_str()]),
        1..=29 => join_words(&[w.minutes(mm).as_str(), w.minute_form(mm), w.word("over"), w.hour.as_str()]),
        _ => join_words(&[
            w.minutes(60 - mm).as_str(),
            w.minute_form(60 - mm),
            w.word("before"),
            w.next_hour.as_str(),
        ]),
    }
}
