/*!
 * Clock time values and their text form.
 *
 * Raw sequence slots and single-speak requests arrive as user-typed text;
 * this module turns them into validated `TimeValue`s and produces random
 * practice times.
 */

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::errors::TimeInputError;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

/// An hour/minute pair on a 24-hour clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeValue {
    hour: u32,
    minute: u32,
}

impl TimeValue {
    /// Create a time, rejecting out-of-range components
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeInputError> {
        if hour > 23 {
            return Err(TimeInputError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeInputError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_as_hhmm(self.hour, self.minute))
    }
}

impl FromStr for TimeValue {
    type Err = TimeInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_input(s)
    }
}

/// Parse "H:MM" or "HH:MM" (surrounding whitespace ignored)
pub fn parse_time_input(raw: &str) -> Result<TimeValue, TimeInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimeInputError::Empty);
    }

    let captures = TIME_PATTERN
        .captures(trimmed)
        .ok_or_else(|| TimeInputError::Malformed(trimmed.to_string()))?;

    let hour: u32 = captures[1]
        .parse()
        .map_err(|_| TimeInputError::Malformed(trimmed.to_string()))?;
    let minute: u32 = captures[2]
        .parse()
        .map_err(|_| TimeInputError::Malformed(trimmed.to_string()))?;

    TimeValue::new(hour, minute)
}

/// Zero-padded "HH:MM"
pub fn format_as_hhmm(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// Random time whose minute is a multiple of `step_minutes`
///
/// A step of 0 is treated as 1; steps above 60 collapse to whole hours.
pub fn random_time<R: Rng + ?Sized>(rng: &mut R, step_minutes: u32) -> TimeValue {
    let step = step_minutes.clamp(1, 60);
    let slots = 60_u32.div_ceil(step);
    let hour = rng.random_range(0..24);
    let minute = rng.random_range(0..slots) * step;

    TimeValue { hour, minute: minute.min(59) }
}

/// Random practice time as "H:MM", using the thread-local generator
pub fn random_time_string(step_minutes: u32) -> String {
    let time = random_time(&mut rand::rng(), step_minutes);
    format!("{}:{:02}", time.hour(), time.minute())
}
