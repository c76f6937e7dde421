/*!
 * Tests for time input parsing and random practice times
 */

use rand::rngs::StdRng;
use rand::SeedableRng;

use clockspeak::errors::TimeInputError;
use clockspeak::time_input::{format_as_hhmm, parse_time_input, random_time, TimeValue};

/// Every valid time survives formatting and parsing unchanged
#[test]
fn test_parse_time_input_withFormattedTimes_shouldRoundTripAllValues() {
    for hour in 0..24 {
        for minute in 0..60 {
            let text = format_as_hhmm(hour, minute);
            let parsed = parse_time_input(&text).unwrap();
            assert_eq!((parsed.hour(), parsed.minute()), (hour, minute), "for {}", text);
        }
    }
}

#[test]
fn test_parse_time_input_withSingleDigitHour_shouldParse() {
    let time = parse_time_input("9:05").unwrap();
    assert_eq!(time.hour(), 9);
    assert_eq!(time.minute(), 5);
}

#[test]
fn test_parse_time_input_withSurroundingWhitespace_shouldTrim() {
    assert_eq!(parse_time_input("  14:45 \n").unwrap(), TimeValue::new(14, 45).unwrap());
}

#[test]
fn test_parse_time_input_withBadInput_shouldReturnSpecificError() {
    assert_eq!(parse_time_input(""), Err(TimeInputError::Empty));
    assert_eq!(parse_time_input("   "), Err(TimeInputError::Empty));
    assert!(matches!(parse_time_input("bad"), Err(TimeInputError::Malformed(_))));
    assert!(matches!(parse_time_input("9:5"), Err(TimeInputError::Malformed(_))));
    assert!(matches!(parse_time_input("123:00"), Err(TimeInputError::Malformed(_))));
    assert!(matches!(parse_time_input("9.15"), Err(TimeInputError::Malformed(_))));
    assert_eq!(parse_time_input("24:00"), Err(TimeInputError::HourOutOfRange(24)));
    assert_eq!(parse_time_input("12:60"), Err(TimeInputError::MinuteOutOfRange(60)));
}

#[test]
fn test_time_value_display_shouldZeroPad() {
    let time = TimeValue::new(7, 5).unwrap();
    assert_eq!(time.to_string(), "07:05");
    assert_eq!("07:05".parse::<TimeValue>().unwrap(), time);
}

#[test]
fn test_time_value_new_withOutOfRangeParts_shouldFail() {
    assert!(TimeValue::new(23, 59).is_ok());
    assert_eq!(TimeValue::new(25, 0), Err(TimeInputError::HourOutOfRange(25)));
    assert_eq!(TimeValue::new(0, 75), Err(TimeInputError::MinuteOutOfRange(75)));
}

#[test]
fn test_random_time_withFiveMinuteStep_shouldStayOnGrid() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..500 {
        let time = random_time(&mut rng, 5);
        assert!(time.hour() < 24);
        assert_eq!(time.minute() % 5, 0);
    }
}

#[test]
fn test_random_time_withSameSeed_shouldBeDeterministic() {
    let a: Vec<TimeValue> = {
        let mut rng = StdRng::seed_from_u64(42);
        (0..10).map(|_| random_time(&mut rng, 15)).collect()
    };
    let b: Vec<TimeValue> = {
        let mut rng = StdRng::seed_from_u64(42);
        (0..10).map(|_| random_time(&mut rng, 15)).collect()
    };
    assert_eq!(a, b);
}

#[test]
fn test_random_time_withZeroStep_shouldAllowAnyMinute() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        assert!(random_time(&mut rng, 0).minute() < 60);
    }
}
