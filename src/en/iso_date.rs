//! ISO 8601 calendar dates with optional time and offset

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::components::Field;
use crate::context::ParsingContext;
use crate::parsers::{classify_number, NumberSlot, Numeric, Parser};
use crate::results::ParsingResult;

use super::ISO_DATE_PARSER_TAG;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        \b(?P<year>[0-9]{4})-(?P<month>[0-9]{2})-(?P<day>[0-9]{2})
        (?:
            [T\x20](?P<hour>[0-9]{2}):(?P<minute>[0-9]{2})
            (?: :(?P<second>[0-9]{2}) (?:\.(?P<fraction>[0-9]{1,9}))? )?
            (?P<offset> Z | (?P<sign>[+-])(?P<offset_hour>[0-9]{2}):?(?P<offset_minute>[0-9]{2}) )?
        )?
        \b
        ",
    )
    .expect("iso date pattern")
});

/// Parser for `YYYY-MM-DD[THH:MM[:SS[.fff]][Z|±HH:MM]]`
#[derive(Debug, Default)]
pub struct IsoDateParser;

impl IsoDateParser {
    pub fn new() -> Self {
        Self
    }
}

fn number(captures: &Captures<'_>, name: &str) -> Option<u32> {
    captures.name(name)?.as_str().parse().ok()
}

/// Milliseconds from a fraction of a second, "5" -> 500, "123456" -> 123
fn milliseconds(fraction: &str) -> Option<u32> {
    let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
    digits.parse().ok()
}

/// Offset in minutes east of UTC
fn offset_minutes(captures: &Captures<'_>) -> Option<Option<i32>> {
    let Some(offset) = captures.name("offset") else {
        return Some(None);
    };
    if offset.as_str().eq_ignore_ascii_case("z") {
        return Some(Some(0));
    }

    let hours = number(captures, "offset_hour")?;
    let minutes = number(captures, "offset_minute")?;
    if hours > 14 || minutes >= 60 {
        return None;
    }
    let magnitude = (hours * 60 + minutes) as i32;
    let sign = if captures.name("sign")?.as_str() == "-" { -1 } else { 1 };
    Some(Some(sign * magnitude))
}

impl Parser for IsoDateParser {
    fn name(&self) -> &'static str {
        "IsoDateParser"
    }

    fn pattern(&self, _context: &ParsingContext<'_>) -> &Regex {
        &PATTERN
    }

    fn extract(
        &self,
        context: &ParsingContext<'_>,
        captures: &Captures<'_>,
    ) -> Option<ParsingResult> {
        let matched = captures.get(0)?;
        let Numeric::Year(year) = classify_number(captures.name("year")?.as_str(), NumberSlot::Year)?
        else {
            return None;
        };
        let date = NaiveDate::from_ymd_opt(year, number(captures, "month")?, number(captures, "day")?)?;

        let mut components = context.create_components();
        components.assign_date(date).add_tag(ISO_DATE_PARSER_TAG);

        if captures.name("hour").is_some() {
            let hour = number(captures, "hour")?;
            let minute = number(captures, "minute")?;
            let second = captures.name("second").map_or(Some(0), |_| number(captures, "second"))?;
            let millisecond = captures
                .name("fraction")
                .map_or(Some(0), |fraction| milliseconds(fraction.as_str()))?;
            if hour > 23 || minute > 59 || second > 59 {
                return None;
            }

            components
                .assign(Field::Hour, hour as i32)
                .assign(Field::Minute, minute as i32)
                .assign(Field::Second, second as i32)
                .assign(Field::Millisecond, millisecond as i32)
                .assign(Field::Meridiem, i32::from(hour >= 12));
            if let Some(offset) = offset_minutes(captures)? {
                components.assign(Field::TimezoneOffset, offset);
            }
        }

        Some(context.create_result(matched.start(), matched.as_str(), components, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::reference::ReferenceInstant;
    use chrono::{TimeZone, Utc};

    fn extract(text: &str) -> Option<ParsingResult> {
        let reference = ReferenceInstant::utc(Utc.with_ymd_and_hms(2024, 6, 12, 8, 0, 0).unwrap());
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference, &options);
        let captures = PATTERN.captures(text)?;
        IsoDateParser::new().extract(&context, &captures)
    }

    #[test]
    fn test_date_only() {
        let result = extract("on 2024-12-30.").unwrap();
        assert_eq!(result.text(), "2024-12-30");
        assert_eq!(result.index(), 3);
        let start = result.start();
        assert!(start.is_date_only());
        assert_eq!(start.get(Field::Day), Some(30));
        // Implied week fields still reflect the reference, not this date
        assert!(!start.is_known(Field::IsoWeek));
    }

    #[test]
    fn test_date_time_with_offset() {
        let result = extract("2024-01-15T10:30:15.25+02:00").unwrap();
        let start = result.start();
        assert_eq!(start.get(Field::Millisecond), Some(250));
        assert_eq!(start.get(Field::TimezoneOffset), Some(120));
        assert_eq!(
            start.resolve().unwrap().to_rfc3339(),
            "2024-01-15T10:30:15.250+02:00"
        );

        let result = extract("2024-01-15 22:05Z").unwrap();
        assert_eq!(result.text(), "2024-01-15 22:05Z");
        assert_eq!(result.start().get(Field::Meridiem), Some(1));
        assert_eq!(result.start().get(Field::TimezoneOffset), Some(0));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(extract("2023-02-29").is_none());
        assert!(extract("2024-13-01").is_none());
        assert!(extract("2024-01-15T24:00").is_none());
        assert_eq!(milliseconds("123456"), Some(123));
        assert_eq!(milliseconds("5"), Some(500));
    }
}
