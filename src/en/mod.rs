//! English locale: vocabulary, parsers and the default configuration
//!
//! [`casual`] is the ready-made extractor most callers want. [`configuration`]
//! returns a fresh [`Configuration`] to extend with custom parsers or
//! refiners before wrapping it in an [`Extractor`].

mod iso_date;
mod month_name;
mod relative_week;
mod slash_date;
mod time;
mod week;

pub use iso_date::IsoDateParser;
pub use month_name::MonthNameParser;
pub use relative_week::RelativeWeekParser;
pub use slash_date::SlashDateParser;
pub use time::TimeParser;
pub use week::WeekParser;

use std::sync::{LazyLock, OnceLock};

use regex::Regex;

use crate::engine::{Configuration, Extractor};
use crate::parsers::{RELATIVE_WEEK_PARSER_TAG, WEEK_PARSER_TAG};
use crate::refiners::{
    ExtractTimezoneRefiner, ExtractYearSuffixRefiner, ForwardDateRefiner, MergeDateRangeRefiner,
    MergeDateTimeRefiner, PrioritizeSpecificRefiner, PrioritizeTaggedRefiner,
    UnlikelyFormatFilter,
};

pub const ISO_DATE_PARSER_TAG: &str = "iso-date-parser";
pub const SLASH_DATE_PARSER_TAG: &str = "slash-date-parser";
pub const MONTH_NAME_PARSER_TAG: &str = "month-name-parser";
pub const TIME_PARSER_TAG: &str = "time-parser";

/// Number words accepted where a count of weeks is expected
const NUMBER_WORDS: &[(&str, i64)] = &[
    ("a", 1),
    ("an", 1),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
];

/// Alternation over [`NUMBER_WORDS`] for use inside patterns
pub(crate) const NUMBER_WORD_PATTERN: &str =
    "a|an|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";

/// Month names and abbreviations, longest spelling first
const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// Alternation over [`MONTHS`] for use inside patterns
pub(crate) const MONTH_PATTERN: &str = "january|jan|february|feb|march|mar|april|apr|may|june|jun|\
     july|jul|august|aug|september|sept|sep|october|oct|november|nov|december|dec";

/// Count written as digits or as an English number word
pub(crate) fn count_value(token: &str) -> Option<i64> {
    let token = token.trim();
    if let Ok(value) = token.parse::<i64>() {
        return Some(value);
    }
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(token))
        .map(|(_, value)| *value)
}

pub(crate) fn month_value(token: &str) -> Option<u32> {
    let token = token.trim().trim_end_matches('.');
    MONTHS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
        .map(|(_, month)| *month)
}

static DATE_TIME_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:,|at|on|@|T)?\s*$").expect("date-time connector"));

static RANGE_CONNECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:to|until|till|through|thru|-|–|—|~)\s*$").expect("range connector")
});

static RANGE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:from|between)\s+$").expect("range prefix"));

static RANGE_PREFIXED_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*and\s*$").expect("prefixed range connector"));

static YEAR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:\s*,\s*|\s+)(?P<year>[0-9]{4}|['’][0-9]{2})|\s*,\s*(?P<short_year>[0-9]{2}))\b",
    )
    .expect("year suffix")
});

/// Fresh English configuration
///
/// Refiners run in this order: date/time merge, range merge, year suffix,
/// timezone, unlikely-format filter, forward dating, tag priority, then
/// specificity.
pub fn configuration() -> Configuration {
    Configuration::new()
        .with_parser(WeekParser::new())
        .with_parser(RelativeWeekParser::new())
        .with_parser(IsoDateParser::new())
        .with_parser(SlashDateParser::new())
        .with_parser(MonthNameParser::new())
        .with_parser(TimeParser::new())
        .with_refiner(MergeDateTimeRefiner::new(DATE_TIME_CONNECTOR.clone(), true))
        .with_refiner(MergeDateRangeRefiner::new(
            RANGE_CONNECTOR.clone(),
            RANGE_PREFIX.clone(),
            RANGE_PREFIXED_CONNECTOR.clone(),
        ))
        .with_refiner(ExtractYearSuffixRefiner::new(YEAR_SUFFIX.clone()))
        .with_refiner(ExtractTimezoneRefiner::new())
        .with_refiner(UnlikelyFormatFilter::new())
        .with_refiner(ForwardDateRefiner::new())
        .with_refiner(PrioritizeTaggedRefiner::new([
            WEEK_PARSER_TAG,
            RELATIVE_WEEK_PARSER_TAG,
        ]))
        .with_refiner(PrioritizeSpecificRefiner::new())
}

/// Shared English extractor, built on first use
pub fn casual() -> &'static Extractor {
    static CASUAL: OnceLock<Extractor> = OnceLock::new();
    CASUAL.get_or_init(|| Extractor::new(configuration()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary() {
        assert_eq!(count_value("3"), Some(3));
        assert_eq!(count_value("An"), Some(1));
        assert_eq!(count_value("twelve"), Some(12));
        assert_eq!(count_value("dozen"), None);

        assert_eq!(month_value("Sept."), Some(9));
        assert_eq!(month_value("MAY"), Some(5));
        assert_eq!(month_value("marc"), None);
    }

    #[test]
    fn test_patterns_cover_vocabulary() {
        for (word, _) in NUMBER_WORDS {
            assert!(NUMBER_WORD_PATTERN.split('|').any(|w| w == *word), "{}", word);
        }
        for (name, _) in MONTHS {
            assert!(MONTH_PATTERN.split('|').any(|m| m == *name), "{}", name);
        }
    }

    #[test]
    fn test_configuration_order() {
        let configuration = configuration();
        let refiners: Vec<&str> = configuration.refiners().iter().map(|r| r.name()).collect();
        assert_eq!(
            refiners,
            vec![
                "MergeDateTimeRefiner",
                "MergeDateRangeRefiner",
                "ExtractYearSuffixRefiner",
                "ExtractTimezoneRefiner",
                "UnlikelyFormatFilter",
                "ForwardDateRefiner",
                "PrioritizeTaggedRefiner",
                "PrioritizeSpecificRefiner",
            ]
        );
        assert_eq!(configuration.parsers().len(), 6);
        assert!(std::ptr::eq(casual(), casual()));
    }
}
