//! Month names with a day: "March 5", "Mar 5th", "5 March", "5th of March"

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::components::Field;
use crate::context::ParsingContext;
use crate::parsers::Parser;
use crate::results::ParsingResult;

use super::{month_value, MONTH_NAME_PARSER_TAG, MONTH_PATTERN};

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?ix)
        (?P<month_first>
            \b(?P<mf_month>{months})\.?\s+(?P<mf_day>[0-9]{{1,2}})(?:st|nd|rd|th)?\b
        )
        | (?P<day_first>
            \b(?P<df_day>[0-9]{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?(?P<df_month>{months})\b
        )
        ",
        months = MONTH_PATTERN,
    ))
    .expect("month name pattern")
});

/// Parser for a day of a named month
///
/// The year is left open; a year written after the date is picked up by the
/// year-suffix refiner.
#[derive(Debug, Default)]
pub struct MonthNameParser;

impl MonthNameParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for MonthNameParser {
    fn name(&self) -> &'static str {
        "MonthNameParser"
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
        let (month, day) = if captures.name("month_first").is_some() {
            (captures.name("mf_month")?, captures.name("mf_day")?)
        } else {
            (captures.name("df_month")?, captures.name("df_day")?)
        };
        // Lowercase "may" is almost always the verb
        if month.as_str() == "may" {
            return None;
        }
        let month = month_value(month.as_str())?;
        let day: u32 = day.as_str().parse().ok()?;

        // Leap year, so 29 February is accepted until a year says otherwise
        NaiveDate::from_ymd_opt(2000, month, day)?;

        let mut components = context.create_components();
        components
            .assign(Field::Month, month as i32)
            .assign(Field::Day, day as i32)
            .add_tag(MONTH_NAME_PARSER_TAG);

        Some(context.create_result(matched.start(), matched.as_str(), components, None))
    }
}
