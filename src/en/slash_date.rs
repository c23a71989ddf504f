//! Month-first slash dates: "3/14", "3/14/2024", "3/14/24", "3/14/'24"

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::components::Field;
use crate::context::ParsingContext;
use crate::parsers::{classify_number, NumberSlot, Numeric, Parser};
use crate::results::ParsingResult;

use super::SLASH_DATE_PARSER_TAG;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<month>[0-9]{1,2})/(?P<day>[0-9]{1,2})(?:/(?P<year>[0-9]{4}|[0-9]{2}|['’][0-9]{2}))?\b",
    )
    .expect("slash date pattern")
});

/// Parser for US-style month/day[/year] dates
#[derive(Debug, Default)]
pub struct SlashDateParser;

impl SlashDateParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for SlashDateParser {
    fn name(&self) -> &'static str {
        "SlashDateParser"
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
        let month: u32 = captures.name("month")?.as_str().parse().ok()?;
        let day: u32 = captures.name("day")?.as_str().parse().ok()?;

        let year = match captures.name("year") {
            Some(token) => match classify_number(token.as_str(), NumberSlot::Year)? {
                Numeric::Year(year) => Some(year),
                Numeric::Week(_) => return None,
            },
            None => None,
        };

        // Without a year, accept 29 February
        NaiveDate::from_ymd_opt(year.unwrap_or(2000), month, day)?;

        let mut components = context.create_components();
        components
            .assign(Field::Month, month as i32)
            .assign(Field::Day, day as i32)
            .add_tag(SLASH_DATE_PARSER_TAG);
        if let Some(year) = year {
            components.assign(Field::Year, year);
        }

        Some(context.create_result(matched.start(), matched.as_str(), components, None))
    }
}
