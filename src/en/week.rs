//! Explicit ISO week numbers: "Week 15", "2024-W05-3", "15th week of 2024"

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::components::Field;
use crate::context::ParsingContext;
use crate::parsers::{assign_week, classify_number, NumberSlot, Numeric, Parser, WEEK_PARSER_TAG};
use crate::results::ParsingResult;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        (?P<compact>
            \b(?P<compact_year>[0-9]{4})-?w(?P<compact_week>[0-9]{2})(?:-?(?P<compact_day>[1-7]))?\b
        )
        | (?P<year_first>
            (?P<lead_year>\b[0-9]{4}|['’][0-9]{2})\s+(?:week|wk)\s*\#?\s*(?P<lead_week>[0-9]{1,2})\b
        )
        | (?P<ordinal>
            \b(?:the\s+)?(?P<ordinal_week>[0-9]{1,2})(?:st|nd|rd|th)\s+week
            (?:\s+of\s+(?P<ordinal_year>[0-9]{4}|['’][0-9]{2}))?\b
        )
        | (?P<labeled>
            \b(?:week|wk|kw|w)\s*\#?\s*(?P<week>[0-9]{1,2})\b
            (?:
                \s*(?:of\s+|,\s*|/\s*)?(?P<year>[0-9]{4}\b|['’][0-9]{2}\b)
                | /(?P<short_year>[0-9]{2})\b
            )?
        )
        ",
    )
    .expect("week pattern")
});

/// A year directly before a labeled week, as in "2023-W53" or "2023 week 53"
static LEADING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\b[0-9]{4}|['’][0-9]{2})(?:\s*-|\s+)$").expect("leading year pattern")
});

/// Which alternative of the pattern matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// `2024-W05`, `2024W05`, `2024-W05-3`
    Compact,
    /// `2024 week 15`, `'24 week 15`
    YearFirst,
    /// `15th week of 2024`, `the 15th week`
    Ordinal,
    /// `Week 15`, `wk 15`, `W15`, `KW 15`, `week 15 of 2024`, `week 15/24`
    Labeled,
}

impl Form {
    fn of(captures: &Captures<'_>) -> Option<Self> {
        [
            ("compact", Form::Compact),
            ("year_first", Form::YearFirst),
            ("ordinal", Form::Ordinal),
            ("labeled", Form::Labeled),
        ]
        .into_iter()
        .find(|(name, _)| captures.name(name).is_some())
        .map(|(_, form)| form)
    }

    /// Capture group names holding the week and (optionally) the year
    fn groups(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Form::Compact => ("compact_week", &["compact_year"]),
            Form::YearFirst => ("lead_week", &["lead_year"]),
            Form::Ordinal => ("ordinal_week", &["ordinal_year"]),
            Form::Labeled => ("week", &["year", "short_year"]),
        }
    }
}

/// Parser for explicitly numbered ISO weeks
#[derive(Debug, Default)]
pub struct WeekParser;

impl WeekParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for WeekParser {
    fn name(&self) -> &'static str {
        "WeekParser"
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
        let form = Form::of(captures)?;
        let (week_group, year_groups) = form.groups();

        // The year-carrying form for this text was already tried and rejected
        if form == Form::Labeled {
            let before = context.text().get(..matched.start())?;
            if LEADING_YEAR.is_match(before) {
                context.debug(|| format!("rejected {:?} after a year", matched.as_str()));
                return None;
            }
        }

        let Numeric::Week(week) =
            classify_number(captures.name(week_group)?.as_str(), NumberSlot::Week)?
        else {
            return None;
        };

        let year = match year_groups.iter().find_map(|name| captures.name(name)) {
            Some(token) => match classify_number(token.as_str(), NumberSlot::Year)? {
                Numeric::Year(year) => Some(year),
                Numeric::Week(_) => return None,
            },
            None => None,
        };

        let mut components = context.create_components();
        if let Some(day) = captures.name("compact_day") {
            components.assign(Field::Weekday, day.as_str().parse().ok()?);
        }
        if !assign_week(&mut components, week, year) {
            context.debug(|| format!("rejected week {} in {:?}", week, matched.as_str()));
            return None;
        }
        components.add_tag(WEEK_PARSER_TAG);

        Some(context.create_result(matched.start(), matched.as_str(), components, None))
    }
}
