//! Times of day: "10:30", "10:30pm", "3 a.m.", "at 15", "noon"

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::components::{Field, ParsingComponents};
use crate::context::ParsingContext;
use crate::parsers::Parser;
use crate::results::ParsingResult;

use super::TIME_PARSER_TAG;

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        (?P<clock>
            (?:(?:\bat|@)\s*)?
            \b(?P<clock_hour>[0-9]{1,2}):(?P<clock_minute>[0-9]{2})(?::(?P<clock_second>[0-9]{2}))?
            (?:\s*(?P<clock_meridiem>[ap])\.?m\b\.?)?
        )
        | (?P<meridiem>
            (?:(?:\bat|@)\s*)?
            \b(?P<bare_hour>[0-9]{1,2})\s*(?P<bare_meridiem>[ap])\.?m\b\.?
        )
        | (?P<at>
            (?:\bat|@)\s*(?P<at_hour>[0-9]{1,2})\b
        )
        | (?P<named> \b(?:noon|midday|midnight)\b )
        ",
    )
    .expect("time pattern")
});

/// Parser for clock times
#[derive(Debug, Default)]
pub struct TimeParser;

impl TimeParser {
    pub fn new() -> Self {
        Self
    }
}

/// 24-hour clock hour from a 12-hour clock hour and meridiem letter
fn to_24_hour(hour: u32, meridiem: &str) -> Option<(u32, i32)> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = meridiem.eq_ignore_ascii_case("p");
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (hour, false) => hour,
        (hour, true) => hour + 12,
    };
    Some((hour, i32::from(pm)))
}

fn number(captures: &Captures<'_>, name: &str) -> Option<u32> {
    captures.name(name)?.as_str().parse().ok()
}

impl TimeParser {
    fn assign_clock(
        components: &mut ParsingComponents,
        hour: u32,
        minute: u32,
        second: Option<u32>,
        meridiem: Option<&str>,
    ) -> Option<()> {
        let (hour, meridiem) = match meridiem {
            Some(meridiem) => {
                let (hour, meridiem) = to_24_hour(hour, meridiem)?;
                (hour, Some(meridiem))
            }
            None if hour <= 23 => (hour, None),
            None => return None,
        };
        if minute > 59 || second.is_some_and(|second| second > 59) {
            return None;
        }

        components
            .assign(Field::Hour, hour as i32)
            .assign(Field::Minute, minute as i32);
        if let Some(second) = second {
            components.assign(Field::Second, second as i32);
        }
        match meridiem {
            Some(meridiem) => components.assign(Field::Meridiem, meridiem),
            None => components.imply(Field::Meridiem, i32::from(hour >= 12)),
        };
        Some(())
    }
}

impl Parser for TimeParser {
    fn name(&self) -> &'static str {
        "TimeParser"
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
        let mut components = context.create_components();

        if captures.name("clock").is_some() {
            Self::assign_clock(
                &mut components,
                number(captures, "clock_hour")?,
                number(captures, "clock_minute")?,
                captures.name("clock_second").and_then(|s| s.as_str().parse().ok()),
                captures.name("clock_meridiem").map(|m| m.as_str()),
            )?;
        } else if captures.name("meridiem").is_some() {
            Self::assign_clock(
                &mut components,
                number(captures, "bare_hour")?,
                0,
                None,
                captures.name("bare_meridiem").map(|m| m.as_str()),
            )?;
        } else if captures.name("at").is_some() {
            Self::assign_clock(&mut components, number(captures, "at_hour")?, 0, None, None)?;
        } else {
            let (hour, meridiem) = match matched.as_str().to_ascii_lowercase().as_str() {
                "midnight" => (0, 0),
                _ => (12, 1),
            };
            components
                .assign(Field::Hour, hour)
                .assign(Field::Minute, 0)
                .assign(Field::Meridiem, meridiem);
        }
        components.add_tag(TIME_PARSER_TAG);

        Some(context.create_result(matched.start(), matched.as_str(), components, None))
    }
}
