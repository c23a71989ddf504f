//! Absorb a timezone written right after a time

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::components::Field;
use crate::context::ParsingContext;
use crate::results::ParsingResult;

use super::Refiner;

/// Abbreviation, optional signed offset, or both (`UTC+2`)
static TIMEZONE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:(?P<abbr>[A-Za-z]{1,5})\b)?\s*(?:(?P<sign>[+-])(?P<hh>[0-9]{1,2})(?::?(?P<mm>[0-9]{2}))?\b)?",
    )
    .expect("timezone suffix pattern")
});

/// Built-in abbreviations, in minutes east of UTC
///
/// Only matched when written in upper case; custom abbreviations from the
/// parse options are matched case-insensitively and take precedence.
const ABBREVIATIONS: &[(&str, i32)] = &[
    ("UTC", 0),
    ("GMT", 0),
    ("Z", 0),
    ("WET", 0),
    ("WEST", 60),
    ("BST", 60),
    ("CET", 60),
    ("CEST", 120),
    ("EET", 120),
    ("EEST", 180),
    ("IST", 330),
    ("JST", 540),
    ("AEST", 600),
    ("AEDT", 660),
    ("EST", -300),
    ("EDT", -240),
    ("CST", -360),
    ("CDT", -300),
    ("MST", -420),
    ("MDT", -360),
    ("PST", -480),
    ("PDT", -420),
];

/// Turns "10:30" + " CET" into a candidate with a known timezone offset
///
/// Applies to candidates that know an hour but not an offset. Both endpoints
/// of a range receive the offset.
#[derive(Debug, Default)]
pub struct ExtractTimezoneRefiner;

impl ExtractTimezoneRefiner {
    pub fn new() -> Self {
        Self
    }

    fn extend(
        &self,
        context: &ParsingContext<'_>,
        result: &ParsingResult,
        next_index: Option<usize>,
    ) -> Option<ParsingResult> {
        let start = result.start();
        if !start.is_known(Field::Hour) || start.is_known(Field::TimezoneOffset) {
            return None;
        }

        let following = context.text().get(result.end_index()..)?;
        let captures = TIMEZONE_SUFFIX.captures(following)?;
        let (offset, consumed) = suffix_offset(context, &captures)?;
        let suffix_end = result.end_index() + consumed;

        if next_index.is_some_and(|next| next < suffix_end) {
            return None;
        }

        let mut extended = result.clone();
        for components in extended.components_mut() {
            if !components.is_known(Field::TimezoneOffset) {
                components.assign(Field::TimezoneOffset, offset);
            }
        }
        if !extended.set_span(context.text(), result.index(), suffix_end) {
            return None;
        }
        Some(extended)
    }
}

/// Offset in minutes and the number of bytes the suffix covers
fn suffix_offset(context: &ParsingContext<'_>, captures: &Captures<'_>) -> Option<(i32, usize)> {
    let abbreviation = match captures.name("abbr") {
        Some(abbr) => Some(lookup(context, abbr.as_str())?),
        None => None,
    };

    let numeric = match (captures.name("sign"), captures.name("hh")) {
        (Some(sign), Some(hours)) => {
            let hours: i32 = hours.as_str().parse().ok()?;
            let minutes: i32 = captures
                .name("mm")
                .map_or(Ok(0), |m| m.as_str().parse())
                .ok()?;
            if hours > 14 || minutes >= 60 {
                return None;
            }
            let magnitude = hours * 60 + minutes;
            Some(if sign.as_str() == "-" { -magnitude } else { magnitude })
        }
        _ => None,
    };

    if abbreviation.is_none() && numeric.is_none() {
        return None;
    }

    let consumed = ["abbr", "hh", "mm"]
        .iter()
        .filter_map(|name| captures.name(name))
        .map(|m| m.end())
        .max()?;

    Some((abbreviation.unwrap_or(0) + numeric.unwrap_or(0), consumed))
}

fn lookup(context: &ParsingContext<'_>, abbreviation: &str) -> Option<i32> {
    if let Some(offset) = context.options().timezone_offset(abbreviation) {
        return Some(offset);
    }
    ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == abbreviation)
        .map(|(_, offset)| *offset)
}

impl Refiner for ExtractTimezoneRefiner {
    fn name(&self) -> &'static str {
        "ExtractTimezoneRefiner"
    }

    fn refine(
        &self,
        context: &ParsingContext<'_>,
        results: Vec<ParsingResult>,
    ) -> Vec<ParsingResult> {
        let next_indexes: Vec<Option<usize>> = (0..results.len())
            .map(|i| {
                results[i + 1..]
                    .iter()
                    .map(ParsingResult::index)
                    .find(|index| *index >= results[i].end_index())
            })
            .collect();

        results
            .into_iter()
            .zip(next_indexes)
            .map(|(result, next_index)| match self.extend(context, &result, next_index) {
                Some(extended) => {
                    context.debug(|| {
                        format!("extended {:?} to {:?}", result.text(), extended.text())
                    });
                    extended
                }
                None => result,
            })
            .collect()
    }
}
