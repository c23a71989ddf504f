//! Parser contract and shared extraction helpers
//!
//! A parser supplies one compiled pattern and turns each match into at most
//! one candidate. Concrete, language-specific parsers live in locale modules
//! such as [`crate::en`].

use regex::{Captures, Regex};

use crate::calendar::{add_weeks, expand_two_digit_year, iso_week_of, weeks_in_year};
use crate::components::{Field, ParsingComponents};
use crate::context::ParsingContext;
use crate::results::ParsingResult;

/// Tag carried by candidates holding an explicit week number
pub const WEEK_PARSER_TAG: &str = "week-parser";

/// Tag carried by candidates holding a week relative to the reference
pub const RELATIVE_WEEK_PARSER_TAG: &str = "relative-week-parser";

/// A source of candidates
///
/// Implementations must be cheap to share: one parser instance serves every
/// parse call made through a configuration, possibly from many threads.
pub trait Parser: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Pattern scanned over the input text
    fn pattern(&self, context: &ParsingContext<'_>) -> &Regex;

    /// Candidate for one match, or `None` if the match does not hold a valid
    /// date. A rejected span stays available to other parsers.
    fn extract(&self, context: &ParsingContext<'_>, captures: &Captures<'_>)
        -> Option<ParsingResult>;
}

/// Which role a captured number was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberSlot {
    Week,
    Year,
}

/// What a captured number turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numeric {
    Week(u32),
    Year(i32),
}

/// Classify a captured number by magnitude and marker
///
/// - four digits or more (value >= 1000): a year, whatever the slot
/// - apostrophe prefix: a two-digit year
/// - 0..=99 in a year slot: a bare two-digit year (sliding window)
/// - 1..=53 in a week slot: a week number
///
/// Anything else yields `None`.
pub fn classify_number(token: &str, slot: NumberSlot) -> Option<Numeric> {
    let token = token.trim();
    if token.starts_with('\'') || token.starts_with('\u{2019}') {
        return expand_two_digit_year(token).map(Numeric::Year);
    }

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u32 = token.parse().ok()?;

    if value >= 1000 {
        return i32::try_from(value).ok().map(Numeric::Year);
    }

    match slot {
        NumberSlot::Year => expand_two_digit_year(token).map(Numeric::Year),
        NumberSlot::Week if (1..=53).contains(&value) => Some(Numeric::Week(value)),
        NumberSlot::Week => None,
    }
}

/// Record an explicitly stated week on `components`
///
/// The week is known; the week-year is known when the text gave one and is
/// otherwise implied from the reference's own ISO week-year. The hour is
/// marked absent so digits of the week can never resurface as a time, and
/// year/month/day are derived from the Monday of the week.
///
/// Returns `false`, leaving `components` untouched, for weeks outside 1..=53
/// or week 53 of a year that has only 52 weeks.
pub fn assign_week(components: &mut ParsingComponents, week: u32, week_year: Option<i32>) -> bool {
    let reference_week = iso_week_of(components.reference().local().date());
    let year = week_year.unwrap_or(reference_week.week_year);

    if week == 0 || week > weeks_in_year(year) {
        return false;
    }

    components.assign(Field::IsoWeek, week as i32);
    match week_year {
        Some(year) => components.assign(Field::IsoWeekYear, year),
        None => components.imply(Field::IsoWeekYear, reference_week.week_year),
    };
    components.assign_absent(Field::Hour);
    components.sync_date_with_week()
}

/// Record the week `offset` whole weeks away from the reference
///
/// Both week and week-year come from the shifted instant and are known.
pub fn assign_relative_week(components: &mut ParsingComponents, offset: i64) -> bool {
    let Some(shifted) = add_weeks(components.reference().local(), offset) else {
        return false;
    };
    let week = iso_week_of(shifted.date());

    components
        .assign(Field::IsoWeek, week.week as i32)
        .assign(Field::IsoWeekYear, week.week_year)
        .assign_absent(Field::Hour);
    components.sync_date_with_week()
}
