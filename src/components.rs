//! Per-field date/time state for one candidate
//!
//! Every [`Field`] is either unset, implied (a default, usually taken from the
//! reference instant), known (stated by the text), or explicitly absent (barred
//! from inference). A known value always shadows an implied one, and absence
//! survives later attempts to imply the field.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime};

use crate::calendar::{iso_week_of, week_start, weeks_in_year, IsoWeek};
use crate::reference::ReferenceInstant;

/// Semantic date/time slots a candidate can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    /// ISO numbering: 1 = Monday .. 7 = Sunday
    Weekday,
    /// 24-hour clock
    Hour,
    Minute,
    Second,
    Millisecond,
    /// 0 = AM, 1 = PM
    Meridiem,
    /// Minutes east of UTC
    TimezoneOffset,
    IsoWeek,
    IsoWeekYear,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Weekday,
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::Millisecond,
        Field::Meridiem,
        Field::TimezoneOffset,
        Field::IsoWeek,
        Field::IsoWeekYear,
    ];

    /// Fields that place a candidate on the calendar
    pub const DATE: [Field; 6] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Weekday,
        Field::IsoWeek,
        Field::IsoWeekYear,
    ];

    /// Fields that place a candidate within a day
    pub const TIME: [Field; 6] = [
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::Millisecond,
        Field::Meridiem,
        Field::TimezoneOffset,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Weekday => "weekday",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Millisecond => "millisecond",
            Field::Meridiem => "meridiem",
            Field::TimezoneOffset => "timezone_offset",
            Field::IsoWeek => "iso_week",
            Field::IsoWeekYear => "iso_week_year",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State of a single field
///
/// A field missing from the store is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Implied(i32),
    Known(i32),
    /// Never infer this field
    Absent,
}

impl FieldState {
    pub fn value(&self) -> Option<i32> {
        match self {
            FieldState::Implied(value) | FieldState::Known(value) => Some(*value),
            FieldState::Absent => None,
        }
    }
}

/// Known/implied field values for one endpoint of a candidate
#[derive(Debug, Clone)]
pub struct ParsingComponents {
    reference: ReferenceInstant,
    fields: BTreeMap<Field, FieldState>,
    tags: BTreeSet<String>,
}

impl ParsingComponents {
    /// Store seeded from the reference instant
    ///
    /// Calendar fields are implied from the reference's local date with the
    /// time at noon. The ISO week fields are implied from the same date through
    /// the ISO week algorithm, never from the calendar year.
    pub fn new(reference: ReferenceInstant) -> Self {
        let local = reference.local();
        let week = iso_week_of(local.date());

        let mut components = Self {
            reference,
            fields: BTreeMap::new(),
            tags: BTreeSet::new(),
        };
        components
            .imply(Field::Year, local.year())
            .imply(Field::Month, local.month() as i32)
            .imply(Field::Day, local.day() as i32)
            .imply(Field::Hour, 12)
            .imply(Field::Minute, 0)
            .imply(Field::Second, 0)
            .imply(Field::Millisecond, 0)
            .imply(Field::IsoWeek, week.week as i32)
            .imply(Field::IsoWeekYear, week.week_year);
        components
    }

    pub fn reference(&self) -> &ReferenceInstant {
        &self.reference
    }

    /// Set a known value, replacing whatever the field held
    pub fn assign(&mut self, field: Field, value: i32) -> &mut Self {
        self.fields.insert(field, FieldState::Known(value));
        self
    }

    /// Set an implied value unless the field is known or absent
    pub fn imply(&mut self, field: Field, value: i32) -> &mut Self {
        match self.fields.get(&field) {
            Some(FieldState::Known(_)) | Some(FieldState::Absent) => {}
            _ => {
                self.fields.insert(field, FieldState::Implied(value));
            }
        }
        self
    }

    /// Bar the field from inference until a known value is assigned
    pub fn assign_absent(&mut self, field: Field) -> &mut Self {
        self.fields.insert(field, FieldState::Absent);
        self
    }

    /// Turn an implied value into a known one
    pub fn promote(&mut self, field: Field) -> &mut Self {
        if let Some(FieldState::Implied(value)) = self.fields.get(&field).copied() {
            self.fields.insert(field, FieldState::Known(value));
        }
        self
    }

    /// Known value, else implied value, else `None`
    pub fn get(&self, field: Field) -> Option<i32> {
        self.fields.get(&field).and_then(FieldState::value)
    }

    pub fn state(&self, field: Field) -> Option<FieldState> {
        self.fields.get(&field).copied()
    }

    pub fn is_known(&self, field: Field) -> bool {
        matches!(self.fields.get(&field), Some(FieldState::Known(_)))
    }

    pub fn is_absent(&self, field: Field) -> bool {
        matches!(self.fields.get(&field), Some(FieldState::Absent))
    }

    /// All fields in their current state
    pub fn fields(&self) -> impl Iterator<Item = (Field, FieldState)> + '_ {
        self.fields.iter().map(|(field, state)| (*field, *state))
    }

    pub fn known_count(&self) -> usize {
        self.fields
            .values()
            .filter(|state| matches!(state, FieldState::Known(_)))
            .count()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn add_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn assign_date(&mut self, date: NaiveDate) -> &mut Self {
        self.assign(Field::Year, date.year())
            .assign(Field::Month, date.month() as i32)
            .assign(Field::Day, date.day() as i32)
    }

    pub fn imply_date(&mut self, date: NaiveDate) -> &mut Self {
        self.imply(Field::Year, date.year())
            .imply(Field::Month, date.month() as i32)
            .imply(Field::Day, date.day() as i32)
    }

    /// Whether some date field is known and no time field is
    pub fn is_date_only(&self) -> bool {
        Field::DATE.iter().any(|f| self.is_known(*f))
            && !Field::TIME.iter().any(|f| self.is_known(*f))
    }

    /// Whether the hour is known and no date field is
    pub fn is_time_only(&self) -> bool {
        self.is_known(Field::Hour) && !Field::DATE.iter().any(|f| self.is_known(*f))
    }

    /// Whether an explicitly stated week drives resolution
    pub fn is_week_based(&self) -> bool {
        self.is_known(Field::IsoWeek) || self.is_known(Field::IsoWeekYear)
    }

    /// Week fields as currently held, known or implied
    pub fn iso_week(&self) -> Option<IsoWeek> {
        let week = u32::try_from(self.get(Field::IsoWeek)?).ok()?;
        Some(IsoWeek::new(week, self.get(Field::IsoWeekYear)?))
    }

    /// Re-derive known year/month/day from the week fields
    ///
    /// No-op for stores that are not week based. Returns `false`, leaving the
    /// store untouched, if the week does not exist in its week-year.
    pub fn sync_date_with_week(&mut self) -> bool {
        if !self.is_week_based() {
            return true;
        }

        match self.week_date() {
            Some(date) => {
                self.assign_date(date);
                true
            }
            None => false,
        }
    }

    /// Resolve the store to an instant
    ///
    /// A known week or week-year takes precedence over year/month/day. Unset
    /// fields fall back to the reference date and noon. Contradictory or
    /// out-of-range fields resolve to `None`.
    pub fn resolve(&self) -> Option<DateTime<FixedOffset>> {
        let local = self.local_date_time()?;
        self.reference
            .localize(local, self.get(Field::TimezoneOffset))
    }

    /// Wall-clock date and time described by the store
    pub fn local_date_time(&self) -> Option<NaiveDateTime> {
        let date = if self.is_week_based() {
            self.week_date()?
        } else {
            self.calendar_date()?
        };

        let hour = field_u32(self.get(Field::Hour).unwrap_or(12))?;
        let minute = field_u32(self.get(Field::Minute).unwrap_or(0))?;
        let second = field_u32(self.get(Field::Second).unwrap_or(0))?;
        let millisecond = field_u32(self.get(Field::Millisecond).unwrap_or(0))?;

        date.and_hms_milli_opt(hour, minute, second, millisecond)
    }

    fn calendar_date(&self) -> Option<NaiveDate> {
        let fallback = self.reference.local();
        let year = self.get(Field::Year).unwrap_or(fallback.year());
        let month = self.get(Field::Month).map_or(Some(fallback.month()), field_u32)?;
        let day = self.get(Field::Day).map_or(Some(fallback.day()), field_u32)?;

        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn week_date(&self) -> Option<NaiveDate> {
        let fallback = iso_week_of(self.reference.local().date());
        let week = self
            .get(Field::IsoWeek)
            .map_or(Some(fallback.week), field_u32)?;
        let week_year = self.get(Field::IsoWeekYear).unwrap_or(fallback.week_year);

        if week == 0 || week > weeks_in_year(week_year) {
            return None;
        }

        let monday = week_start(week, week_year)?;
        match self.get(Field::Weekday) {
            Some(weekday @ 1..=7) => monday.checked_add_days(Days::new((weekday - 1) as u64)),
            Some(_) => None,
            None => Some(monday),
        }
    }

    /// Copy the known time fields of `other` as known values
    pub fn assign_time_from(&mut self, other: &ParsingComponents) -> &mut Self {
        for field in Field::TIME {
            if let Some(FieldState::Known(value)) = other.state(field) {
                self.assign(field, value);
            }
        }
        self
    }
}

fn field_u32(value: i32) -> Option<u32> {
    u32::try_from(value).ok()
}
