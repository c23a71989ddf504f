//! Candidates and the public result records they turn into
//!
//! A [`ParsingResult`] is a mutable, in-progress candidate owned by the parse
//! pipeline. Survivors of the refiners become immutable [`ParsedResult`]s.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::calendar::{iso_week_of, IsoWeek};
use crate::components::{Field, FieldState, ParsingComponents};
use crate::reference::ReferenceInstant;

/// A candidate: a text span plus start (and optional end) components
#[derive(Debug, Clone)]
pub struct ParsingResult {
    index: usize,
    text: String,
    start: ParsingComponents,
    end: Option<ParsingComponents>,
}

impl ParsingResult {
    pub fn new(
        index: usize,
        text: &str,
        start: ParsingComponents,
        end: Option<ParsingComponents>,
    ) -> Self {
        Self {
            index,
            text: text.to_string(),
            start,
            end,
        }
    }

    /// Byte offset of the span in the input text
    pub fn index(&self) -> usize {
        self.index
    }

    /// Byte offset just past the span
    pub fn end_index(&self) -> usize {
        self.index + self.text.len()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Move the span to `input[index..end_index]`
    ///
    /// Out-of-range or non-boundary offsets leave the span unchanged and
    /// return `false`.
    pub fn set_span(&mut self, input: &str, index: usize, end_index: usize) -> bool {
        match input.get(index..end_index) {
            Some(text) => {
                self.index = index;
                self.text = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn start(&self) -> &ParsingComponents {
        &self.start
    }

    pub fn start_mut(&mut self) -> &mut ParsingComponents {
        &mut self.start
    }

    pub fn end(&self) -> Option<&ParsingComponents> {
        self.end.as_ref()
    }

    pub fn end_mut(&mut self) -> Option<&mut ParsingComponents> {
        self.end.as_mut()
    }

    pub fn set_end(&mut self, end: Option<ParsingComponents>) {
        self.end = end;
    }

    /// Start and end components, for edits that apply to both endpoints
    pub fn components_mut(&mut self) -> impl Iterator<Item = &mut ParsingComponents> {
        std::iter::once(&mut self.start).chain(self.end.as_mut())
    }

    pub fn into_parts(self) -> (usize, String, ParsingComponents, Option<ParsingComponents>) {
        (self.index, self.text, self.start, self.end)
    }

    /// Tags of both endpoints
    pub fn tags(&self) -> BTreeSet<String> {
        let mut tags = self.start.tags().clone();
        if let Some(end) = &self.end {
            tags.extend(end.tags().iter().cloned());
        }
        tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.start.has_tag(tag) || self.end.as_ref().is_some_and(|end| end.has_tag(tag))
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: &ParsingResult) -> bool {
        self.index < other.end_index() && other.index < self.end_index()
    }

    /// Resolve both endpoints into a public record
    ///
    /// Returns `None` when either endpoint does not resolve to an instant.
    pub fn into_parsed(self) -> Option<ParsedResult> {
        let start = ParsedComponents::from_components(&self.start)?;
        let end = match &self.end {
            Some(end) => Some(ParsedComponents::from_components(end)?),
            None => None,
        };

        Some(ParsedResult {
            reference: *self.start.reference(),
            tags: self.tags(),
            index: self.index,
            text: self.text,
            start,
            end,
        })
    }
}

/// Immutable, resolved endpoint of a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComponents {
    instant: DateTime<FixedOffset>,
    fields: BTreeMap<Field, FieldState>,
}

impl ParsedComponents {
    fn from_components(components: &ParsingComponents) -> Option<Self> {
        Some(Self {
            instant: components.resolve()?,
            fields: components.fields().collect(),
        })
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.instant
    }

    /// Calendar date of the instant in its own offset
    pub fn date(&self) -> NaiveDate {
        self.instant.date_naive()
    }

    /// Known value, else implied value, else `None`
    pub fn get(&self, field: Field) -> Option<i32> {
        self.fields.get(&field).and_then(FieldState::value)
    }

    pub fn is_known(&self, field: Field) -> bool {
        matches!(self.fields.get(&field), Some(FieldState::Known(_)))
    }

    pub fn is_absent(&self, field: Field) -> bool {
        matches!(self.fields.get(&field), Some(FieldState::Absent))
    }

    /// Copy of the known values
    pub fn known(&self) -> BTreeMap<Field, i32> {
        self.fields
            .iter()
            .filter_map(|(field, state)| match state {
                FieldState::Known(value) => Some((*field, *value)),
                _ => None,
            })
            .collect()
    }

    /// Copy of the implied values
    pub fn implied(&self) -> BTreeMap<Field, i32> {
        self.fields
            .iter()
            .filter_map(|(field, state)| match state {
                FieldState::Implied(value) => Some((*field, *value)),
                _ => None,
            })
            .collect()
    }

    /// ISO week of this endpoint
    ///
    /// A known week is reported as stated; otherwise the week is derived from
    /// the year/month/day fields. The implied week fields seeded from the
    /// reference are never used for dates that did not state a week.
    pub fn iso_week(&self) -> IsoWeek {
        if let (Some(FieldState::Known(week)), Some(week_year)) = (
            self.fields.get(&Field::IsoWeek),
            self.get(Field::IsoWeekYear),
        ) {
            if let Ok(week) = u32::try_from(*week) {
                return IsoWeek::new(week, week_year);
            }
        }

        iso_week_of(self.calendar_date())
    }

    pub fn iso_week_year(&self) -> i32 {
        self.iso_week().week_year
    }

    /// Monday of the ISO week
    pub fn week_monday(&self) -> Option<NaiveDate> {
        self.iso_week().monday()
    }

    /// Sunday of the ISO week
    pub fn week_sunday(&self) -> Option<NaiveDate> {
        self.iso_week().sunday()
    }

    fn calendar_date(&self) -> NaiveDate {
        let fields = (
            self.get(Field::Year),
            self.get(Field::Month).and_then(|m| u32::try_from(m).ok()),
            self.get(Field::Day).and_then(|d| u32::try_from(d).ok()),
        );

        match fields {
            (Some(year), Some(month), Some(day)) => {
                NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| self.date())
            }
            _ => self.date(),
        }
    }
}

/// A date (or date range) found in the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResult {
    index: usize,
    text: String,
    start: ParsedComponents,
    end: Option<ParsedComponents>,
    tags: BTreeSet<String>,
    reference: ReferenceInstant,
}

impl ParsedResult {
    /// Byte offset of the match in the input text
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> &ParsedComponents {
        &self.start
    }

    pub fn end(&self) -> Option<&ParsedComponents> {
        self.end.as_ref()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn reference(&self) -> &ReferenceInstant {
        &self.reference
    }
}
