//! Merge two candidates joined by a range connector into one range

use regex::Regex;

use crate::components::{Field, ParsingComponents};
use crate::context::ParsingContext;
use crate::results::ParsingResult;

use super::{merge_adjacent, Refiner};

/// Combines "Week 45" + "to" + "Week 48" into one candidate with an end
///
/// The earlier endpoint becomes the start. A year (or ISO week-year) stated on
/// only one endpoint is copied to the other. A matching prefix such as "from"
/// directly before the first endpoint is absorbed into the span.
pub struct MergeDateRangeRefiner {
    connector: Regex,
    prefix: Regex,
    prefixed_connector: Regex,
}

impl MergeDateRangeRefiner {
    /// - `connector`: whole text between the endpoints, e.g. `^\s*to\s*$`
    /// - `prefix`: text ending right before the first endpoint, e.g. `from\s*$`
    /// - `prefixed_connector`: connectors accepted only after a prefix,
    ///   e.g. "and" after "between"
    pub fn new(connector: Regex, prefix: Regex, prefixed_connector: Regex) -> Self {
        Self {
            connector,
            prefix,
            prefixed_connector,
        }
    }

    fn prefix_start(&self, context: &ParsingContext<'_>, first: &ParsingResult) -> Option<usize> {
        let before = context.text().get(..first.index())?;
        self.prefix.find(before).map(|m| m.start())
    }

    fn accepts(&self, context: &ParsingContext<'_>, between: &str, first: &ParsingResult) -> bool {
        self.connector.is_match(between)
            || (self.prefixed_connector.is_match(between)
                && self.prefix_start(context, first).is_some())
    }

    fn merge(
        &self,
        context: &ParsingContext<'_>,
        first: &ParsingResult,
        second: &ParsingResult,
    ) -> Option<ParsingResult> {
        let mut start = first.start().clone();
        let mut end = second.start().clone();

        share_year(&mut start, &end)?;
        share_year(&mut end, &start)?;

        if let (Some(a), Some(b)) = (start.resolve(), end.resolve()) {
            if a > b {
                std::mem::swap(&mut start, &mut end);
            }
        }

        let index = self.prefix_start(context, first).unwrap_or(first.index());
        let mut merged = first.clone();
        *merged.start_mut() = start;
        merged.set_end(Some(end));

        if !merged.set_span(context.text(), index, second.end_index()) {
            return None;
        }
        Some(merged)
    }
}

/// Copy a year stated on `from` onto `to` when `to` lacks one
///
/// Week-based stores take the week-year, calendar stores the year. Fails when
/// the copied week-year makes `to` invalid (week 53 of a 52-week year).
fn share_year(to: &mut ParsingComponents, from: &ParsingComponents) -> Option<()> {
    if to.is_week_based() {
        if !to.is_known(Field::IsoWeekYear) && from.is_known(Field::IsoWeekYear) {
            to.assign(Field::IsoWeekYear, from.get(Field::IsoWeekYear)?);
            if !to.sync_date_with_week() {
                return None;
            }
        }
    } else if !to.is_known(Field::Year) && from.is_known(Field::Year) && !from.is_week_based() {
        to.assign(Field::Year, from.get(Field::Year)?);
    }
    Some(())
}

impl Refiner for MergeDateRangeRefiner {
    fn name(&self) -> &'static str {
        "MergeDateRangeRefiner"
    }

    fn refine(
        &self,
        context: &ParsingContext<'_>,
        results: Vec<ParsingResult>,
    ) -> Vec<ParsingResult> {
        merge_adjacent(
            context,
            results,
            |between, first, second| {
                first.end().is_none() && second.end().is_none() && self.accepts(context, between, first)
            },
            |first, second| self.merge(context, first, second),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParseOptions;
    use crate::parsers::assign_week;
    use crate::reference::ReferenceInstant;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn reference() -> ReferenceInstant {
        ReferenceInstant::utc(Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap())
    }

    fn week(text: &str, index: usize, len: usize, week: u32, year: Option<i32>) -> ParsingResult {
        let mut components = ParsingComponents::new(reference());
        assert!(assign_week(&mut components, week, year));
        ParsingResult::new(index, &text[index..index + len], components, None)
    }

    fn refiner() -> MergeDateRangeRefiner {
        MergeDateRangeRefiner::new(
            Regex::new(r"(?i)^\s*(?:to|until|-)\s*$").unwrap(),
            Regex::new(r"(?i)\b(?:from|between)\s+$").unwrap(),
            Regex::new(r"(?i)^\s*and\s*$").unwrap(),
        )
    }

    #[test]
    fn test_merges_range_and_absorbs_prefix() {
        let text = "from Week 45 to Week 48";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let results = vec![week(text, 5, 7, 45, None), week(text, 16, 7, 48, None)];
        let merged = refiner().refine(&context, results);

        assert_eq!(merged.len(), 1);
        let range = &merged[0];
        assert_eq!(range.index(), 0);
        assert_eq!(range.text(), text);
        assert_eq!(range.start().get(Field::IsoWeek), Some(45));
        assert_eq!(range.end().unwrap().get(Field::IsoWeek), Some(48));
    }

    #[test]
    fn test_swaps_reversed_endpoints() {
        let text = "Week 48 - Week 45";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let results = vec![week(text, 0, 7, 48, None), week(text, 10, 7, 45, None)];
        let merged = refiner().refine(&context, results);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].start().get(Field::IsoWeek), Some(45));
        assert_eq!(merged[0].end().unwrap().get(Field::IsoWeek), Some(48));
    }

    #[test]
    fn test_copies_week_year_between_endpoints() {
        let text = "Week 45 to Week 48 2020";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let results = vec![week(text, 0, 7, 45, None), week(text, 11, 12, 48, Some(2020))];
        let merged = refiner().refine(&context, results);

        let start = merged[0].start();
        assert!(start.is_known(Field::IsoWeekYear));
        assert_eq!(start.get(Field::IsoWeekYear), Some(2020));
        assert_eq!(start.resolve().unwrap().date_naive(), NaiveDate::from_ymd_opt(2020, 11, 2).unwrap());
    }

    #[test]
    fn test_and_requires_between() {
        let options = ParseOptions::default();

        let text = "between Week 1 and Week 2";
        let context = ParsingContext::new(text, reference(), &options);
        let results = vec![week(text, 8, 6, 1, None), week(text, 19, 6, 2, None)];
        let merged = refiner().refine(&context, results);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text(), text);

        let text = "Week 1 and Week 2";
        let context = ParsingContext::new(text, reference(), &options);
        let results = vec![week(text, 0, 6, 1, None), week(text, 11, 6, 2, None)];
        assert_eq!(refiner().refine(&context, results).len(), 2);
    }
}
