//! Absorb a year written right after a candidate that lacks one

use regex::Regex;

use crate::components::{Field, ParsingComponents};
use crate::context::ParsingContext;
use crate::parsers::{classify_number, NumberSlot, Numeric};
use crate::results::ParsingResult;

use super::Refiner;

/// Turns "March 5" + ", 2024" into one candidate with a known year
///
/// Applies to candidates whose last endpoint knows a month and day, or an ISO
/// week, but no year or week-year. On a range the year goes to the end, and to
/// the start when the start states none; a start that would then fall after
/// the end takes the previous year ("Dec 28 to Jan 3, 2021"). The suffix pattern is anchored at the end of the
/// candidate and must capture the number in a group named `year` or
/// `short_year`; the number is classified as a year (four digits, `'24`, or a
/// bare `24`).
pub struct ExtractYearSuffixRefiner {
    suffix: Regex,
}

impl ExtractYearSuffixRefiner {
    pub fn new(suffix: Regex) -> Self {
        Self { suffix }
    }

    fn extend(
        &self,
        context: &ParsingContext<'_>,
        result: &ParsingResult,
        next_index: Option<usize>,
    ) -> Option<ParsingResult> {
        let last = result.end().unwrap_or(result.start());
        if !lacks_year(last) {
            return None;
        }

        let following = context.text().get(result.end_index()..)?;
        let captures = self.suffix.captures(following)?;
        let matched = captures.get(0)?;
        let suffix_end = result.end_index() + matched.end();

        // Another candidate already claims these characters
        if next_index.is_some_and(|next| next < suffix_end) {
            return None;
        }

        let token = captures.name("year").or_else(|| captures.name("short_year"))?;
        let Numeric::Year(year) = classify_number(token.as_str(), NumberSlot::Year)? else {
            return None;
        };

        let mut extended = result.clone();
        if let Some(end) = extended.end_mut() {
            assign_year(end, year)?;
        }
        let end_at = extended.end().and_then(ParsingComponents::resolve);
        if extended.end().is_none() || lacks_year(extended.start()) {
            assign_year(extended.start_mut(), year)?;
            if end_at.is_some_and(|end_at| extended.start().resolve().is_some_and(|at| at > end_at)) {
                assign_year(extended.start_mut(), year - 1)?;
            }
        }

        if !extended.set_span(context.text(), result.index(), suffix_end) {
            return None;
        }
        Some(extended)
    }
}

/// Whether `components` names a day or week but leaves its year open
fn lacks_year(components: &ParsingComponents) -> bool {
    if components.is_known(Field::IsoWeek) {
        !components.is_known(Field::IsoWeekYear)
    } else {
        components.is_known(Field::Month)
            && components.is_known(Field::Day)
            && !components.is_known(Field::Year)
    }
}

/// Record `year` as the year, or the week-year of a week-based store
fn assign_year(components: &mut ParsingComponents, year: i32) -> Option<()> {
    if components.is_known(Field::IsoWeek) {
        components.assign(Field::IsoWeekYear, year);
        if !components.sync_date_with_week() {
            return None;
        }
    } else {
        components.assign(Field::Year, year);
    }
    components.resolve().map(|_| ())
}

impl Refiner for ExtractYearSuffixRefiner {
    fn name(&self) -> &'static str {
        "ExtractYearSuffixRefiner"
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
                    context.debug(|| format!("extended {:?} to {:?}", result.text(), extended.text()));
                    extended
                }
                None => result,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ParsingComponents;
    use crate::options::ParseOptions;
    use crate::parsers::assign_week;
    use crate::reference::ReferenceInstant;
    use chrono::{TimeZone, Utc};

    fn reference() -> ReferenceInstant {
        ReferenceInstant::utc(Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap())
    }

    fn refiner() -> ExtractYearSuffixRefiner {
        ExtractYearSuffixRefiner::new(
            Regex::new(
                r"^(?:(?:\s*,\s*|\s+)(?P<year>[0-9]{4}|'[0-9]{2})|\s*,\s*(?P<short_year>[0-9]{2}))\b",
            )
            .unwrap(),
        )
    }

    fn month_day(text: &str, len: usize) -> ParsingResult {
        let mut components = ParsingComponents::new(reference());
        components.assign(Field::Month, 3).assign(Field::Day, 5);
        ParsingResult::new(0, &text[..len], components, None)
    }

    #[test]
    fn test_extends_month_day_with_year() {
        let text = "March 5, 2021 works";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let refined = refiner().refine(&context, vec![month_day(text, 7)]);
        assert_eq!(refined[0].text(), "March 5, 2021");
        assert_eq!(refined[0].start().get(Field::Year), Some(2021));
        assert!(refined[0].start().is_known(Field::Year));
    }

    #[test]
    fn test_extends_week_with_apostrophe_year() {
        let text = "wk 52 '20";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let mut components = ParsingComponents::new(reference());
        assert!(assign_week(&mut components, 52, None));
        let candidate = ParsingResult::new(0, "wk 52", components, None);

        let refined = refiner().refine(&context, vec![candidate]);
        let start = refined[0].start();
        assert_eq!(refined[0].text(), text);
        assert_eq!(start.get(Field::IsoWeekYear), Some(2020));
        assert_eq!(start.get(Field::Year), Some(2020));
        assert_eq!(start.get(Field::Month), Some(12));
        assert_eq!(start.get(Field::Day), Some(21));
    }

    fn range(text: &str, start: (i32, i32), end: (i32, i32)) -> ParsingResult {
        let mut from = ParsingComponents::new(reference());
        from.assign(Field::Month, start.0).assign(Field::Day, start.1);
        let mut to = ParsingComponents::new(reference());
        to.assign(Field::Month, end.0).assign(Field::Day, end.1);
        ParsingResult::new(0, text, from, Some(to))
    }

    #[test]
    fn test_extends_range_with_year() {
        let text = "March 5 to March 8, 2021";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let refined = refiner().refine(&context, vec![range(&text[..18], (3, 5), (3, 8))]);
        assert_eq!(refined[0].text(), text);
        assert_eq!(refined[0].start().get(Field::Year), Some(2021));
        assert!(refined[0].start().is_known(Field::Year));
        assert_eq!(refined[0].end().unwrap().get(Field::Year), Some(2021));
    }

    #[test]
    fn test_range_start_takes_previous_year_when_needed() {
        let text = "Dec 28 to Jan 3, 2021";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let refined = refiner().refine(&context, vec![range(&text[..15], (12, 28), (1, 3))]);
        assert_eq!(refined[0].start().get(Field::Year), Some(2020));
        assert_eq!(refined[0].end().unwrap().get(Field::Year), Some(2021));

        // A start that states its own year keeps it
        let mut candidate = range(&text[..15], (12, 28), (1, 3));
        candidate.start_mut().assign(Field::Year, 2019);
        let refined = refiner().refine(&context, vec![candidate]);
        assert_eq!(refined[0].start().get(Field::Year), Some(2019));
        assert_eq!(refined[0].end().unwrap().get(Field::Year), Some(2021));
    }

    #[test]
    fn test_leaves_candidates_with_year_alone() {
        let text = "March 5 2021";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let mut candidate = month_day(text, 7);
        candidate.start_mut().assign(Field::Year, 2019);
        let refined = refiner().refine(&context, vec![candidate]);
        assert_eq!(refined[0].text(), "March 5");
        assert_eq!(refined[0].start().get(Field::Year), Some(2019));
    }

    #[test]
    fn test_does_not_steal_from_next_candidate() {
        let text = "March 5 2021-04-01";
        let options = ParseOptions::default();
        let context = ParsingContext::new(text, reference(), &options);

        let mut next = ParsingComponents::new(reference());
        next.assign(Field::Year, 2021);
        let results = vec![
            month_day(text, 7),
            ParsingResult::new(8, &text[8..], next, None),
        ];
        let refined = refiner().refine(&context, results);
        assert_eq!(refined[0].text(), "March 5");
        assert_eq!(refined.len(), 2);
    }
}
