//! Merge a date-only candidate with an adjacent time-only candidate

use regex::Regex;

use crate::context::ParsingContext;
use crate::results::ParsingResult;

use super::{merge_adjacent, Refiner};

/// Combines "2024-01-15" + "at 10:30" (or "10:30" + "on 2024-01-15")
///
/// The merged candidate keeps the date candidate's fields, takes the time
/// candidate's known time fields as known, and spans both.
pub struct MergeDateTimeRefiner {
    connector: Regex,
    allow_time_first: bool,
}

impl MergeDateTimeRefiner {
    /// `connector` must match the whole text between the two candidates
    pub fn new(connector: Regex, allow_time_first: bool) -> Self {
        Self {
            connector,
            allow_time_first,
        }
    }

    fn pair<'r>(
        &self,
        first: &'r ParsingResult,
        second: &'r ParsingResult,
    ) -> Option<(&'r ParsingResult, &'r ParsingResult)> {
        if first.end().is_some() || second.end().is_some() {
            return None;
        }

        if first.start().is_date_only() && second.start().is_time_only() {
            Some((first, second))
        } else if self.allow_time_first
            && first.start().is_time_only()
            && second.start().is_date_only()
        {
            Some((second, first))
        } else {
            None
        }
    }
}

impl Refiner for MergeDateTimeRefiner {
    fn name(&self) -> &'static str {
        "MergeDateTimeRefiner"
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
                self.connector.is_match(between) && self.pair(first, second).is_some()
            },
            |first, second| {
                let (date, time) = self.pair(first, second)?;

                let mut merged = date.clone();
                merged
                    .start_mut()
                    .assign_time_from(time.start())
                    .add_tags(time.start().tags().iter().cloned());

                if !merged.set_span(context.text(), first.index(), second.end_index()) {
                    return None;
                }
                Some(merged)
            },
        )
    }
}
