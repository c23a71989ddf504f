//! Push past candidates to their next occurrence

use chrono::{Days, NaiveDate};

use crate::components::{Field, ParsingComponents};
use crate::context::ParsingContext;
use crate::results::ParsingResult;

use super::Refiner;

/// Moves candidates that lie wholly before the reference to the future
///
/// A week counts as past only once its Sunday is over, and a date without a
/// time only once its day is over. Only active when [`crate::ParseOptions::forward_date`] is set, and only
/// for candidates whose text left the year open:
/// - a week without a stated week-year moves to the same week next year
/// - a month/day without a stated year moves to next year
/// - a bare time moves to the next day
///
/// A shift that would leave the candidate unresolvable (week 53 of a year
/// without one, 29 February) is not applied.
#[derive(Debug, Default)]
pub struct ForwardDateRefiner;

impl ForwardDateRefiner {
    pub fn new() -> Self {
        Self
    }

    /// Whether the whole span named by `components` ends before the reference
    fn is_past(components: &ParsingComponents) -> Option<bool> {
        let today = components.reference().local().date();
        if components.is_known(Field::IsoWeek) {
            return Some(components.iso_week()?.sunday()? < today);
        }
        if components.is_date_only() {
            return Some(components.local_date_time()?.date() < today);
        }
        Some(components.resolve()? < components.reference().instant())
    }

    fn forward(components: &ParsingComponents) -> Option<ParsingComponents> {
        if !Self::is_past(components)? {
            return None;
        }

        let mut shifted = components.clone();
        if components.is_known(Field::IsoWeek) {
            if components.is_known(Field::IsoWeekYear) {
                return None;
            }
            let week_year = components.get(Field::IsoWeekYear)?;
            shifted.imply(Field::IsoWeekYear, week_year + 1);
            if !shifted.sync_date_with_week() {
                return None;
            }
        } else if components.is_known(Field::Month) {
            if components.is_known(Field::Year) {
                return None;
            }
            let year = components.get(Field::Year)?;
            shifted.imply(Field::Year, year + 1);
        } else if components.is_time_only() {
            let local = components.reference().local().date();
            let tomorrow: NaiveDate = local.checked_add_days(Days::new(1))?;
            shifted.imply_date(tomorrow);
        } else {
            return None;
        }

        shifted.resolve()?;
        Some(shifted)
    }
}

impl Refiner for ForwardDateRefiner {
    fn name(&self) -> &'static str {
        "ForwardDateRefiner"
    }

    fn refine(
        &self,
        context: &ParsingContext<'_>,
        results: Vec<ParsingResult>,
    ) -> Vec<ParsingResult> {
        if !context.options().forward_date {
            return results;
        }

        results
            .into_iter()
            .map(|mut result| {
                // Ranges move as a whole or not at all
                if let Some(start) = Self::forward(result.start()) {
                    let end = match result.end() {
                        Some(end) => match Self::forward(end) {
                            Some(end) => Some(end),
                            None => return result,
                        },
                        None => None,
                    };
                    context.debug(|| format!("moved {:?} forward", result.text()));
                    *result.start_mut() = start;
                    result.set_end(end);
                }
                result
            })
            .collect()
    }
}
