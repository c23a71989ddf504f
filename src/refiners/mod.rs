//! Refiner contract and the generic refiners
//!
//! A refiner is one stage of the pipeline run after all parsers: it takes the
//! candidate list produced by the previous stage and returns a new one.
//! Stages never see candidates an earlier stage dropped.

pub mod forward_date;
pub mod merge_date_time;
pub mod merge_range;
pub mod prioritize;
pub mod timezone;
pub mod unlikely_format;
pub mod year_suffix;

pub use forward_date::ForwardDateRefiner;
pub use merge_date_time::MergeDateTimeRefiner;
pub use merge_range::MergeDateRangeRefiner;
pub use prioritize::{PrioritizeSpecificRefiner, PrioritizeTaggedRefiner};
pub use timezone::ExtractTimezoneRefiner;
pub use unlikely_format::UnlikelyFormatFilter;
pub use year_suffix::ExtractYearSuffixRefiner;

use crate::context::ParsingContext;
use crate::results::ParsingResult;

/// One stage of the refiner pipeline
pub trait Refiner: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn refine(&self, context: &ParsingContext<'_>, results: Vec<ParsingResult>)
        -> Vec<ParsingResult>;
}

/// Fold neighbouring candidates pairwise
///
/// Walks the (index-ordered) list keeping a running candidate. When the text
/// strictly between the running candidate and the next one satisfies
/// `should_merge`, `merge` may replace both by a single candidate, which then
/// becomes the running one.
pub(crate) fn merge_adjacent<S, M>(
    context: &ParsingContext<'_>,
    results: Vec<ParsingResult>,
    should_merge: S,
    merge: M,
) -> Vec<ParsingResult>
where
    S: Fn(&str, &ParsingResult, &ParsingResult) -> bool,
    M: Fn(&ParsingResult, &ParsingResult) -> Option<ParsingResult>,
{
    let mut merged = Vec::with_capacity(results.len());
    let mut results = results.into_iter();
    let Some(mut current) = results.next() else {
        return merged;
    };

    for next in results {
        let between = context.text().get(current.end_index()..next.index());
        let combined = between
            .filter(|between| should_merge(between, &current, &next))
            .and_then(|_| merge(&current, &next));

        match combined {
            Some(combined) => {
                context.debug(|| {
                    format!(
                        "merged {:?} and {:?} into {:?}",
                        current.text(),
                        next.text(),
                        combined.text()
                    )
                });
                current = combined;
            }
            None => {
                merged.push(std::mem::replace(&mut current, next));
            }
        }
    }

    merged.push(current);
    merged
}
