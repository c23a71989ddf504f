//! Drop candidates that are unlikely to be dates at all

use crate::context::ParsingContext;
use crate::results::ParsingResult;

use super::Refiner;

/// Removes candidates with blank text, with no known field, or whose text is
/// a bare number
#[derive(Debug, Default)]
pub struct UnlikelyFormatFilter;

impl UnlikelyFormatFilter {
    pub fn new() -> Self {
        Self
    }

    fn is_unlikely(result: &ParsingResult) -> bool {
        let text = result.text().trim();
        if text.is_empty() {
            return true;
        }
        if text.bytes().all(|b| b.is_ascii_digit()) {
            return true;
        }
        let known = result.start().known_count() + result.end().map_or(0, |end| end.known_count());
        known == 0
    }
}

impl Refiner for UnlikelyFormatFilter {
    fn name(&self) -> &'static str {
        "UnlikelyFormatFilter"
    }

    fn refine(
        &self,
        context: &ParsingContext<'_>,
        results: Vec<ParsingResult>,
    ) -> Vec<ParsingResult> {
        results
            .into_iter()
            .filter(|result| {
                let unlikely = Self::is_unlikely(result);
                if unlikely {
                    context.debug(|| format!("dropped unlikely candidate {:?}", result.text()));
                }
                !unlikely
            })
            .collect()
    }
}
