//! Parse pipeline: parsers scan the text, refiners reconcile the candidates
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use datewise::{en, Field, ParseOptions, ReferenceInstant};
//!
//! let reference = ReferenceInstant::utc(Utc.with_ymd_and_hms(2023, 1, 15, 9, 0, 0).unwrap());
//! let results = en::casual().parse("the week before last", reference, &ParseOptions::default());
//!
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].start().get(Field::IsoWeek), Some(52));
//! assert_eq!(results[0].start().iso_week().week_year, 2022);
//! ```

use chrono::{DateTime, FixedOffset};

use crate::context::ParsingContext;
use crate::options::ParseOptions;
use crate::parsers::Parser;
use crate::reference::ReferenceInstant;
use crate::refiners::Refiner;
use crate::results::{ParsedResult, ParsingResult};

/// Ordered parsers and refiners for one locale
///
/// Built once and never mutated afterwards; shared freely between threads.
#[derive(Default)]
pub struct Configuration {
    parsers: Vec<Box<dyn Parser>>,
    refiners: Vec<Box<dyn Refiner>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    pub fn with_refiner(mut self, refiner: impl Refiner + 'static) -> Self {
        self.refiners.push(Box::new(refiner));
        self
    }

    pub fn parsers(&self) -> &[Box<dyn Parser>] {
        &self.parsers
    }

    pub fn refiners(&self) -> &[Box<dyn Refiner>] {
        &self.refiners
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("parsers", &self.parsers.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("refiners", &self.refiners.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Runs a [`Configuration`] over input text
#[derive(Debug)]
pub struct Extractor {
    configuration: Configuration,
}

impl Extractor {
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Find every date expression in `text`, in order of appearance
    ///
    /// Never fails: text without dates, matches that do not hold a valid
    /// date, and candidates that cannot be resolved all just yield fewer
    /// results.
    pub fn parse(
        &self,
        text: &str,
        reference: ReferenceInstant,
        options: &ParseOptions,
    ) -> Vec<ParsedResult> {
        let context = ParsingContext::new(text, reference, options);

        let mut results = Vec::new();
        for parser in self.configuration.parsers() {
            scan(&context, parser.as_ref(), &mut results);
        }
        results.sort_by_key(ParsingResult::index);

        for refiner in self.configuration.refiners() {
            let before = results.len();
            results = refiner.refine(&context, results);
            tracing::trace!(
                refiner = refiner.name(),
                before,
                after = results.len(),
                "refiner applied"
            );
        }
        results.sort_by_key(ParsingResult::index);

        results
            .into_iter()
            .filter_map(|result| {
                let text = result.text().to_string();
                let parsed = result.into_parsed();
                if parsed.is_none() {
                    tracing::debug!(text = %text, "dropping unresolvable candidate");
                    context.debug(|| format!("dropped unresolvable candidate {:?}", text));
                }
                parsed
            })
            .collect()
    }

    /// Start instant of the first date expression in `text`
    pub fn parse_date(
        &self,
        text: &str,
        reference: ReferenceInstant,
        options: &ParseOptions,
    ) -> Option<DateTime<FixedOffset>> {
        self.parse(text, reference, options)
            .first()
            .map(|result| result.start().instant())
    }
}

/// Run one parser over the whole text
///
/// After a successful extraction the search resumes at the end of the match;
/// after a rejected one it resumes one character past the match start, so a
/// shorter alternative of the same pattern can still claim part of the span.
fn scan(context: &ParsingContext<'_>, parser: &dyn Parser, results: &mut Vec<ParsingResult>) {
    let text = context.text();
    let pattern = parser.pattern(context);
    let mut cursor = 0;

    while cursor <= text.len() {
        let Some(captures) = pattern.captures_at(text, cursor) else {
            break;
        };
        let Some(matched) = captures.get(0) else {
            break;
        };

        match parser.extract(context, &captures) {
            Some(result) => {
                tracing::trace!(
                    parser = parser.name(),
                    index = result.index(),
                    text = result.text(),
                    "extracted candidate"
                );
                context.debug(|| format!("{} extracted {:?}", parser.name(), result.text()));
                results.push(result);
                cursor = if matched.end() > matched.start() {
                    matched.end()
                } else {
                    next_boundary(text, matched.start())
                };
            }
            None => {
                tracing::trace!(
                    parser = parser.name(),
                    index = matched.start(),
                    text = matched.as_str(),
                    "match rejected"
                );
                cursor = next_boundary(text, matched.start());
            }
        }
    }
}

/// Byte offset of the character after the one starting at `index`
fn next_boundary(text: &str, index: usize) -> usize {
    text[index..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| index + c.len_utf8())
}
