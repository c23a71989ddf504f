//! Datewise Library
//!
//! Finds dates, times and ISO weeks in free-form English text.
//! This library provides:
//! - ISO 8601 week-date arithmetic
//! - Per-field known/implied/absent date components
//! - A pluggable parser and refiner pipeline
//! - English parsers for weeks, relative weeks, dates and times
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use datewise::{Field, ReferenceInstant};
//!
//! let reference = ReferenceInstant::utc(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
//! let results = datewise::parse("Sprint review in Week 15 at 10:30", reference);
//!
//! assert_eq!(results.len(), 1);
//! let start = results[0].start();
//! assert_eq!(start.get(Field::IsoWeek), Some(15));
//! assert_eq!(start.get(Field::Hour), Some(10));
//! assert_eq!(start.date(), NaiveDate::from_ymd_opt(2024, 4, 8).unwrap());
//! ```

pub mod calendar;
pub mod components;
pub mod context;
pub mod en;
pub mod engine;
pub mod error;
pub mod options;
pub mod parsers;
pub mod reference;
pub mod refiners;
pub mod results;

use chrono::{DateTime, FixedOffset};

// Re-export commonly used items
pub use calendar::IsoWeek;
pub use components::{Field, FieldState, ParsingComponents};
pub use context::ParsingContext;
pub use engine::{Configuration, Extractor};
pub use error::{Error, Result};
pub use options::{DebugSink, ParseOptions};
pub use parsers::Parser;
pub use reference::{ReferenceInstant, TimezoneSpec, Zone};
pub use refiners::Refiner;
pub use results::{ParsedComponents, ParsedResult, ParsingResult};

/// Parse `text` with the English configuration and default options
pub fn parse(text: &str, reference: ReferenceInstant) -> Vec<ParsedResult> {
    en::casual().parse(text, reference, &ParseOptions::default())
}

/// Start instant of the first date expression in `text`
pub fn parse_date(text: &str, reference: ReferenceInstant) -> Option<DateTime<FixedOffset>> {
    en::casual().parse_date(text, reference, &ParseOptions::default())
}
