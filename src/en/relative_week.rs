//! Weeks relative to the reference: "next week", "3 weeks ago"

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::context::ParsingContext;
use crate::parsers::{assign_relative_week, Parser, RELATIVE_WEEK_PARSER_TAG};
use crate::results::ParsingResult;

use super::{count_value, NUMBER_WORD_PATTERN};

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let count = format!("[0-9]{{1,3}}|{}", NUMBER_WORD_PATTERN);
    Regex::new(&format!(
        r"(?ix)
        (?P<before_last> \b(?:the\s+)?week\s+before\s+last\b )
        | (?P<after_next> \b(?:the\s+)?week\s+after\s+next\b )
        | (?P<named>
            \b(?P<modifier>this|current|last|previous|past|next|coming|following)\s+week\b
        )
        | (?P<ago> \b(?P<ago_count>{count})\s+weeks?\s+ago\b )
        | (?P<ahead>
            \bin\s+(?P<in_count>{count})\s+weeks?\b
            | \b(?P<later_count>{count})\s+weeks?\s+(?:from\s+now|later|hence)\b
        )
        ",
    ))
    .expect("relative week pattern")
});

/// Parser for weeks counted from the reference instant
#[derive(Debug, Default)]
pub struct RelativeWeekParser;

impl RelativeWeekParser {
    pub fn new() -> Self {
        Self
    }

    /// Whole weeks between the reference and the matched week
    fn offset(captures: &Captures<'_>) -> Option<i64> {
        if captures.name("before_last").is_some() {
            return Some(-2);
        }
        if captures.name("after_next").is_some() {
            return Some(2);
        }
        if let Some(modifier) = captures.name("modifier") {
            return match modifier.as_str().to_ascii_lowercase().as_str() {
                "this" | "current" => Some(0),
                "last" | "previous" | "past" => Some(-1),
                "next" | "coming" | "following" => Some(1),
                _ => None,
            };
        }
        if let Some(count) = captures.name("ago_count") {
            return count_value(count.as_str()).map(|n| -n);
        }
        captures
            .name("in_count")
            .or_else(|| captures.name("later_count"))
            .and_then(|count| count_value(count.as_str()))
    }
}

impl Parser for RelativeWeekParser {
    fn name(&self) -> &'static str {
        "RelativeWeekParser"
    }

    fn pattern(&self, _context: &ParsingContext<'_>) -> &Regex {
        &PATTERN
    }

    fn extract(
        &self,
        context: &ParsingContext<'_>,
        captures: &Captures<'_>,
    ) -> Option<ParsingResult> {
        let matched = captures.get(0)?;
        let offset = Self::offset(captures)?;

        let mut components = context.create_components();
        if !assign_relative_week(&mut components, offset) {
            return None;
        }
        components.add_tag(RELATIVE_WEEK_PARSER_TAG);

        Some(context.create_result(matched.start(), matched.as_str(), components, None))
    }
}
