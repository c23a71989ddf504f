//! State shared by the parsers and refiners of one parse call

use crate::components::ParsingComponents;
use crate::options::ParseOptions;
use crate::reference::ReferenceInstant;
use crate::results::ParsingResult;

/// Input text, reference instant and options for one parse call
///
/// Borrowed immutably by every parser and refiner; each call builds its own.
#[derive(Debug, Clone, Copy)]
pub struct ParsingContext<'a> {
    text: &'a str,
    reference: ReferenceInstant,
    options: &'a ParseOptions,
}

impl<'a> ParsingContext<'a> {
    pub fn new(text: &'a str, reference: ReferenceInstant, options: &'a ParseOptions) -> Self {
        Self {
            text,
            reference,
            options,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn reference(&self) -> &ReferenceInstant {
        &self.reference
    }

    pub fn options(&self) -> &'a ParseOptions {
        self.options
    }

    /// Fresh store seeded from the reference instant
    pub fn create_components(&self) -> ParsingComponents {
        ParsingComponents::new(self.reference)
    }

    /// Candidate covering `index..index + text.len()` of the input
    pub fn create_result(
        &self,
        index: usize,
        text: &str,
        start: ParsingComponents,
        end: Option<ParsingComponents>,
    ) -> ParsingResult {
        ParsingResult::new(index, text, start, end)
    }

    /// Send a message to the debug sink; `message` only runs when one is enabled
    pub fn debug(&self, message: impl FnOnce() -> String) {
        if self.options.debug.is_enabled() {
            self.options.debug.emit(&message());
        }
    }
}
