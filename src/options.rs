//! Per-call parse options

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Where debug messages go
///
/// Debug output is a side channel: it never changes parse results, and a
/// callback that panics is caught and ignored.
#[derive(Clone, Default)]
pub enum DebugSink {
    #[default]
    Off,
    /// `true` forwards messages to `tracing` under the `datewise::debug` target
    Flag(bool),
    Callback(Arc<dyn Fn(&str) + Send + Sync>),
}

impl DebugSink {
    pub fn callback(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        DebugSink::Callback(Arc::new(f))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, DebugSink::Off | DebugSink::Flag(false))
    }

    pub fn emit(&self, message: &str) {
        match self {
            DebugSink::Off | DebugSink::Flag(false) => {}
            DebugSink::Flag(true) => {
                tracing::debug!(target: "datewise::debug", "{}", message);
            }
            DebugSink::Callback(callback) => {
                if catch_unwind(AssertUnwindSafe(|| callback(message))).is_err() {
                    tracing::warn!("debug callback panicked; message dropped");
                }
            }
        }
    }
}

impl fmt::Debug for DebugSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugSink::Off => f.write_str("Off"),
            DebugSink::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            DebugSink::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Options for a single parse call
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Move results that fall in the past to their next occurrence
    pub forward_date: bool,
    pub debug: DebugSink,
    /// Custom timezone abbreviations, in minutes east of UTC
    pub timezones: HashMap<String, i32>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forward_date(mut self, forward_date: bool) -> Self {
        self.forward_date = forward_date;
        self
    }

    pub fn with_debug(mut self, debug: DebugSink) -> Self {
        self.debug = debug;
        self
    }

    /// Register a timezone abbreviation (case-insensitive)
    pub fn with_timezone(mut self, abbreviation: &str, offset_minutes: i32) -> Self {
        self.timezones
            .insert(abbreviation.to_ascii_uppercase(), offset_minutes);
        self
    }

    /// Offset for a custom abbreviation, if one was registered
    pub fn timezone_offset(&self, abbreviation: &str) -> Option<i32> {
        self.timezones
            .get(&abbreviation.to_ascii_uppercase())
            .copied()
            .or_else(|| {
                // Entries inserted directly into the map may not be upper-case
                self.timezones
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(abbreviation))
                    .map(|(_, offset)| *offset)
            })
    }
}
