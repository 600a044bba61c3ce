//! Per-command output parsers.
//!
//! Each parser is an independent, stateless transform from one vendor
//! command's raw CLI text to a structured record. Vendor CLI text is
//! semi-structured and drifts across firmware versions, so every parser uses
//! tolerant line-by-line regex matching: unmatched lines are skipped, missing
//! optional fields default to empty/zero, and whatever could be extracted is
//! returned. A parser never panics on malformed text — its only failure
//! channel is the [`ParseOutcome`] it returns.

pub mod cisco;
pub mod juniper;

use serde::Serialize;

/// Outcome of running one parser over one command's raw output.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Structured record extracted from the output.
    Parsed(serde_json::Value),

    /// The parser recognized the output but found nothing to extract
    /// (e.g. the device explicitly reported no matches).
    Empty,

    /// The output was present but could not be turned into a record.
    Malformed(String),
}

impl ParseOutcome {
    /// Serialize a record type into a `Parsed` outcome.
    ///
    /// Record types here are plain derive(Serialize) structs, so
    /// serialization cannot realistically fail; if it somehow does, that is
    /// a malformed result, not a panic.
    pub fn record<T: Serialize>(record: T) -> ParseOutcome {
        match serde_json::to_value(record) {
            Ok(value) => ParseOutcome::Parsed(value),
            Err(e) => ParseOutcome::Malformed(format!("record serialization failed: {e}")),
        }
    }

    /// True for the `Parsed` variant.
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }
}

/// A registered parser: raw command output in, outcome out.
pub type Parser = fn(&str) -> ParseOutcome;

/// Freeform record for commands intentionally left unparsed: the raw text is
/// passed through under a single `output` key.
#[derive(Debug, Clone, Serialize)]
pub struct FreeformOutput {
    pub output: String,
}

/// Base-10 integer conversion with the tolerant default the parsers use:
/// a token that does not convert contributes 0 instead of aborting.
pub(crate) fn int_or_zero(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}

/// Base-10 float conversion, defaulting to 0.0 on failure.
pub(crate) fn float_or_zero(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}

/// Convert a token to a JSON number when it parses as base-10, otherwise
/// keep it as the raw string.
pub(crate) fn num_or_raw(s: &str) -> serde_json::Value {
    let t = s.trim();
    if let Ok(i) = t.parse::<i64>() {
        return serde_json::Value::from(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return serde_json::Value::from(f);
    }
    serde_json::Value::from(t)
}
