//! BGP summary and neighbor parsers.
//!
//! Both outputs are kept verbatim. The neighbor listing in particular is too
//! free-form to tabulate reliably, and the raw text is what gets diffed
//! between the pre and post phases.

use crate::parsers::{FreeformOutput, ParseOutcome};

/// Capture `show bgp summary | no-more` output.
pub fn parse_bgp_summary(text: &str) -> ParseOutcome {
    if text.trim().is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(FreeformOutput {
        output: text.to_string(),
    })
}

/// Capture `show bgp neighbor | no-more` output.
pub fn parse_bgp_neighbor(text: &str) -> ParseOutcome {
    if text.trim().is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(FreeformOutput {
        output: text.to_string(),
    })
}
