//! Parse stage: turn raw command output into structured records.

use log::{debug, info, warn};

use super::{MIN_OUTPUT_CHARS, Phase, RunContext};
use crate::parsers::ParseOutcome;
use crate::registry::{ParserRegistry, normalize};

/// Run the registered parser over each collected entry, in place.
///
/// Per-entry decision ladder:
/// 1. entry already carries a collection failure → leave it as is;
/// 2. no parser registered → reason "no parser registered" (collect-only,
///    not a failure);
/// 3. trimmed output at or under the threshold → reason "output too short"
///    (nothing to parse, not a failure);
/// 4. parser returns `Parsed` → record stored, reason cleared;
///    `Empty` or `Malformed` → classified reason, batch flag false,
///    continue.
///
/// Returns true iff no parser actually failed. Never aborts the batch.
pub fn parse_outputs(registry: &ParserRegistry, ctx: &mut RunContext, phase: Phase) -> bool {
    let device_key = ctx.device_key.clone();
    let vendor = ctx.vendor;
    let entries = ctx.entries_mut(phase);

    if entries.is_empty() {
        warn!("[{device_key}] parse: nothing collected for phase={phase}");
        return false;
    }

    info!(
        "[{device_key}] parse: {} entry(ies), vendor={vendor}",
        entries.len()
    );

    let mut all_ok = true;

    for entry in entries.iter_mut() {
        if !entry.failure.is_empty() {
            // Collection already recorded a transport failure here.
            continue;
        }

        let normalized = normalize(&entry.command);

        let Some(parser) = registry.lookup(vendor, &normalized) else {
            entry.failure = "no parser registered".to_string();
            debug!("[{device_key}] {:?}: collect-only", entry.command);
            continue;
        };

        if entry.output.trim().len() <= MIN_OUTPUT_CHARS {
            entry.failure = "output too short".to_string();
            info!("[{device_key}] {:?}: output too short", entry.command);
            continue;
        }

        match parser(&entry.output) {
            ParseOutcome::Parsed(record) => {
                entry.record = record;
                entry.failure.clear();
                debug!("[{device_key}] {:?}: parsed OK", entry.command);
            }
            ParseOutcome::Empty => {
                entry.failure = "parser returned empty result".to_string();
                all_ok = false;
                warn!(
                    "[{device_key}] {:?}: parser returned empty result",
                    entry.command
                );
            }
            ParseOutcome::Malformed(reason) => {
                entry.failure = format!("parser failed for '{}': {reason}", entry.command);
                all_ok = false;
                warn!("[{device_key}] {:?}: parser failed: {reason}", entry.command);
            }
        }
    }

    info!(
        "[{device_key}] parse done: {}",
        if all_ok {
            "all parsers OK"
        } else {
            "one or more parsers failed (continued)"
        }
    );
    all_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CommandEntry;
    use crate::registry::Vendor;

    fn ctx_with_entries(entries: Vec<CommandEntry>) -> RunContext {
        let mut ctx = RunContext::with_timestamp(
            "juniper_mx204",
            Vendor::Juniper,
            "mx204",
            "2026-08-29_12-00-00",
        );
        ctx.set_entries(Phase::Pre, entries);
        ctx
    }

    #[test]
    fn test_empty_batch_is_false() {
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = ctx_with_entries(vec![]);
        assert!(!parse_outputs(&registry, &mut ctx, Phase::Pre));
    }

    #[test]
    fn test_transport_failure_is_preserved() {
        let registry = ParserRegistry::build().unwrap();
        let mut failed = CommandEntry::new("show bfd session | no-more");
        failed.failure = "send_command failed for 'show bfd session | no-more'".to_string();
        let mut ctx = ctx_with_entries(vec![failed]);

        let ok = parse_outputs(&registry, &mut ctx, Phase::Pre);

        // A collection failure is not a parser failure.
        assert!(ok);
        assert!(ctx.entries(Phase::Pre)[0].failure.contains("send_command"));
    }

    #[test]
    fn test_unnormalized_command_still_found() {
        let registry = ParserRegistry::build().unwrap();
        let mut entry = CommandEntry::new("show arp  no-resolve |no-more");
        entry.output = "\
MAC Address       Address         Interface                Flags
00:11:22:33:44:55 10.0.0.1        ge-0/0/0.0               none
Total entries: 1
"
        .to_string();
        let mut ctx = ctx_with_entries(vec![entry]);

        let ok = parse_outputs(&registry, &mut ctx, Phase::Pre);

        assert!(ok);
        assert!(ctx.entries(Phase::Pre)[0].has_record());
    }
}
