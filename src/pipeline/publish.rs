//! Publish stage: mirror pipeline results into the workflow tracker.

use log::info;

use super::{Phase, RunContext};

/// Push a phase's entries into the tracker and log the two pipeline tasks.
///
/// The tracker's command list for the phase is overwritten wholesale, in
/// original command order. "executing show commands" succeeds when at
/// least one command returned output; "parsing the data" mirrors the
/// batch parse flag.
pub fn publish_results(ctx: &mut RunContext, phase: Phase, parse_ok: bool) {
    let slot = phase.tracker_slot();
    let entries = ctx.entries(phase).to_vec();
    let total = entries.len();
    let parsed = entries.iter().filter(|e| e.has_record()).count();
    let any_output = entries.iter().any(|e| !e.output.is_empty());

    let device_key = ctx.device_key.clone();
    ctx.tracker.set_commands(&device_key, slot, entries);

    let collect_status = if any_output { "Success" } else { "Failed" };
    ctx.tracker.log_task(
        &device_key,
        slot,
        "executing show commands",
        collect_status,
        &format!("{total} command(s) collected"),
        &format!(
            "Collected {total} outputs [{}]",
            phase.as_str().to_uppercase()
        ),
    );

    let (parse_status, parse_detail) = if parse_ok {
        ("Success", "All parsers OK")
    } else {
        ("Failed", "One or more parsers failed")
    };
    ctx.tracker.log_task(
        &device_key,
        slot,
        "parsing the data",
        parse_status,
        parse_detail,
        &format!("Parser run: {parse_detail}"),
    );

    info!(
        "[{device_key}] publish: {total} entries -> [{slot}], \
         parsed={parsed}, skipped/collect-only={}, parse_ok={parse_ok}",
        total - parsed
    );
}
