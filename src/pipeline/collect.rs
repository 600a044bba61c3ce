//! Collection stage: run every command, capture every reply.

use log::{debug, error, info};

use super::{CommandEntry, MIN_OUTPUT_CHARS, Phase, RunContext};
use crate::transport::CliSession;

/// Send each command in order and store one entry per command on the
/// context, replacing whatever the phase slot held before.
///
/// A transport error on one command is recorded on that entry and the loop
/// moves on — one bad command must not sacrifice the rest of the batch.
/// Single attempt per command, no retry.
pub async fn collect_outputs<S: CliSession>(
    session: &mut S,
    ctx: &mut RunContext,
    commands: &[String],
    phase: Phase,
) {
    info!(
        "[{}] collect: {} command(s), phase={phase}, threshold={MIN_OUTPUT_CHARS}",
        ctx.device_key,
        commands.len()
    );

    let mut entries = Vec::with_capacity(commands.len());

    for command in commands {
        info!("[{}] sending {command:?}", ctx.device_key);
        let mut entry = CommandEntry::new(command);

        match session.send_command(command).await {
            Ok(output) => {
                let collected = output.trim().len() > MIN_OUTPUT_CHARS;
                debug!(
                    "[{}] {command:?}: {} chars, collected={collected}",
                    ctx.device_key,
                    output.len()
                );
                entry.output = output;
            }
            Err(e) => {
                error!("[{}] {command:?} send failed: {e}", ctx.device_key);
                entry.failure = format!("send_command failed for '{command}'");
            }
        }

        entries.push(entry);
    }

    info!(
        "[{}] collect done: {} entries stored",
        ctx.device_key,
        entries.len()
    );
    ctx.set_entries(phase, entries);
}
