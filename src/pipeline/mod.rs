//! The collect → parse → publish pipeline.
//!
//! One pipeline invocation owns a [`RunContext`] and works one device, one
//! phase at a time. Stages communicate through the context's entry lists,
//! never through globals, so concurrent device runs only share the
//! read-only registry.

use std::fmt;

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::registry::{ParserRegistry, Vendor};
use crate::transport::CliSession;

pub mod collect;
pub mod parse;
pub mod publish;
pub mod tracker;

pub use collect::collect_outputs;
pub use parse::parse_outputs;
pub use publish::publish_results;
pub use tracker::WorkflowTracker;

/// Outputs whose trimmed length is at or below this are treated as empty,
/// both for the "collected" signal and the "worth parsing" signal. A
/// tunable, not a domain law.
pub const MIN_OUTPUT_CHARS: usize = 5;

/// Health-check phase relative to the upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Pre,
    Post,
}

impl Phase {
    /// Short tag used in logs and result keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Pre => "pre",
            Phase::Post => "post",
        }
    }

    /// The workflow tracker slot this phase publishes into.
    pub fn tracker_slot(&self) -> &'static str {
        match self {
            Phase::Pre => "pre-checks",
            Phase::Post => "post-checks",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command's record as it moves through the pipeline.
///
/// Serialized field names are the tracker/report wire shape. After the
/// parse stage exactly one of `record` / `failure` is populated: a parsed
/// entry has a record and an empty failure, everything else has an empty
/// record and a reason string (which for collect-only and short-output
/// entries is descriptive, not an error).
#[derive(Debug, Clone, Serialize)]
pub struct CommandEntry {
    #[serde(rename = "cmd")]
    pub command: String,
    pub output: String,
    #[serde(rename = "json")]
    pub record: serde_json::Value,
    #[serde(rename = "exception")]
    pub failure: String,
}

impl CommandEntry {
    /// A fresh entry: no output, empty record, no failure.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            output: String::new(),
            record: serde_json::Value::Object(serde_json::Map::new()),
            failure: String::new(),
        }
    }

    /// True when the parse stage stored a non-empty record.
    pub fn has_record(&self) -> bool {
        match &self.record {
            serde_json::Value::Object(map) => !map.is_empty(),
            serde_json::Value::Null => false,
            _ => true,
        }
    }
}

/// Context owned by one device run.
///
/// Holds identity (device key, vendor, model), the run timestamp, the
/// per-phase entry lists, and the workflow tracker.
pub struct RunContext {
    pub device_key: String,
    pub vendor: Vendor,
    pub model: String,
    pub timestamp: String,
    results: IndexMap<Phase, Vec<CommandEntry>>,
    pub tracker: WorkflowTracker,
}

impl RunContext {
    /// Create a context stamped with the current time.
    pub fn new(device_key: impl Into<String>, vendor: Vendor, model: impl Into<String>) -> Self {
        Self::with_timestamp(device_key, vendor, model, run_timestamp())
    }

    /// Create a context with a caller-supplied timestamp (deterministic
    /// artifact names).
    pub fn with_timestamp(
        device_key: impl Into<String>,
        vendor: Vendor,
        model: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        let device_key = device_key.into();
        let model = model.into();
        let timestamp = timestamp.into();
        let mut tracker = WorkflowTracker::new();
        tracker.init_device(&device_key, "", vendor.as_str(), &model, &timestamp);
        Self {
            device_key,
            vendor,
            model,
            timestamp,
            results: IndexMap::new(),
            tracker,
        }
    }

    /// Entries for a phase; empty slice if the phase has not run.
    pub fn entries(&self, phase: Phase) -> &[CommandEntry] {
        self.results.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable entries for a phase.
    pub fn entries_mut(&mut self, phase: Phase) -> &mut Vec<CommandEntry> {
        self.results.entry(phase).or_default()
    }

    /// Overwrite a phase's entry list wholesale.
    pub fn set_entries(&mut self, phase: Phase, entries: Vec<CommandEntry>) {
        self.results.insert(phase, entries);
    }
}

/// Timestamp format used in artifact names and the tracker, e.g.
/// `2026-08-29_14-03-55`.
pub fn run_timestamp() -> String {
    let format = format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_else(|_| String::from("unknown-time"))
}

/// Run the full pipeline for one device/phase: collect every command's
/// output, parse what the registry knows, publish to the tracker.
///
/// Returns the batch parse flag: true iff no registered parser actually
/// failed. Transport errors mid-batch do not abort the run; they are
/// recorded on the affected entries.
pub async fn run_pipeline<S: CliSession>(
    session: &mut S,
    registry: &ParserRegistry,
    ctx: &mut RunContext,
    commands: &[String],
    phase: Phase,
) -> bool {
    if commands.is_empty() {
        warn!("[{}] no commands provided, nothing to run", ctx.device_key);
        return false;
    }

    collect_outputs(session, ctx, commands, phase).await;
    let parse_ok = parse_outputs(registry, ctx, phase);
    publish_results(ctx, phase, parse_ok);
    parse_ok
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::error::{Result, TransportError};
    use crate::transport::CliSession;

    /// Scripted session: each command is answered from a queue; a queued
    /// `Err` simulates a transport failure for that one command.
    pub(crate) struct MockSession {
        replies: Vec<std::result::Result<String, ()>>,
        next: usize,
        pub sent: Vec<String>,
        pub closed: bool,
    }

    impl MockSession {
        pub fn new(replies: Vec<std::result::Result<String, ()>>) -> Self {
            Self {
                replies,
                next: 0,
                sent: Vec::new(),
                closed: false,
            }
        }
    }

    impl CliSession for MockSession {
        fn send_command(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send {
            self.sent.push(command.to_string());
            let reply = self.replies.get(self.next).cloned();
            self.next += 1;
            async move {
                match reply {
                    Some(Ok(output)) => Ok(output),
                    Some(Err(())) => {
                        Err(TransportError::PromptTimeout(std::time::Duration::from_secs(1)).into())
                    }
                    None => Ok(String::new()),
                }
            }
        }

        fn close(&mut self) -> impl Future<Output = Result<()>> + Send {
            self.closed = true;
            async { Ok(()) }
        }
    }

    const ARP_SAMPLE: &str = "\
MAC Address       Address         Interface                Flags
00:11:22:33:44:55 10.0.0.1        ge-0/0/0.0               none
66:77:88:99:aa:bb 10.0.0.2        ge-0/0/1.0               none
Total entries: 2
";

    fn juniper_ctx() -> RunContext {
        RunContext::with_timestamp(
            "juniper_mx204",
            Vendor::Juniper,
            "mx204",
            "2026-08-29_12-00-00",
        )
    }

    #[tokio::test]
    async fn test_scenario_registered_command_parses() {
        // Unnormalized spelling must still hit the registered parser.
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = juniper_ctx();
        let mut session = MockSession::new(vec![Ok(ARP_SAMPLE.to_string())]);
        let commands = vec!["show arp no-resolve |no-more".to_string()];

        let parse_ok =
            run_pipeline(&mut session, &registry, &mut ctx, &commands, Phase::Pre).await;

        assert!(parse_ok);
        let entries = ctx.entries(Phase::Pre);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].has_record());
        assert!(entries[0].failure.is_empty());
        assert_eq!(entries[0].record["entries"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_scenario_unregistered_command_is_collect_only() {
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = juniper_ctx();
        let mut session =
            MockSession::new(vec![Ok("Junos: 21.4R3-S4.9 etc etc".to_string())]);
        let commands = vec!["show version".to_string()];

        let parse_ok =
            run_pipeline(&mut session, &registry, &mut ctx, &commands, Phase::Pre).await;

        // Collect-only commands never flip the batch flag.
        assert!(parse_ok);
        let entries = ctx.entries(Phase::Pre);
        assert_eq!(entries[0].failure, "no parser registered");
        assert!(!entries[0].has_record());
    }

    #[tokio::test]
    async fn test_scenario_output_at_threshold_is_too_short() {
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = juniper_ctx();
        // Exactly MIN_OUTPUT_CHARS characters: at the threshold, not over it.
        let mut session = MockSession::new(vec![Ok("abcde".to_string())]);
        let commands = vec!["show arp no-resolve | no-more".to_string()];

        let parse_ok =
            run_pipeline(&mut session, &registry, &mut ctx, &commands, Phase::Pre).await;

        assert!(parse_ok);
        let entries = ctx.entries(Phase::Pre);
        assert_eq!(entries[0].failure, "output too short");
        assert!(!entries[0].has_record());
    }

    #[tokio::test]
    async fn test_scenario_parser_failure_flags_batch_keeps_entry() {
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = juniper_ctx();
        // Long enough to parse, but matches no ARP rows: the parser comes
        // back empty, which counts as a parse failure.
        let mut session =
            MockSession::new(vec![Ok("garbage text with no arp rows at all".to_string())]);
        let commands = vec!["show arp no-resolve | no-more".to_string()];

        let parse_ok =
            run_pipeline(&mut session, &registry, &mut ctx, &commands, Phase::Pre).await;

        assert!(!parse_ok);
        let entries = ctx.entries(Phase::Pre);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].failure.is_empty());
        assert!(!entries[0].has_record());
    }

    #[tokio::test]
    async fn test_collection_isolation_mid_batch_error() {
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = juniper_ctx();
        let mut session = MockSession::new(vec![
            Ok(ARP_SAMPLE.to_string()),
            Err(()),
            Ok("Junos: 21.4R3".to_string()),
        ]);
        let commands = vec![
            "show arp no-resolve | no-more".to_string(),
            "show bfd session | no-more".to_string(),
            "show version".to_string(),
        ];

        run_pipeline(&mut session, &registry, &mut ctx, &commands, Phase::Pre).await;

        // All three commands attempted and present despite the failure.
        assert_eq!(session.sent.len(), 3);
        let entries = ctx.entries(Phase::Pre);
        assert_eq!(entries.len(), 3);
        assert!(entries[1].failure.contains("show bfd session"));
        assert!(entries[1].output.is_empty());
    }

    #[tokio::test]
    async fn test_parse_totality() {
        // After the pipeline, every entry has exactly one of record/failure.
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = juniper_ctx();
        let mut session = MockSession::new(vec![
            Ok(ARP_SAMPLE.to_string()),
            Ok("abc".to_string()),
            Ok("collect-only free text output".to_string()),
            Err(()),
        ]);
        let commands = vec![
            "show arp no-resolve | no-more".to_string(),
            "show bfd session | no-more".to_string(),
            "show version".to_string(),
            "show lldp neighbors | no-more".to_string(),
        ];

        run_pipeline(&mut session, &registry, &mut ctx, &commands, Phase::Pre).await;

        for entry in ctx.entries(Phase::Pre) {
            assert!(
                entry.has_record() ^ !entry.failure.is_empty(),
                "entry for {:?} has both or neither of record/failure",
                entry.command
            );
        }
    }

    #[tokio::test]
    async fn test_empty_command_list_returns_false() {
        let registry = ParserRegistry::build().unwrap();
        let mut ctx = juniper_ctx();
        let mut session = MockSession::new(vec![]);

        let parse_ok = run_pipeline(&mut session, &registry, &mut ctx, &[], Phase::Pre).await;

        assert!(!parse_ok);
        assert!(ctx.entries(Phase::Pre).is_empty());
    }

    #[test]
    fn test_entry_wire_shape() {
        let mut entry = CommandEntry::new("show arp no-resolve | no-more");
        entry.output = "raw".to_string();
        entry.failure = "no parser registered".to_string();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["cmd"], "show arp no-resolve | no-more");
        assert_eq!(value["output"], "raw");
        assert_eq!(value["json"], serde_json::json!({}));
        assert_eq!(value["exception"], "no parser registered");
    }
}
