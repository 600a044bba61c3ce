//! Workflow tracker: per-device task/status map for the whole upgrade
//! workflow.
//!
//! The tracker is the reporting backbone: every device gets a fixed table
//! of named tasks per phase, and the pipeline logs statuses and command
//! entries into it. Serializing the tracker yields the exact wire shape
//! the downstream report generator consumes.

use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;

use super::CommandEntry;

/// One task row: status plus free-text error and accumulated log lines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskStatus {
    pub status: String,
    pub error: String,
    pub title: String,
    pub logs: String,
}

impl TaskStatus {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// A phase slot: its task table and the published command entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhaseRecord {
    pub tasks: IndexMap<String, TaskStatus>,
    pub commands: Vec<CommandEntry>,
}

/// Identity block stamped on each tracked device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub host: String,
    pub vendor: String,
    pub model: String,
    pub timestamp: String,
}

/// All tracked state for one device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceRecord {
    pub device_info: DeviceInfo,
    #[serde(rename = "pre-checks")]
    pub pre_checks: PhaseRecord,
    pub upgrade: PhaseRecord,
    #[serde(rename = "post-checks")]
    pub post_checks: PhaseRecord,
}

/// Tracker over every device in the run, keyed by device key.
///
/// Lookups against unknown device keys, phases or task names warn and
/// no-op; a reporting mishap must never take the pipeline down.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct WorkflowTracker {
    devices: IndexMap<String, DeviceRecord>,
}

const PRE_CHECK_TASKS: &[(&str, &str)] = &[
    ("read Yaml", "Load device config from YAML"),
    ("start logger", "Initialise log file for session"),
    ("connection using credentials", "Establish SSH session to device"),
    ("show version", "Run show version"),
    ("executing show commands", "Collect pre-check show command output"),
    ("parsing the data", "Parse and validate pre-check output"),
    ("Backup Config", "Save running config and device logs"),
    ("Validate MD5 checksum", "Verify image integrity via MD5"),
    ("Storage Check (5GB threshold)", "Confirm sufficient disk space"),
    ("Disable Filter", "Remove RE protection firewall filter"),
];

const UPGRADE_TASKS: &[(&str, &str)] = &[
    ("image installation", "Install target OS image on device"),
    ("reboot the device", "Reboot and confirm device comes up"),
    ("ping the device", "Verify device reachability after upgrade"),
];

const POST_CHECK_TASKS: &[(&str, &str)] = &[
    ("Take snapshot", "Snapshot primary disk to backup disk"),
    ("executing show commands", "Collect post-upgrade show command output"),
    ("parsing the data", "Parse and validate post-upgrade output"),
    ("Enable RE-PROTECT filter", "Re-apply RE protection firewall filter"),
];

fn task_table(names: &[(&str, &str)]) -> IndexMap<String, TaskStatus> {
    names
        .iter()
        .map(|(name, title)| (name.to_string(), TaskStatus::titled(title)))
        .collect()
}

impl WorkflowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the full task table for a device. Re-initializing an existing
    /// key resets it.
    pub fn init_device(
        &mut self,
        device_key: &str,
        host: &str,
        vendor: &str,
        model: &str,
        timestamp: &str,
    ) {
        self.devices.insert(
            device_key.to_string(),
            DeviceRecord {
                device_info: DeviceInfo {
                    host: host.to_string(),
                    vendor: vendor.to_string(),
                    model: model.to_string(),
                    timestamp: timestamp.to_string(),
                },
                pre_checks: PhaseRecord {
                    tasks: task_table(PRE_CHECK_TASKS),
                    commands: Vec::new(),
                },
                upgrade: PhaseRecord {
                    tasks: task_table(UPGRADE_TASKS),
                    commands: Vec::new(),
                },
                post_checks: PhaseRecord {
                    tasks: task_table(POST_CHECK_TASKS),
                    commands: Vec::new(),
                },
            },
        );
        info!("[tracker] initialised slot for {device_key:?}");
    }

    /// Record the host a device was actually reached at.
    pub fn set_host(&mut self, device_key: &str, host: &str) {
        if let Some(device) = self.devices.get_mut(device_key) {
            device.device_info.host = host.to_string();
        }
    }

    /// Update one task's status. `error` and `log_line` are appended only
    /// when non-empty; log lines accumulate newline-separated.
    pub fn log_task(
        &mut self,
        device_key: &str,
        phase: &str,
        task_name: &str,
        status: &str,
        error: &str,
        log_line: &str,
    ) {
        let Some(device) = self.devices.get_mut(device_key) else {
            warn!("[tracker] log_task: unknown device {device_key:?}");
            return;
        };
        let Some(record) = phase_record_mut(device, phase) else {
            warn!("[tracker] log_task: unknown phase {phase:?} for {device_key:?}");
            return;
        };
        let Some(task) = record.tasks.get_mut(task_name) else {
            warn!("[tracker] log_task: unknown task {task_name:?} under [{device_key}][{phase}]");
            return;
        };

        task.status = status.to_string();
        if !error.is_empty() {
            task.error = error.to_string();
        }
        if !log_line.is_empty() {
            if task.logs.is_empty() {
                task.logs = log_line.to_string();
            } else {
                task.logs.push('\n');
                task.logs.push_str(log_line);
            }
        }
        info!("[tracker] {device_key} | {phase} | {task_name} -> {status}");
    }

    /// Replace a phase's published command entries wholesale.
    pub fn set_commands(&mut self, device_key: &str, phase: &str, entries: Vec<CommandEntry>) {
        let Some(device) = self.devices.get_mut(device_key) else {
            warn!("[tracker] set_commands: unknown device {device_key:?}");
            return;
        };
        let Some(record) = phase_record_mut(device, phase) else {
            warn!("[tracker] set_commands: unknown phase {phase:?} for {device_key:?}");
            return;
        };
        info!(
            "[tracker] stored {} command entries -> [{device_key}][{phase}]",
            entries.len()
        );
        record.commands = entries;
    }

    /// Read access for a device's record.
    pub fn device(&self, device_key: &str) -> Option<&DeviceRecord> {
        self.devices.get(device_key)
    }
}

fn phase_record_mut<'a>(device: &'a mut DeviceRecord, phase: &str) -> Option<&'a mut PhaseRecord> {
    match phase {
        "pre-checks" => Some(&mut device.pre_checks),
        "upgrade" => Some(&mut device.upgrade),
        "post-checks" => Some(&mut device.post_checks),
        _ => None,
    }
}
