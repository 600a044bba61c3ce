//! VM host version and snapshot parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::ParseOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct VmhostVersionSet {
    pub version_set: String,
    pub vmhost_version: String,
    pub vmhost_root: String,
    pub vmhost_core: String,
    pub kernel: String,
    pub junos_disk: String,
}

#[derive(Debug, Default, Serialize)]
pub struct VmhostVersion {
    pub current_device: String,
    pub current_label: String,
    pub current_partition: String,
    pub current_boot_disk: String,
    pub current_root_set: String,
    pub uefi_version: String,
    pub disk_type: String,
    pub upgrade_time: String,
    pub versions: Vec<VmhostVersionSet>,
}

static ROOT_DETAILS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Current root details,\s+Device\s+(\S+),\s+Label:\s+(\S+),\s+Partition:\s+(\S+)")
        .unwrap()
});
static BOOT_DISK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Current boot disk:\s+(.+)").unwrap());
static ROOT_SET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Current root set:\s+(.+)").unwrap());
static UEFI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"UEFI\s+Version:\s+(.+)").unwrap());
static UPGRADE_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+?Disk),\s+Upgrade Time:\s+(.+)").unwrap());
static SNAPSHOT_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.+?Disk),\s+Snapshot Time:\s+(.+)").unwrap());

// The two boot sets (p and b) print the same block layout.
static VERSION_SET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)Version:\s+set\s+(\w+)\s+VMHost Version:\s+(.+?)\s+VMHost Root:\s+(.+?)\s+VMHost Core:\s+(.+?)\s+kernel:\s+(.+?)\s+Junos Disk:\s+(.+?)(?:\n\n|\nVersion:|\z)",
    )
    .unwrap()
});

fn version_sets(text: &str) -> Vec<VmhostVersionSet> {
    VERSION_SET_RE
        .captures_iter(text)
        .map(|caps| VmhostVersionSet {
            version_set: caps[1].trim().to_string(),
            vmhost_version: caps[2].trim().to_string(),
            vmhost_root: caps[3].trim().to_string(),
            vmhost_core: caps[4].trim().to_string(),
            kernel: caps[5].trim().to_string(),
            junos_disk: caps[6].trim().to_string(),
        })
        .collect()
}

/// Parse `show vmhost version | no-more` output.
pub fn parse_vmhost_version(text: &str) -> ParseOutcome {
    let mut result = VmhostVersion::default();

    if let Some(caps) = ROOT_DETAILS_RE.captures(text) {
        result.current_device = caps[1].trim().to_string();
        result.current_label = caps[2].trim().to_string();
        result.current_partition = caps[3].trim().to_string();
    }
    if let Some(caps) = BOOT_DISK_RE.captures(text) {
        result.current_boot_disk = caps[1].trim().to_string();
    }
    if let Some(caps) = ROOT_SET_RE.captures(text) {
        result.current_root_set = caps[1].trim().to_string();
    }
    if let Some(caps) = UEFI_RE.captures(text) {
        result.uefi_version = caps[1].trim().to_string();
    }
    if let Some(caps) = UPGRADE_TIME_RE.captures(text) {
        result.disk_type = caps[1].trim().to_string();
        result.upgrade_time = caps[2].trim().to_string();
    }
    result.versions = version_sets(text);

    if result.versions.is_empty() && result.current_boot_disk.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Default, Serialize)]
pub struct VmhostSnapshot {
    pub uefi_version: String,
    pub disk_type: String,
    pub snapshot_time: String,
    pub versions: Vec<VmhostVersionSet>,
}

/// Parse `show vmhost snapshot | no-more` output.
pub fn parse_vmhost_snapshot(text: &str) -> ParseOutcome {
    let mut result = VmhostSnapshot::default();

    if let Some(caps) = UEFI_RE.captures(text) {
        result.uefi_version = caps[1].trim().to_string();
    }
    if let Some(caps) = SNAPSHOT_TIME_RE.captures(text) {
        result.disk_type = caps[1].trim().to_string();
        result.snapshot_time = caps[2].trim().to_string();
    }
    result.versions = version_sets(text);

    if result.versions.is_empty() && result.uefi_version.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION_SAMPLE: &str = "\
Current root details, Device sda, Label: jrootp_P, Partition: sda3
Current boot disk: Primary
Current root set: p
UEFI Version: NGRE_v00.53

Primary Disk, Upgrade Time: Fri Oct 18 10:45:46 UTC 2024
Version: set p
  VMHost Version: 3.5.0
  VMHost Root: vmhost-x86-64-21.4R3.15
  VMHost Core: vmhost-core-x86-64-21.4R3.15
  kernel: 4.14.304
  Junos Disk: junos-install-mx-x86-64-21.4R3.15

Version: set b
  VMHost Version: 3.4.0
  VMHost Root: vmhost-x86-64-20.4R3.8
  VMHost Core: vmhost-core-x86-64-20.4R3.8
  kernel: 4.14.290
  Junos Disk: junos-install-mx-x86-64-20.4R3.8
";

    #[test]
    fn test_parse_vmhost_version_sets() {
        let ParseOutcome::Parsed(v) = parse_vmhost_version(VERSION_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["current_device"], "sda");
        assert_eq!(v["current_label"], "jrootp_P");
        assert_eq!(v["current_root_set"], "p");
        assert_eq!(v["disk_type"], "Primary Disk");
        let versions = v["versions"].as_array().unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0]["version_set"], "p");
        assert_eq!(versions[0]["vmhost_version"], "3.5.0");
        assert_eq!(versions[1]["kernel"], "4.14.290");
    }

    const SNAPSHOT_SAMPLE: &str = "\
UEFI Version: NGRE_v00.53

Secondary Disk, Snapshot Time: Mon Nov 04 02:00:01 UTC 2024
Version: set b
  VMHost Version: 3.4.0
  VMHost Root: vmhost-x86-64-20.4R3.8
  VMHost Core: vmhost-core-x86-64-20.4R3.8
  kernel: 4.14.290
  Junos Disk: junos-install-mx-x86-64-20.4R3.8
";

    #[test]
    fn test_parse_vmhost_snapshot() {
        let ParseOutcome::Parsed(v) = parse_vmhost_snapshot(SNAPSHOT_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["uefi_version"], "NGRE_v00.53");
        assert_eq!(v["disk_type"], "Secondary Disk");
        assert_eq!(v["snapshot_time"], "Mon Nov 04 02:00:01 UTC 2024");
        assert_eq!(v["versions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(parse_vmhost_version(""), ParseOutcome::Empty);
        assert_eq!(parse_vmhost_snapshot("garbage"), ParseOutcome::Empty);
    }
}
