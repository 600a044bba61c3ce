//! Hardware inventory parsers: `show inventory`, `show platform`, and
//! `show hw-module fpd`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, float_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    pub name: String,
    pub descr: String,
    pub pid: String,
    pub vid: String,
    pub sn: String,
}

#[derive(Debug, Default, Serialize)]
pub struct Inventory {
    pub items: Vec<InventoryItem>,
}

static INVENTORY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"NAME:\s*"(?P<name>[^"]+)",\s*DESCR:\s*"(?P<descr>[^"]+)"\s*[\s\n]PID:\s*(?P<pid>[^,]+?)\s*,\s*VID:\s*(?P<vid>[^,]+?)\s*,\s*SN:\s*(?P<sn>\S+)"#,
    )
    .unwrap()
});

/// Parse `show inventory` output.
pub fn parse_inventory(text: &str) -> ParseOutcome {
    let mut result = Inventory::default();

    for caps in INVENTORY_RE.captures_iter(text) {
        result.items.push(InventoryItem {
            name: caps["name"].trim().to_string(),
            descr: caps["descr"].trim().to_string(),
            pid: caps["pid"].trim().to_string(),
            vid: caps["vid"].trim().to_string(),
            sn: caps["sn"].trim().to_string(),
        });
    }

    if result.items.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformNode {
    pub node: String,
    pub node_type: String,
    pub state: String,
    pub config_state: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct Platform {
    pub nodes: Vec<PlatformNode>,
}

static COLUMN_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Parse `show platform` output. Columns are separated by runs of at least
/// two spaces.
pub fn parse_platform(text: &str) -> ParseOutcome {
    let mut result = Platform::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("Node") || line.starts_with('-') {
            continue;
        }

        let cols: Vec<&str> = COLUMN_GAP_RE.split(line).collect();
        if cols.len() < 3 {
            continue;
        }
        result.nodes.push(PlatformNode {
            node: cols[0].to_string(),
            node_type: cols[1].to_string(),
            state: cols[2].to_string(),
            config_state: cols.get(3).map(|c| c.to_string()),
        });
    }

    if result.nodes.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct FpdVersions {
    pub running: f64,
    pub programd: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FpdEntry {
    pub location: String,
    pub card_type: String,
    pub hw_ver: String,
    pub fpd_device: String,
    pub atr_status: String,
    pub fpd_versions: FpdVersions,
}

#[derive(Debug, Default, Serialize)]
pub struct HwModuleFpd {
    pub auto_upgrade: String,
    pub fpds: Vec<FpdEntry>,
}

static AUTO_UPGRADE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Auto-upgrade\s*:\s*(?P<auto>\S+)").unwrap());

/// Parse `show hw-module fpd` output.
pub fn parse_hw_module_fpd(text: &str) -> ParseOutcome {
    let mut result = HwModuleFpd::default();

    if let Some(caps) = AUTO_UPGRADE_RE.captures(text) {
        result.auto_upgrade = caps["auto"].to_string();
    }

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.starts_with("Auto")
            || line.starts_with("Location")
            || line.starts_with('-')
            || line.starts_with('=')
            || line.starts_with("FPD")
        {
            continue;
        }

        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 7 {
            continue;
        }
        result.fpds.push(FpdEntry {
            location: cols[0].to_string(),
            card_type: cols[1].to_string(),
            hw_ver: cols[2].to_string(),
            fpd_device: cols[3].to_string(),
            atr_status: cols[4].to_string(),
            fpd_versions: FpdVersions {
                running: float_or_zero(cols[5]),
                programd: float_or_zero(cols[6]),
            },
        });
    }

    if result.fpds.is_empty() && result.auto_upgrade.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVENTORY_SAMPLE: &str = "\
NAME: \"Rack 0\", DESCR: \"NCS 5501 1RU Chassis\"
PID: NCS-5501, VID: V01, SN: FOC2233ABCD

NAME: \"0/0/0\", DESCR: \"Cisco QSFP28 100G SR4 Pluggable Optics Module\"
PID: QSFP-100G-SR4-S, VID: V02, SN: AVF2144XYZ1
";

    #[test]
    fn test_parse_inventory_blocks() {
        let ParseOutcome::Parsed(v) = parse_inventory(INVENTORY_SAMPLE) else {
            panic!("expected parsed");
        };
        let items = v["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Rack 0");
        assert_eq!(items[0]["pid"], "NCS-5501");
        assert_eq!(items[1]["sn"], "AVF2144XYZ1");
    }

    const PLATFORM_SAMPLE: &str = "\
Node              Type                       State             Config state
--------------------------------------------------------------------------------
0/RP0/CPU0        NCS-5501(Active)           IOS XR RUN        NSHUT
0/FT0             NCS-1RU-FAN-FW             OPERATIONAL       NSHUT
0/PM0             NCS-1100W-ACFW             OPERATIONAL       NSHUT
";

    #[test]
    fn test_parse_platform_rows() {
        let ParseOutcome::Parsed(v) = parse_platform(PLATFORM_SAMPLE) else {
            panic!("expected parsed");
        };
        let nodes = v["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0]["node"], "0/RP0/CPU0");
        assert_eq!(nodes[0]["node_type"], "NCS-5501(Active)");
        assert_eq!(nodes[0]["state"], "IOS XR RUN");
        assert_eq!(nodes[2]["config_state"], "NSHUT");
    }

    const FPD_SAMPLE: &str = "\
Auto-upgrade:Enabled
                                                               FPD Versions
                                                               ==============
Location   Card type             HWver FPD device  ATR Status  Running Programd
------------------------------------------------------------------------------
0/RP0      NCS-5501              1.0   MB-MIFPGA       CURRENT    0.19    0.19
0/RP0      NCS-5501              1.0   Bootloader      CURRENT    1.14    1.14
";

    #[test]
    fn test_parse_fpd_rows() {
        let ParseOutcome::Parsed(v) = parse_hw_module_fpd(FPD_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["auto_upgrade"], "Enabled");
        let fpds = v["fpds"].as_array().unwrap();
        assert_eq!(fpds.len(), 2);
        assert_eq!(fpds[0]["fpd_device"], "MB-MIFPGA");
        assert_eq!(fpds[0]["fpd_versions"]["running"], 0.19);
        assert_eq!(fpds[1]["fpd_versions"]["programd"], 1.14);
    }

    #[test]
    fn test_empty_inventory() {
        assert_eq!(parse_inventory("no entries"), ParseOutcome::Empty);
    }
}
