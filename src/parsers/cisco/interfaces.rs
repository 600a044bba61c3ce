//! Interface-facing parsers: VRF interface brief, LLDP neighbors, and
//! interface descriptions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct VrfInterfaceBrief {
    pub interface: String,
    pub ip_address: String,
    pub status: String,
    pub protocol: String,
    pub vrf_name: String,
}

#[derive(Debug, Default, Serialize)]
pub struct VrfInterfaceBriefs {
    pub interfaces: Vec<VrfInterfaceBrief>,
}

static COLUMN_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Parse `show ipv4 vrf all interface brief` output.
pub fn parse_ipv4_vrf_interface_brief(text: &str) -> ParseOutcome {
    let mut result = VrfInterfaceBriefs::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("Interface") {
            continue;
        }

        let cols: Vec<&str> = COLUMN_GAP_RE.split(line).collect();
        if cols.len() < 5 {
            continue;
        }
        result.interfaces.push(VrfInterfaceBrief {
            interface: cols[0].to_string(),
            ip_address: cols[1].to_string(),
            status: cols[2].to_string(),
            protocol: cols[3].to_string(),
            vrf_name: cols[4].to_string(),
        });
    }

    if result.interfaces.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct LldpNeighborRow {
    pub device_id: String,
    pub local_intf: String,
    pub hold_time: String,
    pub capability: String,
    pub port_id: String,
}

#[derive(Debug, Default, Serialize)]
pub struct LldpNeighbors {
    pub total_entries: i64,
    pub neighbors: Vec<LldpNeighborRow>,
}

static LLDP_TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Total\s+entries\s+displayed:\s*(\d+)").unwrap());

/// Parse `show lldp neighbors` output.
pub fn parse_lldp_neighbors(text: &str) -> ParseOutcome {
    let mut result = LldpNeighbors::default();

    if let Some(caps) = LLDP_TOTAL_RE.captures(text) {
        result.total_entries = int_or_zero(&caps[1]);
    }

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.starts_with("Capability")
            || line.starts_with('(')
            || line.starts_with("Device ID")
            || line.starts_with("Total")
        {
            continue;
        }

        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 5 {
            continue;
        }
        result.neighbors.push(LldpNeighborRow {
            device_id: cols[0].to_string(),
            local_intf: cols[1].to_string(),
            hold_time: cols[2].to_string(),
            capability: cols[3].to_string(),
            port_id: cols[4].to_string(),
        });
    }

    if result.neighbors.is_empty() && result.total_entries == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceDescriptionRow {
    pub interface: String,
    pub status: String,
    pub protocol: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct InterfaceDescriptions {
    pub interfaces: Vec<InterfaceDescriptionRow>,
}

/// Parse `show interface description` output.
pub fn parse_interface_description(text: &str) -> ParseOutcome {
    let mut result = InterfaceDescriptions::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("Interface") || line.starts_with('-') {
            continue;
        }

        let cols: Vec<&str> = COLUMN_GAP_RE.split(line).collect();
        if cols.len() < 3 {
            continue;
        }
        result.interfaces.push(InterfaceDescriptionRow {
            interface: cols[0].to_string(),
            status: cols[1].to_string(),
            protocol: cols[2].to_string(),
            description: cols.get(3).map(|c| c.to_string()),
        });
    }

    if result.interfaces.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}
