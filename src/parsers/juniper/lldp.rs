//! `show lldp neighbors` parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::ParseOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct LldpNeighbor {
    pub local_interface: String,
    pub parent_interface: String,
    pub chassis_id: String,
    pub port_info: String,
    pub system_name: String,
}

#[derive(Debug, Default, Serialize)]
pub struct LldpNeighbors {
    pub entries: Vec<LldpNeighbor>,
}

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\S+)\s+(\S+)\s+([0-9a-f:]{17})\s+(\S+)\s+(.+)$").unwrap()
});

/// Parse `show lldp neighbors | no-more` output.
pub fn parse_lldp_neighbors(text: &str) -> ParseOutcome {
    let mut result = LldpNeighbors::default();

    for caps in ENTRY_RE.captures_iter(text) {
        result.entries.push(LldpNeighbor {
            local_interface: caps[1].to_string(),
            parent_interface: caps[2].to_string(),
            chassis_id: caps[3].to_string(),
            port_info: caps[4].to_string(),
            system_name: caps[5].trim().to_string(),
        });
    }

    if result.entries.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}
