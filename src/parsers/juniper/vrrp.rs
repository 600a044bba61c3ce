//! `show vrrp summary` parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct VrrpAddress {
    #[serde(rename = "type")]
    pub addr_type: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VrrpEntry {
    pub interface: String,
    pub state: String,
    pub group: i64,
    pub vr_state: String,
    pub vr_mode: String,
    pub addresses: Vec<VrrpAddress>,
}

#[derive(Debug, Default, Serialize)]
pub struct VrrpSummary {
    pub entries: Vec<VrrpEntry>,
}

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<interface>\S+)\s+(?P<state>\S+)\s+(?P<group>\d+)\s+(?P<vr_state>\S+)\s+(?P<vr_mode>\S+)\s+(?P<addr_type>lcl|vip)\s+(?P<address>\d+\.\d+\.\d+\.\d+)",
    )
    .unwrap()
});

// Continuation lines carry only an indented lcl/vip address for the entry above.
static CONT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s+(?P<addr_type>lcl|vip)\s+(?P<address>\d+\.\d+\.\d+\.\d+)").unwrap()
});

/// Parse `show vrrp summary | no-more` output.
pub fn parse_vrrp_summary(text: &str) -> ParseOutcome {
    let mut result = VrrpSummary::default();

    for line in text.lines() {
        if let Some(caps) = HEADER_RE.captures(line) {
            result.entries.push(VrrpEntry {
                interface: caps["interface"].to_string(),
                state: caps["state"].to_string(),
                group: int_or_zero(&caps["group"]),
                vr_state: caps["vr_state"].to_string(),
                vr_mode: caps["vr_mode"].to_string(),
                addresses: vec![VrrpAddress {
                    addr_type: caps["addr_type"].to_lowercase(),
                    address: caps["address"].to_string(),
                }],
            });
            continue;
        }

        if let Some(caps) = CONT_RE.captures(line) {
            if let Some(current) = result.entries.last_mut() {
                current.addresses.push(VrrpAddress {
                    addr_type: caps["addr_type"].to_lowercase(),
                    address: caps["address"].to_string(),
                });
            }
        }
    }

    if result.entries.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}
