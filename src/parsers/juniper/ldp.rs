//! `show ldp neighbor` parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct LdpNeighbor {
    pub address: String,
    pub interface: String,
    pub label_space_id: String,
    pub hold_time: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct LdpNeighbors {
    pub neighbors: Vec<LdpNeighbor>,
}

static ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\.\d+\.\d+\.\d+)\s+(\S+)\s+(\S+)\s+(\d+)$").unwrap());

/// Parse `show ldp neighbor | no-more` output.
pub fn parse_ldp_neighbor(text: &str) -> ParseOutcome {
    let mut result = LdpNeighbors::default();

    for line in text.lines() {
        if line.contains("Address") || line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = ENTRY_RE.captures(line.trim()) {
            result.neighbors.push(LdpNeighbor {
                address: caps[1].to_string(),
                interface: caps[2].to_string(),
                label_space_id: caps[3].to_string(),
                hold_time: int_or_zero(&caps[4]),
            });
        }
    }

    if result.neighbors.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Address                             Interface       Label space ID     Hold time
10.210.8.1                          ge-0/0/0.0      10.255.0.1:0         11
10.210.8.5                          ge-0/0/1.0      10.255.0.2:0         13
";

    #[test]
    fn test_parse_ldp_neighbors() {
        let ParseOutcome::Parsed(v) = parse_ldp_neighbor(SAMPLE) else {
            panic!("expected parsed");
        };
        let neighbors = v["neighbors"].as_array().unwrap();
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0]["label_space_id"], "10.255.0.1:0");
        assert_eq!(neighbors[1]["hold_time"], 13);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert_eq!(
            parse_ldp_neighbor("Address Interface Label space ID Hold time\n"),
            ParseOutcome::Empty
        );
    }
}
