//! `show arp no-resolve` parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct ArpEntry {
    pub mac_address: String,
    pub ip_address: String,
    pub interface: String,
    pub flags: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ArpTable {
    pub entries: Vec<ArpEntry>,
    pub total_entries: i64,
}

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([0-9a-f:]{17})\s+(\d+\.\d+\.\d+\.\d+)\s+(\S+)\s+(\S+)").unwrap()
});

static TOTAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Total entries:\s*(\d+)").unwrap());

/// Parse `show arp no-resolve | no-more` output into MAC/IP rows.
pub fn parse_arp_no_resolve(text: &str) -> ParseOutcome {
    let mut result = ArpTable::default();

    for caps in ENTRY_RE.captures_iter(text) {
        result.entries.push(ArpEntry {
            mac_address: caps[1].to_string(),
            ip_address: caps[2].to_string(),
            interface: caps[3].to_string(),
            flags: caps[4].to_string(),
        });
    }

    result.total_entries = match TOTAL_RE.captures(text) {
        Some(caps) => int_or_zero(&caps[1]),
        None => result.entries.len() as i64,
    };

    if result.entries.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
MAC Address       Address         Interface                Flags
56:04:15:00:a2:01 10.210.8.1      ge-0/0/0.0               none
56:04:15:00:b3:02 10.210.8.5     ge-0/0/1.0               none
aa:bb:cc:dd:ee:ff 192.168.77.20   fxp0.0                   permanent
Total entries: 3
";

    #[test]
    fn test_parse_arp_rows() {
        let outcome = parse_arp_no_resolve(SAMPLE);
        let ParseOutcome::Parsed(v) = outcome else {
            panic!("expected parsed");
        };
        assert_eq!(v["entries"].as_array().unwrap().len(), 3);
        assert_eq!(v["total_entries"], 3);
        assert_eq!(v["entries"][0]["mac_address"], "56:04:15:00:a2:01");
        assert_eq!(v["entries"][2]["interface"], "fxp0.0");
        assert_eq!(v["entries"][2]["flags"], "permanent");
    }

    #[test]
    fn test_total_falls_back_to_row_count() {
        let sample = "56:04:15:00:a2:01 10.210.8.1 ge-0/0/0.0 none\n";
        let ParseOutcome::Parsed(v) = parse_arp_no_resolve(sample) else {
            panic!("expected parsed");
        };
        assert_eq!(v["total_entries"], 1);
    }

    #[test]
    fn test_empty_output_is_empty_outcome() {
        assert_eq!(parse_arp_no_resolve("error: syntax"), ParseOutcome::Empty);
    }
}
