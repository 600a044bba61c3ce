//! `show bfd session` parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct BfdSessionEntry {
    pub address: String,
    pub state: String,
    pub interface: String,
    pub detect_time: String,
    pub transmit_interval: String,
    pub multiplier: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BfdSessions {
    pub entries: Vec<BfdSessionEntry>,
    pub total_sessions: i64,
    pub total_clients: i64,
}

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.\d+\.\d+\.\d+)\s+(\S+)\s+(\S+)\s+([\d.]+)\s+([\d.]+)\s+(\d+)").unwrap()
});

static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+sessions?,\s+(\d+)\s+clients?").unwrap());

/// Parse `show bfd session | no-more` output.
pub fn parse_bfd_session(text: &str) -> ParseOutcome {
    let mut result = BfdSessions::default();

    for caps in ENTRY_RE.captures_iter(text) {
        result.entries.push(BfdSessionEntry {
            address: caps[1].to_string(),
            state: caps[2].to_string(),
            interface: caps[3].to_string(),
            detect_time: caps[4].to_string(),
            transmit_interval: caps[5].to_string(),
            multiplier: caps[6].to_string(),
        });
    }

    if let Some(caps) = SUMMARY_RE.captures(text) {
        result.total_sessions = int_or_zero(&caps[1]);
        result.total_clients = int_or_zero(&caps[2]);
    }

    if result.entries.is_empty() && result.total_sessions == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
                                                  Detect   Transmit
Address                  State     Interface      Time     Interval  Multiplier
10.210.8.1               Up        ge-0/0/0.0     1.500     0.500        3
10.210.8.5               Up        ge-0/0/1.0     1.500     0.500        3
2 sessions, 2 clients
Cumulative transmit rate 4.0 pps, cumulative receive rate 4.0 pps
";

    #[test]
    fn test_parse_bfd_sessions() {
        let ParseOutcome::Parsed(v) = parse_bfd_session(SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["entries"].as_array().unwrap().len(), 2);
        assert_eq!(v["total_sessions"], 2);
        assert_eq!(v["total_clients"], 2);
        assert_eq!(v["entries"][0]["state"], "Up");
        assert_eq!(v["entries"][1]["interface"], "ge-0/0/1.0");
    }

    #[test]
    fn test_no_sessions_is_empty() {
        assert_eq!(parse_bfd_session("0 sessions, 0 clients\n"), ParseOutcome::Empty);
    }
}
