//! `show isis adjacency extensive` parser.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct AdjSid {
    pub level: String,
    pub ip_version: String,
    pub protection: String,
    pub sid: String,
    pub flags: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionLogEntry {
    pub when: String,
    pub state: String,
    pub event: String,
    pub down_reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IsisAdjacency {
    pub system_name: String,
    pub interface: String,
    pub level: String,
    pub state: String,
    pub expires_in: String,
    pub priority: String,
    pub up_down_transitions: i64,
    pub last_transition: String,
    pub circuit_type: String,
    pub speaks: String,
    pub topologies: String,
    pub restart_capable: String,
    pub adjacency_advertisement: String,
    pub ip_addresses: Vec<String>,
    pub adj_sids: Vec<AdjSid>,
    pub transition_log: Vec<TransitionLogEntry>,
}

#[derive(Debug, Default, Serialize)]
pub struct IsisAdjacencies {
    pub entries: Vec<IsisAdjacency>,
}

static SECTION_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n([A-Z0-9]+\n\s+Interface:)").unwrap());

static SYSTEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z0-9-]+)").unwrap());
static INTERFACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Interface:\s+(\S+),").unwrap());
static LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Level:\s+(\d+)").unwrap());
static STATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"State:\s+(\w+)").unwrap());
static EXPIRES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Expires in\s+(\d+\s+secs)").unwrap());
static PRIORITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Priority:\s+(\d+)").unwrap());
static TRANSITIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Up/Down transitions:\s+(\d+)").unwrap());
static LAST_TRANSITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Last transition:\s+(.+?)(?:\n|$)").unwrap());
static CIRCUIT_TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Circuit type:\s+(\d+)").unwrap());
static SPEAKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Speaks:\s+(.+?)\n").unwrap());
static TOPOLOGIES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Topologies:\s+(.+)").unwrap());
static RESTART_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Restart capable:\s+(\w+)").unwrap());
static ADJ_ADV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Adjacency advertisement:\s+(.+)").unwrap());
static IP_ADDR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"IP addresses:\s+(.+)").unwrap());

static ADJ_SID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Level\s+(\d+)\s+(IPv[46])\s+(\w+)\s+Adj-SID:\s+(\d+),\s+Flags:\s+(.+)").unwrap()
});

static TRANSITION_LOG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Transition log:\s*\n\s+When\s+State\s+Event\s+Down reason\s*\n((?:\s+\S.*\n?)+)")
        .unwrap()
});

// "Thu Feb  6 12:35:10" style, day of month may be a single digit.
static LOG_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s+(\w{3}\s+\w{3}\s+\d{1,2}\s+\d+:\d+:\d+)\s+(\w+)\s+(.+)").unwrap()
});

static COLUMN_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

fn capture_str(re: &Regex, section: &str) -> String {
    re.captures(section)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

fn transition_log(section: &str) -> Vec<TransitionLogEntry> {
    let Some(caps) = TRANSITION_LOG_RE.captures(section) else {
        return Vec::new();
    };
    let mut log = Vec::new();
    for line in caps[1].lines() {
        let Some(m) = LOG_LINE_RE.captures(line) else {
            continue;
        };
        let rest = m[3].trim();
        // Event and down reason are separated by at least two spaces.
        let mut parts = COLUMN_GAP_RE.splitn(rest, 2);
        let event = parts.next().unwrap_or("").trim().to_string();
        let down_reason = parts.next().unwrap_or("").trim().to_string();
        log.push(TransitionLogEntry {
            when: m[1].to_string(),
            state: m[2].to_string(),
            event,
            down_reason,
        });
    }
    log
}

/// Parse `show isis adjacency extensive | no-more` output. Each adjacency is
/// a block headed by the neighbor system name.
pub fn parse_isis_adjacency_extensive(text: &str) -> ParseOutcome {
    let mut result = IsisAdjacencies::default();

    // Re-join the split markers so each section keeps its header.
    let marked = SECTION_SPLIT_RE.replace_all(text, "\n\u{0}$1");
    for section in marked.split('\u{0}') {
        if section.trim().is_empty() {
            continue;
        }
        let Some(system) = SYSTEM_RE.captures(section) else {
            continue;
        };
        if !section.contains("Interface:") {
            continue;
        }

        let mut entry = IsisAdjacency {
            system_name: system[1].to_string(),
            interface: capture_str(&INTERFACE_RE, section),
            level: capture_str(&LEVEL_RE, section),
            state: capture_str(&STATE_RE, section),
            expires_in: capture_str(&EXPIRES_RE, section),
            priority: capture_str(&PRIORITY_RE, section),
            last_transition: capture_str(&LAST_TRANSITION_RE, section),
            circuit_type: capture_str(&CIRCUIT_TYPE_RE, section),
            speaks: capture_str(&SPEAKS_RE, section),
            topologies: capture_str(&TOPOLOGIES_RE, section),
            restart_capable: capture_str(&RESTART_RE, section),
            adjacency_advertisement: capture_str(&ADJ_ADV_RE, section),
            ..IsisAdjacency::default()
        };

        if let Some(caps) = TRANSITIONS_RE.captures(section) {
            entry.up_down_transitions = int_or_zero(&caps[1]);
        }
        if let Some(caps) = IP_ADDR_RE.captures(section) {
            entry.ip_addresses = vec![caps[1].trim().to_string()];
        }

        for caps in ADJ_SID_RE.captures_iter(section) {
            entry.adj_sids.push(AdjSid {
                level: caps[1].to_string(),
                ip_version: caps[2].to_string(),
                protection: caps[3].to_string(),
                sid: caps[4].to_string(),
                flags: caps[5].trim().to_string(),
            });
        }

        entry.transition_log = transition_log(section);
        result.entries.push(entry);
    }

    if result.entries.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
CORE1
  Interface: ge-0/0/0.0, Level: 2, State: Up, Expires in 24 secs
  Priority: 64, Up/Down transitions: 3, Last transition: 3w0d 05:11:42 ago
  Circuit type: 2, Speaks: IP, IPv6
  Topologies: Unicast
  Restart capable: yes, Adjacency advertisement: Advertise
  IP addresses: 10.210.8.1
  Level 2 IPv4 Adj-SID: 16001, Flags: --VL--
  Transition log:
  When                  State        Event           Down reason
  Thu Feb  6 12:35:10   Up           Seenself
  Tue May  6 02:40:15   Down         Interface Down  Interface Down
CORE2
  Interface: ge-0/0/1.0, Level: 2, State: Up, Expires in 19 secs
  Priority: 64, Up/Down transitions: 1, Last transition: 10w2d 12:30:01 ago
  Circuit type: 2, Speaks: IP
  Topologies: Unicast
  Restart capable: yes, Adjacency advertisement: Advertise
  IP addresses: 10.210.8.5
";

    #[test]
    fn test_parse_adjacency_sections() {
        let ParseOutcome::Parsed(v) = parse_isis_adjacency_extensive(SAMPLE) else {
            panic!("expected parsed");
        };
        let entries = v["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["system_name"], "CORE1");
        assert_eq!(entries[0]["interface"], "ge-0/0/0.0");
        assert_eq!(entries[0]["up_down_transitions"], 3);
        assert_eq!(entries[0]["speaks"], "IP, IPv6");
        assert_eq!(entries[0]["adj_sids"][0]["sid"], "16001");
        assert_eq!(entries[1]["system_name"], "CORE2");
        assert_eq!(entries[1]["ip_addresses"][0], "10.210.8.5");
    }

    #[test]
    fn test_transition_log_columns() {
        let ParseOutcome::Parsed(v) = parse_isis_adjacency_extensive(SAMPLE) else {
            panic!("expected parsed");
        };
        let log = v["entries"][0]["transition_log"].as_array().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0]["when"], "Thu Feb  6 12:35:10");
        assert_eq!(log[0]["event"], "Seenself");
        assert_eq!(log[0]["down_reason"], "");
        assert_eq!(log[1]["state"], "Down");
        assert_eq!(log[1]["event"], "Interface Down");
        assert_eq!(log[1]["down_reason"], "Interface Down");
    }

    #[test]
    fn test_no_adjacencies_is_empty() {
        assert_eq!(parse_isis_adjacency_extensive(""), ParseOutcome::Empty);
    }
}
