//! RSVP neighbor, session, and interface parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{FreeformOutput, ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct RsvpNeighborEntry {
    pub address: String,
    pub idle: i64,
    pub up_dn: String,
    pub last_change: String,
    pub hello_interval: i64,
    pub hello_tx_rx: String,
    pub msg_rcvd: i64,
}

#[derive(Debug, Default, Serialize)]
pub struct RsvpNeighbors {
    pub total_neighbors: i64,
    pub entries: Vec<RsvpNeighborEntry>,
}

static NEIGHBOR_TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"RSVP neighbor:\s+(\d+)\s+learned").unwrap());

/// Parse `show rsvp neighbor | no-more` output.
pub fn parse_rsvp_neighbor(text: &str) -> ParseOutcome {
    let mut result = RsvpNeighbors::default();

    if let Some(caps) = NEIGHBOR_TOTAL_RE.captures(text) {
        result.total_neighbors = int_or_zero(&caps[1]);
    }

    for line in text.lines() {
        if line.contains("Address") || line.contains("RSVP neighbor") || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        // Address, Idle, Up/Dn, date, time, HelloInt, HelloTx/Rx, MsgRcvd
        if fields.len() >= 8 {
            let (Ok(idle), Ok(hello_interval), Ok(msg_rcvd)) = (
                fields[1].parse::<i64>(),
                fields[5].parse::<i64>(),
                fields[7].parse::<i64>(),
            ) else {
                continue;
            };
            result.entries.push(RsvpNeighborEntry {
                address: fields[0].to_string(),
                idle,
                up_dn: fields[2].to_string(),
                last_change: format!("{} {}", fields[3], fields[4]),
                hello_interval,
                hello_tx_rx: fields[6].to_string(),
                msg_rcvd,
            });
        }
    }

    if result.entries.is_empty() && result.total_neighbors == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct RsvpSessionEntry {
    pub to: String,
    pub from: String,
    pub state: String,
    pub rt: i64,
    pub style: String,
    pub label_in: String,
    pub label_out: String,
    pub lsp_name: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RsvpSessionTable {
    pub ingress_sessions: i64,
    pub ingress_up: i64,
    pub ingress_down: i64,
    pub ingress_entries: Vec<RsvpSessionEntry>,
    pub egress_sessions: i64,
    pub egress_up: i64,
    pub egress_down: i64,
    pub egress_entries: Vec<RsvpSessionEntry>,
    pub transit_sessions: i64,
    pub transit_up: i64,
    pub transit_down: i64,
    pub transit_entries: Vec<RsvpSessionEntry>,
}

static SESSION_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)(\d+\.\d+\.\d+\.\d+)\s+(\d+\.\d+\.\d+\.\d+)\s+(\w+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(.+)$",
    )
    .unwrap()
});

static SESSION_TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Total\s+(\d+)\s+displayed,\s+Up\s+(\d+),\s+Down\s+(\d+)").unwrap()
});

fn section_header_count(text: &str, header: &str) -> i64 {
    let pattern = format!(r"{header}:\s+(\d+)\s+sessions");
    match Regex::new(&pattern) {
        Ok(re) => re
            .captures(text)
            .map(|caps| int_or_zero(&caps[1]))
            .unwrap_or(0),
        Err(_) => 0,
    }
}

fn session_entries(section: &str) -> Vec<RsvpSessionEntry> {
    SESSION_ENTRY_RE
        .captures_iter(section)
        .map(|caps| RsvpSessionEntry {
            to: caps[1].to_string(),
            from: caps[2].to_string(),
            state: caps[3].to_string(),
            rt: int_or_zero(&caps[4]),
            style: format!("{} {}", &caps[5], &caps[6]),
            label_in: caps[7].to_string(),
            label_out: caps[8].to_string(),
            lsp_name: caps[9].trim().to_string(),
        })
        .collect()
}

fn section_between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let body = text.split(start).nth(1)?;
    Some(body.split(end).next().unwrap_or(body))
}

/// Parse `show rsvp session | no-more` output into ingress, egress, and
/// transit sections.
pub fn parse_rsvp_session(text: &str) -> ParseOutcome {
    let mut result = RsvpSessionTable {
        ingress_sessions: section_header_count(text, "Ingress RSVP"),
        egress_sessions: section_header_count(text, "Egress RSVP"),
        transit_sessions: section_header_count(text, "Transit RSVP"),
        ..RsvpSessionTable::default()
    };

    let before_egress = text.split("Egress RSVP:").next().unwrap_or(text);
    if let Some(caps) = SESSION_TOTAL_RE.captures(before_egress) {
        result.ingress_up = int_or_zero(&caps[2]);
        result.ingress_down = int_or_zero(&caps[3]);
    }

    if let Some(section) = section_between(text, "Ingress RSVP:", "Egress RSVP:") {
        result.ingress_entries = session_entries(section);
    }

    if let Some(section) = section_between(text, "Egress RSVP:", "Transit RSVP:") {
        result.egress_entries = session_entries(section);
        if let Some(caps) = SESSION_TOTAL_RE.captures(section) {
            result.egress_up = int_or_zero(&caps[2]);
            result.egress_down = int_or_zero(&caps[3]);
        }
    }

    if let Some(section) = text.split("Transit RSVP:").nth(1) {
        result.transit_entries = session_entries(section);
        match SESSION_TOTAL_RE.captures(section) {
            Some(caps) => {
                result.transit_up = int_or_zero(&caps[2]);
                result.transit_down = int_or_zero(&caps[3]);
            }
            // No summary line after the transit table, count the rows.
            None => {
                result.transit_up = result
                    .transit_entries
                    .iter()
                    .filter(|e| e.state == "Up")
                    .count() as i64;
                result.transit_down = result
                    .transit_entries
                    .iter()
                    .filter(|e| e.state == "Down")
                    .count() as i64;
            }
        }
    }

    if result.ingress_sessions == 0
        && result.egress_sessions == 0
        && result.transit_sessions == 0
        && result.ingress_entries.is_empty()
        && result.egress_entries.is_empty()
        && result.transit_entries.is_empty()
    {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

/// Filtered session listing kept verbatim for diffing between phases.
pub fn parse_rsvp_session_match_dn(text: &str) -> ParseOutcome {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.to_lowercase().contains("empty") {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(FreeformOutput {
        output: trimmed.to_string(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct RsvpInterfaceEntry {
    pub interface: String,
    pub active_state: String,
    pub active_reservations: i64,
    pub subscription: String,
    pub static_bw: String,
    pub available_bw: String,
    pub reserved_bw: String,
    pub highwater_mark: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RsvpInterfaces {
    pub total_interfaces: i64,
    pub interfaces: Vec<RsvpInterfaceEntry>,
}

static INTERFACE_TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"RSVP interface:\s+(\d+)\s+active").unwrap());

static INTERFACE_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\S+)\s+(Up|Down)\s+(\d+)\s+(\d+%)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s*$")
        .unwrap()
});

/// Parse `show rsvp interface | no-more` output.
pub fn parse_rsvp(text: &str) -> ParseOutcome {
    let mut result = RsvpInterfaces::default();

    if let Some(caps) = INTERFACE_TOTAL_RE.captures(text) {
        result.total_interfaces = int_or_zero(&caps[1]);
    }

    for caps in INTERFACE_ENTRY_RE.captures_iter(text) {
        result.interfaces.push(RsvpInterfaceEntry {
            interface: caps[1].to_string(),
            active_state: caps[2].to_string(),
            active_reservations: int_or_zero(&caps[3]),
            subscription: caps[4].to_string(),
            static_bw: caps[5].to_string(),
            available_bw: caps[6].to_string(),
            reserved_bw: caps[7].to_string(),
            highwater_mark: caps[8].to_string(),
        });
    }

    if result.interfaces.is_empty() && result.total_interfaces == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}
