//! `show route summary` and `show isis adjacency` parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct RouteSourceSummary {
    pub route_source: String,
    pub routes: String,
    pub backup: String,
    pub deleted: String,
    pub memory: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RouteSummary {
    pub sources: Vec<RouteSourceSummary>,
}

static COLUMN_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Parse `show route summary` output.
pub fn parse_route_summary(text: &str) -> ParseOutcome {
    let mut result = RouteSummary::default();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("Route") {
            continue;
        }

        let cols: Vec<&str> = COLUMN_GAP_RE.split(line).collect();
        if cols.len() < 5 {
            continue;
        }
        result.sources.push(RouteSourceSummary {
            route_source: cols[0].to_string(),
            routes: cols[1].to_string(),
            backup: cols[2].to_string(),
            deleted: cols[3].to_string(),
            memory: cols[4].to_string(),
        });
    }

    if result.sources.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct IsisAdjacencyRow {
    pub system_id: String,
    pub interface: String,
    pub snpa: String,
    pub state: String,
    pub hold: String,
    pub changed: String,
    pub nsf: String,
    pub ipv4_bfd: String,
    pub ipv6_bfd: String,
}

#[derive(Debug, Default, Serialize)]
pub struct IsisAdjacencies {
    pub adjacency_level: i64,
    pub adjacencies: Vec<IsisAdjacencyRow>,
    pub total_adjacency: i64,
}

static LEVEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"IS-IS\s\S+\sLevel-(\d+)").unwrap());

static TOTAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Total\s+adjacency\s+count:\s*(\d+)").unwrap());

/// Parse `show isis adjacency` output.
pub fn parse_isis_adjacency(text: &str) -> ParseOutcome {
    let mut result = IsisAdjacencies::default();

    if let Some(caps) = LEVEL_RE.captures(text) {
        result.adjacency_level = int_or_zero(&caps[1]);
    }
    if let Some(caps) = TOTAL_RE.captures(text) {
        result.total_adjacency = int_or_zero(&caps[1]);
    }

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.starts_with("System")
            || line.starts_with("IS-IS")
            || line.starts_with("Total")
            || line.starts_with("BFD")
        {
            continue;
        }

        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 9 {
            continue;
        }
        result.adjacencies.push(IsisAdjacencyRow {
            system_id: cols[0].to_string(),
            interface: cols[1].to_string(),
            snpa: cols[2].to_string(),
            state: cols[3].to_string(),
            hold: cols[4].to_string(),
            changed: cols[5].to_string(),
            nsf: cols[6].to_string(),
            ipv4_bfd: cols[7].to_string(),
            ipv6_bfd: cols[8].to_string(),
        });
    }

    if result.adjacencies.is_empty() && result.total_adjacency == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}
