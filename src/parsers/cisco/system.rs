//! `show media` and `show watchdog memory-state` parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::ParseOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct MediaPartition {
    pub partition: String,
    pub size: String,
    pub used: String,
    pub percent: String,
    pub avail: String,
}

#[derive(Debug, Default, Serialize)]
pub struct MediaInfo {
    pub media_location: String,
    pub partitions: Vec<MediaPartition>,
}

static MEDIA_LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Media Info for Location:\s*([A-Za-z0-9_-]+)$").unwrap());

static COLUMN_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Parse `show media` output.
pub fn parse_media(text: &str) -> ParseOutcome {
    let mut result = MediaInfo::default();

    if let Some(caps) = MEDIA_LOCATION_RE.captures(text) {
        result.media_location = caps[1].to_string();
    }

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.starts_with('-')
            || line.starts_with("Partition")
            || line.starts_with("Media")
        {
            continue;
        }

        let cols: Vec<&str> = COLUMN_GAP_RE.split(line).collect();
        if cols.len() < 5 {
            continue;
        }
        result.partitions.push(MediaPartition {
            partition: cols[0].to_string(),
            size: cols[1].to_string(),
            used: cols[2].to_string(),
            percent: cols[3].to_string(),
            avail: cols[4].to_string(),
        });
    }

    if result.partitions.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeMemoryInfo {
    pub physical_mem: String,
    pub free_mem: String,
    pub memory_state: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeMemoryState {
    pub node_name: String,
    pub memory_info: Vec<NodeMemoryInfo>,
}

#[derive(Debug, Default, Serialize)]
pub struct WatchdogMemoryState {
    pub nodes: Vec<NodeMemoryState>,
}

static WATCHDOG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"----\s*(?P<section>[^-]+?)\s*----\s*Memory information:\s\s*Physical Memory\s*:\s*(?P<physical>[\d.]+)\s*MB\s*\s*Free Memory\s*:\s*(?P<free>[\d.]+)\s*MB\s*\s*Memory State\s*:\s*(?P<state>\w+)",
    )
    .unwrap()
});

/// Parse `show watchdog memory-state location all` output, one block per
/// node.
pub fn parse_watchdog_memory_state(text: &str) -> ParseOutcome {
    let mut result = WatchdogMemoryState::default();

    for caps in WATCHDOG_RE.captures_iter(text) {
        result.nodes.push(NodeMemoryState {
            node_name: caps["section"].trim().to_string(),
            memory_info: vec![NodeMemoryInfo {
                physical_mem: caps["physical"].to_string(),
                free_mem: caps["free"].to_string(),
                memory_state: caps["state"].to_string(),
            }],
        });
    }

    if result.nodes.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}
