//! `show install active summary` and `show install committed summary`
//! parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Default, Serialize)]
pub struct InstallActiveSummary {
    pub active_packages: i64,
    pub packages: Vec<String>,
}

static ACTIVE_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Active Packages:\s*(\d+)").unwrap());

static COMMITTED_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Committed Packages:\s*(\d+)").unwrap());

fn indented_packages(text: &str, skip_prefixes: &[&str]) -> Vec<String> {
    let mut packages = Vec::new();
    for line in text.lines() {
        if !line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if skip_prefixes.iter().any(|p| token.starts_with(p)) {
            continue;
        }
        packages.push(token.to_string());
    }
    packages
}

/// Parse `show install active summary` output.
pub fn parse_install_active_summary(text: &str) -> ParseOutcome {
    let mut result = InstallActiveSummary::default();

    if let Some(caps) = ACTIVE_COUNT_RE.captures(text) {
        result.active_packages = int_or_zero(&caps[1]);
    }
    result.packages = indented_packages(text, &["Active", "Mon"]);

    if result.packages.is_empty() && result.active_packages == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Default, Serialize)]
pub struct InstallCommittedSummary {
    pub committed_packages: i64,
    pub packages: Vec<String>,
}

/// Parse `show install committed summary` output.
pub fn parse_install_committed_summary(text: &str) -> ParseOutcome {
    let mut result = InstallCommittedSummary::default();

    if let Some(caps) = COMMITTED_COUNT_RE.captures(text) {
        result.committed_packages = int_or_zero(&caps[1]);
    }
    result.packages = indented_packages(text, &[]);

    if result.packages.is_empty() && result.committed_packages == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVE_SAMPLE: &str = "\
Mon Dec 16 10:20:30.123 UTC
    Active Packages: 3
        ncs5500-xr-7.3.2 version=7.3.2 [Boot image]
        ncs5500-mpls-te-rsvp-2.1.0.0-r732
        ncs5500-mcast-3.1.0.0-r732
";

    #[test]
    fn test_parse_active_summary() {
        let ParseOutcome::Parsed(v) = parse_install_active_summary(ACTIVE_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["active_packages"], 3);
        let packages = v["packages"].as_array().unwrap();
        assert_eq!(packages.len(), 3);
        assert_eq!(packages[0], "ncs5500-xr-7.3.2");
        assert_eq!(packages[2], "ncs5500-mcast-3.1.0.0-r732");
    }

    const COMMITTED_SAMPLE: &str = "\
Committed Packages: 2
    ncs5500-xr-7.3.2 version=7.3.2 [Boot image]
    ncs5500-mpls-te-rsvp-2.1.0.0-r732
";

    #[test]
    fn test_parse_committed_summary() {
        let ParseOutcome::Parsed(v) = parse_install_committed_summary(COMMITTED_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["committed_packages"], 2);
        assert_eq!(v["packages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(parse_install_active_summary(""), ParseOutcome::Empty);
    }
}
