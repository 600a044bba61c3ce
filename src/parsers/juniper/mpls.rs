//! MPLS interface and label-switched-path parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{FreeformOutput, ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct MplsInterfaceEntry {
    pub interface: String,
    pub state: String,
    pub administrative_groups: String,
}

#[derive(Debug, Default, Serialize)]
pub struct MplsInterfaces {
    pub entries: Vec<MplsInterfaceEntry>,
}

static INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\S+)\s+(Up|Down)\s+(.*)$").unwrap());

/// Parse `show mpls interface | no-more` output.
pub fn parse_mpls_interface(text: &str) -> ParseOutcome {
    let mut result = MplsInterfaces::default();

    for caps in INTERFACE_RE.captures_iter(text) {
        if &caps[1] == "Interface" {
            continue;
        }
        result.entries.push(MplsInterfaceEntry {
            interface: caps[1].to_string(),
            state: caps[2].to_string(),
            administrative_groups: caps[3].trim().to_string(),
        });
    }

    if result.entries.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct LspIngressEntry {
    pub to: String,
    pub from: String,
    pub state: String,
    pub rt: i64,
    pub p: String,
    pub active_path: String,
    pub lsp_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LspLabelEntry {
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
pub struct MplsLspTable {
    pub ingress_sessions: i64,
    pub ingress_up: i64,
    pub ingress_down: i64,
    pub ingress_entries: Vec<LspIngressEntry>,
    pub egress_sessions: i64,
    pub egress_up: i64,
    pub egress_down: i64,
    pub egress_entries: Vec<LspLabelEntry>,
    pub transit_sessions: i64,
    pub transit_up: i64,
    pub transit_down: i64,
    pub transit_entries: Vec<LspLabelEntry>,
}

static LSP_TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Total\s+(\d+)\s+displayed,\s+Up\s+(\d+),\s+Down\s+(\d+)").unwrap()
});

// Ingress rows have an empty ActivePath column before the LSP name.
static INGRESS_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(\d+\.\d+\.\d+\.\d+)\s+(\d+\.\d+\.\d+\.\d+)\s+(\w+)\s+(\d+)\s+(\*|\s+)\s+(.+)$")
        .unwrap()
});

static LABEL_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)(\d+\.\d+\.\d+\.\d+)\s+(\d+\.\d+\.\d+\.\d+)\s+(\w+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(.+?)$",
    )
    .unwrap()
});

fn lsp_header_count(text: &str, header: &str) -> i64 {
    let pattern = format!(r"{header}:\s+(\d+)\s+sessions");
    match Regex::new(&pattern) {
        Ok(re) => re
            .captures(text)
            .map(|caps| int_or_zero(&caps[1]))
            .unwrap_or(0),
        Err(_) => 0,
    }
}

fn label_entries(section: &str) -> Vec<LspLabelEntry> {
    LABEL_ENTRY_RE
        .captures_iter(section)
        .map(|caps| LspLabelEntry {
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

/// Parse `show mpls lsp | no-more` output into ingress, egress, and transit
/// sections.
pub fn parse_mpls_lsp(text: &str) -> ParseOutcome {
    let mut result = MplsLspTable {
        ingress_sessions: lsp_header_count(text, "Ingress LSP"),
        egress_sessions: lsp_header_count(text, "Egress LSP"),
        transit_sessions: lsp_header_count(text, "Transit LSP"),
        ..MplsLspTable::default()
    };

    let before_egress = text.split("Egress LSP:").next().unwrap_or(text);
    if let Some(caps) = LSP_TOTAL_RE.captures(before_egress) {
        result.ingress_up = int_or_zero(&caps[2]);
        result.ingress_down = int_or_zero(&caps[3]);
    }

    if let Some(section) = section_between(text, "Ingress LSP:", "Egress LSP:") {
        for caps in INGRESS_ENTRY_RE.captures_iter(section) {
            result.ingress_entries.push(LspIngressEntry {
                to: caps[1].to_string(),
                from: caps[2].to_string(),
                state: caps[3].to_string(),
                rt: int_or_zero(&caps[4]),
                p: caps[5].trim().to_string(),
                active_path: String::new(),
                lsp_name: caps[6].trim().to_string(),
            });
        }
    }

    if let Some(section) = section_between(text, "Egress LSP:", "Transit LSP:") {
        result.egress_entries = label_entries(section);
        if let Some(caps) = LSP_TOTAL_RE.captures(section) {
            result.egress_up = int_or_zero(&caps[2]);
            result.egress_down = int_or_zero(&caps[3]);
        }
    }

    if let Some(section) = text.split("Transit LSP:").nth(1) {
        result.transit_entries = label_entries(section);
        match LSP_TOTAL_RE.captures(section) {
            Some(caps) => {
                result.transit_up = int_or_zero(&caps[2]);
                result.transit_down = int_or_zero(&caps[3]);
            }
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

#[derive(Debug, Clone, Serialize)]
pub struct P2mpIngressBranch {
    pub to: String,
    pub from: String,
    pub state: String,
    pub rt: i64,
    pub p: String,
    pub active_path: String,
    pub lsp_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum P2mpBranch {
    Ingress(P2mpIngressBranch),
    Label(LspLabelEntry),
}

#[derive(Debug, Clone, Serialize)]
pub struct P2mpSession {
    pub p2mp_name: String,
    pub branch_count: i64,
    pub branches: Vec<P2mpBranch>,
}

#[derive(Debug, Default, Serialize)]
pub struct P2mpSectionSummary {
    pub total_sessions: i64,
    pub sessions_displayed: i64,
    pub sessions_up: i64,
    pub sessions_down: i64,
    pub sessions: Vec<P2mpSession>,
}

#[derive(Debug, Default, Serialize)]
pub struct MplsLspP2mp {
    pub ingress_lsp: P2mpSectionSummary,
    pub egress_lsp: P2mpSectionSummary,
    pub transit_lsp: P2mpSectionSummary,
}

static P2MP_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?),\s+P2MP branch count:\s+(\d+)").unwrap());

fn p2mp_sessions(section: &str, ingress: bool) -> Vec<P2mpSession> {
    let mut sessions = Vec::new();
    for session_text in section.split("P2MP name:").skip(1) {
        let mut lines = session_text.trim().lines();
        let Some(first_line) = lines.next() else {
            continue;
        };
        let Some(caps) = P2MP_NAME_RE.captures(first_line) else {
            continue;
        };

        let mut session = P2mpSession {
            p2mp_name: caps[1].trim().to_string(),
            branch_count: int_or_zero(&caps[2]),
            branches: Vec::new(),
        };

        for line in lines {
            if line.trim().starts_with("To") {
                continue;
            }
            if ingress {
                if let Some(b) = INGRESS_ENTRY_RE.captures(line) {
                    session.branches.push(P2mpBranch::Ingress(P2mpIngressBranch {
                        to: b[1].to_string(),
                        from: b[2].to_string(),
                        state: b[3].to_string(),
                        rt: int_or_zero(&b[4]),
                        p: b[5].trim().to_string(),
                        active_path: String::new(),
                        lsp_name: b[6].trim().to_string(),
                    }));
                }
            } else if let Some(b) = LABEL_ENTRY_RE.captures(line) {
                session.branches.push(P2mpBranch::Label(LspLabelEntry {
                    to: b[1].to_string(),
                    from: b[2].to_string(),
                    state: b[3].to_string(),
                    rt: int_or_zero(&b[4]),
                    style: format!("{} {}", &b[5], &b[6]),
                    label_in: b[7].to_string(),
                    label_out: b[8].to_string(),
                    lsp_name: b[9].trim().to_string(),
                }));
            }
        }
        sessions.push(session);
    }
    sessions
}

fn branch_state(branch: &P2mpBranch) -> &str {
    match branch {
        P2mpBranch::Ingress(b) => &b.state,
        P2mpBranch::Label(b) => &b.state,
    }
}

/// Parse `show mpls lsp p2mp | no-more` output. Each section groups branches
/// under a P2MP session name.
pub fn parse_mpls_lsp_p2mp(text: &str) -> ParseOutcome {
    let mut result = MplsLspP2mp {
        ingress_lsp: P2mpSectionSummary {
            total_sessions: lsp_header_count(text, "Ingress LSP"),
            ..P2mpSectionSummary::default()
        },
        egress_lsp: P2mpSectionSummary {
            total_sessions: lsp_header_count(text, "Egress LSP"),
            ..P2mpSectionSummary::default()
        },
        transit_lsp: P2mpSectionSummary {
            total_sessions: lsp_header_count(text, "Transit LSP"),
            ..P2mpSectionSummary::default()
        },
    };

    if let Some(section) = section_between(text, "Ingress LSP:", "Egress LSP:") {
        if let Some(caps) = LSP_TOTAL_RE.captures(section) {
            result.ingress_lsp.sessions_displayed = int_or_zero(&caps[1]);
            result.ingress_lsp.sessions_up = int_or_zero(&caps[2]);
            result.ingress_lsp.sessions_down = int_or_zero(&caps[3]);
        }
        result.ingress_lsp.sessions = p2mp_sessions(section, true);
    }

    if let Some(section) = section_between(text, "Egress LSP:", "Transit LSP:") {
        if let Some(caps) = LSP_TOTAL_RE.captures(section) {
            result.egress_lsp.sessions_displayed = int_or_zero(&caps[1]);
            result.egress_lsp.sessions_up = int_or_zero(&caps[2]);
            result.egress_lsp.sessions_down = int_or_zero(&caps[3]);
        }
        result.egress_lsp.sessions = p2mp_sessions(section, false);
    }

    if let Some(section) = text.split("Transit LSP:").nth(1) {
        result.transit_lsp.sessions = p2mp_sessions(section, false);
        // Transit carries no Total line, the branches are counted instead.
        let branches: Vec<&P2mpBranch> = result
            .transit_lsp
            .sessions
            .iter()
            .flat_map(|s| s.branches.iter())
            .collect();
        result.transit_lsp.sessions_displayed = branches.len() as i64;
        result.transit_lsp.sessions_up =
            branches.iter().filter(|b| branch_state(b) == "Up").count() as i64;
        result.transit_lsp.sessions_down =
            branches.iter().filter(|b| branch_state(b) == "Down").count() as i64;
    }

    if result.ingress_lsp.total_sessions == 0
        && result.egress_lsp.total_sessions == 0
        && result.transit_lsp.total_sessions == 0
        && result.ingress_lsp.sessions.is_empty()
        && result.egress_lsp.sessions.is_empty()
        && result.transit_lsp.sessions.is_empty()
    {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

/// Filtered unidirectional LSP listing kept verbatim for diffing between
/// phases.
pub fn parse_mpls_lsp_unidirectional_match_dn(text: &str) -> ParseOutcome {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.to_lowercase().contains("empty") {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(FreeformOutput {
        output: trimmed.to_string(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct UnidirectionalEntry {
    pub to_address: String,
    pub from_address: String,
    pub state: String,
    pub rt: i64,
    pub style: String,
    pub label_in: String,
    pub label_out: String,
    pub lsp_name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnidirectionalSection {
    pub section_type: String,
    pub total_sessions: i64,
    pub sessions_displayed: i64,
    pub sessions_up: i64,
    pub sessions_down: i64,
    pub entries: Vec<UnidirectionalEntry>,
}

#[derive(Debug, Default, Serialize)]
pub struct MplsLspUnidirectional {
    pub ingress: Option<UnidirectionalSection>,
    pub egress: Option<UnidirectionalSection>,
    pub transit: Option<UnidirectionalSection>,
}

static MORE_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"---\(more\)---\s*\n?").unwrap());

static SECTION_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Ingress|Egress|Transit) LSP: (\d+) sessions").unwrap());

static UNI_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)(\d+\.\d+\.\d+\.\d+)\s+(\d+\.\d+\.\d+\.\d+)\s+(Up|Down)\s+(\d+)\s+(\d+)\s+(\w+)\s+(\S+)\s+(\S+)\s+(\S+)$",
    )
    .unwrap()
});

fn unidirectional_section(
    section_type: &str,
    total_sessions: i64,
    content: &str,
) -> UnidirectionalSection {
    let mut section = UnidirectionalSection {
        section_type: section_type.to_string(),
        total_sessions,
        ..UnidirectionalSection::default()
    };

    if let Some(caps) = LSP_TOTAL_RE.captures(content) {
        section.sessions_displayed = int_or_zero(&caps[1]);
        section.sessions_up = int_or_zero(&caps[2]);
        section.sessions_down = int_or_zero(&caps[3]);
    }

    for caps in UNI_ENTRY_RE.captures_iter(content) {
        section.entries.push(UnidirectionalEntry {
            to_address: caps[1].to_string(),
            from_address: caps[2].to_string(),
            state: caps[3].to_string(),
            rt: int_or_zero(&caps[4]),
            style: format!("{} {}", &caps[5], &caps[6]),
            label_in: caps[7].to_string(),
            label_out: caps[8].to_string(),
            lsp_name: caps[9].trim().to_string(),
        });
    }

    if section.sessions_displayed == 0 && !section.entries.is_empty() {
        section.sessions_displayed = section.entries.len() as i64;
        section.sessions_up = section.entries.iter().filter(|e| e.state == "Up").count() as i64;
        section.sessions_down =
            section.entries.iter().filter(|e| e.state == "Down").count() as i64;
    }
    section
}

/// Parse `show mpls lsp unidirectional | no-more` output. Pagination markers
/// left by the terminal are stripped first.
pub fn parse_mpls_lsp_unidirectional(text: &str) -> ParseOutcome {
    let cleaned = MORE_MARKER_RE.replace_all(text, "");
    let mut result = MplsLspUnidirectional::default();

    let mut sections: Vec<(String, i64, usize)> = Vec::new();
    for caps in SECTION_SPLIT_RE.captures_iter(&cleaned) {
        let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        sections.push((caps[1].to_string(), int_or_zero(&caps[2]), end));
    }

    for (idx, (section_type, total, start)) in sections.iter().enumerate() {
        let end = sections
            .get(idx + 1)
            .map(|(_, _, next_start)| {
                // Back up to the start of the next header line.
                cleaned[..*next_start]
                    .rfind(&format!("{} LSP:", sections[idx + 1].0))
                    .unwrap_or(*next_start)
            })
            .unwrap_or(cleaned.len());
        let content = &cleaned[*start..end];
        let section = unidirectional_section(section_type, *total, content);
        match section_type.as_str() {
            "Ingress" => result.ingress = Some(section),
            "Egress" => result.egress = Some(section),
            _ => result.transit = Some(section),
        }
    }

    if result.ingress.is_none() && result.egress.is_none() && result.transit.is_none() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERFACE_SAMPLE: &str = "\
Interface        State       Administrative groups (x: extended)
ge-0/0/0.0       Up          <none>
ge-0/0/1.0       Up          gold
";

    #[test]
    fn test_parse_mpls_interfaces() {
        let ParseOutcome::Parsed(v) = parse_mpls_interface(INTERFACE_SAMPLE) else {
            panic!("expected parsed");
        };
        let entries = v["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["administrative_groups"], "<none>");
        assert_eq!(entries[1]["administrative_groups"], "gold");
    }

    const LSP_SAMPLE: &str = "\
Ingress LSP: 2 sessions
To              From            State Rt P     ActivePath       LSPname
10.255.0.9      10.255.0.1      Up     0 *                      LSP-TO-PE9
10.255.0.13     10.255.0.1      Up     0 *                      LSP-TO-PE13
Total 2 displayed, Up 2, Down 0

Egress LSP: 1 sessions
To              From            State Rt Style Labelin Labelout LSPname
10.255.0.1      10.255.0.9      Up     0  1 SE   3            - LSP-FROM-PE9
Total 1 displayed, Up 1, Down 0

Transit LSP: 1 sessions
To              From            State Rt Style Labelin Labelout LSPname
10.255.0.21     10.255.0.17     Up     1  1 SE  299840    299844 TRANSIT-LSP-1
";

    #[test]
    fn test_parse_mpls_lsp_sections() {
        let ParseOutcome::Parsed(v) = parse_mpls_lsp(LSP_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["ingress_sessions"], 2);
        assert_eq!(v["ingress_up"], 2);
        let ingress = v["ingress_entries"].as_array().unwrap();
        assert_eq!(ingress.len(), 2);
        assert_eq!(ingress[0]["p"], "*");
        assert_eq!(ingress[0]["lsp_name"], "LSP-TO-PE9");
        assert_eq!(v["egress_entries"][0]["style"], "1 SE");
        assert_eq!(v["transit_up"], 1);
    }

    const P2MP_SAMPLE: &str = "\
Ingress LSP: 2 sessions
P2MP name: MCAST-TREE-1, P2MP branch count: 2
To              From            State Rt P     ActivePath       LSPname
10.255.0.9      10.255.0.1      Up     0 *                      BRANCH-PE9
10.255.0.13     10.255.0.1      Up     0 *                      BRANCH-PE13
Total 2 displayed, Up 2, Down 0

Egress LSP: 0 sessions

Transit LSP: 1 sessions
P2MP name: MCAST-TREE-2, P2MP branch count: 1
To              From            State Rt Style Labelin Labelout LSPname
10.255.0.21     10.255.0.17     Up     1  1 SE  299840    299844 BRANCH-T1
";

    #[test]
    fn test_parse_p2mp_sessions() {
        let ParseOutcome::Parsed(v) = parse_mpls_lsp_p2mp(P2MP_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["ingress_lsp"]["total_sessions"], 2);
        let sessions = v["ingress_lsp"]["sessions"].as_array().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0]["p2mp_name"], "MCAST-TREE-1");
        assert_eq!(sessions[0]["branch_count"], 2);
        assert_eq!(sessions[0]["branches"].as_array().unwrap().len(), 2);
        assert_eq!(v["transit_lsp"]["sessions_displayed"], 1);
        assert_eq!(v["transit_lsp"]["sessions_up"], 1);
    }

    #[test]
    fn test_match_dn_empty_listing() {
        assert_eq!(
            parse_mpls_lsp_unidirectional_match_dn(""),
            ParseOutcome::Empty
        );
        let ParseOutcome::Parsed(v) = parse_mpls_lsp_unidirectional_match_dn(
            "10.255.0.9 10.255.0.1 Up 0 1 SE - 299824 DN-LSP-9",
        ) else {
            panic!("expected parsed");
        };
        assert!(v["output"].as_str().unwrap().contains("DN-LSP-9"));
    }

    const UNI_SAMPLE: &str = "\
Ingress LSP: 1 sessions
To              From            State Rt Style Labelin Labelout LSPname
10.255.0.9      10.255.0.1      Up     0  1 SE  -        299824 UNI-LSP-9
---(more)---
Egress LSP: 1 sessions
To              From            State Rt Style Labelin Labelout LSPname
10.255.0.1      10.255.0.9      Up     0  1 SE  3        - UNI-LSP-BACK
Total 1 displayed, Up 1, Down 0
";

    #[test]
    fn test_parse_unidirectional_sections() {
        let ParseOutcome::Parsed(v) = parse_mpls_lsp_unidirectional(UNI_SAMPLE) else {
            panic!("expected parsed");
        };
        let ingress = &v["ingress"];
        assert_eq!(ingress["total_sessions"], 1);
        assert_eq!(ingress["entries"].as_array().unwrap().len(), 1);
        assert_eq!(ingress["entries"][0]["lsp_name"], "UNI-LSP-9");
        // No Total line in the ingress section, rows are counted instead.
        assert_eq!(ingress["sessions_displayed"], 1);
        assert_eq!(v["egress"]["sessions_up"], 1);
        assert!(v["transit"].is_null());
    }
}
