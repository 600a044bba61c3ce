//! Routing table parsers for inet.0, inet.3, mpls.0, the route summary,
//! and the kernel routing table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct RouteEntry {
    pub destination: String,
    pub protocol: String,
    pub preference: i64,
    pub metric: i64,
    pub age: String,
    pub next_hop: String,
    pub interface: String,
    pub flags: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RouteTable {
    pub table_name: String,
    pub total_destinations: i64,
    pub total_routes: i64,
    pub active_routes: i64,
    pub holddown_routes: i64,
    pub hidden_routes: i64,
    pub entries: Vec<RouteEntry>,
}

static INET0_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(inet\.0):\s+(\d+)\s+destinations,\s+(\d+)\s+routes\s+\((\d+)\s+active,\s+(\d+)\s+holddown,\s+(\d+)\s+hidden\)",
    )
    .unwrap()
});

static INET0_DEST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\d\./]+)\s+(\*?)\[([\w\-]+)/(\d+)\]\s+([\w\d\s:]+?)(?:,\s+metric\s+(\d+))?$")
        .unwrap()
});

static HOP_TO_VIA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">\s+to\s+([\d\.]+)\s+via\s+([\w\-\./]+)").unwrap());

static HOP_VIA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+via\s+([\w\-\./]+)").unwrap());

static HOP_LOCAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Local\s+via\s+([\w\-\./]+)").unwrap());

/// Parse `show route table inet.0 | no-more` output. Destination lines pair
/// with the next-hop line that follows them.
pub fn parse_route_table_inet0(text: &str) -> ParseOutcome {
    let mut result = RouteTable::default();

    if let Some(caps) = INET0_HEADER_RE.captures(text) {
        result.table_name = caps[1].to_string();
        result.total_destinations = int_or_zero(&caps[2]);
        result.total_routes = int_or_zero(&caps[3]);
        result.active_routes = int_or_zero(&caps[4]);
        result.holddown_routes = int_or_zero(&caps[5]);
        result.hidden_routes = int_or_zero(&caps[6]);
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() || line.starts_with('+') || line.starts_with("inet.") {
            i += 1;
            continue;
        }

        if let Some(caps) = INET0_DEST_RE.captures(line) {
            let mut next_hop = String::new();
            let mut interface = String::new();

            if let Some(next_line) = lines.get(i + 1).map(|l| l.trim()) {
                if next_line.starts_with('>') {
                    if let Some(hop) = HOP_TO_VIA_RE.captures(next_line) {
                        next_hop = hop[1].to_string();
                        interface = hop[2].to_string();
                        i += 1;
                    } else if let Some(hop) = HOP_VIA_RE.captures(next_line) {
                        interface = hop[1].to_string();
                        i += 1;
                    }
                } else if let Some(hop) = HOP_LOCAL_RE.captures(next_line) {
                    interface = hop[1].to_string();
                    next_hop = "Local".to_string();
                    i += 1;
                }
            }

            result.entries.push(RouteEntry {
                destination: caps[1].to_string(),
                protocol: caps[3].to_string(),
                preference: int_or_zero(&caps[4]),
                metric: caps.get(6).map(|m| int_or_zero(m.as_str())).unwrap_or(0),
                age: caps[5].trim().to_string(),
                next_hop,
                interface,
                flags: caps[2].to_string(),
            });
        }
        i += 1;
    }

    if result.entries.is_empty() && result.table_name.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LabeledNextHop {
    pub to: String,
    pub via: String,
    pub mpls_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Inet3Entry {
    pub destination: String,
    pub protocol: String,
    pub preference: String,
    pub metric: String,
    pub age: String,
    pub next_hops: Vec<LabeledNextHop>,
}

#[derive(Debug, Default, Serialize)]
pub struct Inet3Table {
    pub total_destinations: i64,
    pub total_routes: i64,
    pub active_routes: i64,
    pub holddown_routes: i64,
    pub hidden_routes: i64,
    pub entries: Vec<Inet3Entry>,
}

static INET3_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"inet\.3:\s+(\d+)\s+destinations,\s+(\d+)\s+routes\s+\((\d+)\s+active,\s+(\d+)\s+holddown,\s+(\d+)\s+hidden\)",
    )
    .unwrap()
});

static INET3_ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+\*\[(\S+)/(\d+)\]\s+(.+?),\s+metric\s+(\d+)").unwrap()
});

static INET3_HOP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^>?\s*to\s+(\S+)\s+via\s+(\S+?)(?:,\s+Push\s+(\S+?))?(?:,\s+Push\s+(\S+?))?\s*$")
        .unwrap()
});

fn labeled_hop(caps: &regex::Captures<'_>) -> LabeledNextHop {
    let label1 = caps.get(3).map(|m| m.as_str());
    let label2 = caps.get(4).map(|m| m.as_str());
    let mpls_label = match (label1, label2) {
        (Some(a), Some(b)) => format!("Push {a}, Push {}", b.replace("(top)", "")),
        (Some(a), None) => format!("Push {a}"),
        _ => String::new(),
    };
    LabeledNextHop {
        to: caps[1].to_string(),
        via: caps[2].trim_end_matches(',').to_string(),
        mpls_label,
    }
}

/// Parse `show route table inet.3 | no-more` output. Routes here carry
/// stacked MPLS label operations on their next hops.
pub fn parse_route_table_inet3(text: &str) -> ParseOutcome {
    let mut result = Inet3Table::default();

    if let Some(caps) = INET3_HEADER_RE.captures(text) {
        result.total_destinations = int_or_zero(&caps[1]);
        result.total_routes = int_or_zero(&caps[2]);
        result.active_routes = int_or_zero(&caps[3]);
        result.holddown_routes = int_or_zero(&caps[4]);
        result.hidden_routes = int_or_zero(&caps[5]);
    }

    let mut current: Option<Inet3Entry> = None;
    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('+') || stripped.starts_with("inet.3:") {
            continue;
        }

        if let Some(caps) = INET3_ROUTE_RE.captures(line) {
            if let Some(entry) = current.take() {
                result.entries.push(entry);
            }
            current = Some(Inet3Entry {
                destination: caps[1].to_string(),
                protocol: caps[2].to_string(),
                preference: caps[3].to_string(),
                metric: caps[5].to_string(),
                age: caps[4].to_string(),
                next_hops: Vec::new(),
            });
        } else if let Some(entry) = current.as_mut() {
            if let Some(caps) = INET3_HOP_RE.captures(stripped) {
                entry.next_hops.push(labeled_hop(&caps));
            }
        }
    }
    if let Some(entry) = current {
        result.entries.push(entry);
    }

    if result.entries.is_empty() && result.total_destinations == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MplsNextHop {
    pub to: String,
    pub via: String,
    pub action: String,
    pub mpls_label: String,
    pub lsp_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Mpls0Entry {
    pub label: String,
    pub protocol: String,
    pub preference: String,
    pub metric: String,
    pub age: String,
    pub next_hops: Vec<MplsNextHop>,
}

#[derive(Debug, Default, Serialize)]
pub struct Mpls0Table {
    pub total_destinations: i64,
    pub total_routes: i64,
    pub active_routes: i64,
    pub holddown_routes: i64,
    pub hidden_routes: i64,
    pub entries: Vec<Mpls0Entry>,
}

static MPLS0_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"mpls\.0:\s+(\d+)\s+destinations,\s+(\d+)\s+routes\s+\((\d+)\s+active,\s+(\d+)\s+holddown,\s+(\d+)\s+hidden\)",
    )
    .unwrap()
});

static MPLS0_ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\(S=\d+\))?)\s+\*\[(\S+)/(\d+)\]\s+(.+?)(?:,\s+metric\s+(\d+))?$")
        .unwrap()
});

static MPLS0_TABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+to table\s+(\S+)").unwrap());

static MPLS0_LSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+>\s+via\s+(lsi\.\d+)\s+\(([^)]+)\),\s+(\w+)").unwrap());

static MPLS0_VT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+>?\s*via\s+(vt-[\d/\.]+),\s+(\w+)").unwrap());

static MPLS0_NH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*to\s+(\S+)\s+via\s+(\S+)").unwrap());

static MPLS0_LSP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"label-switched-path\s+(.+?)$").unwrap());

static SWAP_PUSH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Swap\s+(\S+),\s+Push\s+(\S+)").unwrap());
static SWAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Swap\s+(\S+)").unwrap());
static PUSH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Push\s+(\S+)").unwrap());

fn mpls0_label_hop(clean_line: &str) -> Option<MplsNextHop> {
    let caps = MPLS0_NH_RE.captures(clean_line)?;
    let mut hop = MplsNextHop {
        to: caps[1].to_string(),
        via: caps[2].trim_end_matches(',').to_string(),
        ..MplsNextHop::default()
    };

    if let Some(lsp) = MPLS0_LSP_RE.captures(clean_line) {
        hop.lsp_name = lsp[1].to_string();
    }

    let remainder = clean_line[caps.get(0).map(|m| m.end()).unwrap_or(0)..]
        .trim()
        .trim_start_matches(',')
        .trim();
    if !remainder.is_empty() && hop.lsp_name.is_empty() {
        if remainder.starts_with("Pop") {
            hop.action = "Pop".to_string();
        } else if remainder.starts_with("Swap") {
            if let Some(sp) = SWAP_PUSH_RE.captures(remainder) {
                hop.action = format!("Swap {}, Push", sp[1].trim_end_matches(','));
                hop.mpls_label = sp[2].to_string();
            } else if let Some(s) = SWAP_RE.captures(remainder) {
                hop.action = "Swap".to_string();
                hop.mpls_label = s[1].trim_end_matches(',').to_string();
            }
        } else if remainder.starts_with("Push") {
            if let Some(p) = PUSH_RE.captures(remainder) {
                hop.action = "Push".to_string();
                hop.mpls_label = p[1].to_string();
            }
        }
    }
    Some(hop)
}

/// Parse `show route table mpls.0 | no-more` output. Label routes carry Pop,
/// Swap, and Push operations plus table redirects and lsi/vt next hops.
pub fn parse_route_table_mpls0(text: &str) -> ParseOutcome {
    let mut result = Mpls0Table::default();

    if let Some(caps) = MPLS0_HEADER_RE.captures(text) {
        result.total_destinations = int_or_zero(&caps[1]);
        result.total_routes = int_or_zero(&caps[2]);
        result.active_routes = int_or_zero(&caps[3]);
        result.holddown_routes = int_or_zero(&caps[4]);
        result.hidden_routes = int_or_zero(&caps[5]);
    }

    let mut current: Option<Mpls0Entry> = None;
    for line in text.lines() {
        if let Some(caps) = MPLS0_ROUTE_RE.captures(line) {
            if let Some(entry) = current.take() {
                result.entries.push(entry);
            }
            current = Some(Mpls0Entry {
                label: caps[1].to_string(),
                protocol: caps[2].to_string(),
                preference: caps[3].to_string(),
                metric: caps.get(5).map(|m| m.as_str().to_string()).unwrap_or_default(),
                age: caps[4].to_string(),
                next_hops: Vec::new(),
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = MPLS0_TABLE_RE.captures(line) {
            entry.next_hops.push(MplsNextHop {
                action: format!("to table {}", &caps[1]),
                ..MplsNextHop::default()
            });
        } else if line.trim_start().starts_with("Receive") {
            entry.next_hops.push(MplsNextHop {
                action: "Receive".to_string(),
                ..MplsNextHop::default()
            });
        } else if line.contains("via lsi.") {
            if let Some(caps) = MPLS0_LSI_RE.captures(line) {
                entry.next_hops.push(MplsNextHop {
                    via: caps[1].to_string(),
                    lsp_name: caps[2].to_string(),
                    action: caps[3].to_string(),
                    ..MplsNextHop::default()
                });
            }
        } else if line.contains("via vt-") {
            if let Some(caps) = MPLS0_VT_RE.captures(line) {
                entry.next_hops.push(MplsNextHop {
                    via: caps[1].to_string(),
                    action: caps[2].to_string(),
                    ..MplsNextHop::default()
                });
            }
        } else if line.trim().starts_with('>') || line.trim().starts_with("to ") {
            let clean = line.trim().trim_start_matches('>').trim();
            if let Some(hop) = mpls0_label_hop(clean) {
                entry.next_hops.push(hop);
            }
        }
    }
    if let Some(entry) = current {
        result.entries.push(entry);
    }

    if result.entries.is_empty() && result.total_destinations == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummaryProtocol {
    pub protocol: String,
    pub routes: i64,
    pub active: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummaryTable {
    pub table_name: String,
    pub destinations: i64,
    pub routes: i64,
    pub active: i64,
    pub holddown: i64,
    pub hidden: i64,
    pub protocols: Vec<RouteSummaryProtocol>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteSummaryHighwater {
    pub rib_unique_destination_routes: String,
    pub rib_routes: String,
    pub fib_routes: String,
    pub vrf_type_routing_instances: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RouteSummary {
    pub autonomous_system: String,
    pub router_id: String,
    pub highwater: RouteSummaryHighwater,
    pub tables: Vec<RouteSummaryTable>,
}

static AS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Autonomous system number:\s+(\d+)").unwrap());
static ROUTER_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Router ID:\s+(\S+)").unwrap());
static HW_UNIQUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"RIB unique destination routes:\s+(.+)").unwrap());
static HW_RIB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"RIB routes\s+:\s+(.+)").unwrap());
static HW_FIB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"FIB routes\s+:\s+(.+)").unwrap());
static HW_VRF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"VRF type routing instances\s+:\s+(.+)").unwrap());

static SUMMARY_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\S+?): (\d+) destinations, (\d+) routes \((\d+) active, (\d+) holddown, (\d+) hidden\)",
    )
    .unwrap()
});

static SUMMARY_PROTO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+(\S+):\s+(\d+) routes,\s+(\d+) active").unwrap());

/// Parse `show route summary | no-more` output into per-table protocol counts
/// plus the highwater-mark block.
pub fn parse_route_summary(text: &str) -> ParseOutcome {
    let mut result = RouteSummary::default();

    if let Some(caps) = AS_RE.captures(text) {
        result.autonomous_system = caps[1].to_string();
    }
    if let Some(caps) = ROUTER_ID_RE.captures(text) {
        result.router_id = caps[1].to_string();
    }
    if let Some(caps) = HW_UNIQUE_RE.captures(text) {
        result.highwater.rib_unique_destination_routes = caps[1].trim().to_string();
    }
    if let Some(caps) = HW_RIB_RE.captures(text) {
        result.highwater.rib_routes = caps[1].trim().to_string();
    }
    if let Some(caps) = HW_FIB_RE.captures(text) {
        result.highwater.fib_routes = caps[1].trim().to_string();
    }
    if let Some(caps) = HW_VRF_RE.captures(text) {
        result.highwater.vrf_type_routing_instances = caps[1].trim().to_string();
    }

    let tables_section = text.split("Highwater Mark").nth(1).unwrap_or(text);
    for line in tables_section.lines() {
        if let Some(caps) = SUMMARY_TABLE_RE.captures(line.trim()) {
            result.tables.push(RouteSummaryTable {
                table_name: caps[1].to_string(),
                destinations: int_or_zero(&caps[2]),
                routes: int_or_zero(&caps[3]),
                active: int_or_zero(&caps[4]),
                holddown: int_or_zero(&caps[5]),
                hidden: int_or_zero(&caps[6]),
                protocols: Vec::new(),
            });
        } else if let Some(current) = result.tables.last_mut() {
            if let Some(caps) = SUMMARY_PROTO_RE.captures(line) {
                current.protocols.push(RouteSummaryProtocol {
                    protocol: caps[1].to_string(),
                    routes: int_or_zero(&caps[2]),
                    active: int_or_zero(&caps[3]),
                });
            }
        }
    }

    if result.tables.is_empty() && result.router_id.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KrtEntry {
    pub kernel_id: String,
    pub route_prefix: String,
    pub interface: String,
    pub next_hop: String,
}

#[derive(Debug, Default, Serialize)]
pub struct KrtTable {
    pub entries: Vec<KrtEntry>,
}

static KERNEL_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"kernel-id:\s+(-|\d+)").unwrap());

static KRT_ROUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+\.\d+\.\d+/\d+)\s+via\s+(\S+)\s+(\S+)").unwrap());

/// Parse `show krt table | no-more` output.
pub fn parse_krt_table(text: &str) -> ParseOutcome {
    let mut result = KrtTable::default();

    for line in text.lines() {
        if let Some(kernel) = KERNEL_ID_RE.captures(line) {
            let mut entry = KrtEntry {
                kernel_id: kernel[1].to_string(),
                ..KrtEntry::default()
            };
            if let Some(route) = KRT_ROUTE_RE.captures(line) {
                entry.route_prefix = route[1].to_string();
                entry.interface = route[2].to_string();
                entry.next_hop = route[3].to_string();
            }
            result.entries.push(entry);
        }
    }

    if result.entries.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INET0_SAMPLE: &str = "\
inet.0: 24 destinations, 25 routes (24 active, 0 holddown, 1 hidden)
+ = Active Route, - = Last Active, * = Both

0.0.0.0/0          *[Static/5] 10w2d 12:30:01
                    > to 192.168.77.1 via fxp0.0
10.210.8.0/30      *[Direct/0] 3w0d 05:11:42
                    > via ge-0/0/0.0
10.210.8.2/32      *[Local/0] 3w0d 05:11:42
                      Local via ge-0/0/0.0
10.255.0.9/32      *[OSPF/10] 1d 02:03:04, metric 100
                    > to 10.210.8.1 via ge-0/0/0.0
";

    #[test]
    fn test_parse_inet0_header_and_routes() {
        let ParseOutcome::Parsed(v) = parse_route_table_inet0(INET0_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["table_name"], "inet.0");
        assert_eq!(v["total_destinations"], 24);
        assert_eq!(v["hidden_routes"], 1);
        let entries = v["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["protocol"], "Static");
        assert_eq!(entries[0]["next_hop"], "192.168.77.1");
        assert_eq!(entries[1]["interface"], "ge-0/0/0.0");
        assert_eq!(entries[1]["next_hop"], "");
        assert_eq!(entries[2]["next_hop"], "Local");
        assert_eq!(entries[3]["metric"], 100);
        assert_eq!(entries[3]["flags"], "*");
    }

    const INET3_SAMPLE: &str = "\
inet.3: 3 destinations, 4 routes (3 active, 0 holddown, 0 hidden)
+ = Active Route, - = Last Active, * = Both

10.255.0.9/32      *[LDP/9] 2w1d 10:20:30, metric 100
                    > to 10.210.8.1 via ge-0/0/0.0
10.255.0.13/32     *[RSVP/7/1] 1w0d 01:02:03, metric 200
                    > to 10.210.8.1 via ge-0/0/0.0, Push 299824
                      to 10.210.8.5 via ge-0/0/1.0, Push 16, Push 299828(top)
";

    #[test]
    fn test_parse_inet3_labeled_hops() {
        let ParseOutcome::Parsed(v) = parse_route_table_inet3(INET3_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["total_destinations"], 3);
        let entries = v["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["next_hops"][0]["mpls_label"], "");
        let hops = entries[1]["next_hops"].as_array().unwrap();
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0]["mpls_label"], "Push 299824");
        assert_eq!(hops[1]["mpls_label"], "Push 16, Push 299828");
    }

    const MPLS0_SAMPLE: &str = "\
mpls.0: 6 destinations, 6 routes (6 active, 0 holddown, 0 hidden)
+ = Active Route, - = Last Active, * = Both

0                  *[MPLS/0] 10w2d 12:30:01, metric 1
                      Receive
299824             *[LDP/9] 2w1d 10:20:30, metric 1
                    > to 10.210.8.1 via ge-0/0/0.0, Pop
299828             *[LDP/9] 2w1d 10:20:30, metric 1
                    > to 10.210.8.5 via ge-0/0/1.0, Swap 16
299832             *[VPN/170] 1w0d 01:02:03
                      to table VRF-A.inet.0
";

    #[test]
    fn test_parse_mpls0_actions() {
        let ParseOutcome::Parsed(v) = parse_route_table_mpls0(MPLS0_SAMPLE) else {
            panic!("expected parsed");
        };
        let entries = v["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0]["next_hops"][0]["action"], "Receive");
        assert_eq!(entries[1]["next_hops"][0]["action"], "Pop");
        assert_eq!(entries[2]["next_hops"][0]["action"], "Swap");
        assert_eq!(entries[2]["next_hops"][0]["mpls_label"], "16");
        assert_eq!(entries[3]["next_hops"][0]["action"], "to table VRF-A.inet.0");
        assert_eq!(entries[3]["metric"], "");
    }

    const SUMMARY_SAMPLE: &str = "\
Autonomous system number: 65001
Router ID: 10.255.0.1

Highwater Mark (Sizing parameters)
                                     Current    Highwater    Timestamp
  RIB unique destination routes:          42           50    2024-12-01 10:00:00
  RIB routes                    :          44           52    2024-12-01 10:00:00
  FIB routes                    :          40           48    2024-12-01 10:00:00
  VRF type routing instances    :           2            2    2024-11-01 09:00:00

inet.0: 24 destinations, 25 routes (24 active, 0 holddown, 1 hidden)
              Direct:      5 routes,      5 active
               Local:      5 routes,      5 active
                OSPF:     12 routes,     12 active
              Static:      3 routes,      2 active

mpls.0: 6 destinations, 6 routes (6 active, 0 holddown, 0 hidden)
                MPLS:      3 routes,      3 active
                 LDP:      3 routes,      3 active
";

    #[test]
    fn test_parse_route_summary_tables() {
        let ParseOutcome::Parsed(v) = parse_route_summary(SUMMARY_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["autonomous_system"], "65001");
        assert_eq!(v["router_id"], "10.255.0.1");
        assert!(
            v["highwater"]["rib_routes"]
                .as_str()
                .unwrap()
                .starts_with("44")
        );
        let tables = v["tables"].as_array().unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0]["table_name"], "inet.0");
        assert_eq!(tables[0]["protocols"].as_array().unwrap().len(), 4);
        assert_eq!(tables[0]["protocols"][2]["protocol"], "OSPF");
        assert_eq!(tables[1]["protocols"][1]["routes"], 3);
    }

    const KRT_SAMPLE: &str = "\
10.255.0.9/32 via ge-0/0/0.0 10.210.8.1 kernel-id: 12
10.255.0.13/32 via ge-0/0/1.0 10.210.8.5 kernel-id: 13
kernel-id: -
";

    #[test]
    fn test_parse_krt_table_rows() {
        let ParseOutcome::Parsed(v) = parse_krt_table(KRT_SAMPLE) else {
            panic!("expected parsed");
        };
        let entries = v["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["kernel_id"], "12");
        assert_eq!(entries[0]["route_prefix"], "10.255.0.9/32");
        assert_eq!(entries[2]["kernel_id"], "-");
        assert_eq!(entries[2]["route_prefix"], "");
    }
}
