//! Command normalization and the per-(vendor, command) parser registry.
//!
//! The registry is a fixed table of (vendor, raw command, parser) triples,
//! compiled into an order-preserving map keyed by the *normalized* command
//! string. It is built once at process start and read-only afterwards, so
//! concurrent device pipelines can share it behind an `Arc` without locking.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{ConfigError, RegistryError, Result};
use crate::parsers::{self, Parser};

/// Network-equipment vendor whose CLI dialect a parser targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Juniper Junos (MX-class)
    Juniper,
    /// Cisco IOS-XR (NCS-class)
    Cisco,
}

impl Vendor {
    /// Lowercase vendor tag as used in device keys and artifact metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Juniper => "juniper",
            Vendor::Cisco => "cisco",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "juniper" => Ok(Vendor::Juniper),
            "cisco" => Ok(Vendor::Cisco),
            other => Err(ConfigError::UnknownVendor(other.to_string())),
        }
    }
}

/// Canonicalize a CLI command string for registry lookups.
///
/// Rules:
/// 1. Strip leading/trailing whitespace
/// 2. Collapse every internal whitespace run to a single space
/// 3. Exactly one space on each side of every pipe `|`
///
/// Pure and total: any input maps to exactly one output, and the function is
/// idempotent. `"show arp no-resolve |no-more"` and
/// `"show arp  no-resolve  | no-more"` both normalize to
/// `"show arp no-resolve | no-more"`, so lookups succeed regardless of how
/// the caller formatted the command.
pub fn normalize(cmd: &str) -> String {
    let mut out = String::with_capacity(cmd.len());
    for (i, token) in cmd.split_whitespace().enumerate() {
        // A pipe glued to a word ("|no-more") still needs spacing around it.
        let mut rest = token;
        let mut first = i == 0;
        while let Some(pos) = rest.find('|') {
            let (before, after) = rest.split_at(pos);
            if !before.is_empty() {
                if !first {
                    out.push(' ');
                }
                out.push_str(before);
                first = false;
            }
            if !first {
                out.push(' ');
            }
            out.push('|');
            first = false;
            rest = &after[1..];
        }
        if !rest.is_empty() {
            if !first {
                out.push(' ');
            }
            out.push_str(rest);
        }
    }
    out
}

/// The fixed registration table: every (vendor, command) the pipeline knows
/// how to parse. Commands are written here as operators type them; they are
/// normalized at build time.
///
/// Plain `fn` pointers keep this statically checked — a name listed here
/// without an implementation is a compile error.
const PARSER_TABLE: &[(Vendor, &str, Parser)] = &[
    // Juniper Junos (MX204)
    (Vendor::Juniper, "show arp no-resolve | no-more", parsers::juniper::arp::parse_arp_no_resolve),
    (Vendor::Juniper, "show vrrp summary | no-more", parsers::juniper::vrrp::parse_vrrp_summary),
    (Vendor::Juniper, "show lldp neighbors | no-more", parsers::juniper::lldp::parse_lldp_neighbors),
    (Vendor::Juniper, "show bfd session | no-more", parsers::juniper::bfd::parse_bfd_session),
    (Vendor::Juniper, "show rsvp neighbor | no-more", parsers::juniper::rsvp::parse_rsvp_neighbor),
    (Vendor::Juniper, "show rsvp session | no-more", parsers::juniper::rsvp::parse_rsvp_session),
    (Vendor::Juniper, "show route table inet.0 | no-more", parsers::juniper::route::parse_route_table_inet0),
    (Vendor::Juniper, "show route table inet.3 | no-more", parsers::juniper::route::parse_route_table_inet3),
    (Vendor::Juniper, "show route table mpls.0 | no-more", parsers::juniper::route::parse_route_table_mpls0),
    (Vendor::Juniper, "show mpls interface | no-more", parsers::juniper::mpls::parse_mpls_interface),
    (Vendor::Juniper, "show mpls lsp | no-more", parsers::juniper::mpls::parse_mpls_lsp),
    (Vendor::Juniper, "show mpls lsp p2mp | no-more", parsers::juniper::mpls::parse_mpls_lsp_p2mp),
    (Vendor::Juniper, "show bgp summary | no-more", parsers::juniper::bgp::parse_bgp_summary),
    (Vendor::Juniper, "show bgp neighbor | no-more", parsers::juniper::bgp::parse_bgp_neighbor),
    (Vendor::Juniper, "show isis adjacency extensive | no-more", parsers::juniper::isis::parse_isis_adjacency_extensive),
    (Vendor::Juniper, "show route summary | no-more", parsers::juniper::route::parse_route_summary),
    (Vendor::Juniper, "show rsvp session match DN | no-more", parsers::juniper::rsvp::parse_rsvp_session_match_dn),
    (Vendor::Juniper, "show mpls lsp unidirectional match DN | no-more", parsers::juniper::mpls::parse_mpls_lsp_unidirectional_match_dn),
    (Vendor::Juniper, "show rsvp | no-more", parsers::juniper::rsvp::parse_rsvp),
    (Vendor::Juniper, "show mpls lsp unidirectional | no-more", parsers::juniper::mpls::parse_mpls_lsp_unidirectional),
    (Vendor::Juniper, "show system uptime | no-more", parsers::juniper::system::parse_system_uptime),
    (Vendor::Juniper, "show ntp associations no-resolve | no-more", parsers::juniper::system::parse_ntp_associations),
    (Vendor::Juniper, "show vmhost version | no-more", parsers::juniper::vmhost::parse_vmhost_version),
    (Vendor::Juniper, "show vmhost snapshot | no-more", parsers::juniper::vmhost::parse_vmhost_snapshot),
    (Vendor::Juniper, "show chassis hardware | no-more", parsers::juniper::chassis::parse_chassis_hardware),
    (Vendor::Juniper, "show chassis fpc detail | no-more", parsers::juniper::chassis::parse_chassis_fpc_detail),
    (Vendor::Juniper, "show chassis alarms | no-more", parsers::juniper::chassis::parse_chassis_alarms),
    (Vendor::Juniper, "show system alarms | no-more", parsers::juniper::system::parse_system_alarms),
    (Vendor::Juniper, "show chassis routing-engine | no-more", parsers::juniper::chassis::parse_chassis_routing_engine),
    (Vendor::Juniper, "show chassis environment | no-more", parsers::juniper::chassis::parse_chassis_environment),
    (Vendor::Juniper, "show system resource-monitor fpc | no-more", parsers::juniper::system::parse_resource_monitor_fpc),
    (Vendor::Juniper, "show krt table | no-more", parsers::juniper::route::parse_krt_table),
    (Vendor::Juniper, "show system processes | no-more", parsers::juniper::system::parse_system_processes),
    (Vendor::Juniper, "show interface descriptions | no-more", parsers::juniper::interfaces::parse_interface_descriptions),
    (Vendor::Juniper, "show oam ethernet connectivity-fault-management interfaces extensive | no-more", parsers::juniper::interfaces::parse_oam_cfm_interfaces),
    (Vendor::Juniper, "show ldp neighbor | no-more", parsers::juniper::ldp::parse_ldp_neighbor),
    (Vendor::Juniper, "show connections | no-more", parsers::juniper::system::parse_connections),
    // Cisco IOS-XR (NCS5501)
    (Vendor::Cisco, "show inventory", parsers::cisco::inventory::parse_inventory),
    (Vendor::Cisco, "show install active summary", parsers::cisco::install::parse_install_active_summary),
    (Vendor::Cisco, "show install committed summary", parsers::cisco::install::parse_install_committed_summary),
    (Vendor::Cisco, "show platform", parsers::cisco::inventory::parse_platform),
    (Vendor::Cisco, "show hw-module fpd", parsers::cisco::inventory::parse_hw_module_fpd),
    (Vendor::Cisco, "show media", parsers::cisco::system::parse_media),
    (Vendor::Cisco, "show route summary", parsers::cisco::routing::parse_route_summary),
    (Vendor::Cisco, "show watchdog memory-state location all", parsers::cisco::system::parse_watchdog_memory_state),
    (Vendor::Cisco, "show ipv4 vrf all interface brief", parsers::cisco::interfaces::parse_ipv4_vrf_interface_brief),
    (Vendor::Cisco, "show lldp neighbors", parsers::cisco::interfaces::parse_lldp_neighbors),
    (Vendor::Cisco, "show isis adjacency", parsers::cisco::routing::parse_isis_adjacency),
    (Vendor::Cisco, "show interface description", parsers::cisco::interfaces::parse_interface_description),
];

/// Immutable mapping from (vendor, normalized command) to a parser function.
#[derive(Debug)]
pub struct ParserRegistry {
    parsers: IndexMap<(Vendor, String), Parser>,
}

impl ParserRegistry {
    /// Build the registry from the fixed table, normalizing every command.
    ///
    /// Fails fast if two table entries normalize to the same key — that is a
    /// registration bug, not a runtime condition.
    pub fn build() -> Result<Self> {
        let mut parsers = IndexMap::with_capacity(PARSER_TABLE.len());
        for (vendor, command, parser) in PARSER_TABLE {
            let key = (*vendor, normalize(command));
            if parsers.insert(key.clone(), *parser).is_some() {
                return Err(RegistryError::DuplicateCommand {
                    vendor: vendor.to_string(),
                    command: key.1,
                }
                .into());
            }
        }
        Ok(Self { parsers })
    }

    /// Look up the parser for a normalized command. `None` means the command
    /// is collect-only; that is an expected outcome, not an error.
    pub fn lookup(&self, vendor: Vendor, normalized_command: &str) -> Option<Parser> {
        self.parsers
            .get(&(vendor, normalized_command.to_string()))
            .copied()
    }

    /// Number of registered (vendor, command) pairs.
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// True if no parsers are registered.
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Iterate over registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &(Vendor, String)> {
        self.parsers.keys()
    }
}
