//! Junos MX-class command parsers.
//!
//! One module per command family. Record types live next to the parser that
//! produces them.

pub mod arp;
pub mod bfd;
pub mod bgp;
pub mod chassis;
pub mod interfaces;
pub mod isis;
pub mod ldp;
pub mod lldp;
pub mod mpls;
pub mod route;
pub mod rsvp;
pub mod system;
pub mod vmhost;
pub mod vrrp;
