//! Interface description and ethernet OAM parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceDescription {
    pub interface: String,
    pub admin_status: String,
    pub link_status: String,
    pub description: String,
}

#[derive(Debug, Default, Serialize)]
pub struct InterfaceDescriptions {
    pub interfaces: Vec<InterfaceDescription>,
}

static DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(up|down)\s+(up|down)\s+(.+)$").unwrap());

/// Parse `show interfaces descriptions | no-more` output.
pub fn parse_interface_descriptions(text: &str) -> ParseOutcome {
    let mut result = InterfaceDescriptions::default();

    for line in text.lines() {
        if (line.contains("Interface") && line.contains("Admin")) || line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = DESCRIPTION_RE.captures(line) {
            result.interfaces.push(InterfaceDescription {
                interface: caps[1].to_string(),
                admin_status: caps[2].to_string(),
                link_status: caps[3].to_string(),
                description: caps[4].trim().to_string(),
            });
        }
    }

    if result.interfaces.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OamCfmInterface {
    pub interface_name: String,
    pub interface_status: String,
    pub link_status: String,
    pub maintenance_domain_name: String,
    pub md_format: String,
    pub md_level: i64,
    pub md_index: i64,
    pub maintenance_association_name: String,
    pub ma_format: String,
    pub ma_index: i64,
    pub continuity_check_status: String,
    pub cc_interval: String,
    pub loss_threshold: String,
    pub mep_identifier: i64,
    pub mep_direction: String,
    pub mac_address: String,
    pub mep_status: String,
}

#[derive(Debug, Default, Serialize)]
pub struct OamCfmInterfaces {
    pub interfaces: Vec<OamCfmInterface>,
}

static OAM_INTF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Interface name:\s+(\S+)\s*,\s*Interface status:\s+(\w+)\s*,\s*Link status:\s+(\w+)",
    )
    .unwrap()
});

static OAM_MD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"Maintenance domain name:\s+(.+?)\s*,\s*Format:\s+(\w+)\s*,\s*Level:\s+(\d+)\s*,\s*MD Index:\s+(\d+)",
    )
    .unwrap()
});

static OAM_MA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Maintenance association name:\s+(.+?)\s*,\s*Format:\s+(\w+)\s*,\s*MA Index:\s+(\d+)")
        .unwrap()
});

static OAM_CC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Continuity-check status:\s+(\w+)\s*,\s*Interval:\s+(\S+)\s*,\s*Loss-threshold:\s+(.+)")
        .unwrap()
});

static OAM_MEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"MEP identifier:\s+(\d+)\s*,\s*Direction:\s+(\w+)\s*,\s*MAC address:\s+([0-9a-f:]+)")
        .unwrap()
});

static OAM_MEP_STATUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"MEP status:\s+(\w+)").unwrap());

/// Parse `show oam ethernet connectivity-fault-management interfaces
/// extensive | no-more` output, one block per interface.
pub fn parse_oam_cfm_interfaces(text: &str) -> ParseOutcome {
    let mut result = OamCfmInterfaces::default();

    for block in text.split("Interface name:") {
        if block.trim().is_empty() {
            continue;
        }
        let block = format!("Interface name:{block}");
        let Some(intf) = OAM_INTF_RE.captures(&block) else {
            continue;
        };

        let mut interface = OamCfmInterface {
            interface_name: intf[1].to_string(),
            interface_status: intf[2].to_string(),
            link_status: intf[3].to_string(),
            ..OamCfmInterface::default()
        };

        if let Some(caps) = OAM_MD_RE.captures(&block) {
            interface.maintenance_domain_name = caps[1].trim().to_string();
            interface.md_format = caps[2].to_string();
            interface.md_level = int_or_zero(&caps[3]);
            interface.md_index = int_or_zero(&caps[4]);
        }
        if let Some(caps) = OAM_MA_RE.captures(&block) {
            interface.maintenance_association_name = caps[1].trim().to_string();
            interface.ma_format = caps[2].to_string();
            interface.ma_index = int_or_zero(&caps[3]);
        }
        if let Some(caps) = OAM_CC_RE.captures(&block) {
            interface.continuity_check_status = caps[1].to_string();
            interface.cc_interval = caps[2].to_string();
            interface.loss_threshold = caps[3].trim().to_string();
        }
        if let Some(caps) = OAM_MEP_RE.captures(&block) {
            interface.mep_identifier = int_or_zero(&caps[1]);
            interface.mep_direction = caps[2].to_string();
            interface.mac_address = caps[3].to_string();
        }
        if let Some(caps) = OAM_MEP_STATUS_RE.captures(&block) {
            interface.mep_status = caps[1].to_string();
        }

        result.interfaces.push(interface);
    }

    if result.interfaces.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTIONS_SAMPLE: &str = "\
Interface       Admin Link Description
ge-0/0/0        up    up   CORE1 ge-0/0/4
ge-0/0/1        up    down AGG2 et-0/0/12 (maintenance)
ge-0/0/5        down  down spare
";

    #[test]
    fn test_parse_descriptions() {
        let ParseOutcome::Parsed(v) = parse_interface_descriptions(DESCRIPTIONS_SAMPLE) else {
            panic!("expected parsed");
        };
        let interfaces = v["interfaces"].as_array().unwrap();
        assert_eq!(interfaces.len(), 3);
        assert_eq!(interfaces[0]["interface"], "ge-0/0/0");
        assert_eq!(interfaces[1]["link_status"], "down");
        assert_eq!(interfaces[1]["description"], "AGG2 et-0/0/12 (maintenance)");
        assert_eq!(interfaces[2]["admin_status"], "down");
    }

    const OAM_SAMPLE: &str = "\
Interface name: ge-0/0/2.0 , Interface status: Active , Link status: Up
  Maintenance domain name: CUST-A , Format: string , Level: 4 , MD Index: 1
  Maintenance association name: MA-100 , Format: string , MA Index: 1
  Continuity-check status: enabled , Interval: 1s , Loss-threshold: 3 frames
  MEP identifier: 101 , Direction: down , MAC address: 2c:6b:f5:00:11:22
  MEP status: running
Interface name: ge-0/0/3.0 , Interface status: Active , Link status: Up
  Maintenance domain name: CUST-B , Format: string , Level: 4 , MD Index: 2
  Maintenance association name: MA-200 , Format: string , MA Index: 2
  Continuity-check status: enabled , Interval: 1s , Loss-threshold: 3 frames
  MEP identifier: 201 , Direction: down , MAC address: 2c:6b:f5:00:33:44
  MEP status: running
";

    #[test]
    fn test_parse_oam_blocks() {
        let ParseOutcome::Parsed(v) = parse_oam_cfm_interfaces(OAM_SAMPLE) else {
            panic!("expected parsed");
        };
        let interfaces = v["interfaces"].as_array().unwrap();
        assert_eq!(interfaces.len(), 2);
        assert_eq!(interfaces[0]["interface_name"], "ge-0/0/2.0");
        assert_eq!(interfaces[0]["maintenance_domain_name"], "CUST-A");
        assert_eq!(interfaces[0]["md_level"], 4);
        assert_eq!(interfaces[0]["mep_identifier"], 101);
        assert_eq!(interfaces[1]["mac_address"], "2c:6b:f5:00:33:44");
        assert_eq!(interfaces[1]["mep_status"], "running");
    }

    #[test]
    fn test_empty_outputs() {
        assert_eq!(parse_interface_descriptions(""), ParseOutcome::Empty);
        assert_eq!(parse_oam_cfm_interfaces("no entries"), ParseOutcome::Empty);
    }
}
