//! System-level parsers: uptime, NTP, alarms, resource monitor, processes,
//! and connections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, float_or_zero, int_or_zero};

#[derive(Debug, Default, Serialize)]
pub struct SystemUptime {
    pub current_time: String,
    pub time_source: String,
    pub system_booted: String,
    pub system_booted_ago: String,
    pub protocols_started: String,
    pub protocols_started_ago: String,
    pub last_configured: String,
    pub last_configured_ago: String,
    pub last_configured_by: String,
    pub uptime_time: String,
    pub uptime_duration: String,
    pub users: i64,
    pub load_average_1min: f64,
    pub load_average_5min: f64,
    pub load_average_15min: f64,
}

static CURRENT_TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Current time:\s+(.+)").unwrap());
static TIME_SOURCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Time Source:\s+(.+)").unwrap());
static BOOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"System booted:\s+(.+?)\s+\((.+?)\)").unwrap());
static PROTOCOLS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Protocols started:\s+(.+?)\s+\((.+?)\)").unwrap());
static CONFIGURED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Last configured:\s+(.+?)\s+\((.+?)\)\s+by\s+(.+)").unwrap());
static UPTIME_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d{1,2}:\d{2}[AP]M)\s+up\s+(.+?),\s+(\d+)\s+users?,\s+load averages?:\s+([\d.]+),\s+([\d.]+),\s+([\d.]+)",
    )
    .unwrap()
});

/// Parse `show system uptime | no-more` output.
pub fn parse_system_uptime(text: &str) -> ParseOutcome {
    let mut result = SystemUptime::default();

    if let Some(caps) = CURRENT_TIME_RE.captures(text) {
        result.current_time = caps[1].trim().to_string();
    }
    if let Some(caps) = TIME_SOURCE_RE.captures(text) {
        result.time_source = caps[1].trim().to_string();
    }
    if let Some(caps) = BOOTED_RE.captures(text) {
        result.system_booted = caps[1].trim().to_string();
        result.system_booted_ago = caps[2].trim().to_string();
    }
    if let Some(caps) = PROTOCOLS_RE.captures(text) {
        result.protocols_started = caps[1].trim().to_string();
        result.protocols_started_ago = caps[2].trim().to_string();
    }
    if let Some(caps) = CONFIGURED_RE.captures(text) {
        result.last_configured = caps[1].trim().to_string();
        result.last_configured_ago = caps[2].trim().to_string();
        result.last_configured_by = caps[3].trim().to_string();
    }
    if let Some(caps) = UPTIME_LINE_RE.captures(text) {
        result.uptime_time = caps[1].to_string();
        result.uptime_duration = caps[2].trim().to_string();
        result.users = int_or_zero(&caps[3]);
        result.load_average_1min = float_or_zero(&caps[4]);
        result.load_average_5min = float_or_zero(&caps[5]);
        result.load_average_15min = float_or_zero(&caps[6]);
    }

    if result.current_time.is_empty() && result.uptime_duration.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct NtpAssociation {
    pub remote: String,
    pub refid: String,
    pub auth: String,
    pub st: i64,
    pub t: String,
    pub when: String,
    pub poll: i64,
    pub reach: i64,
    pub delay: f64,
    pub offset: String,
    pub jitter: f64,
    pub rootdelay: f64,
    pub rootdisp: f64,
}

#[derive(Debug, Default, Serialize)]
pub struct NtpAssociations {
    pub associations: Vec<NtpAssociation>,
}

static NTP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\S+)\s+(\S+)\s+(\S+)\s+(\d+)\s+(\w+)\s+(\S+)\s+(\d+)\s+(\d+)\s+([\d.]+)\s+([\d.+-]+)\s+([\d.]+)\s+([\d.]+)\s+([\d.]+)",
    )
    .unwrap()
});

/// Parse `show ntp associations no-resolve | no-more` output.
pub fn parse_ntp_associations(text: &str) -> ParseOutcome {
    let mut result = NtpAssociations::default();

    for line in text.lines() {
        if line.contains("remote") || line.contains("=====") || line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = NTP_RE.captures(line) {
            result.associations.push(NtpAssociation {
                remote: caps[1].to_string(),
                refid: caps[2].to_string(),
                auth: caps[3].to_string(),
                st: int_or_zero(&caps[4]),
                t: caps[5].to_string(),
                when: caps[6].to_string(),
                poll: int_or_zero(&caps[7]),
                reach: int_or_zero(&caps[8]),
                delay: float_or_zero(&caps[9]),
                offset: caps[10].to_string(),
                jitter: float_or_zero(&caps[11]),
                rootdelay: float_or_zero(&caps[12]),
                rootdisp: float_or_zero(&caps[13]),
            });
        }
    }

    if result.associations.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemAlarm {
    pub alarm_time: String,
    pub alarm_class: String,
    pub alarm_description: String,
    pub alarm_source: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SystemAlarms {
    pub has_alarms: bool,
    pub alarm_count: i64,
    pub alarms: Vec<SystemAlarm>,
}

static NO_ALARMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)No alarms currently active").unwrap());

static SYSTEM_ALARM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+(\w+)\s+(.+?)(?:\((.+?)\))?(?:\n\d{4}-|\z)",
    )
    .unwrap()
});

/// Parse `show system alarms | no-more` output. Devices with no alarms report
/// an explicit sentinel line.
pub fn parse_system_alarms(text: &str) -> ParseOutcome {
    let mut result = SystemAlarms::default();

    if NO_ALARMS_RE.is_match(text) {
        return ParseOutcome::record(result);
    }

    // Overlapping boundary lookaheads are not available, so re-scan from the
    // end of each description.
    let mut remaining = text;
    while let Some(caps) = SYSTEM_ALARM_RE.captures(remaining) {
        result.alarms.push(SystemAlarm {
            alarm_time: caps[1].trim().to_string(),
            alarm_class: caps[2].trim().to_string(),
            alarm_description: caps[3].trim().to_string(),
            alarm_source: caps.get(4).map(|m| m.as_str().trim().to_string()),
        });
        let end = caps.get(3).map(|m| m.end()).unwrap_or(remaining.len());
        if end >= remaining.len() {
            break;
        }
        remaining = &remaining[end..];
    }

    result.has_alarms = !result.alarms.is_empty();
    result.alarm_count = result.alarms.len() as i64;

    if result.alarms.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct PfeResourceUsage {
    pub pfe_number: i64,
    pub encap_mem_free_percent: String,
    pub nh_mem_free_percent: i64,
    pub fw_mem_free_percent: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FpcResourceUsage {
    pub slot_number: i64,
    pub heap_free_percent: i64,
    pub pfe_resources: Vec<PfeResourceUsage>,
}

#[derive(Debug, Default, Serialize)]
pub struct ResourceMonitorFpc {
    pub free_heap_mem_watermark: i64,
    pub free_nh_mem_watermark: i64,
    pub free_filter_mem_watermark: i64,
    pub fpc_resources: Vec<FpcResourceUsage>,
}

static HEAP_WATERMARK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Free Heap Mem Watermark\s+:\s+(\d+)").unwrap());
static NH_WATERMARK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Free NH Mem Watermark\s+:\s+(\d+)").unwrap());
static FILTER_WATERMARK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Free Filter Mem Watermark\s*:\s*(\d+)").unwrap());

/// Parse `show system resource-monitor fpc | no-more` output. Slot rows are
/// followed by indented per-PFE rows.
pub fn parse_resource_monitor_fpc(text: &str) -> ParseOutcome {
    let mut result = ResourceMonitorFpc::default();

    if let Some(caps) = HEAP_WATERMARK_RE.captures(text) {
        result.free_heap_mem_watermark = int_or_zero(&caps[1]);
    }
    if let Some(caps) = NH_WATERMARK_RE.captures(text) {
        result.free_nh_mem_watermark = int_or_zero(&caps[1]);
    }
    if let Some(caps) = FILTER_WATERMARK_RE.captures(text) {
        result.free_filter_mem_watermark = int_or_zero(&caps[1]);
    }

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty()
            || line.contains("Slot")
            || line.contains("Free")
            || line.contains('*')
            || line.contains("FPC Resource")
        {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let first_numeric = parts
            .first()
            .map(|p| p.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false);

        if parts.len() == 2 && first_numeric && parts[1].chars().all(|c| c.is_ascii_digit()) {
            result.fpc_resources.push(FpcResourceUsage {
                slot_number: int_or_zero(parts[0]),
                heap_free_percent: int_or_zero(parts[1]),
                pfe_resources: Vec::new(),
            });
        } else if parts.len() >= 4 && first_numeric {
            if let Some(current) = result.fpc_resources.last_mut() {
                current.pfe_resources.push(PfeResourceUsage {
                    pfe_number: int_or_zero(parts[0]),
                    encap_mem_free_percent: parts[1].to_string(),
                    nh_mem_free_percent: int_or_zero(parts[2]),
                    fw_mem_free_percent: int_or_zero(parts[3]),
                });
            }
        }
    }

    if result.fpc_resources.is_empty() && result.free_heap_mem_watermark == 0 {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemProcess {
    pub pid: i64,
    pub user: String,
    pub priority: i64,
    pub nice: i64,
    pub size: String,
    pub res: String,
    pub state: String,
    pub cpu_id: i64,
    pub time: String,
    pub cpu_percent: String,
    pub command: String,
}

#[derive(Debug, Default, Serialize)]
pub struct SystemProcesses {
    pub processes: Vec<SystemProcess>,
}

static PROCESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d+)\s+(\S+)\s+(\d+)\s+(\d+)\s+(\S+)\s+(\S+)\s+(\S+)\s+(\d+)\s+([\d:]+)\s+([\d.]+%)\s+(.+)$",
    )
    .unwrap()
});

/// Parse `show system processes | no-more` output (top-style listing).
pub fn parse_system_processes(text: &str) -> ParseOutcome {
    let mut result = SystemProcesses::default();

    for line in text.lines() {
        if let Some(caps) = PROCESS_RE.captures(line) {
            result.processes.push(SystemProcess {
                pid: int_or_zero(&caps[1]),
                user: caps[2].to_string(),
                priority: int_or_zero(&caps[3]),
                nice: int_or_zero(&caps[4]),
                size: caps[5].to_string(),
                res: caps[6].to_string(),
                state: caps[7].to_string(),
                cpu_id: int_or_zero(&caps[8]),
                time: caps[9].to_string(),
                cpu_percent: caps[10].to_string(),
                command: caps[11].trim().to_string(),
            });
        }
    }

    if result.processes.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub connection_id: String,
    pub source: String,
    pub destination: String,
    pub state: String,
}

#[derive(Debug, Default, Serialize)]
pub struct Connections {
    pub has_connections: bool,
    pub connections: Vec<Connection>,
}

static NO_CONNECTIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)No matching connections found").unwrap());

static CONNECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)\s+(\w+)$").unwrap());

/// Parse `show connections | no-more` output.
pub fn parse_connections(text: &str) -> ParseOutcome {
    let mut result = Connections::default();

    if NO_CONNECTIONS_RE.is_match(text) {
        return ParseOutcome::record(result);
    }

    for line in text.lines() {
        if line.trim().is_empty() || line.contains("Connection") {
            continue;
        }
        if let Some(caps) = CONNECTION_RE.captures(line.trim()) {
            result.connections.push(Connection {
                connection_id: caps[1].to_string(),
                source: caps[2].to_string(),
                destination: caps[3].to_string(),
                state: caps[4].to_string(),
            });
        }
    }

    result.has_connections = !result.connections.is_empty();
    if result.connections.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPTIME_SAMPLE: &str = "\
Current time: 2024-12-20 10:15:30 UTC
Time Source:  NTP CLOCK
System booted: 2024-10-01 08:00:00 UTC (11w4d 02:15 ago)
Protocols started: 2024-10-01 08:02:10 UTC (11w4d 02:13 ago)
Last configured: 2024-12-01 09:30:00 UTC (2w5d 00:45 ago) by netops
10:15AM  up 80 days, 2:15, 2 users, load averages: 0.45, 0.38, 0.30
";

    #[test]
    fn test_parse_uptime_fields() {
        let ParseOutcome::Parsed(v) = parse_system_uptime(UPTIME_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["time_source"], "NTP CLOCK");
        assert_eq!(v["system_booted_ago"], "11w4d 02:15 ago");
        assert_eq!(v["last_configured_by"], "netops");
        assert_eq!(v["users"], 2);
        assert_eq!(v["load_average_1min"], 0.45);
        assert_eq!(v["uptime_duration"], "80 days, 2:15");
    }

    const NTP_SAMPLE: &str = "\
  remote         refid      auth st t when poll reach   delay   offset   jitter rootdelay rootdisp
==========================================================================================
*10.1.1.10      10.0.0.5    none  2 u  120 1024   377    0.512   +0.134    0.089     1.250    2.100
+10.1.1.11      10.0.0.6    none  2 u  300 1024   377    0.618   -0.201    0.112     1.310    2.250
";

    #[test]
    fn test_parse_ntp_rows() {
        let ParseOutcome::Parsed(v) = parse_ntp_associations(NTP_SAMPLE) else {
            panic!("expected parsed");
        };
        let assoc = v["associations"].as_array().unwrap();
        assert_eq!(assoc.len(), 2);
        assert_eq!(assoc[0]["remote"], "*10.1.1.10");
        assert_eq!(assoc[0]["st"], 2);
        assert_eq!(assoc[0]["offset"], "+0.134");
        assert_eq!(assoc[1]["delay"], 0.618);
    }

    #[test]
    fn test_no_system_alarms() {
        let ParseOutcome::Parsed(v) = parse_system_alarms("No alarms currently active\n") else {
            panic!("expected parsed");
        };
        assert_eq!(v["has_alarms"], false);
        assert_eq!(v["alarm_count"], 0);
    }

    #[test]
    fn test_system_alarm_rows() {
        let sample = "\
2 alarms currently active
Alarm time           Class  Description
2024-12-19 22:10:05  Minor  Rescue configuration is not set
2024-12-20 01:02:03  Major  Host 0 Active Disk Usage Exceeded (95%)";
        let ParseOutcome::Parsed(v) = parse_system_alarms(sample) else {
            panic!("expected parsed");
        };
        assert_eq!(v["has_alarms"], true);
        assert_eq!(v["alarm_count"], 2);
        assert_eq!(v["alarms"][0]["alarm_class"], "Minor");
        assert_eq!(v["alarms"][1]["alarm_source"], "95%");
    }

    const RESOURCE_SAMPLE: &str = "\
FPC Resource Usage Summary

Free Heap Mem Watermark : 20
Free NH Mem Watermark   : 30
Free Filter Mem Watermark : 25

                         Heap
 Slot #                  % Free
      0                      78
     PFE #    ENCAP mem   NH mem   FW mem
      0           NA         82       91
      1           NA         80       90
";

    #[test]
    fn test_parse_resource_monitor() {
        let ParseOutcome::Parsed(v) = parse_resource_monitor_fpc(RESOURCE_SAMPLE) else {
            panic!("expected parsed");
        };
        assert_eq!(v["free_heap_mem_watermark"], 20);
        assert_eq!(v["free_filter_mem_watermark"], 25);
        let fpcs = v["fpc_resources"].as_array().unwrap();
        assert_eq!(fpcs.len(), 1);
        assert_eq!(fpcs[0]["heap_free_percent"], 78);
        let pfes = fpcs[0]["pfe_resources"].as_array().unwrap();
        assert_eq!(pfes.len(), 2);
        assert_eq!(pfes[0]["encap_mem_free_percent"], "NA");
        assert_eq!(pfes[1]["nh_mem_free_percent"], 80);
    }

    const PROCESS_SAMPLE: &str = "\
  PID USERNAME    PRI NICE   SIZE    RES STATE    C   TIME    WCPU COMMAND
11234 root         52    0   724M   158M select   0 412:30   1.12% rpd
11250 root         20    0   312M    85M select   1  88:02   0.40% mgd
";

    #[test]
    fn test_parse_processes() {
        let ParseOutcome::Parsed(v) = parse_system_processes(PROCESS_SAMPLE) else {
            panic!("expected parsed");
        };
        let procs = v["processes"].as_array().unwrap();
        assert_eq!(procs.len(), 2);
        assert_eq!(procs[0]["pid"], 11234);
        assert_eq!(procs[0]["command"], "rpd");
        assert_eq!(procs[1]["cpu_percent"], "0.40%");
    }

    #[test]
    fn test_no_connections() {
        let ParseOutcome::Parsed(v) = parse_connections("No matching connections found\n") else {
            panic!("expected parsed");
        };
        assert_eq!(v["has_connections"], false);
    }

    #[test]
    fn test_connection_rows() {
        let sample = "\
Connection-ID  Source          Destination     State
conn-1         10.0.0.1        10.0.0.2        Up
conn-2         10.0.0.1        10.0.0.3        Down
";
        let ParseOutcome::Parsed(v) = parse_connections(sample) else {
            panic!("expected parsed");
        };
        assert_eq!(v["has_connections"], true);
        let conns = v["connections"].as_array().unwrap();
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[0]["connection_id"], "conn-1");
        assert_eq!(conns[1]["state"], "Down");
    }
}
