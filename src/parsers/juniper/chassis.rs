//! Chassis parsers: hardware inventory, FPC detail, alarms, routing engine,
//! and environment.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsers::{ParseOutcome, float_or_zero, int_or_zero};

#[derive(Debug, Clone, Serialize)]
pub struct ChassisHardwareItem {
    pub item: String,
    pub version: Option<String>,
    pub part_number: String,
    pub serial_number: String,
    pub description: String,
    pub indent_level: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct ChassisHardware {
    pub items: Vec<ChassisHardwareItem>,
}

fn hardware_item(line: &str) -> Option<ChassisHardwareItem> {
    let indent = line.len() - line.trim_start().len();
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    let mut version = None;
    let (item, remaining): (String, &[&str]) = if let Some(rev_index) =
        parts.iter().position(|p| *p == "REV")
    {
        version = parts.get(rev_index + 1).map(|v| v.to_string());
        (parts[..rev_index].join(" "), &parts[rev_index + 2..])
    } else if matches!(parts[0], "Chassis" | "FPC" | "PIC" | "Xcvr" | "PEM" | "CB") {
        if parts.len() > 1 && parts[1].chars().all(|c| c.is_ascii_digit()) {
            (format!("{} {}", parts[0], parts[1]), &parts[2..])
        } else {
            (parts[0].to_string(), &parts[1..])
        }
    } else if parts[0] == "Routing" && parts.get(1) == Some(&"Engine") {
        if parts.len() > 2 {
            (format!("Routing Engine {}", parts[2]), &parts[3..])
        } else {
            ("Routing Engine".to_string(), &[][..])
        }
    } else if parts[0] == "Fan" && parts.get(1) == Some(&"Tray") {
        if parts.len() > 2 {
            (format!("Fan Tray {}", parts[2]), &parts[3..])
        } else {
            ("Fan Tray".to_string(), &[][..])
        }
    } else {
        (parts[0].to_string(), &parts[1..])
    };

    let (part_number, serial_number, description) = match remaining.len() {
        0 => (String::new(), String::new(), String::new()),
        1 => (remaining[0].to_string(), String::new(), String::new()),
        2 => (remaining[0].to_string(), remaining[1].to_string(), String::new()),
        _ => (
            remaining[0].to_string(),
            remaining[1].to_string(),
            remaining[2..].join(" "),
        ),
    };

    Some(ChassisHardwareItem {
        item,
        version,
        part_number,
        serial_number,
        description,
        indent_level: indent / 2,
    })
}

/// Parse `show chassis hardware | no-more` output. Column positions drift
/// between platforms, so tokens are classified instead of sliced.
pub fn parse_chassis_hardware(text: &str) -> ParseOutcome {
    let mut result = ChassisHardware::default();

    for line in text.lines() {
        if line.contains("Hardware inventory:")
            || (line.contains("Item") && line.contains("Version"))
            || line.trim().is_empty()
        {
            continue;
        }
        if let Some(item) = hardware_item(line) {
            result.items.push(item);
        }
    }

    if result.items.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChassisFpcSlot {
    pub slot: i64,
    pub state: String,
    pub total_cpu_dram: String,
    pub total_rldram: String,
    pub total_ddr_dram: String,
    pub fips_capable: String,
    pub temperature: String,
    pub start_time: String,
    pub uptime: String,
    pub high_performance_mode_support: String,
    pub pfes_in_high_performance_mode: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ChassisFpcDetail {
    pub slots: Vec<ChassisFpcSlot>,
}

static SLOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Slot\s+(\d+)\s+information:").unwrap());
static FPC_STATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"State\s+(\S+)").unwrap());
static CPU_DRAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Total CPU DRAM\s+(.+)").unwrap());
static RLDRAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Total RLDRAM\s+(.+)").unwrap());
static DDR_DRAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Total DDR DRAM\s+(.+)").unwrap());
static FIPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"FIPS Capable\s+(\S+)").unwrap());
static FPC_TEMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Temperature\s+(\S+)").unwrap());
static FPC_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Start time\s+(.+)").unwrap());
static FPC_UPTIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Uptime\s+(.+)").unwrap());
static HP_SUPPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"High-Performance mode support\s+(\S+)").unwrap());
static HP_PFES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PFEs in High-Performance mode\s+(.+)").unwrap());

fn capture_str(re: &Regex, block: &str) -> String {
    re.captures(block)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}

/// Parse `show chassis fpc detail | no-more` output, one block per slot.
pub fn parse_chassis_fpc_detail(text: &str) -> ParseOutcome {
    let mut result = ChassisFpcDetail::default();

    let slot_matches: Vec<(i64, usize)> = SLOT_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let end = caps.get(0)?.end();
            Some((int_or_zero(&caps[1]), end))
        })
        .collect();

    let starts: Vec<usize> = SLOT_RE.find_iter(text).map(|m| m.start()).collect();

    for (idx, (slot, block_start)) in slot_matches.iter().enumerate() {
        let block_end = starts.get(idx + 1).copied().unwrap_or(text.len());
        let block = &text[*block_start..block_end];

        result.slots.push(ChassisFpcSlot {
            slot: *slot,
            state: capture_str(&FPC_STATE_RE, block),
            total_cpu_dram: capture_str(&CPU_DRAM_RE, block),
            total_rldram: capture_str(&RLDRAM_RE, block),
            total_ddr_dram: capture_str(&DDR_DRAM_RE, block),
            fips_capable: capture_str(&FIPS_RE, block),
            temperature: capture_str(&FPC_TEMP_RE, block),
            start_time: capture_str(&FPC_START_RE, block),
            uptime: capture_str(&FPC_UPTIME_RE, block),
            high_performance_mode_support: capture_str(&HP_SUPPORT_RE, block),
            pfes_in_high_performance_mode: capture_str(&HP_PFES_RE, block),
        });
    }

    if result.slots.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct ChassisAlarm {
    pub alarm_time: String,
    pub alarm_class: String,
    pub alarm_description: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ChassisAlarms {
    pub has_alarms: bool,
    pub alarm_count: i64,
    pub alarms: Vec<ChassisAlarm>,
}

static NO_ALARMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)No alarms currently active").unwrap());

static CHASSIS_ALARM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}(?:\s+\S+)?)\s+(Major|Minor)\s+(.+)$")
        .unwrap()
});

/// Parse `show chassis alarms | no-more` output.
pub fn parse_chassis_alarms(text: &str) -> ParseOutcome {
    let mut result = ChassisAlarms::default();

    if NO_ALARMS_RE.is_match(text) {
        return ParseOutcome::record(result);
    }

    for caps in CHASSIS_ALARM_RE.captures_iter(text) {
        result.alarms.push(ChassisAlarm {
            alarm_time: caps[1].trim().to_string(),
            alarm_class: caps[2].trim().to_string(),
            alarm_description: caps[3].trim().to_string(),
        });
    }

    result.has_alarms = !result.alarms.is_empty();
    result.alarm_count = result.alarms.len() as i64;

    if result.alarms.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CpuUtilization {
    pub user: i64,
    pub background: i64,
    pub kernel: i64,
    pub interrupt: i64,
    pub idle: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadAverages {
    pub one_minute: f64,
    pub five_minute: f64,
    pub fifteen_minute: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RoutingEngineStatus {
    pub temperature: String,
    pub cpu_temperature: String,
    pub dram: String,
    pub memory_utilization: i64,
    pub cpu_util_5_sec: Option<CpuUtilization>,
    pub cpu_util_1_min: Option<CpuUtilization>,
    pub cpu_util_5_min: Option<CpuUtilization>,
    pub cpu_util_15_min: Option<CpuUtilization>,
    pub model: String,
    pub start_time: String,
    pub uptime: String,
    pub last_reboot_reason: String,
    pub load_averages: Option<LoadAverages>,
}

#[derive(Debug, Default, Serialize)]
pub struct ChassisRoutingEngine {
    pub routing_engines: Vec<RoutingEngineStatus>,
}

static RE_TEMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Temperature\s+(\d+\s+degrees\s+C\s+/\s+\d+\s+degrees\s+F)").unwrap()
});
static RE_CPU_TEMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"CPU temperature\s+(\d+\s+degrees\s+C\s+/\s+\d+\s+degrees\s+F)").unwrap()
});
static DRAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"DRAM\s+(\d+\s+MB.*?)(?:\n|$)").unwrap());
static MEM_UTIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Memory utilization\s+(\d+)\s+percent").unwrap());
static MODEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Model\s+(.+?)(?:\n|$)").unwrap());
static START_TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Start time\s+(.+?)(?:\n|$)").unwrap());
static RE_UPTIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Uptime\s+(.+?)(?:\n|$)").unwrap());
static REBOOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Last reboot reason\s+(.+?)(?:\n|$)").unwrap());
static LOAD_AVG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Load averages:.*?\n\s+([\d.]+)\s+([\d.]+)\s+([\d.]+)").unwrap()
});

fn cpu_utilization(text: &str, window: &str) -> Option<CpuUtilization> {
    let pattern = format!(
        r"{window} CPU utilization:\s+User\s+(\d+)\s+percent\s+Background\s+(\d+)\s+percent\s+Kernel\s+(\d+)\s+percent\s+Interrupt\s+(\d+)\s+percent\s+Idle\s+(\d+)\s+percent"
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(text)?;
    Some(CpuUtilization {
        user: int_or_zero(&caps[1]),
        background: int_or_zero(&caps[2]),
        kernel: int_or_zero(&caps[3]),
        interrupt: int_or_zero(&caps[4]),
        idle: int_or_zero(&caps[5]),
    })
}

/// Parse `show chassis routing-engine | no-more` output.
pub fn parse_chassis_routing_engine(text: &str) -> ParseOutcome {
    let mut status = RoutingEngineStatus {
        temperature: capture_str(&RE_TEMP_RE, text),
        cpu_temperature: capture_str(&RE_CPU_TEMP_RE, text),
        dram: capture_str(&DRAM_RE, text),
        model: capture_str(&MODEL_RE, text),
        start_time: capture_str(&START_TIME_RE, text),
        uptime: capture_str(&RE_UPTIME_RE, text),
        last_reboot_reason: capture_str(&REBOOT_RE, text),
        cpu_util_5_sec: cpu_utilization(text, "5 sec"),
        cpu_util_1_min: cpu_utilization(text, "1 min"),
        cpu_util_5_min: cpu_utilization(text, "5 min"),
        cpu_util_15_min: cpu_utilization(text, "15 min"),
        ..RoutingEngineStatus::default()
    };

    if let Some(caps) = MEM_UTIL_RE.captures(text) {
        status.memory_utilization = int_or_zero(&caps[1]);
    }
    if let Some(caps) = LOAD_AVG_RE.captures(text) {
        status.load_averages = Some(LoadAverages {
            one_minute: float_or_zero(&caps[1]),
            five_minute: float_or_zero(&caps[2]),
            fifteen_minute: float_or_zero(&caps[3]),
        });
    }

    if status.model.is_empty() && status.temperature.is_empty() && status.uptime.is_empty() {
        return ParseOutcome::Empty;
    }

    let mut result = ChassisRoutingEngine::default();
    result.routing_engines.push(status);
    ParseOutcome::record(result)
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentItem {
    pub item_class: Option<String>,
    pub item_name: String,
    pub status: String,
    pub measurement: String,
}

#[derive(Debug, Default, Serialize)]
pub struct ChassisEnvironment {
    pub items: Vec<EnvironmentItem>,
}

/// Parse `show chassis environment | no-more` output. The class column only
/// appears on the first row of each group.
pub fn parse_chassis_environment(text: &str) -> ParseOutcome {
    let mut result = ChassisEnvironment::default();
    let mut current_class: Option<String> = None;

    for line in text.lines() {
        if line.contains("Class Item") || line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            continue;
        };

        let rest: String = if matches!(*first, "Temp" | "Power" | "Fans") {
            current_class = Some(first.to_string());
            parts[1..].join(" ")
        } else {
            line.trim().to_string()
        };

        let rest_parts: Vec<&str> = rest.split_whitespace().collect();
        let Some(status_index) = rest_parts
            .iter()
            .position(|w| matches!(*w, "OK" | "Absent" | "Failed" | "Check"))
        else {
            continue;
        };

        result.items.push(EnvironmentItem {
            item_class: current_class.clone(),
            item_name: rest_parts[..status_index].join(" "),
            status: rest_parts[status_index].to_string(),
            measurement: rest_parts[status_index + 1..].join(" "),
        });
    }

    if result.items.is_empty() {
        return ParseOutcome::Empty;
    }
    ParseOutcome::record(result)
}
