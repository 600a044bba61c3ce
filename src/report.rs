//! JSON artifacts: the per-command merge file and the run summary export.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::{ReportError, Result};
use crate::pipeline::{Phase, RunContext};

/// Merge one command's parsed record into the run's artifact file,
/// `{vendor}_{model}_{timestamp}.json` under `output_dir`.
///
/// The file accumulates across calls within a run: metadata is written
/// once, and each call upserts `commands[command_name]` — last write wins
/// for a repeated command name.
pub fn write_command_artifact(
    output_dir: impl AsRef<Path>,
    ctx: &RunContext,
    command_name: &str,
    record: &Value,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.display().to_string(),
        source,
    })?;

    let filename = format!("{}_{}_{}.json", ctx.vendor, ctx.model, ctx.timestamp);
    let path = output_dir.join(filename);

    let mut data = if path.exists() {
        let text = fs::read_to_string(&path).map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ReportError::Merge {
            path: path.display().to_string(),
            source,
        })?
    } else {
        json!({
            "metadata": {
                "timestamp": ctx.timestamp,
                "vendor": ctx.vendor.as_str(),
                "model": ctx.model,
            },
            "commands": {}
        })
    };

    data["commands"][command_name] = record.clone();

    let rendered = serde_json::to_string_pretty(&data).map_err(|source| ReportError::Merge {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(&path, rendered).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!("artifact updated: {}", path.display());
    Ok(path)
}

/// Write every parsed record from a phase into the artifact file.
pub fn write_phase_artifacts(
    output_dir: impl AsRef<Path>,
    ctx: &RunContext,
    phase: Phase,
) -> Result<Option<PathBuf>> {
    let output_dir = output_dir.as_ref();
    let mut path = None;
    for entry in ctx.entries(phase) {
        if entry.has_record() {
            path = Some(write_command_artifact(
                output_dir,
                ctx,
                &entry.command,
                &entry.record,
            )?);
        }
    }
    Ok(path)
}

/// Export the per-device run summary.
///
/// One JSON file per export, keyed by device key; each entry keeps only
/// the first line of its raw output — the summary is an index, the full
/// text lives in the tracker.
pub fn export_run_summary(
    output_dir: impl AsRef<Path>,
    ctx: &RunContext,
    phase: Phase,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.display().to_string(),
        source,
    })?;

    let checks: Vec<Value> = ctx
        .entries(phase)
        .iter()
        .map(|entry| {
            let first_line = entry
                .output
                .trim()
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            json!({
                "cmd": entry.command,
                "output": first_line,
                "json": entry.record,
                "exception": entry.failure,
            })
        })
        .collect();

    let slot = match phase {
        Phase::Pre => "pre_checks",
        Phase::Post => "post_checks",
    };
    let mut device = serde_json::Map::new();
    device.insert(
        "device_details".to_string(),
        json!({
            "device_key": ctx.device_key,
            "vendor": ctx.vendor.as_str(),
            "model": ctx.model,
            "pre_check_timestamp": ctx.timestamp,
        }),
    );
    device.insert(slot.to_string(), Value::Array(checks));
    let mut root = serde_json::Map::new();
    root.insert(ctx.device_key.clone(), Value::Object(device));
    let summary = Value::Object(root);

    let path = output_dir.join(format!("{}.json", summary_timestamp()));
    let rendered = serde_json::to_string_pretty(&summary).map_err(|source| ReportError::Merge {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(&path, rendered).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    info!("summary written: {}", path.display());
    Ok(path)
}

fn summary_timestamp() -> String {
    let format = format_description!("[day]_[month]_[year repr:last_two]_[hour]_[minute]");
    OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_else(|_| String::from("unknown-time"))
}
