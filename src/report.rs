// CSV log of removed devices, one file per run.

use crate::api::Device;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

const HEADER: [&str; 3] = ["Device Name", "Device ID", "Last Checkin Time"];

/// File name for a log written at `epoch_secs`.
pub fn log_file_name(epoch_secs: i64) -> String {
    format!("deletions_{epoch_secs}_log.csv")
}

/// Write `devices` to `dir/deletions_<epoch_secs>_log.csv` and return the path.
pub fn write_log(dir: &Path, epoch_secs: i64, devices: &[Device]) -> Result<PathBuf> {
    let path = dir.join(log_file_name(epoch_secs));
    fs::write(&path, render(devices))
        .with_context(|| format!("Failed to write deletion log: {:?}", path))?;
    info!("wrote {} devices to {}", devices.len(), path.display());
    Ok(path)
}

fn render(devices: &[Device]) -> String {
    let mut out = String::new();
    push_record(&mut out, &HEADER);
    for d in devices {
        push_record(&mut out, &[d.name.as_str(), d.id.as_str(), d.last_contact_time.as_str()]);
    }
    out
}

fn push_record(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\r', '\n']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push_str("\r\n");
}
