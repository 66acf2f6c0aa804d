// ABOUTME: Renders the combined store state as the human-readable log report.
// ABOUTME: Offers an atomic single-write strategy and a per-line append strategy.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use packd_core::{NamedStore, Packet, UnnamedStore};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while writing a report to disk.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

const NAMED_HEADER: &str = "Named Storage:\n";
const UNNAMED_HEADER: &str = "\nUnnamed Storage:\n";

fn named_line(name: &str, value: &Value) -> String {
    format!("{name}: {value}\n")
}

fn packet_block(packet: &Packet) -> String {
    format!(
        "Source: {}\nTimestamp: {}\nData: {}\n",
        packet.source(),
        packet.timestamp(),
        packet.data()
    )
}

/// Build the full report in memory. Named entries come first (one line
/// each), then a blank line, then one three-line block per packet in
/// insertion order. Values render as compact JSON.
pub fn render_report(named: &NamedStore, unnamed: &UnnamedStore) -> String {
    let mut out = String::from(NAMED_HEADER);
    for (name, value) in named.iter() {
        out.push_str(&named_line(name, value));
    }
    out.push_str(UNNAMED_HEADER);
    for packet in unnamed.packets() {
        out.push_str(&packet_block(packet));
    }
    out
}

/// Write the whole report in a single write. Nothing reaches disk until the
/// report is fully built, so a crash mid-build leaves no partial file.
pub fn write_report_atomic(
    path: &Path,
    named: &NamedStore,
    unnamed: &UnnamedStore,
) -> Result<(), ReportError> {
    std::fs::write(path, render_report(named, unnamed))?;
    Ok(())
}

fn append_line(path: &Path, line: &str) -> Result<(), ReportError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

/// Write the report one logical line at a time, opening and closing the
/// file per line. A crash after any completed line leaves a valid partial
/// report on disk, at the cost of many more I/O operations. The finished
/// file is byte-identical to the atomic strategy's output.
pub fn write_report_append(
    path: &Path,
    named: &NamedStore,
    unnamed: &UnnamedStore,
) -> Result<(), ReportError> {
    append_line(path, NAMED_HEADER)?;
    for (name, value) in named.iter() {
        append_line(path, &named_line(name, value))?;
    }
    append_line(path, UNNAMED_HEADER)?;
    for packet in unnamed.packets() {
        append_line(path, &packet_block(packet))?;
    }
    Ok(())
}
