//! Delimited-file export
//!
//! Thin caller-side wrapper: the core components only return structured
//! records, so writing the timestamped one-file-per-report-kind CSV lives
//! here, next to the CLI that owns persistence.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::domain::{EmployeeRecord, ReportKind};

const HEADER: [&str; 12] = [
    "first_name",
    "middle_name",
    "last_name",
    "suffix",
    "ssn",
    "address",
    "state",
    "event_date",
    "event_kind",
    "birth_date",
    "received_date",
    "sent_date",
];

/// Write one report's records to `<out_dir>/<kind>_<YYYYmmdd_HHMMSS>.csv`.
/// Returns the written path.
pub fn write_report(
    out_dir: &Path,
    kind: ReportKind,
    records: &[EmployeeRecord],
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = out_dir.join(format!("{}_{timestamp}.csv", kind.slug()));

    let mut writer = BufWriter::new(File::create(&path)?);
    write_row(&mut writer, &HEADER.map(String::from))?;
    for record in records {
        write_row(&mut writer, &record_row(record, kind))?;
    }
    writer.flush()?;

    info!("Wrote {} record(s) to {:?}", records.len(), path);
    Ok(path)
}

fn record_row(record: &EmployeeRecord, kind: ReportKind) -> [String; 12] {
    [
        record.first_name.clone(),
        record.middle_name.clone(),
        record.last_name.clone(),
        record.suffix.clone(),
        record.ssn.clone(),
        record.address.clone(),
        record.state.clone(),
        record.event_date().unwrap_or_default().to_string(),
        kind.slug().to_string(),
        record.birth_date.clone(),
        record.received_date.clone(),
        record.sent_date.clone(),
    ]
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}
