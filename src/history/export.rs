// ABOUTME: CSV export of the session history.
// ABOUTME: Resolves the export file name and writes one row per record with the persisted field names.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::HistoryRecord;

/// File name used when the user leaves the name prompt empty.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "pomodoro-stats.csv";

/// Column headers, matching the persisted record field names.
pub const CSV_HEADERS: [&str; 4] = ["duration", "workspaceName", "startDateTime", "endDateTime"];

/// File name for an export: the default when `input` is absent or blank,
/// otherwise `input` with a `.csv` extension.
pub fn export_file_name(input: Option<&str>) -> String {
    match input.map(str::trim) {
        None | Some("") => DEFAULT_EXPORT_FILE_NAME.to_string(),
        Some(name) if name.to_ascii_lowercase().ends_with(".csv") => name.to_string(),
        Some(name) => format!("{}.csv", name),
    }
}

/// Full destination path for an export into `dir`.
pub fn export_path(dir: &Path, name: Option<&str>) -> PathBuf {
    dir.join(export_file_name(name))
}

/// Write `records` as CSV to `path`, replacing any existing file.
pub fn write_csv(path: &Path, records: &[HistoryRecord]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv_to(file, records)?;
    tracing::info!(path = %path.display(), count = records.len(), "exported history");
    Ok(())
}

/// Write `records` as CSV to any writer.
pub fn write_csv_to<W: Write>(writer: W, records: &[HistoryRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADERS)?;
    for record in records {
        wtr.write_record([
            format_minutes(record.duration_minutes()),
            record.workspace_name().to_string(),
            record.start_time().to_rfc3339(),
            record.end_time().to_rfc3339(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a minute count without a trailing `.0` for whole numbers.
pub fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 && minutes.abs() < 1e15 {
        format!("{}", minutes as i64)
    } else {
        minutes.to_string()
    }
}
