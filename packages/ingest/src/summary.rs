//! Canonical summary CSV output.

use std::io::Write;
use std::path::Path;

use dengue_watch_case_models::{CaseRecord, SUMMARY_HEADERS};

use crate::IngestError;

/// Writes summary rows with a header line.
///
/// Values containing commas, quotes, or newlines are double-quoted with
/// inner quotes doubled. The header is written even when `groups` is
/// empty.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if writing fails.
pub fn write_summary(writer: impl Write, groups: &[CaseRecord]) -> Result<(), IngestError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(SUMMARY_HEADERS)?;
    for group in groups {
        writer.serialize(group)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the summary to `path` through a temporary sibling file that is
/// renamed into place once complete.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be created, written, or
/// renamed.
pub fn write_summary_file(path: &Path, groups: &[CaseRecord]) -> Result<(), IngestError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let file = std::fs::File::create(&tmp_path)?;
    if let Err(e) = write_summary(std::io::BufWriter::new(file), groups) {
        std::fs::remove_file(&tmp_path).ok();
        return Err(e);
    }
    std::fs::rename(&tmp_path, path)?;

    log::info!("Wrote {} summary rows to {}", groups.len(), path.display());
    Ok(())
}
