//! Report export. The text report goes to stdout; this writes the same
//! run as JSON for machine consumers.
use std::path::Path;

use crate::error::AppResult;
use crate::summary::RunReport;

/// Writes the run report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error when serialization or the file write fails.
pub fn write_json_report(path: &Path, report: &RunReport) -> AppResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
