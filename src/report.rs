use crate::error::Result;
use crate::models::{AppendOutcome, AppendResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

fn or_unknown(value: Option<usize>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

/// Write the human-readable summary.
pub fn write_summary<W: Write>(out: &mut W, outcome: &AppendOutcome) -> Result<()> {
    let result = &outcome.result;
    writeln!(out)?;
    writeln!(out, "Successfully appended row!")?;
    writeln!(out, "  Updated range: {}", result.updated_range)?;
    writeln!(out, "  Updated rows: {}", result.updated_rows)?;
    writeln!(out, "  Updated columns: {}", result.updated_columns)?;
    writeln!(out, "  Updated cells: {}", result.updated_cells)?;
    writeln!(out)?;
    writeln!(out, "Data length information:")?;
    writeln!(
        out,
        "  Existing rows before append: {}",
        or_unknown(outcome.existing_rows)
    )?;
    writeln!(
        out,
        "  Row number where data added: {}",
        or_unknown(outcome.target_row)
    )?;
    writeln!(out, "  Total rows after append: {}", outcome.total_rows())?;

    Ok(())
}

/// Write the `key=value` lines read back by the workflow.
pub fn write_outputs<W: Write>(out: &mut W, result: &AppendResult) -> Result<()> {
    writeln!(out, "updated_range={}", result.updated_range)?;
    writeln!(out, "updated_rows={}", result.updated_rows)?;
    Ok(())
}

/// Append the workflow outputs to `path`.
///
/// The file is expected to exist already; it is never created. Failures
/// are logged and otherwise ignored.
pub fn publish_outputs(path: &Path, result: &AppendResult) {
    let mut file = match OpenOptions::new().append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = ?path, "Failed to open output file: {}", e);
            return;
        }
    };

    match write_outputs(&mut file, result) {
        Ok(()) => debug!(path = ?path, "Wrote outputs"),
        Err(e) => warn!(path = ?path, "Failed to write outputs: {}", e),
    }
}

/// Print the summary to stdout and, when an output file is configured,
/// publish the outputs to it.
pub fn report(outcome: &AppendOutcome, github_output: Option<&Path>) {
    let stdout = std::io::stdout();
    report_to(&mut stdout.lock(), outcome, github_output);
}

/// The row is already written by the time this runs, so neither a failed
/// summary nor a failed output file is an error.
fn report_to<W: Write>(out: &mut W, outcome: &AppendOutcome, github_output: Option<&Path>) {
    if let Err(e) = write_summary(out, outcome) {
        warn!("Failed to write summary: {}", e);
    }

    if let Some(path) = github_output {
        publish_outputs(path, &outcome.result);
    }
}
